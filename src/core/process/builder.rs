// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Subprocess description and its observed output.
//!
//! ```text
//! ProcessBuilder::new(git) .arg .args .env .name .timeout .capture_output
//!   --> run() --> ProcessOutput { exit_code, stdout, stderr, timed_out }
//!
//! StreamFlags   FORWARD_TO_LOG (default)  trace every line
//!               KEEP_IN_STRING            keep text in the output
//! ```

use bitflags::bitflags;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

bitflags! {
    /// Flags controlling stream handling for stdout/stderr.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StreamFlags: u32 {
        /// Forward output to tracing logs
        const FORWARD_TO_LOG = 0x01;
        /// Keep output in a string for later retrieval
        const KEEP_IN_STRING = 0x04;
    }
}

impl Default for StreamFlags {
    fn default() -> Self {
        Self::FORWARD_TO_LOG
    }
}

/// Output from a completed (or killed) process.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    exit_code: Option<i32>,
    stdout: String,
    stderr: String,
    timed_out: bool,
}

impl ProcessOutput {
    pub(super) const fn new(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        timed_out: bool,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            timed_out,
        }
    }

    /// Returns the exit code, or `None` if the process was killed by a signal.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Returns captured stdout (if `KEEP_IN_STRING` was set).
    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Returns captured stdout followed by stderr, skipping empty streams.
    #[must_use]
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (false, false) => format!("{}\n{}", self.stdout, self.stderr),
            (false, true) => self.stdout.clone(),
            (true, _) => self.stderr.clone(),
        }
    }

    /// Returns whether the process was killed for exceeding its timeout.
    #[must_use]
    pub const fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Returns true if the process exited on its own with code 0.
    #[must_use]
    pub const fn success(&self) -> bool {
        !self.timed_out && matches!(self.exit_code, Some(0))
    }
}

/// A git (or any) subprocess waiting to be run.
///
/// Arguments are passed as a vector; nothing goes through a shell.
#[derive(Debug)]
pub struct ProcessBuilder {
    pub(super) program: PathBuf,
    pub(super) args: Vec<String>,
    /// Added on top of the inherited environment.
    pub(super) env: Vec<(String, String)>,
    pub(super) stdout: StreamFlags,
    pub(super) stderr: StreamFlags,
    /// Display name for logging; the program's file stem otherwise.
    pub(super) name: Option<String>,
    /// Wall-clock limit after which the child is killed.
    pub(super) timeout: Option<Duration>,
}

impl ProcessBuilder {
    /// A bare name is resolved via PATH at spawn time.
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: Vec::new(),
            stdout: StreamFlags::default(),
            stderr: StreamFlags::default(),
            name: None,
            timeout: None,
        }
    }

    /// Resolves `program` via PATH.
    #[must_use]
    pub fn find(program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_string_lossy().into_owned()));
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Keeps stdout and stderr in the output while still tracing every line.
    #[must_use]
    pub const fn capture_output(mut self) -> Self {
        self.stdout = StreamFlags::KEEP_IN_STRING.union(StreamFlags::FORWARD_TO_LOG);
        self.stderr = StreamFlags::KEEP_IN_STRING.union(StreamFlags::FORWARD_TO_LOG);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Kills the child and everything it started once `duration` has
    /// elapsed; the output is then marked as timed out.
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }
}
