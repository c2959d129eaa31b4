// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and lifecycle management.
//!
//! ```text
//! run()
//!   |
//!   v
//! build_command()
//! args, env, stdin=null, stdout/stderr piped, kill_on_drop,
//! own process group (unix)
//!   |
//!   v
//! spawn() --(io error)--> ProcessError::SpawnFailed
//!   |
//!   v
//! run_child()  wait | timeout -> kill the group
//!   |
//!   v
//! ProcessOutput { exit_code, stdout, stderr, timed_out }
//! ```
//!
//! Non-zero exits and timeouts are reported in the output, never as errors:
//! callers decide what a failed process means for them.

use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, trace};

use super::builder::{ProcessBuilder, ProcessOutput};
use crate::error::{ArchiveResult, ProcessError};

impl ProcessBuilder {
    /// Explicit name, or the program's file stem.
    fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        self.program.file_stem().map_or_else(
            || "process".to_string(),
            |stem| stem.to_string_lossy().into_owned(),
        )
    }

    /// Returns the full command line as a string (for logging).
    #[must_use]
    pub fn command_line(&self) -> String {
        use std::fmt::Write as _;

        let mut cmd = self.program.display().to_string();
        for arg in &self.args {
            if arg.contains(' ') {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }

    /// Spawns and runs the process, waiting for completion or timeout.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` if the child cannot be spawned, waited on, or
    /// killed. A non-zero exit or an expired timeout is not an error.
    pub async fn run(self) -> ArchiveResult<ProcessOutput> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        debug!(cmd = %cmd_line, "exec");

        let mut command = self.build_command();

        let mut child = command.spawn().map_err(|source| ProcessError::SpawnFailed {
            command: cmd_line.clone(),
            source,
        })?;

        trace!(process = %name, pid = ?child.id(), "spawned");

        let output = self
            .run_child(&name, &mut child)
            .await
            .map_err(|source| ProcessError::WaitFailed {
                command: cmd_line,
                source,
            })?;

        trace!(
            process = %name,
            exit_code = ?output.exit_code(),
            timed_out = output.timed_out(),
            "completed"
        );
        Ok(output)
    }

    /// Builds the tokio Command from this builder's configuration.
    fn build_command(&self) -> Command {
        let mut command = Command::new(&self.program);

        command.args(&self.args);

        for (key, value) in &self.env {
            command.env(key, value);
        }

        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        // A timed-out or abandoned child must never outlive its handle.
        command.kill_on_drop(true);

        // git forks remote helpers and index-pack; a timeout has to reach them.
        #[cfg(unix)]
        super::unix::own_process_group(&mut command);

        command
    }
}
