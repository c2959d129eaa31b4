// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning and management.
//!
//! ```text
//! ProcessBuilder::new("git")
//!   .args() .env() .capture_output() .timeout()
//!   .run()
//!       --> tokio::process::Command (stdin=null, kill_on_drop)
//!           stream stdout/stderr
//!           timeout --> kill the process group (unix)
//!       --> ProcessOutput { exit_code, stdout, stderr, timed_out }
//! ```

pub mod builder;
mod io;
mod runner;
#[cfg(unix)]
mod unix;
#[cfg(test)]
mod tests;
