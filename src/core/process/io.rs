// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! I/O streaming and output capture for processes.
//!
//! ```text
//! run_child()
//!   stdout/stderr reader tasks (each returns its captured text)
//!   wait | timeout
//!     exited   --> join readers
//!     timeout  --> kill the process group, reap, abort readers,
//!                  wait for the group to exit (unix)
//!   --> ProcessOutput { exit_code, stdout, stderr, timed_out }
//! ```

use std::io;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

use super::builder::{ProcessBuilder, ProcessOutput, StreamFlags};

/// Spawns a reader task for a piped child stream.
fn spawn_reader<R>(
    stream: Option<R>,
    flags: StreamFlags,
    process_name: &str,
    stream_name: &'static str,
) -> Option<JoinHandle<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    stream.map(|stream| {
        let name = process_name.to_string();
        tokio::spawn(async move { read_stream(stream, flags, &name, stream_name).await })
    })
}

/// Joins a finished reader. A panicked reader yields no output.
async fn join_reader(handle: Option<JoinHandle<String>>) -> String {
    match handle {
        Some(handle) => handle.await.unwrap_or_default(),
        None => String::new(),
    }
}

/// Aborts a reader that may still be blocked on a pipe held open by a
/// grandchild of the killed process.
fn abort_reader(handle: Option<JoinHandle<String>>) {
    if let Some(handle) = handle {
        handle.abort();
    }
}

impl ProcessBuilder {
    /// Runs the child process, handling I/O streaming and waiting for completion.
    pub(super) async fn run_child(&self, name: &str, child: &mut Child) -> io::Result<ProcessOutput> {
        let stdout_handle = spawn_reader(child.stdout.take(), self.stdout, name, "stdout");
        let stderr_handle = spawn_reader(child.stderr.take(), self.stderr, name, "stderr");

        let Some(timeout_duration) = self.timeout else {
            let status = child.wait().await?;
            return Ok(ProcessOutput::new(
                status.code(),
                join_reader(stdout_handle).await,
                join_reader(stderr_handle).await,
                false,
            ));
        };

        tokio::select! {
            status = child.wait() => {
                let status = status?;
                Ok(ProcessOutput::new(
                    status.code(),
                    join_reader(stdout_handle).await,
                    join_reader(stderr_handle).await,
                    false,
                ))
            }
            () = tokio::time::sleep(timeout_duration) => {
                warn!(process = %name, timeout = ?timeout_duration, "process timed out");
                #[cfg(unix)]
                let pid = child.id();
                #[cfg(unix)]
                if let Some(pid) = pid {
                    super::unix::kill_group(pid)?;
                }
                child.kill().await?;
                abort_reader(stdout_handle);
                abort_reader(stderr_handle);
                #[cfg(unix)]
                if let Some(pid) = pid {
                    super::unix::wait_group_exit(pid).await;
                }
                Ok(ProcessOutput::new(None, String::new(), String::new(), true))
            }
        }
    }
}

/// Reads a stream line by line, forwarding to logs and/or keeping the text.
async fn read_stream<R>(
    reader: R,
    flags: StreamFlags,
    process_name: &str,
    stream_name: &str,
) -> String
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut output = String::new();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if flags.contains(StreamFlags::FORWARD_TO_LOG) {
                    trace!(process = %process_name, stream = %stream_name, line = %line, "output");
                }
                if flags.contains(StreamFlags::KEEP_IN_STRING) {
                    if !output.is_empty() {
                        output.push('\n');
                    }
                    output.push_str(&line);
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(
                    process = %process_name,
                    stream = %stream_name,
                    error = %e,
                    "error reading stream"
                );
                break;
            }
        }
    }

    output
}
