// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process groups, so a timeout takes down everything git started.
//!
//! ```text
//! build_command()   process_group(0)       child pid == pgid
//! timeout           killpg(pgid, SIGKILL)  git, remote-https, index-pack, ...
//!                   reap child
//!                   wait_group_exit()      until ESRCH or GROUP_EXIT_WAIT
//! ```

use std::io;
use std::time::Duration;

use nix::errno::Errno;
use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;
use tokio::process::Command;
use tracing::{debug, warn};

/// Upper bound on waiting for killed group members to disappear. Orphans are
/// reaped by init, which may never happen in a minimal container.
const GROUP_EXIT_WAIT: Duration = Duration::from_secs(2);
const GROUP_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Makes the child the leader of a new process group.
pub(super) fn own_process_group(command: &mut Command) {
    command.process_group(0);
}

fn group_of(pid: u32) -> Option<Pid> {
    i32::try_from(pid).ok().map(Pid::from_raw)
}

/// Sends SIGKILL to every process in the group led by `pid`.
///
/// A group that is already gone is not an error.
pub(super) fn kill_group(pid: u32) -> io::Result<()> {
    let Some(pgid) = group_of(pid) else {
        return Ok(());
    };
    match killpg(pgid, Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(errno) => Err(io::Error::from(errno)),
    }
}

/// Polls the group until no member is left or the wait runs out.
pub(super) async fn wait_group_exit(pid: u32) {
    let Some(pgid) = group_of(pid) else {
        return;
    };
    let deadline = tokio::time::Instant::now() + GROUP_EXIT_WAIT;
    loop {
        match killpg(pgid, None) {
            Err(Errno::ESRCH) => {
                debug!(pgid = pid, "process group gone");
                return;
            }
            Err(errno) => {
                warn!(pgid = pid, error = %errno, "cannot probe process group");
                return;
            }
            Ok(()) => {}
        }
        if tokio::time::Instant::now() >= deadline {
            warn!(pgid = pid, wait = ?GROUP_EXIT_WAIT, "process group still present after kill");
            return;
        }
        tokio::time::sleep(GROUP_POLL_INTERVAL).await;
    }
}
