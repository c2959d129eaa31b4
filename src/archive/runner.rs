// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Single clone/pull execution.
//!
//! ```text
//! OperationRequest
//!   |
//!   +-- clone && path exists   --> Skipped
//!   +-- pull  && path missing  --> Skipped
//!   |
//!   v
//! git clone <url> <path>          (SSH unless https or no token)
//! git -C <path> pull --rebase
//!   |
//!   +-- exit 0     --> Success
//!   +-- timed out  --> Failure(Timeout)
//!   +-- exit != 0  --> Failure(ProcessError)
//! ```

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::asset::{FailureReason, GitAsset, Operation, OperationOutcome, OperationRequest};
use crate::config::Config;
use crate::core::process::builder::ProcessBuilder;
use crate::error::{ArchiveResult, ProcessError};

/// Runs one git operation per request, bounded by a wall-clock timeout.
#[derive(Debug, Clone)]
pub struct GitOperationRunner {
    git: PathBuf,
    timeout: Duration,
    use_https: bool,
    has_token: bool,
}

impl GitOperationRunner {
    /// Creates a runner for the given git executable.
    ///
    /// HTTPS is used until a token is declared with [`Self::with_token`].
    pub fn new(git: impl AsRef<Path>, timeout: Duration) -> Self {
        Self {
            git: git.as_ref().to_path_buf(),
            timeout,
            use_https: false,
            has_token: false,
        }
    }

    /// Resolves `git` from PATH and applies the archive settings.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::ExecutableNotFound` if git is not installed.
    pub fn from_config(config: &Config) -> ArchiveResult<Self> {
        let git = ProcessBuilder::find("git").ok_or_else(|| ProcessError::ExecutableNotFound {
            name: "git".to_string(),
        })?;
        Ok(Self::new(git, config.timeout())
            .with_https(config.archive.use_https)
            .with_token(config.github.has_token()))
    }

    /// Forces HTTPS remotes for clones.
    #[must_use]
    pub const fn with_https(mut self, use_https: bool) -> Self {
        self.use_https = use_https;
        self
    }

    /// Declares whether a credential token is configured. SSH remotes are only
    /// used when one is.
    #[must_use]
    pub const fn with_token(mut self, has_token: bool) -> Self {
        self.has_token = has_token;
        self
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Picks the remote a clone uses for this asset.
    #[must_use]
    pub fn clone_url<'a>(&self, asset: &'a GitAsset) -> &'a str {
        if self.use_https || !self.has_token {
            asset.clone_url_https()
        } else {
            asset.clone_url_ssh()
        }
    }

    /// Runs one request.
    ///
    /// # Errors
    ///
    /// Only when git cannot be started at all. Non-zero exits and timeouts
    /// are returned as [`OperationOutcome::Failure`].
    pub async fn run(&self, request: &OperationRequest) -> ArchiveResult<OperationOutcome> {
        let asset = request.asset();
        let operation = request.operation();
        let path = request.local_path();

        if Self::is_settled(operation, path) {
            debug!(
                asset = %asset.full_name(),
                %operation,
                path = %path.display(),
                "skipped"
            );
            return Ok(OperationOutcome::Skipped);
        }

        let builder = self.command(request);
        let started = Instant::now();
        let output = builder.run().await?;
        let elapsed = started.elapsed();

        if output.success() {
            info!(
                kind = asset.kind().label(),
                asset = %asset.full_name(),
                %operation,
                elapsed = ?elapsed,
                "done"
            );
            return Ok(OperationOutcome::Success);
        }

        let reason = if output.timed_out() {
            error!(
                kind = asset.kind().label(),
                asset = %asset.full_name(),
                %operation,
                timeout = ?self.timeout,
                "timed out"
            );
            FailureReason::Timeout
        } else {
            error!(
                kind = asset.kind().label(),
                asset = %asset.full_name(),
                %operation,
                exit_code = ?output.exit_code(),
                output = %output.combined(),
                "git failed"
            );
            FailureReason::ProcessError
        };

        Ok(OperationOutcome::Failure {
            reason,
            identifier: asset.identifier(),
        })
    }

    /// Idempotence guard: a clone target that exists is already archived, and
    /// a pull target that does not exist has nothing to update.
    fn is_settled(operation: Operation, path: &Path) -> bool {
        match operation {
            Operation::Clone => path.exists(),
            Operation::Pull => !path.exists(),
        }
    }

    fn command(&self, request: &OperationRequest) -> ProcessBuilder {
        let path = request.local_path();
        let builder = ProcessBuilder::new(&self.git)
            .name(format!("git {}", request.operation()))
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GCM_INTERACTIVE", "never")
            .capture_output()
            .timeout(self.timeout);

        match request.operation() {
            Operation::Clone => builder
                .arg("clone")
                .arg(self.clone_url(request.asset()))
                .arg(path),
            Operation::Pull => builder.arg("-C").arg(path).args(["pull", "--rebase"]),
        }
    }
}
