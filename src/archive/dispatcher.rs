// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Bounded fan-out of git operations.
//!
//! ```text
//! dispatch(assets, op)
//!   for asset:
//!     filter?          no  --> filtered
//!     path seen?       yes --> duplicate, dropped
//!     acquire permit   (waits while `threads` tasks run)
//!     spawn runner.run(request)
//!   join every task    (barrier)
//!   --> DispatchReport { succeeded, skipped, filtered, failed }
//! ```
//!
//! A fatal error (git could not be spawned, a task panicked) stops further
//! submissions. Tasks already running are still joined before it is returned.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use super::{ArchiveContext, Forker};
use crate::asset::{GitAsset, Operation, OperationOutcome, OperationRequest};
use crate::error::{ArchiveError, ArchiveResult, bail_out};

/// Aggregate result of one dispatched batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Assets whose git operation succeeded.
    pub succeeded: usize,
    /// Assets the idempotence guard skipped.
    pub skipped: usize,
    /// Assets rejected by the filter or dropped as duplicates.
    pub filtered: usize,
    /// Identifiers of assets whose operation failed.
    pub failed: BTreeSet<String>,
}

impl DispatchReport {
    fn record(&mut self, outcome: OperationOutcome) {
        match outcome {
            OperationOutcome::Success => self.succeeded += 1,
            OperationOutcome::Skipped => self.skipped += 1,
            OperationOutcome::Failure { identifier, .. } => {
                self.failed.insert(identifier);
            }
        }
    }

    /// Number of assets submitted to the pool.
    #[must_use]
    pub fn submitted(&self) -> usize {
        self.succeeded + self.skipped + self.failed.len()
    }
}

/// Fans operations for a list of assets out over a bounded pool.
#[derive(Debug, Clone)]
pub struct ConcurrentDispatcher {
    context: Arc<ArchiveContext>,
    permits: Arc<Semaphore>,
}

impl ConcurrentDispatcher {
    /// Creates a dispatcher. Pool size is the context's thread count, at least 1.
    #[must_use]
    pub fn new(context: ArchiveContext) -> Self {
        let permits = Arc::new(Semaphore::new(context.threads().max(1)));
        Self {
            context: Arc::new(context),
            permits,
        }
    }

    #[must_use]
    pub fn context(&self) -> &ArchiveContext {
        &self.context
    }

    /// Runs `operation` for every qualifying asset and returns the identifiers
    /// of the ones that failed.
    ///
    /// # Errors
    ///
    /// Returns an error only for run-aborting conditions such as git failing
    /// to spawn. Per-asset failures are part of the returned set.
    pub async fn dispatch(
        &self,
        assets: &[GitAsset],
        operation: Operation,
    ) -> ArchiveResult<BTreeSet<String>> {
        self.dispatch_report(assets, operation)
            .await
            .map(|report| report.failed)
    }

    /// Like [`Self::dispatch`], but also returns success and skip counts.
    ///
    /// # Errors
    ///
    /// See [`Self::dispatch`].
    pub async fn dispatch_report(
        &self,
        assets: &[GitAsset],
        operation: Operation,
    ) -> ArchiveResult<DispatchReport> {
        let mut report = DispatchReport::default();
        let mut set: JoinSet<ArchiveResult<OperationOutcome>> = JoinSet::new();
        let mut seen: BTreeSet<PathBuf> = BTreeSet::new();
        let mut fatal: Option<ArchiveError> = None;

        for asset in assets {
            if !self.context.filter().should_include(asset) {
                report.filtered += 1;
                continue;
            }

            let request =
                OperationRequest::new(asset.clone(), operation, self.context.archive_root());
            if !seen.insert(request.local_path().to_path_buf()) {
                debug!(asset = %asset.full_name(), "duplicate asset dropped");
                report.filtered += 1;
                continue;
            }

            let permit = self.acquire().await?;
            if let Some(err) = drain_finished(&mut set, &mut report) {
                fatal = Some(err);
                break;
            }

            let context = Arc::clone(&self.context);
            set.spawn(async move {
                let _permit = permit;
                context.runner().run(&request).await
            });
        }

        while let Some(joined) = set.join_next().await {
            if let Some(err) = absorb(joined, &mut report) {
                if fatal.is_some() {
                    error!(error = %err, "additional fatal error in batch");
                } else {
                    fatal = Some(err);
                }
            }
        }

        if let Some(err) = fatal {
            return Err(err);
        }

        info!(
            %operation,
            succeeded = report.succeeded,
            skipped = report.skipped,
            failed = report.failed.len(),
            filtered = report.filtered,
            "batch complete"
        );
        Ok(report)
    }

    /// Forks every qualifying asset. Failures are logged and never touch the
    /// filesystem.
    ///
    /// # Errors
    ///
    /// Only if the worker pool has been closed.
    pub async fn fork_dispatch(
        &self,
        assets: &[GitAsset],
        forker: Arc<dyn Forker>,
    ) -> ArchiveResult<()> {
        let mut set: JoinSet<(String, ArchiveResult<()>)> = JoinSet::new();

        for asset in assets {
            if !self.context.filter().should_include(asset) {
                continue;
            }

            let permit = self.acquire().await?;
            let forker = Arc::clone(&forker);
            let asset = asset.clone();
            set.spawn(async move {
                let _permit = permit;
                let result = forker.fork(&asset).await;
                (asset.full_name(), result)
            });
        }

        let (mut forked, mut failed) = (0_usize, 0_usize);
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((asset, Ok(()))) => {
                    info!(%asset, "forked");
                    forked += 1;
                }
                Ok((asset, Err(err))) => {
                    error!(%asset, error = %err, "fork failed");
                    failed += 1;
                }
                Err(err) => {
                    error!(error = %err, "fork task panicked");
                    failed += 1;
                }
            }
        }

        info!(forked, failed, "fork batch complete");
        Ok(())
    }

    async fn acquire(&self) -> ArchiveResult<OwnedSemaphorePermit> {
        Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| bail_out("worker pool closed"))
    }
}

/// Records tasks that already finished. Returns the first fatal error seen.
fn drain_finished(
    set: &mut JoinSet<ArchiveResult<OperationOutcome>>,
    report: &mut DispatchReport,
) -> Option<ArchiveError> {
    let mut fatal = None;
    while let Some(joined) = set.try_join_next() {
        if let Some(err) = absorb(joined, report) {
            fatal.get_or_insert(err);
        }
    }
    fatal
}

/// Records one joined task, returning a fatal error instead of recording it.
fn absorb(
    joined: Result<ArchiveResult<OperationOutcome>, JoinError>,
    report: &mut DispatchReport,
) -> Option<ArchiveError> {
    match joined {
        Ok(Ok(outcome)) => {
            report.record(outcome);
            None
        }
        Ok(Err(err)) => Some(err),
        Err(err) => {
            warn!(error = %err, "archive task panicked");
            Some(ArchiveError::Other(format!("archive task panicked: {err}").into()))
        }
    }
}
