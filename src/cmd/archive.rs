// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Archive run orchestration.
//!
//! ```text
//! run_archive(args, config)
//!   check lists/operations/token
//!   plan: personal (token owner in --users) → users → orgs → gists → stars
//!   for each context:
//!     enumerate → view → clone → cleanup → pull → cleanup → fork
//!   summary
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::archive::{
    ArchiveContext, AssetFilter, ConcurrentDispatcher, FailureCleaner, Forker, GitOperationRunner,
};
use crate::asset::{GitAsset, Operation};
use crate::cli::archive::ArchiveArgs;
use crate::config::Config;
use crate::error::{ArchiveResult, ConfigError, GithubError, Result};
use crate::github::{Context, GithubClient};

/// Operations requested for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Operations {
    pub view: bool,
    pub clone: bool,
    pub pull: bool,
    pub fork: bool,
}

impl Operations {
    #[must_use]
    pub const fn from_args(args: &ArchiveArgs) -> Self {
        Self {
            view: args.view,
            clone: args.clone,
            pull: args.pull,
            fork: args.fork,
        }
    }

    const fn needs_git(self) -> bool {
        self.clone || self.pull
    }
}

/// One enumeration context and the owners it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedContext {
    pub context: Context,
    pub owners: Vec<String>,
}

/// Totals over a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub assets: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cleaned: usize,
}

/// Rejects argument combinations that cannot produce a run.
///
/// # Errors
///
/// Returns a `ConfigError::Missing` if lists or operations are missing, or a
/// `GithubError::TokenRequired` when forking without a token.
pub fn check_request(args: &ArchiveArgs, config: &Config) -> ArchiveResult<()> {
    match (args.has_lists(), args.has_operations()) {
        (true, true) => {}
        (true, false) => {
            return Err(ConfigError::Missing(
                "an operation (--view, --clone, --pull or --fork) must be given with a list".into(),
            )
            .into());
        }
        (false, true) => {
            return Err(ConfigError::Missing(
                "a list (--users, --orgs, --gists or --stars) must be given with an operation"
                    .into(),
            )
            .into());
        }
        (false, false) => {
            return Err(ConfigError::Missing(
                "at least one operation and one list must be given".into(),
            )
            .into());
        }
    }

    if args.fork && !config.github.has_token() {
        return Err(GithubError::TokenRequired("fork".into()).into());
    }
    Ok(())
}

/// Orders the contexts of a run. `authenticated` is the token owner's login,
/// which moves from the user context into the personal one.
#[must_use]
pub fn plan_contexts(args: &ArchiveArgs, authenticated: Option<&str>) -> Vec<PlannedContext> {
    let mut users = ArchiveArgs::owners(&args.users);
    let mut plan = Vec::new();

    if let Some(login) = authenticated
        && let Some(index) = users.iter().position(|user| user == login)
    {
        users.remove(index);
        plan.push(PlannedContext {
            context: Context::Personal,
            owners: vec![login.to_string()],
        });
    }

    let lists = [
        (Context::User, users),
        (Context::Org, ArchiveArgs::owners(&args.orgs)),
        (Context::Gist, ArchiveArgs::owners(&args.gists)),
        (Context::Star, ArchiveArgs::owners(&args.stars)),
    ];
    plan.extend(
        lists
            .into_iter()
            .filter(|(_, owners)| !owners.is_empty())
            .map(|(context, owners)| PlannedContext { context, owners }),
    );
    plan
}

/// Drives the archive engine over every planned context.
#[derive(Debug)]
pub struct Archiver {
    client: Arc<GithubClient>,
    dispatcher: ConcurrentDispatcher,
    cleaner: FailureCleaner,
    operations: Operations,
}

impl Archiver {
    #[must_use]
    pub fn new(
        client: GithubClient,
        context: ArchiveContext,
        operations: Operations,
    ) -> Self {
        Self {
            client: Arc::new(client),
            dispatcher: ConcurrentDispatcher::new(context),
            cleaner: FailureCleaner::new(),
            operations,
        }
    }

    /// Runs every context in order.
    ///
    /// # Errors
    ///
    /// Stops at the first enumeration error, spawn failure or cleanup failure.
    pub async fn run(&self, plan: &[PlannedContext]) -> ArchiveResult<RunSummary> {
        let mut summary = RunSummary::default();
        for planned in plan {
            self.run_context(planned, &mut summary).await?;
        }
        Ok(summary)
    }

    async fn run_context(
        &self,
        planned: &PlannedContext,
        summary: &mut RunSummary,
    ) -> ArchiveResult<()> {
        let context = planned.context;
        info!(%context, owners = ?planned.owners, "# fetching");
        let assets = self.client.list_assets(context, &planned.owners).await?;
        summary.assets += assets.len();

        if self.operations.view {
            info!(%context, count = assets.len(), "# viewing");
            view(&assets);
        }
        if self.operations.clone {
            info!(%context, "# cloning missing assets");
            self.archive_batch(context, &assets, Operation::Clone, summary).await?;
        }
        if self.operations.pull {
            info!(%context, "# pulling changes");
            self.archive_batch(context, &assets, Operation::Pull, summary).await?;
        }
        if self.operations.fork {
            info!(%context, "# forking");
            let forker: Arc<dyn Forker> = self.client.clone();
            self.dispatcher.fork_dispatch(&assets, forker).await?;
        }
        Ok(())
    }

    async fn archive_batch(
        &self,
        context: Context,
        assets: &[GitAsset],
        operation: Operation,
        summary: &mut RunSummary,
    ) -> ArchiveResult<()> {
        let report = self.dispatcher.dispatch_report(assets, operation).await?;
        summary.succeeded += report.succeeded;
        summary.skipped += report.skipped;
        summary.failed += report.failed.len();

        if !report.failed.is_empty() {
            let root = self.dispatcher.context().archive_root();
            let category = context.asset_kind().category();
            summary.cleaned += self
                .cleaner
                .cleanup_async(root, category, &report.failed)
                .await?;
        }
        Ok(())
    }
}

fn view(assets: &[GitAsset]) {
    for asset in assets {
        info!("{}: {}", asset.kind().label(), asset.full_name());
    }
}

/// Runs the archive for the parsed arguments and merged configuration.
///
/// # Errors
///
/// Returns an error if the request is incomplete, git is missing, the GitHub
/// API cannot be reached, or a failed working copy cannot be removed.
pub async fn run_archive(args: &ArchiveArgs, config: &Config) -> Result<()> {
    check_request(args, config)?;

    let started = Instant::now();
    info!(location = %config.location().display(), "# GitHub Archive started");

    let operations = Operations::from_args(args);
    let context = if operations.needs_git() {
        ArchiveContext::from_config(config)?
    } else {
        ArchiveContext::builder()
            .archive_root(config.location())
            .threads(config.archive.threads)
            .filter(AssetFilter::from_config(&config.filter))
            .runner(GitOperationRunner::new("git", config.timeout()))
            .build()
    };

    let client = GithubClient::from_config(config)?;
    let authenticated = if client.is_authenticated() && !args.users.is_empty() {
        Some(client.authenticated_login().await?)
    } else {
        None
    };
    let plan = plan_contexts(args, authenticated.as_deref());

    let archiver = Archiver::new(client, context, operations);
    let summary = archiver.run(&plan).await?;

    log_summary(&summary, started.elapsed());
    Ok(())
}

fn log_summary(summary: &RunSummary, elapsed: Duration) {
    if summary.failed > 0 {
        warn!(
            failed = summary.failed,
            cleaned = summary.cleaned,
            "some assets failed; they will be retried on the next run"
        );
    }
    info!(
        assets = summary.assets,
        succeeded = summary.succeeded,
        skipped = summary.skipped,
        failed = summary.failed,
        cleaned = summary.cleaned,
        "# GitHub Archive complete! Execution time: {elapsed:.2?}"
    );
}
