// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Concurrent archive-operation engine.
//!
//! ```text
//!                  ConcurrentDispatcher
//!                  (JoinSet + Semaphore)
//!                   |        |        |
//!              AssetFilter   |     Forker (fork_dispatch)
//!                            v
//!                  GitOperationRunner ---> core::process (git, timeout)
//!                            |
//!                     failed identifiers
//!                            v
//!                     FailureCleaner ---> DirRemover (fs)
//! ```
//!
//! Everything a batch needs lives in one [`ArchiveContext`], built once per
//! run and shared by reference with every task.

pub mod cleaner;
pub mod dispatcher;
pub mod filter;
pub mod runner;


use bon::Builder;
use futures_util::future::BoxFuture;
use std::path::{Path, PathBuf};

use crate::asset::GitAsset;
use crate::config::Config;
use crate::config::types::DEFAULT_NUM_THREADS;
use crate::error::ArchiveResult;

pub use cleaner::{DirRemover, FailureCleaner, FsRemover};
pub use dispatcher::{ConcurrentDispatcher, DispatchReport};
pub use filter::AssetFilter;
pub use runner::GitOperationRunner;

/// Something that can fork an asset into the authenticated account.
pub trait Forker: Send + Sync {
    fn fork<'a>(&'a self, asset: &'a GitAsset) -> BoxFuture<'a, ArchiveResult<()>>;
}

/// Per-run state shared by every archive task.
#[derive(Debug, Clone, Builder)]
pub struct ArchiveContext {
    #[builder(into)]
    archive_root: PathBuf,
    #[builder(default = DEFAULT_NUM_THREADS)]
    threads: usize,
    #[builder(default)]
    filter: AssetFilter,
    runner: GitOperationRunner,
}

impl ArchiveContext {
    /// Builds the context from configuration, resolving git from PATH.
    ///
    /// # Errors
    ///
    /// Returns an error if git is not installed.
    pub fn from_config(config: &Config) -> ArchiveResult<Self> {
        Ok(Self::builder()
            .archive_root(config.location())
            .threads(config.archive.threads)
            .filter(AssetFilter::from_config(&config.filter))
            .runner(GitOperationRunner::from_config(config)?)
            .build())
    }

    #[must_use]
    pub fn archive_root(&self) -> &Path {
        &self.archive_root
    }

    #[must_use]
    pub const fn threads(&self) -> usize {
        self.threads
    }

    #[must_use]
    pub const fn filter(&self) -> &AssetFilter {
        &self.filter
    }

    #[must_use]
    pub const fn runner(&self) -> &GitOperationRunner {
        &self.runner
    }
}
