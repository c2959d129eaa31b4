// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git assets and the requests/outcomes that flow through the archive engine.
//!
//! ```text
//! GitAsset { kind, owner_login, name_or_id, is_fork, language, urls }
//!     |
//!     | + Operation::{Clone, Pull} + archive root
//!     v
//! OperationRequest { asset, operation, local_path }
//!     |
//!     v
//! OperationOutcome::{Success, Skipped, Failure { reason, identifier }}
//!
//! Layout:
//!   <root>/repos/<owner_login>/<name>   identifier "owner/name"
//!   <root>/gists/<gist_id>              identifier "gist_id"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// What kind of git asset this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Repository,
    Gist,
}

impl AssetKind {
    /// The top-level directory under the archive root for this kind.
    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            Self::Repository => Category::Repos,
            Self::Gist => Category::Gists,
        }
    }

    /// Human-readable label used in log lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Repository => "Repo",
            Self::Gist => "Gist",
        }
    }
}

/// Top-level directory of the archive layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Repos,
    Gists,
}

impl Category {
    /// Directory name under the archive root.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Repos => "repos",
            Self::Gists => "gists",
        }
    }

    /// Absolute directory of this category under `root`.
    #[must_use]
    pub fn dir(self, root: &Path) -> PathBuf {
        root.join(self.dir_name())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A git operation that touches the local archive.
///
/// Forking is remote-only and is handled by `fork_dispatch`, so it has no
/// variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Clone,
    Pull,
}

impl Operation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clone => "clone",
            Self::Pull => "pull",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A clonable/pullable unit: a repository or a gist.
///
/// Identity is `(owner_login, name_or_id)`. `owner_login` is lowercased on
/// construction so that paths are stable regardless of how the API spells it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitAsset {
    kind: AssetKind,
    owner_login: String,
    name_or_id: String,
    is_fork: bool,
    language: Option<String>,
    clone_url_ssh: String,
    clone_url_https: String,
}

impl GitAsset {
    /// Creates a repository asset.
    pub fn repository(
        owner_login: impl AsRef<str>,
        name: impl Into<String>,
        clone_url_ssh: impl Into<String>,
        clone_url_https: impl Into<String>,
    ) -> Self {
        Self {
            kind: AssetKind::Repository,
            owner_login: owner_login.as_ref().to_lowercase(),
            name_or_id: name.into(),
            is_fork: false,
            language: None,
            clone_url_ssh: clone_url_ssh.into(),
            clone_url_https: clone_url_https.into(),
        }
    }

    /// Creates a gist asset. Gists are only ever cloned over HTTPS.
    pub fn gist(
        owner_login: impl AsRef<str>,
        id: impl Into<String>,
        clone_url_https: impl Into<String>,
    ) -> Self {
        let https = clone_url_https.into();
        Self {
            kind: AssetKind::Gist,
            owner_login: owner_login.as_ref().to_lowercase(),
            name_or_id: id.into(),
            is_fork: false,
            language: None,
            clone_url_ssh: https.clone(),
            clone_url_https: https,
        }
    }

    /// Marks the asset as a fork.
    #[must_use]
    pub const fn with_fork(mut self, is_fork: bool) -> Self {
        self.is_fork = is_fork;
        self
    }

    /// Sets the primary language reported by the API.
    #[must_use]
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    #[must_use]
    pub const fn kind(&self) -> AssetKind {
        self.kind
    }

    #[must_use]
    pub fn owner_login(&self) -> &str {
        &self.owner_login
    }

    #[must_use]
    pub fn name_or_id(&self) -> &str {
        &self.name_or_id
    }

    #[must_use]
    pub const fn is_fork(&self) -> bool {
        self.is_fork
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    #[must_use]
    pub fn clone_url_ssh(&self) -> &str {
        &self.clone_url_ssh
    }

    #[must_use]
    pub fn clone_url_https(&self) -> &str {
        &self.clone_url_https
    }

    /// `owner/name`, used in log lines and views.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner_login, self.name_or_id)
    }

    /// Path-form identifier relative to the category directory.
    ///
    /// This is what failed operations report and what `cleanup` joins onto
    /// `root/category` to find the directory to remove.
    #[must_use]
    pub fn identifier(&self) -> String {
        match self.kind {
            AssetKind::Repository => self.full_name(),
            AssetKind::Gist => self.name_or_id.clone(),
        }
    }

    /// Deterministic working copy location under `archive_root`.
    #[must_use]
    pub fn local_path(&self, archive_root: &Path) -> PathBuf {
        let category_dir = self.kind.category().dir(archive_root);
        match self.kind {
            AssetKind::Repository => category_dir.join(&self.owner_login).join(&self.name_or_id),
            AssetKind::Gist => category_dir.join(&self.name_or_id),
        }
    }
}

/// One unit of work for the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    asset: GitAsset,
    operation: Operation,
    local_path: PathBuf,
}

impl OperationRequest {
    /// Builds a request, deriving the local path from the archive root.
    #[must_use]
    pub fn new(asset: GitAsset, operation: Operation, archive_root: &Path) -> Self {
        let local_path = asset.local_path(archive_root);
        Self {
            asset,
            operation,
            local_path,
        }
    }

    #[must_use]
    pub const fn asset(&self) -> &GitAsset {
        &self.asset
    }

    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    #[must_use]
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }
}

/// Why a git operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureReason {
    /// The subprocess exceeded its wall-clock budget and was killed.
    Timeout,
    /// git exited with a non-zero status.
    ProcessError,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("timeout"),
            Self::ProcessError => f.write_str("process error"),
        }
    }
}

/// Result of running one [`OperationRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    /// git ran and succeeded.
    Success,
    /// The idempotence guard fired; git was never invoked.
    Skipped,
    /// git ran and failed; `identifier` locates the directory to clean up.
    Failure {
        reason: FailureReason,
        identifier: String,
    },
}
