// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration sections.
//!
//! ```text
//! Config: GlobalConfig, ArchiveConfig, FilterConfig, GithubConfig
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::logging::LogLevel;

/// Default number of concurrent git operations.
pub const DEFAULT_NUM_THREADS: usize = 10;

/// Default per-operation timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Global options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for stdout output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file (default: `<location>/logs/github-archive.log`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::DEBUG,
            log_file: None,
        }
    }
}

/// Where and how assets are archived.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Archive root; `repos/` and `gists/` live underneath.
    pub location: PathBuf,
    /// Maximum number of concurrent git operations.
    pub threads: usize,
    /// Per-operation timeout in seconds.
    pub timeout: u64,
    /// Clone over HTTPS instead of SSH.
    pub use_https: bool,
    /// Include forked repositories when enumerating.
    pub forks: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
            threads: DEFAULT_NUM_THREADS,
            timeout: DEFAULT_TIMEOUT_SECS,
            use_https: false,
            forks: false,
        }
    }
}

/// `~/github-archive`, or `./github-archive` when no home directory exists.
#[must_use]
pub fn default_location() -> PathBuf {
    dirs::home_dir().map_or_else(
        || PathBuf::from("github-archive"),
        |home| home.join("github-archive"),
    )
}

/// Per-asset filters. At most one of `include`, `exclude`, `languages` may be
/// non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Only these repository names.
    pub include: BTreeSet<String>,
    /// Every repository except these names.
    pub exclude: BTreeSet<String>,
    /// Only repositories whose primary language is listed (case-insensitive).
    pub languages: BTreeSet<String>,
}

/// GitHub API access.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GithubConfig {
    /// Personal access token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// REST API base URL.
    pub api_url: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl GithubConfig {
    /// Whether a non-blank token is configured.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.as_deref().and_then(non_blank_token).is_some()
    }
}

/// The token with surrounding whitespace removed, or `None` if nothing is left.
#[must_use]
pub fn non_blank_token(token: impl AsRef<str>) -> Option<String> {
    let token = token.as_ref().trim();
    (!token.is_empty()).then(|| token.to_string())
}
