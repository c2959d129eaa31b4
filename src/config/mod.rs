// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for github-archive.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. github-archive.toml (cwd, optional)
//! 3. --ini FILE (repeatable)
//! 4. GITHUB_ARCHIVE_* env vars
//! 5. CLI flags
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GITHUB_ARCHIVE_ARCHIVE__THREADS=4        → archive.threads = 4
//! GITHUB_ARCHIVE_ARCHIVE__USE_HTTPS=true   → archive.use_https = true
//! GITHUB_ARCHIVE_GITHUB__TOKEN=ghp_...     → github.token
//! ```
//!
//! # Example
//!
//! ```toml
//! [archive]
//! location = "/backups/github"
//! threads = 16
//! timeout = 600
//!
//! [filter]
//! languages = ["rust", "python"]
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{ArchiveConfig, FilterConfig, GithubConfig, GlobalConfig, non_blank_token};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "GITHUB_ARCHIVE";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "github-archive.toml";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Archive location and git behavior.
    pub archive: ArchiveConfig,
    /// Per-asset filters.
    pub filter: FilterConfig,
    /// GitHub API access.
    pub github: GithubConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use github_archive::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("github-archive.toml")
    ///     .with_env_prefix("GITHUB_ARCHIVE")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML, does not match the
    /// `Config` structure, or fails validation.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Archive root.
    #[must_use]
    pub fn location(&self) -> &Path {
        &self.archive.location
    }

    /// Per-operation timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.archive.timeout)
    }

    /// Lowercases language filters, trims filter entries and the token, and
    /// drops a blank token.
    pub fn normalize(&mut self) {
        self.github.token = self.github.token.take().and_then(non_blank_token);
        let trim = |set: &std::collections::BTreeSet<String>| {
            set.iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        };
        self.filter.include = trim(&self.filter.include);
        self.filter.exclude = trim(&self.filter.exclude);
        self.filter.languages = self
            .filter
            .languages
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
    }

    /// Rejects option combinations the archive engine does not accept.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `threads` or `timeout` is zero, if include and
    /// exclude are both set, or if languages are combined with either.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.archive.threads == 0 {
            return Err(ConfigError::InvalidValue {
                section: "archive".to_string(),
                key: "threads".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.archive.timeout == 0 {
            return Err(ConfigError::InvalidValue {
                section: "archive".to_string(),
                key: "timeout".to_string(),
                message: "must be a positive number of seconds".to_string(),
            });
        }

        let filter = &self.filter;
        if !filter.include.is_empty() && !filter.exclude.is_empty() {
            return Err(ConfigError::Conflict {
                first: "include".to_string(),
                second: "exclude".to_string(),
            });
        }
        if !filter.languages.is_empty() {
            let other = if filter.include.is_empty() {
                (!filter.exclude.is_empty()).then_some("exclude")
            } else {
                Some("include")
            };
            if let Some(other) = other {
                return Err(ConfigError::Conflict {
                    first: "languages".to_string(),
                    second: other.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// The token is hidden. Output is deterministically ordered.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let join = |set: &std::collections::BTreeSet<String>| {
            set.iter().cloned().collect::<Vec<_>>().join(",")
        };

        let mut options = BTreeMap::new();
        options.insert(
            "global.output_log_level",
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level",
            self.global.file_log_level.as_u8().to_string(),
        );
        if let Some(log_file) = &self.global.log_file {
            options.insert("global.log_file", log_file.display().to_string());
        }
        options.insert("archive.location", self.archive.location.display().to_string());
        options.insert("archive.threads", self.archive.threads.to_string());
        options.insert("archive.timeout", self.archive.timeout.to_string());
        options.insert("archive.use_https", self.archive.use_https.to_string());
        options.insert("archive.forks", self.archive.forks.to_string());
        options.insert("filter.include", join(&self.filter.include));
        options.insert("filter.exclude", join(&self.filter.exclude));
        options.insert("filter.languages", join(&self.filter.languages));
        options.insert("github.api_url", self.github.api_url.clone());
        if self.github.has_token() {
            options.insert("github.token", "[hidden]".to_string());
        }

        let max_key_len = options.keys().map(|k| k.len()).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}
