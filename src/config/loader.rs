// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Layered configuration loading.
//!
//! ```text
//! ConfigLoader::new()
//!   .add_toml_file_optional("github-archive.toml")
//!   .add_toml_file(--ini)...
//!   .with_env_prefix("GITHUB_ARCHIVE")
//!   .set_option(--set) / .set() / .set_list()   (CLI flags)
//!        |
//!        v
//!    build() --> normalize --> validate --> Config
//! ```
//!
//! Later sources win. Environment variables are applied after every file, and
//! overrides after the environment.

use std::fmt;
use std::path::{Path, PathBuf};

use config::{File, FileFormat};

use super::Config;
use crate::error::{ConfigError, Result};

/// A file-like source, kept for `inis` and error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--ini FILE`; must exist.
    File(PathBuf),
    /// Picked up only when present.
    Optional(PathBuf),
    /// Inline TOML.
    Inline,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "[file] {}", path.display()),
            Self::Optional(path) => write!(f, "[optional] {}", path.display()),
            Self::Inline => f.write_str("[string] <string>"),
        }
    }
}

/// Builder for loading configuration from multiple sources.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            sources: Vec::new(),
        }
    }

    fn add_file(mut self, path: &Path, required: bool) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path).format(FileFormat::Toml).required(required));
        self
    }

    /// Adds a TOML file that must exist when `build()` runs.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(self, path: P) -> Self {
        let path = path.as_ref();
        let mut loader = self.add_file(path, true);
        loader.sources.push(ConfigSource::File(path.to_path_buf()));
        loader
    }

    /// Adds a TOML file that is skipped when absent.
    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(self, path: P) -> Self {
        let path = path.as_ref();
        let mut loader = self.add_file(path, false);
        if path.exists() {
            loader
                .sources
                .push(ConfigSource::Optional(path.to_path_buf()));
        }
        loader
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.sources.push(ConfigSource::Inline);
        self
    }

    /// Reads `<PREFIX>_<SECTION>__<KEY>` environment variables.
    ///
    /// The double underscore separates section from key because keys such as
    /// `use_https` contain single underscores.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Sets a single override.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a valid config path.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
        Ok(self)
    }

    /// Applies a `key=value` override as given to `--set`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the option has no `=`.
    pub fn set_option(self, option: &str) -> Result<Self> {
        let Some((key, value)) = option.split_once('=') else {
            return Err(ConfigError::InvalidValue {
                section: "cli".to_string(),
                key: option.to_string(),
                message: "expected KEY=VALUE".to_string(),
            }
            .into());
        };
        self.set(key.trim(), value.trim())
    }

    /// Sets a list override (e.g. `filter.include`). Empty lists are ignored so
    /// that absent CLI flags never clear file settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid.
    pub fn set_list<I, S>(self, key: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Ok(self);
        }
        self.set(key, values)
    }

    /// Merges every source into a validated [`Config`].
    ///
    /// # Errors
    ///
    /// Returns an error if a required file is missing or malformed, a value
    /// has the wrong type, an unknown key is present, or validation fails
    /// (e.g. include and exclude both set).
    pub fn build(self) -> Result<Config> {
        let builder = match &self.env_prefix {
            Some(prefix) => self.builder.add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            ),
            None => self.builder,
        };

        let merged = builder.build().map_err(|e| ConfigError::ParseError {
            path: self
                .sources
                .last()
                .map_or_else(|| "<defaults>".to_string(), ToString::to_string),
            message: e.to_string(),
        })?;
        let mut config: Config = merged.try_deserialize()?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn sources(&self) -> &[ConfigSource] {
        &self.sources
    }

    /// Numbered source list, as printed by `inis`.
    #[must_use]
    pub fn format_loaded_files(&self) -> Vec<String> {
        self.sources
            .iter()
            .enumerate()
            .map(|(i, source)| format!("{}. {source}", i + 1))
            .collect()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
