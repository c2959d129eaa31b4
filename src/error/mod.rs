// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!            ArchiveError (~24 bytes)
//!                     |
//!   +-------+-------+-------+-------+-------+
//!   |       |       |       |       |       |
//!   v       v       v       v       v       v
//! Bail    Cfg    Proc   Cleanup  GitHub  Io/Other
//!         Box    Box     Box     Box     Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Config   ParseError, InvalidValue, Conflict, Missing
//!   Process  ExecutableNotFound, SpawnFailed, WaitFailed
//!   Cleanup  RemoveFailed
//!   GitHub   Request, HttpError, ForkFailed, TokenRequired
//!
//! Per-asset git failures are NOT errors: they are reported through
//! `OperationOutcome` and never abort a batch.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`ArchiveError`].
pub type ArchiveResult<T> = std::result::Result<T, ArchiveError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Fatal error that should terminate the run.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Process could not be started or observed.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// A failed asset's directory could not be removed.
    #[error("cleanup error: {0}")]
    Cleanup(#[from] Box<CleanupError>),

    /// GitHub API error.
    #[error("github error: {0}")]
    Github(#[from] Box<GithubError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

/// Create a fatal [`ArchiveError::Bailed`] that terminates the run.
pub fn bail_out(message: impl Into<String>) -> ArchiveError {
    ArchiveError::Bailed(message.into().into_boxed_str())
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for ArchiveError {
                fn from(err: $error) -> Self {
                    ArchiveError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ConfigError => Config,
    ProcessError => Process,
    CleanupError => Cleanup,
    GithubError => Github,
    std::io::Error => Io,
}

// --- Config Errors ---

/// Configuration-related errors.
///
/// These are rejected before the archive engine is ever invoked.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration sources.
    #[error("failed to parse config '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// Two options that cannot be combined were both set.
    #[error("'{first}' and '{second}' cannot be used together")]
    Conflict { first: String, second: String },

    /// A required input is missing.
    #[error("{0}")]
    Missing(String),
}

// --- Process Errors ---

/// Process execution errors.
///
/// Only conditions that prevent a subprocess from running at all live here.
/// Non-zero exits and timeouts are observed outcomes, not errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed while waiting on or killing the process.
    #[error("failed to observe process '{command}': {source}")]
    WaitFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

// --- Cleanup Errors ---

/// Errors removing the working directory of a failed asset.
#[derive(Debug, Error)]
pub enum CleanupError {
    /// Removal failed even after the tree was made writable.
    #[error("failed to remove '{path}' after making it writable: {source}")]
    RemoveFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// --- GitHub Errors ---

/// GitHub API errors.
#[derive(Debug, Error)]
pub enum GithubError {
    /// Error from reqwest library.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// HTTP error response.
    #[error("http error {status}: {url}")]
    HttpError { status: u16, url: String },

    /// A fork request was rejected.
    #[error("failed to fork {asset}: {message}")]
    ForkFailed { asset: String, message: String },

    /// An operation needs an authenticated client.
    #[error("a GitHub token is required to {0}")]
    TokenRequired(String),
}

#[cfg(test)]
mod tests;
