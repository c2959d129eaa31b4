// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Options shared by the archive run and the helper commands.
//!
//! ```text
//! --ini FILE          extra config file, repeatable, loaded in order
//! --no-default-inis   skip ./github-archive.toml
//! --set KEY=VALUE     raw config override, repeatable
//! --log-level N       console verbosity 0-6
//! --file-log-level N  file verbosity, defaults to --log-level
//! --log-file FILE     default <location>/logs/github-archive.log
//! ```
//!
//! Flags become `key=value` overrides applied after files and environment.

use clap::Args;
use std::path::PathBuf;

use crate::logging::LogLevel;

fn parse_log_level(value: &str) -> Result<LogLevel, String> {
    let level: u8 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    LogLevel::new(level).map_err(|e| e.to_string())
}

/// Config sources and logging.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Additional TOML config file. Can be given multiple times.
    #[arg(short = 'i', long = "ini", value_name = "FILE", action = clap::ArgAction::Append)]
    pub inis: Vec<PathBuf>,

    /// Do not load `github-archive.toml` from the current directory.
    #[arg(long = "no-default-inis")]
    pub no_default_inis: bool,

    /// Sets an option, such as 'archive.threads=4'. Can be given multiple times.
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE", action = clap::ArgAction::Append)]
    pub options: Vec<String>,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = parse_log_level)]
    pub log_level: Option<LogLevel>,

    /// Log file level. Defaults to --log-level when that is given.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = parse_log_level)]
    pub file_log_level: Option<LogLevel>,

    /// Log file path.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl GlobalOptions {
    /// `--set` options followed by the logging flags, as `key=value` strings.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<String> {
        let mut overrides = self.options.clone();

        if let Some(level) = self.log_level {
            overrides.push(format!("global.output_log_level={}", level.as_u8()));
        }
        if let Some(level) = self.file_log_level.or(self.log_level) {
            overrides.push(format!("global.file_log_level={}", level.as_u8()));
        }
        if let Some(path) = &self.log_file {
            overrides.push(format!("global.log_file={}", path.display()));
        }

        overrides
    }
}
