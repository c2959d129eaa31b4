// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for github-archive using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! github-archive [global options] [archive options]   run the archive
//! github-archive options                              dump merged config
//! github-archive inis                                 list loaded config files
//! ```

pub mod archive;
pub mod global;

#[cfg(test)]
mod tests;

use crate::cli::archive::ArchiveArgs;
use crate::cli::global::GlobalOptions;
use clap::{Parser, Subcommand};

/// GitHub Backup Tool
///
/// Clones and pulls the repos, gists and stars of GitHub users and orgs.
#[derive(Debug, Parser)]
#[command(
    name = "github-archive",
    author,
    version,
    about = "GitHub Backup Tool",
    long_about = "github-archive Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Archives GitHub repos, gists and starred repos to local disk.\n\n\
                  Invoking `github-archive --users alice --clone` clones every\n\
                  repo of alice that is not archived yet. Add `--pull` to update\n\
                  the ones that are.",
    after_help = "CONFIG FILES:\n\n\
                  github-archive reads `github-archive.toml` from the current\n\
                  directory when present. Additional files can be given with\n\
                  --ini and are loaded after it. GITHUB_ARCHIVE_<SECTION>__<KEY>\n\
                  environment variables override files, and flags override both."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// What to archive
    #[command(flatten)]
    pub archive: ArchiveArgs,

    /// Helper command; runs the archive when absent
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Lists all options and their values after merging every source.
    Options,

    /// Lists the config files in load order.
    Inis,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
