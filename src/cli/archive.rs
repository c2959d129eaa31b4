// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Archive selection and behavior flags.
//!
//! ```text
//! lists       --users --orgs --gists --stars   (comma separated, lowercased)
//! operations  --view --clone --pull --fork
//! filters     --include | --exclude | --languages
//! behavior    --forks --https --location --timeout --threads --token
//! ```

use clap::Args;
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::config::loader::ConfigLoader;
use crate::config::types::non_blank_token;
use crate::error::Result;

/// What to archive and how.
#[derive(Debug, Clone, Default, Args)]
pub struct ArchiveArgs {
    /// Users whose repos are archived (comma separated).
    #[arg(short = 'u', long, value_name = "USERS", value_delimiter = ',')]
    pub users: Vec<String>,

    /// Organizations whose repos are archived (comma separated).
    #[arg(short = 'o', long, value_name = "ORGS", value_delimiter = ',')]
    pub orgs: Vec<String>,

    /// Users whose gists are archived (comma separated).
    #[arg(short = 'g', long, value_name = "USERS", value_delimiter = ',')]
    pub gists: Vec<String>,

    /// Users whose starred repos are archived (comma separated).
    #[arg(long, value_name = "USERS", value_delimiter = ',')]
    pub stars: Vec<String>,

    /// Log every asset that would be cloned or pulled.
    #[arg(short = 'v', long)]
    pub view: bool,

    /// Clone assets that are not archived yet.
    #[arg(short = 'c', long)]
    pub clone: bool,

    /// Pull changes into assets that are already archived.
    #[arg(short = 'p', long)]
    pub pull: bool,

    /// Fork assets into the authenticated account.
    #[arg(long)]
    pub fork: bool,

    /// Include forked repos when enumerating.
    #[arg(long)]
    pub forks: bool,

    /// Only archive repos with these names (comma separated).
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub include: Vec<String>,

    /// Archive every repo except these (comma separated).
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Only archive repos written in these languages (comma separated).
    #[arg(long, value_name = "LANGUAGES", value_delimiter = ',')]
    pub languages: Vec<String>,

    /// Archive root directory.
    #[arg(long, value_name = "DIR")]
    pub location: Option<PathBuf>,

    /// Clone over HTTPS instead of SSH.
    #[arg(long)]
    pub https: bool,

    /// Seconds before a single git operation is killed.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Maximum number of concurrent git operations.
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// GitHub access token.
    #[arg(short = 't', long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

impl ArchiveArgs {
    /// Lowercased, trimmed, non-empty owners from a list flag.
    #[must_use]
    pub fn owners(list: &[String]) -> Vec<String> {
        let mut seen = BTreeSet::new();
        list.iter()
            .map(|owner| owner.trim().to_lowercase())
            .filter(|owner| !owner.is_empty() && seen.insert(owner.clone()))
            .collect()
    }

    /// True if any of `--users`, `--orgs`, `--gists`, `--stars` was given.
    #[must_use]
    pub fn has_lists(&self) -> bool {
        [&self.users, &self.orgs, &self.gists, &self.stars]
            .into_iter()
            .any(|list| !Self::owners(list).is_empty())
    }

    /// True if any of `--view`, `--clone`, `--pull`, `--fork` was given.
    #[must_use]
    pub const fn has_operations(&self) -> bool {
        self.view || self.clone || self.pull || self.fork
    }

    /// Applies the flags that map onto configuration keys.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be stored as an override.
    pub fn apply(&self, mut loader: ConfigLoader) -> Result<ConfigLoader> {
        if let Some(location) = &self.location {
            loader = loader.set("archive.location", location.display().to_string())?;
        }
        if let Some(threads) = self.threads {
            loader = loader.set("archive.threads", i64::try_from(threads)?)?;
        }
        if let Some(timeout) = self.timeout {
            loader = loader.set("archive.timeout", i64::try_from(timeout)?)?;
        }
        if self.https {
            loader = loader.set("archive.use_https", true)?;
        }
        if self.forks {
            loader = loader.set("archive.forks", true)?;
        }
        if let Some(token) = self.token.as_deref().and_then(non_blank_token) {
            loader = loader.set("github.token", token)?;
        }
        loader
            .set_list("filter.include", self.include.iter().cloned())?
            .set_list("filter.exclude", self.exclude.iter().cloned())?
            .set_list("filter.languages", self.languages.iter().cloned())
    }
}
