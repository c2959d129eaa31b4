// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-asset inclusion rules.
//!
//! ```text
//! gist?            --> include
//! include set?     --> name in include
//! exclude set?     --> name not in exclude
//! languages set?   --> lowercase(language) in languages
//! otherwise        --> include
//! ```
//!
//! The first configured list decides. Include, exclude and languages are
//! mutually exclusive once config validation has run, but the order above
//! still holds if more than one is set.

use std::collections::BTreeSet;
use tracing::debug;

use crate::asset::{AssetKind, GitAsset};
use crate::config::types::FilterConfig;

/// Decides whether an asset takes part in a clone, pull or fork pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetFilter {
    include: BTreeSet<String>,
    exclude: BTreeSet<String>,
    languages: BTreeSet<String>,
}

impl AssetFilter {
    /// Creates a filter. Language names are compared case-insensitively.
    #[must_use]
    pub fn new<I, E, L, S>(include: I, exclude: E, languages: L) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = S>,
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: include.into_iter().map(Into::into).collect(),
            exclude: exclude.into_iter().map(Into::into).collect(),
            languages: languages
                .into_iter()
                .map(|l| l.into().to_lowercase())
                .collect(),
        }
    }

    #[must_use]
    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(
            config.include.iter().cloned(),
            config.exclude.iter().cloned(),
            config.languages.iter().cloned(),
        )
    }

    /// Applies the inclusion rules to one asset.
    #[must_use]
    pub fn should_include(&self, asset: &GitAsset) -> bool {
        if asset.kind() == AssetKind::Gist {
            return true;
        }

        let name = asset.name_or_id();
        let included = if !self.include.is_empty() {
            self.include.contains(name)
        } else if !self.exclude.is_empty() {
            !self.exclude.contains(name)
        } else if !self.languages.is_empty() {
            asset
                .language()
                .is_some_and(|language| self.languages.contains(&language.to_lowercase()))
        } else {
            true
        };

        if !included {
            debug!(
                owner = asset.owner_login(),
                name,
                language = asset.language().unwrap_or("-"),
                "filtered out"
            );
        }
        included
    }
}
