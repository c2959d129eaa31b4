// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Removal of working copies left behind by failed operations.
//!
//! ```text
//! cleanup(root, category, identifiers)
//!   dedupe identifiers
//!   for each: root/category/identifier
//!     missing          --> nothing to do
//!     remove_dir_all   --> ok
//!       error          --> make_writable (best effort), remove_dir_all again
//!         error        --> CleanupError (fatal)
//!
//! cleanup_async()      same, on tokio's blocking pool
//! ```
//!
//! git marks pack and object files read-only, which some filesystems refuse
//! to unlink. The writable retry covers that case.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Component, Path};
use tracing::{debug, info, warn};

use crate::asset::Category;
use crate::error::{ArchiveError, ArchiveResult, CleanupError};

/// Filesystem operations the cleaner needs.
pub trait DirRemover: Send + Sync {
    /// Recursively removes a directory.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Clears read-only bits on a tree.
    ///
    /// Best effort: every entry is attempted, and the first failure (if any)
    /// is reported once the walk is done.
    fn make_writable(&self, path: &Path) -> io::Result<()>;
}

/// [`DirRemover`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRemover;

impl DirRemover for FsRemover {
    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }

    fn make_writable(&self, path: &Path) -> io::Result<()> {
        let mut first_error = None;
        make_tree_writable(path, &mut first_error);
        first_error.map_or(Ok(()), Err)
    }
}

/// Walks the tree, logging and skipping entries that cannot be changed.
fn make_tree_writable(path: &Path, first_error: &mut Option<io::Error>) {
    let mut note = |err: io::Error| {
        debug!(path = %path.display(), error = %err, "cannot make writable");
        first_error.get_or_insert(err);
    };

    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(err) => return note(err),
    };
    if metadata.file_type().is_symlink() {
        return;
    }
    if let Err(err) = set_writable(path, &metadata) {
        note(err);
    }
    if !metadata.is_dir() {
        return;
    }

    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(err) => return note(err),
    };
    for entry in entries {
        match entry {
            Ok(entry) => make_tree_writable(&entry.path(), first_error),
            Err(err) => {
                debug!(path = %path.display(), error = %err, "cannot read directory entry");
                first_error.get_or_insert(err);
            }
        }
    }
}

#[cfg(unix)]
fn set_writable(path: &Path, metadata: &fs::Metadata) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = metadata.permissions();
    let extra = if metadata.is_dir() { 0o700 } else { 0o600 };
    permissions.set_mode(permissions.mode() | extra);
    fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn set_writable(path: &Path, metadata: &fs::Metadata) -> io::Result<()> {
    let mut permissions = metadata.permissions();
    permissions.set_readonly(false);
    fs::set_permissions(path, permissions)
}

/// Removes the directories of failed assets after a batch.
#[derive(Debug, Clone, Default)]
pub struct FailureCleaner<R = FsRemover> {
    remover: R,
}

impl FailureCleaner {
    #[must_use]
    pub const fn new() -> Self {
        Self { remover: FsRemover }
    }
}

impl<R: DirRemover> FailureCleaner<R> {
    /// Uses a custom remover.
    pub const fn with_remover(remover: R) -> Self {
        Self { remover }
    }

    pub const fn remover(&self) -> &R {
        &self.remover
    }

    /// Removes `root/category/identifier` for every failed identifier.
    ///
    /// Returns the number of directories removed. Identifiers that would
    /// resolve outside the category directory are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`CleanupError`] if a directory cannot be removed even after
    /// it was made writable. The caller should stop the run: the partial
    /// working copy would otherwise look archived to later runs.
    pub fn cleanup<I, S>(&self, root: &Path, category: Category, failed: I) -> ArchiveResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let identifiers: BTreeSet<String> = failed
            .into_iter()
            .map(|identifier| identifier.as_ref().to_string())
            .collect();

        let category_dir = category.dir(root);
        let mut removed = 0;

        for identifier in &identifiers {
            if !is_relative_identifier(identifier) {
                warn!(%category, identifier, "refusing to clean up identifier outside the archive");
                continue;
            }

            let path = category_dir.join(identifier);
            if !path.exists() {
                debug!(path = %path.display(), "nothing to clean up");
                continue;
            }

            self.remove(&path)?;
            info!(%category, identifier, path = %path.display(), "removed failed working copy");
            removed += 1;
        }

        Ok(removed)
    }

    fn remove(&self, path: &Path) -> ArchiveResult<()> {
        let Err(first) = self.remover.remove_dir_all(path) else {
            return Ok(());
        };
        debug!(path = %path.display(), error = %first, "removal failed, retrying after making writable");

        if let Err(err) = self.remover.make_writable(path) {
            debug!(path = %path.display(), error = %err, "tree only partly made writable");
        }

        self.remover
            .remove_dir_all(path)
            .map_err(|source| CleanupError::RemoveFailed {
                path: path.display().to_string(),
                source,
            })?;
        Ok(())
    }
}

impl<R: DirRemover + Clone + 'static> FailureCleaner<R> {
    /// [`cleanup`](Self::cleanup) on the blocking thread pool, so recursive
    /// removal never stalls a runtime worker.
    ///
    /// # Errors
    ///
    /// Same as [`cleanup`](Self::cleanup).
    pub async fn cleanup_async<I, S>(
        &self,
        root: &Path,
        category: Category,
        failed: I,
    ) -> ArchiveResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cleaner = self.clone();
        let root = root.to_path_buf();
        let failed: Vec<String> = failed
            .into_iter()
            .map(|identifier| identifier.as_ref().to_string())
            .collect();

        tokio::task::spawn_blocking(move || cleaner.cleanup(&root, category, failed))
            .await
            .map_err(|err| ArchiveError::Other(format!("cleanup task panicked: {err}").into()))?
    }
}

/// True if `identifier` is a non-empty relative path made of plain names.
fn is_relative_identifier(identifier: &str) -> bool {
    let path = Path::new(identifier);
    !identifier.is_empty()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}
