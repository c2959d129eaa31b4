// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{ArchiveError, ArchiveResult, CleanupError, ConfigError, bail_out};

#[test]
fn test_config_error_display() {
    let err = ConfigError::Conflict {
        first: "include".to_string(),
        second: "exclude".to_string(),
    };
    insta::assert_snapshot!(err.to_string(), @"'include' and 'exclude' cannot be used together");
}

#[test]
fn test_cleanup_error_wraps_into_archive_error() {
    let err: ArchiveError = CleanupError::RemoveFailed {
        path: "/archive/repos/alice/repo2".to_string(),
        source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
    }
    .into();

    assert!(matches!(err, ArchiveError::Cleanup(_)));
    assert!(err.to_string().starts_with("cleanup error: failed to remove"));
}

#[test]
fn test_bail_out_message() {
    insta::assert_snapshot!(bail_out("git is missing").to_string(), @"fatal error: git is missing");
}

#[test]
fn test_archive_error_size() {
    // Box<str> variants (Bailed, Other) are 16 bytes (fat pointer: ptr + len)
    // With discriminant + alignment = 24 bytes
    let size = std::mem::size_of::<ArchiveError>();
    assert!(size <= 24, "ArchiveError is {size} bytes, expected <= 24");
}

#[test]
fn test_archive_result_size() {
    let size = std::mem::size_of::<ArchiveResult<()>>();
    assert!(size <= 24, "ArchiveResult<()> is {size} bytes, expected <= 24");
}
