// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use super::{LogConfig, LogLevel, default_log_file};

#[test]
fn test_log_level_bounds() {
    assert!(LogLevel::new(6).is_ok());
    assert!(LogLevel::new(7).is_err());
    assert_eq!(LogLevel::from_u8(4), Some(LogLevel::DEBUG));
    assert_eq!(LogLevel::from_u8(9), None);
}

#[test]
fn test_log_level_filters() {
    let filters: Vec<_> = (0..=6)
        .filter_map(LogLevel::from_u8)
        .map(LogLevel::filter_directives)
        .collect();
    insta::assert_debug_snapshot!(filters, @r#"
    [
        "off",
        "error",
        "warn",
        "info,hyper=warn,reqwest=warn",
        "debug,hyper=warn,reqwest=warn",
        "trace,hyper=warn,reqwest=warn",
        "trace",
    ]
    "#);
}

#[test]
fn test_log_level_serde_as_number() {
    let ok: LogLevel = serde_json::from_str("5").unwrap();
    assert_eq!(ok, LogLevel::TRACE);
    assert_eq!(serde_json::to_string(&LogLevel::DUMP).unwrap(), "6");

    let err = serde_json::from_str::<LogLevel>("12").unwrap_err();
    assert!(err.to_string().contains("log level must be 0-6, got 12"), "{err}");
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert_eq!(config.file_level(), LogLevel::DEBUG);
    assert!(config.log_file().is_none());
}

#[test]
fn test_default_log_file_under_archive_root() {
    let path = default_log_file(Path::new("/backups/github"));
    assert_eq!(
        path,
        Path::new("/backups/github/logs/github-archive.log")
    );
}
