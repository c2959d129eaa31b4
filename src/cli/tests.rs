// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::cli::archive::ArchiveArgs;
use crate::cli::{Cli, Command};
use crate::config::loader::ConfigLoader;
use clap::{CommandFactory, Parser};

#[test]
fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_lists_and_operations() {
    let cli = Cli::try_parse_from([
        "github-archive",
        "--users",
        "Alice,bob",
        "-o",
        "acme",
        "--clone",
        "--pull",
    ])
    .unwrap();

    assert!(cli.command.is_none());
    assert_eq!(ArchiveArgs::owners(&cli.archive.users), ["alice", "bob"]);
    assert_eq!(cli.archive.orgs, ["acme"]);
    assert!(cli.archive.clone && cli.archive.pull);
    assert!(!cli.archive.view && !cli.archive.fork);
    assert!(cli.archive.has_lists());
    assert!(cli.archive.has_operations());
}

#[test]
fn test_owners_normalized_and_deduplicated() {
    let owners = ArchiveArgs::owners(&[" Alice".into(), "alice".into(), String::new(), "Bob".into()]);
    insta::assert_debug_snapshot!(owners, @r#"
    [
        "alice",
        "bob",
    ]
    "#);
}

#[test]
fn test_parse_global_options() {
    let cli = Cli::try_parse_from([
        "github-archive",
        "-l",
        "5",
        "--ini",
        "a.toml",
        "--ini",
        "b.toml",
        "--set",
        "archive.threads=2",
    ])
    .unwrap();

    insta::assert_debug_snapshot!(cli.global.to_config_overrides(), @r#"
    [
        "archive.threads=2",
        "global.output_log_level=5",
        "global.file_log_level=5",
    ]
    "#);
    assert_eq!(cli.global.inis.len(), 2);
}

#[test]
fn test_log_level_range_enforced() {
    assert!(Cli::try_parse_from(["github-archive", "-l", "7"]).is_err());
}

#[test]
fn test_parse_helper_commands() {
    let cli = Cli::try_parse_from(["github-archive", "options"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Options)));

    let cli = Cli::try_parse_from(["github-archive", "inis"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Inis)));
}

#[test]
fn test_archive_args_apply_to_config() {
    let cli = Cli::try_parse_from([
        "github-archive",
        "--users",
        "alice",
        "--clone",
        "--location",
        "/backups",
        "--threads",
        "3",
        "--timeout",
        "42",
        "--https",
        "--languages",
        "Rust,Go",
        "--token",
        "ghp_test",
    ])
    .unwrap();

    let config = cli.archive.apply(ConfigLoader::new()).unwrap().build().unwrap();
    assert_eq!(config.archive.location, std::path::PathBuf::from("/backups"));
    assert_eq!(config.archive.threads, 3);
    assert_eq!(config.archive.timeout, 42);
    assert!(config.archive.use_https);
    assert_eq!(config.github.token.as_deref(), Some("ghp_test"));
    let languages: Vec<_> = config.filter.languages.iter().cloned().collect();
    assert_eq!(languages, ["go", "rust"]);
}

#[test]
fn test_include_and_exclude_flags_rejected_by_config() {
    let cli = Cli::try_parse_from([
        "github-archive",
        "--users",
        "alice",
        "--clone",
        "--include",
        "a",
        "--exclude",
        "b",
    ])
    .unwrap();

    let err = cli.archive.apply(ConfigLoader::new()).unwrap().build().unwrap_err();
    insta::assert_snapshot!(err, @"'include' and 'exclude' cannot be used together");
}

#[test]
fn test_set_option_requires_equals() {
    let err = ConfigLoader::new().set_option("archive.threads").err().unwrap();
    assert!(err.to_string().contains("KEY=VALUE"), "{err}");
}
