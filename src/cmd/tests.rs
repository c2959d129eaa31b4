// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::cli::Cli;
use crate::cli::archive::ArchiveArgs;
use crate::cmd::archive::{Operations, PlannedContext, check_request, plan_contexts};
use crate::config::Config;
use crate::github::Context;
use clap::Parser;

fn args(list: &[&str]) -> ArchiveArgs {
    let mut argv = vec!["github-archive"];
    argv.extend_from_slice(list);
    Cli::try_parse_from(argv).unwrap().archive
}

fn config_with_token(token: Option<&str>) -> Config {
    let mut config = Config::default();
    config.github.token = token.map(ToString::to_string);
    config
}

fn contexts(plan: &[PlannedContext]) -> Vec<(Context, Vec<String>)> {
    plan.iter()
        .map(|planned| (planned.context, planned.owners.clone()))
        .collect()
}

#[test]
fn test_plan_orders_contexts_and_skips_empty_lists() {
    let plan = plan_contexts(
        &args(&["--stars", "carol", "--gists", "bob", "--users", "Alice", "--clone"]),
        None,
    );
    insta::assert_debug_snapshot!(contexts(&plan), @r#"
    [
        (
            User,
            [
                "alice",
            ],
        ),
        (
            Gist,
            [
                "bob",
            ],
        ),
        (
            Star,
            [
                "carol",
            ],
        ),
    ]
    "#);
}

#[test]
fn test_plan_moves_authenticated_user_to_personal_context() {
    let plan = plan_contexts(&args(&["--users", "alice,Me", "-o", "acme", "--clone"]), Some("me"));
    assert_eq!(
        contexts(&plan),
        [
            (Context::Personal, vec!["me".to_string()]),
            (Context::User, vec!["alice".to_string()]),
            (Context::Org, vec!["acme".to_string()]),
        ]
    );
}

#[test]
fn test_plan_drops_user_context_when_only_authenticated_user() {
    let plan = plan_contexts(&args(&["--users", "me", "--pull"]), Some("me"));
    assert_eq!(
        contexts(&plan),
        [(Context::Personal, vec!["me".to_string()])]
    );
}

#[test]
fn test_plan_ignores_login_not_in_users() {
    let plan = plan_contexts(&args(&["--users", "alice", "--pull"]), Some("me"));
    assert_eq!(contexts(&plan), [(Context::User, vec!["alice".to_string()])]);
}

#[test]
fn test_check_request_requires_operation() {
    let err = check_request(&args(&["--users", "alice"]), &config_with_token(None)).unwrap_err();
    insta::assert_snapshot!(err, @"config error: an operation (--view, --clone, --pull or --fork) must be given with a list");
}

#[test]
fn test_check_request_requires_list() {
    let err = check_request(&args(&["--clone"]), &config_with_token(None)).unwrap_err();
    insta::assert_snapshot!(err, @"config error: a list (--users, --orgs, --gists or --stars) must be given with an operation");
}

#[test]
fn test_check_request_requires_both() {
    let err = check_request(&args(&[]), &config_with_token(None)).unwrap_err();
    insta::assert_snapshot!(err, @"config error: at least one operation and one list must be given");
}

#[test]
fn test_check_request_fork_needs_token() {
    let request = args(&["--users", "alice", "--fork"]);
    let err = check_request(&request, &config_with_token(None)).unwrap_err();
    insta::assert_snapshot!(err, @"github error: a GitHub token is required to fork");

    check_request(&request, &config_with_token(Some("ghp_test"))).unwrap();
}

#[test]
fn test_operations_from_args() {
    let operations = Operations::from_args(&args(&["-u", "alice", "-v", "-p"]));
    assert_eq!(
        operations,
        Operations {
            view: true,
            clone: false,
            pull: true,
            fork: false,
        }
    );
}
