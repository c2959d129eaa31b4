// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the GitHub client using wiremock.
//!
//! Covers enumeration per context, fork requests, error mapping and a full
//! archive run against a mocked API.

use github_archive::archive::{ArchiveContext, GitOperationRunner};
use github_archive::asset::{AssetKind, GitAsset};
use github_archive::cmd::archive::{Archiver, Operations, PlannedContext};
use github_archive::error::{ArchiveError, GithubError};
use github_archive::github::{Context, GithubClient};
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn repo_json(owner: &str, name: &str, fork: bool, language: Option<&str>) -> Value {
    json!({
        "name": name,
        "owner": { "login": owner },
        "fork": fork,
        "language": language,
        "ssh_url": format!("git@github.com:{owner}/{name}.git"),
        "html_url": format!("https://github.com/{owner}/{name}"),
    })
}

async fn mount_get(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn names(assets: &[GitAsset]) -> Vec<String> {
    assets.iter().map(GitAsset::full_name).collect()
}

// =============================================================================
// Enumeration
// =============================================================================

#[tokio::test]
async fn github_user_repos_sorted_without_forks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/alice/repos"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            repo_json("Alice", "zeta", false, Some("Rust")),
            repo_json("Alice", "forked", true, None),
            repo_json("Alice", "alpha", false, None),
        ])))
        .mount(&server)
        .await;

    let client = GithubClient::new(server.uri(), None).unwrap();
    let assets = client
        .list_assets(Context::User, &["alice".to_string()])
        .await
        .unwrap();

    assert_eq!(names(&assets), ["alice/alpha", "alice/zeta"]);
    assert_eq!(assets[1].language(), Some("Rust"));
    assert_eq!(assets[1].clone_url_https(), "https://github.com/Alice/zeta");
}

#[tokio::test]
async fn github_forks_kept_when_enabled() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/orgs/acme/repos",
        json!([repo_json("acme", "upstream", true, None)]),
    )
    .await;

    let client = GithubClient::new(server.uri(), None).unwrap().with_forks(true);
    let assets = client
        .list_assets(Context::Org, &["acme".to_string()])
        .await
        .unwrap();

    assert_eq!(names(&assets), ["acme/upstream"]);
    assert!(assets[0].is_fork());
}

#[tokio::test]
async fn github_stars_across_owners() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/users/bob/starred",
        json!([repo_json("tokio-rs", "tokio", false, Some("Rust"))]),
    )
    .await;
    mount_get(
        &server,
        "/users/alice/starred",
        json!([repo_json("clap-rs", "clap", false, Some("Rust"))]),
    )
    .await;

    let client = GithubClient::new(server.uri(), None).unwrap();
    let assets = client
        .list_assets(Context::Star, &["bob".to_string(), "alice".to_string()])
        .await
        .unwrap();

    assert_eq!(names(&assets), ["clap-rs/clap", "tokio-rs/tokio"]);
}

#[tokio::test]
async fn github_gists_fall_back_to_queried_owner() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/users/alice/gists",
        json!([
            { "id": "b2", "owner": { "login": "Alice" }, "html_url": "https://gist.github.com/b2" },
            { "id": "a1", "owner": null, "html_url": "https://gist.github.com/a1" },
        ]),
    )
    .await;

    let client = GithubClient::new(server.uri(), None).unwrap();
    let assets = client
        .list_assets(Context::Gist, &["alice".to_string()])
        .await
        .unwrap();

    assert_eq!(names(&assets), ["alice/a1", "alice/b2"]);
    assert!(assets.iter().all(|asset| asset.kind() == AssetKind::Gist));
}

#[tokio::test]
async fn github_personal_repos_sent_with_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .and(query_param("affiliation", "owner"))
        .and(header("authorization", "Bearer ghp_test"))
        .and(header("accept", "application/vnd.github+json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([repo_json("me", "private", false, None)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = GithubClient::new(server.uri(), Some("ghp_test".into())).unwrap();
    let assets = client.list_assets(Context::Personal, &[]).await.unwrap();

    assert_eq!(names(&assets), ["me/private"]);
}

#[tokio::test]
async fn github_personal_repos_need_token() {
    let client = GithubClient::new("http://127.0.0.1:1", None).unwrap();
    let err = client.list_assets(Context::Personal, &[]).await.unwrap_err();
    insta::assert_snapshot!(err, @"github error: a GitHub token is required to list personal repos");
}

#[tokio::test]
async fn github_blank_token_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .expect(0)
        .mount(&server)
        .await;

    let client = GithubClient::new(server.uri(), Some("   ".into())).unwrap();
    let err = client.list_assets(Context::Personal, &[]).await.unwrap_err();
    insta::assert_snapshot!(err, @"github error: a GitHub token is required to list personal repos");
}

#[tokio::test]
async fn github_http_error_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/ghost/repos"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = GithubClient::new(server.uri(), None).unwrap();
    let err = client
        .list_assets(Context::User, &["ghost".to_string()])
        .await
        .unwrap_err();

    match err {
        ArchiveError::Github(boxed) => match *boxed {
            GithubError::HttpError { status, url } => {
                assert_eq!(status, 404);
                assert!(url.ends_with("/users/ghost/repos?per_page=100"), "{url}");
            }
            other => panic!("expected HttpError, got {other:?}"),
        },
        other => panic!("expected ArchiveError::Github, got {other:?}"),
    }
}

#[tokio::test]
async fn github_authenticated_login_lowercased() {
    let server = MockServer::start().await;
    mount_get(&server, "/user", json!({ "login": "MeMyself" })).await;

    let client = GithubClient::new(format!("{}/", server.uri()), Some("ghp_test".into())).unwrap();
    assert_eq!(client.authenticated_login().await.unwrap(), "memyself");
}

// =============================================================================
// Forks
// =============================================================================

#[tokio::test]
async fn github_fork_repo_and_gist_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/alice/repo1/forks"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/gists/abc123/forks"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = GithubClient::new(server.uri(), Some("ghp_test".into())).unwrap();
    let repo = GitAsset::repository("alice", "repo1", "ssh", "https");
    let gist = GitAsset::gist("alice", "abc123", "https");

    client.fork_asset(&repo).await.unwrap();
    client.fork_asset(&gist).await.unwrap();
}

#[tokio::test]
async fn github_fork_rejection_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/alice/repo1/forks"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let client = GithubClient::new(server.uri(), Some("ghp_test".into())).unwrap();
    let repo = GitAsset::repository("alice", "repo1", "ssh", "https");
    let err = client.fork_asset(&repo).await.unwrap_err();

    insta::assert_snapshot!(err, @"github error: failed to fork alice/repo1: 403 Forbidden: forbidden");
}

// =============================================================================
// Full run
// =============================================================================

#[cfg(unix)]
#[tokio::test]
async fn github_archiver_clones_listed_repos() {
    use std::os::unix::fs::PermissionsExt;

    let server = MockServer::start().await;
    mount_get(
        &server,
        "/users/alice/repos",
        json!([
            repo_json("alice", "repo1", false, None),
            repo_json("alice", "broken", false, None),
        ]),
    )
    .await;

    let tools = tempfile::tempdir().unwrap();
    let git = tools.path().join("git");
    std::fs::write(
        &git,
        "#!/bin/sh\n[ \"$1\" = clone ] || exit 0\ncase \"$2\" in *broken*) exit 128 ;; esac\nmkdir -p \"$3/.git\"\n",
    )
    .unwrap();
    std::fs::set_permissions(&git, std::fs::Permissions::from_mode(0o755)).unwrap();
    for _ in 0..50 {
        match std::process::Command::new(&git).status() {
            Err(e) if e.raw_os_error() == Some(26) => std::thread::sleep(Duration::from_millis(20)),
            _ => break,
        }
    }

    let root = tempfile::tempdir().unwrap();
    let context = ArchiveContext::builder()
        .archive_root(root.path())
        .threads(2)
        .runner(GitOperationRunner::new(&git, Duration::from_secs(10)))
        .build();
    let client = GithubClient::new(server.uri(), None).unwrap();
    let operations = Operations {
        clone: true,
        ..Operations::default()
    };
    let plan = [PlannedContext {
        context: Context::User,
        owners: vec!["alice".to_string()],
    }];

    let summary = Archiver::new(client, context, operations)
        .run(&plan)
        .await
        .unwrap();

    assert_eq!(summary.assets, 2);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert!(root.path().join("repos/alice/repo1/.git").is_dir());
    assert!(!root.path().join("repos/alice/broken").exists());
}
