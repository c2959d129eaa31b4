// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::builder::ProcessBuilder;
use std::time::{Duration, Instant};

#[cfg(unix)]
fn sh(script: &str) -> ProcessBuilder {
    ProcessBuilder::new("sh").arg("-c").arg(script)
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_echo() {
    let output = ProcessBuilder::new("echo")
        .arg("hello")
        .capture_output()
        .run()
        .await
        .expect("echo should succeed");

    assert!(output.success());
    insta::assert_snapshot!(output.stdout().trim(), @"hello");
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_exit_code_is_not_an_error() {
    let output = sh("echo out; echo err >&2; exit 42")
        .capture_output()
        .run()
        .await
        .expect("process should complete");

    assert!(!output.success());
    assert!(!output.timed_out());
    assert_eq!(output.exit_code(), Some(42));
    insta::assert_snapshot!(output.combined(), @r"
    out
    err
    ");
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_env() {
    let output = sh("echo $TEST_VAR")
        .env("TEST_VAR", "test_value")
        .capture_output()
        .run()
        .await
        .expect("process should succeed");

    insta::assert_snapshot!(output.stdout().trim(), @"test_value");
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_stdin_is_closed() {
    // `cat` would block forever on an inherited terminal.
    let output = ProcessBuilder::new("cat")
        .capture_output()
        .timeout(Duration::from_secs(10))
        .run()
        .await
        .expect("cat should complete");

    assert!(output.success());
    assert!(output.stdout().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_timeout_kills_child() {
    let started = Instant::now();
    let output = sh("exec sleep 30")
        .capture_output()
        .timeout(Duration::from_millis(200))
        .run()
        .await
        .expect("timeout is reported in the output");

    assert!(output.timed_out());
    assert!(!output.success());
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_timeout_kills_background_children() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("late");
    let script = format!("( sleep 1; touch '{}' ) & sleep 30", marker.display());

    let output = sh(&script)
        .capture_output()
        .timeout(Duration::from_millis(200))
        .run()
        .await
        .expect("timeout is reported in the output");
    assert!(output.timed_out());

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(!marker.exists(), "background child survived the timeout");
}

#[tokio::test]
async fn test_spawn_failure_is_an_error() {
    let err = ProcessBuilder::new("/nonexistent/github-archive-test-binary")
        .run()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("github-archive-test-binary"), "{err}");
}

#[test]
fn test_command_line_quotes_spaces() {
    let builder = ProcessBuilder::new("git")
        .args(["clone", "https://example.com/a.git"])
        .arg("/tmp/some dir");
    insta::assert_snapshot!(builder.command_line(), @r#"git clone https://example.com/a.git "/tmp/some dir""#);
}

#[test]
fn test_executable_lookup_not_found() {
    let program = "nonexistent_program_12345";

    assert!(ProcessBuilder::find(program).is_none());
}
