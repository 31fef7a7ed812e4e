//! # Chatdesk CLI Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//!
//! ## Overview
//!
//! Top-level behavior of the `chatdesk` binary: standard flags, argument
//! errors, configuration validation and the "not logged in" path.
//!

mod common;
use common::*;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_main_help_flag() {
    chatdesk_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("admin"));
}

#[test]
fn test_main_version_flag() {
    chatdesk_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_subcommand_fails() {
    chatdesk_cmd().assert().failure();
}

#[test]
fn test_invalid_base_url_is_rejected() {
    let dir = tempdir().expect("Failed to create temp dir");
    chatdesk_cmd()
        .args(["--base-url", "localhost:8000", "logout"])
        .arg("--session-file")
        .arg(dir.path().join("session.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid base URL"));
}

#[test]
fn test_protected_command_without_session_makes_no_request() {
    let backend = MockBackend::start();
    let dir = tempdir().expect("Failed to create temp dir");

    chatdesk_cmd()
        .args(["--base-url", &backend.base_url, "chat", "list"])
        .arg("--session-file")
        .arg(dir.path().join("session.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));

    assert!(backend.requests().is_empty());
}

#[test]
fn test_logout_when_logged_out() {
    let dir = tempdir().expect("Failed to create temp dir");
    chatdesk_cmd()
        .arg("logout")
        .arg("--session-file")
        .arg(dir.path().join("session.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));
}
