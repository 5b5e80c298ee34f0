//! End-to-end CLI tests for the asc-analytics binary.
//!
//! Everything here stays offline: the commands either exit during argument
//! parsing or fail before the first network request (missing password).

use assert_cmd::Command;
use predicates::prelude::*;

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("asc-analytics").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Query App Store Connect analytics"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("asc-analytics").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("asc-analytics"));
}

/// Test that invoking without a subcommand fails with usage help.
#[test]
fn test_binary_requires_a_subcommand() {
    let mut cmd = Command::cargo_bin("asc-analytics").unwrap();
    cmd.args(["-u", "dev@example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

/// Test that invalid flags cause non-zero exit.
#[test]
fn test_binary_invalid_flag_returns_error() {
    let mut cmd = Command::cargo_bin("asc-analytics").unwrap();
    cmd.arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

/// Test that a missing password env var fails before any network I/O.
#[test]
fn test_binary_requires_password_env_var() {
    let mut cmd = Command::cargo_bin("asc-analytics").unwrap();
    cmd.env_remove("ASC_PASSWORD")
        .args(["-u", "dev@example.com", "metadata"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ASC_PASSWORD"));
}

/// Test that an empty password env var is rejected with a clear message.
#[test]
fn test_binary_rejects_empty_password_env_var() {
    let mut cmd = Command::cargo_bin("asc-analytics").unwrap();
    cmd.env("ASC_PASSWORD", "")
        .args(["-u", "dev@example.com", "metadata"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ASC_PASSWORD is set but empty"));
}

/// Test that a malformed date is rejected during argument parsing.
#[test]
fn test_binary_rejects_malformed_date() {
    let mut cmd = Command::cargo_bin("asc-analytics").unwrap();
    cmd.args([
        "-u",
        "dev@example.com",
        "metrics",
        "-a",
        "123",
        "-m",
        "units",
        "-s",
        "yesterday",
        "-e",
        "2024-01-31",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid value"));
}

/// Test that the metrics subcommand requires at least one metric.
#[test]
fn test_binary_metrics_requires_a_metric() {
    let mut cmd = Command::cargo_bin("asc-analytics").unwrap();
    cmd.args([
        "-u",
        "dev@example.com",
        "metrics",
        "-a",
        "123",
        "-s",
        "2024-01-01",
        "-e",
        "2024-01-31",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("--metric"));
}
