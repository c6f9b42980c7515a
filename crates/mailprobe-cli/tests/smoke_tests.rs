//! Smoke tests for the mailprobe CLI
//!
//! These tests verify basic CLI functionality works correctly.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the mailprobe binary
fn mailprobe() -> Command {
    Command::cargo_bin("mailprobe").expect("mailprobe binary should exist")
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    mailprobe()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.4.0"));
}

#[test]
fn test_help_flag() {
    mailprobe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("demo"))
        .stdout(predicate::str::contains("check-config"));
}

#[test]
fn test_no_args_shows_help() {
    mailprobe().assert().failure(); // Requires a subcommand
}

// ============================================================================
// Palette
// ============================================================================

#[test]
fn test_palette_text() {
    mailprobe()
        .args(["-q", "palette"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rgb_114_114_167"))
        .stdout(predicate::str::contains("color: rgb(223, 178, 134);"));
}

#[test]
fn test_palette_json() {
    let output = mailprobe()
        .args(["-q", "palette", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 19);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_check_config_valid() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("account.json");
    fs::write(
        &path,
        r#"{"credentials": {"username": "alice", "password": "pw"}}"#,
    )
    .unwrap();

    mailprobe()
        .args(["-q", "check-config", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"))
        .stdout(predicate::str::contains("alice"));
}

#[test]
fn test_check_config_missing_file_exits_2() {
    mailprobe()
        .args(["-q", "check-config", "--config", "/nonexistent/account.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_check_config_malformed_exits_2() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("account.json");
    fs::write(&path, "{ not json").unwrap();

    mailprobe()
        .args(["-q", "check-config", "--config"])
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("malformed"));
}

// ============================================================================
// Demo
// ============================================================================

#[test]
fn test_demo_passes() {
    let dir = TempDir::new().unwrap();
    mailprobe()
        .args(["-q", "demo", "--seed", "5", "--data-dir"])
        .arg(dir.path())
        .assert()
        .success();
}

#[test]
fn test_demo_json_report() {
    let dir = TempDir::new().unwrap();
    let output = mailprobe()
        .args(["-q", "demo", "--kind", "folder", "--format", "json", "--data-dir"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<_> = report["scenarios"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["create_folder", "rename_folder", "delete_folder"]);
}

#[test]
fn test_demo_fault_exits_1() {
    let dir = TempDir::new().unwrap();
    mailprobe()
        .args(["-q", "demo", "--kind", "label", "--fault", "no-notifications", "--data-dir"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("not shown"));
}

#[test]
fn test_demo_survives_reordered_menu() {
    let dir = TempDir::new().unwrap();
    mailprobe()
        .args(["-q", "demo", "--kind", "folder", "--fault", "reorder-menu", "--data-dir"])
        .arg(dir.path())
        .assert()
        .success();
}
