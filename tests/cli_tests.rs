//! Integration tests for the tagrank CLI
//!
//! These tests run the tagrank binary against scratch config/database files
//! and verify behavior and exit codes. Nothing here talks to a real Hydrus
//! instance; provider-facing paths are exercised only up to the connection
//! error.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

/// Get a Command for tagrank
fn tagrank() -> Command {
    Command::cargo_bin("tagrank").unwrap()
}

fn config_path(dir: &Path) -> PathBuf {
    dir.join("tagrank.toml")
}

/// Init a scratch store and return the config path
fn init_store(dir: &Path) -> PathBuf {
    let config = config_path(dir);
    tagrank()
        .arg("--config")
        .arg(&config)
        .arg("init")
        .assert()
        .success();
    config
}

// ============================================================================
// Help, version, and usage errors
// ============================================================================

#[test]
fn test_help_flag() {
    tagrank()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: tagrank"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("tag"))
        .stdout(predicate::str::contains("rank"));
}

#[test]
fn test_version_flag() {
    tagrank()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tagrank"));
}

#[test]
fn test_unknown_format_exit_code_2() {
    tagrank()
        .args(["--format", "invalid", "tag", "list"])
        .assert()
        .code(2);
}

#[test]
fn test_unknown_argument_json_usage_error() {
    tagrank()
        .args(["--format", "json", "tag", "list", "--bogus-flag"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"type\":\"usage_error\""));
}

// ============================================================================
// init
// ============================================================================

#[test]
fn test_init_creates_config_and_db() {
    let dir = tempdir().unwrap();
    let config = config_path(dir.path());

    tagrank()
        .arg("--config")
        .arg(&config)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));

    assert!(config.exists());
    assert!(dir.path().join("tagrank.db").exists());
}

#[test]
fn test_init_is_idempotent() {
    let dir = tempdir().unwrap();
    let config = init_store(dir.path());

    tagrank()
        .arg("--config")
        .arg(&config)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_init_with_examples_seeds_records() {
    let dir = tempdir().unwrap();
    let config = config_path(dir.path());

    tagrank()
        .arg("--config")
        .arg(&config)
        .args(["init", "--examples", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"examples_seeded\": 10"));

    tagrank()
        .arg("--config")
        .arg(&config)
        .args(["tag", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("system:has audio"));
}

// ============================================================================
// tag commands
// ============================================================================

#[test]
fn test_tag_commands_require_init() {
    let dir = tempdir().unwrap();

    tagrank()
        .arg("--config")
        .arg(config_path(dir.path()))
        .args(["--format", "json", "tag", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("\"type\":\"config_not_found\""));
}

#[test]
fn test_tag_add_and_list() {
    let dir = tempdir().unwrap();
    let config = init_store(dir.path());

    tagrank()
        .arg("--config")
        .arg(&config)
        .args(["tag", "add", "elf", "--weight", "0.7", "--comment", "nice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("added elf"));

    tagrank()
        .arg("--config")
        .arg(&config)
        .args(["tag", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+0.70  elf  # nice"));
}

#[test]
fn test_tag_list_json_round_trips_records() {
    let dir = tempdir().unwrap();
    let config = init_store(dir.path());

    tagrank()
        .arg("--config")
        .arg(&config)
        .args(["tag", "add", "blood", "--weight", "-1.5"])
        .assert()
        .success();

    let output = tagrank()
        .arg("--config")
        .arg(&config)
        .args(["--format", "json", "tag", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(records[0]["tag"], "blood");
    assert_eq!(records[0]["weight"], -1.5);
}

#[test]
fn test_tag_add_without_weight_lists_unset() {
    let dir = tempdir().unwrap();
    let config = init_store(dir.path());

    tagrank()
        .arg("--config")
        .arg(&config)
        .args(["tag", "add", "system:has audio"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default weight"));

    let output = tagrank()
        .arg("--config")
        .arg(&config)
        .args(["--format", "json", "tag", "list"])
        .output()
        .unwrap();
    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(records[0]["weight"].is_null());
}

#[test]
fn test_tag_set_updates_weight_keeps_comment() {
    let dir = tempdir().unwrap();
    let config = init_store(dir.path());

    tagrank()
        .arg("--config")
        .arg(&config)
        .args(["tag", "add", "elf", "--weight", "0.2", "--comment", "keep"])
        .assert()
        .success();

    tagrank()
        .arg("--config")
        .arg(&config)
        .args(["tag", "set", "elf", "--weight", "0.9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("updated elf"));

    tagrank()
        .arg("--config")
        .arg(&config)
        .args(["tag", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+0.90  elf  # keep"));
}

#[test]
fn test_tag_rm_removes_record() {
    let dir = tempdir().unwrap();
    let config = init_store(dir.path());

    tagrank()
        .arg("--config")
        .arg(&config)
        .args(["tag", "add", "elf"])
        .assert()
        .success();

    tagrank()
        .arg("--config")
        .arg(&config)
        .args(["tag", "rm", "elf"])
        .assert()
        .success();

    tagrank()
        .arg("--config")
        .arg(&config)
        .args(["--format", "json", "tag", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn test_tag_rm_unknown_exit_code_3() {
    let dir = tempdir().unwrap();
    let config = init_store(dir.path());

    tagrank()
        .arg("--config")
        .arg(&config)
        .args(["--format", "json", "tag", "rm", "missing"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("\"type\":\"tag_not_found\""));
}

// ============================================================================
// rank
// ============================================================================

#[test]
fn test_rank_dry_run_with_empty_store() {
    let dir = tempdir().unwrap();
    let config = init_store(dir.path());

    // No tags means no remote queries; the dry run never touches the API
    tagrank()
        .arg("--config")
        .arg(&config)
        .args(["rank", "--dry-run"])
        .assert()
        .success()
        .stderr(predicate::str::contains("dry run: 0 file(s) ranked"));
}

#[test]
fn test_rank_dry_run_json_reports_skipped_delivery() {
    let dir = tempdir().unwrap();
    let config = init_store(dir.path());

    let output = tagrank()
        .arg("--config")
        .arg(&config)
        .args(["--format", "json", "rank", "--dry-run"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["ranked"], serde_json::json!([]));
    assert_eq!(report["delivery"]["status"], "skipped");
}

#[test]
fn test_rank_unreachable_provider_exit_code_1() {
    let dir = tempdir().unwrap();
    let config = config_path(dir.path());

    // Point the API at a port nothing listens on
    std::fs::write(&config, "api_url = \"http://127.0.0.1:9\"\n").unwrap();

    tagrank()
        .arg("--config")
        .arg(&config)
        .args(["--format", "json", "rank"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("\"type\":\"provider_error\""));
}
