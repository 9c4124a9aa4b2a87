//! Fast CLI tests using assert_cmd.
//! These run the binary directly without a backend.

#![allow(deprecated)] // assert_cmd::Command::cargo_bin is deprecated but works fine

use assert_cmd::Command;
use predicates::prelude::*;

/// A command isolated from the user's config and environment
fn minedock(config_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("minedock").unwrap();
    cmd.env_remove("MINEDOCK_SERVER")
        .arg("--config")
        .arg(config_dir.path().join("config.toml"));
    cmd
}

#[test]
fn test_help_flag() {
    Command::cargo_bin("minedock")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Minecraft Server Control Panel"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("minedock")
        .unwrap()
        .arg("--version")
        .assert()
        .success();
}

#[test]
fn test_subcommand_help() {
    for subcmd in &["list", "start", "stop", "create", "logs", "config"] {
        Command::cargo_bin("minedock")
            .unwrap()
            .args([subcmd, "--help"])
            .assert()
            .success()
            .stdout(predicate::str::is_empty().not());
    }
}

#[test]
fn test_unknown_subcommand_fails() {
    Command::cargo_bin("minedock")
        .unwrap()
        .arg("nonexistent-subcommand")
        .assert()
        .failure();
}

#[test]
fn test_config_shows_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    minedock(&tmp)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("not created yet"))
        .stdout(predicate::str::contains("http://127.0.0.1:8080"));
}

#[test]
fn test_config_reflects_server_override() {
    let tmp = tempfile::tempdir().unwrap();
    minedock(&tmp)
        .env("MINEDOCK_SERVER", "http://mc.example.net:9000")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("http://mc.example.net:9000"));
}

#[test]
fn test_config_init_writes_file() {
    let tmp = tempfile::tempdir().unwrap();
    minedock(&tmp)
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config"));

    let written = std::fs::read_to_string(tmp.path().join("config.toml")).unwrap();
    assert!(written.contains("origin"));
}

#[test]
fn test_invalid_origin_fails() {
    let tmp = tempfile::tempdir().unwrap();
    minedock(&tmp)
        .args(["--server", "not a url", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid backend origin"));
}

#[test]
fn test_list_unreachable_backend_fails() {
    let tmp = tempfile::tempdir().unwrap();
    // Port 9 (discard) is closed on any sane test host
    minedock(&tmp)
        .args(["--server", "http://127.0.0.1:9", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_create_requires_port() {
    let tmp = tempfile::tempdir().unwrap();
    minedock(&tmp)
        .args(["create", "--name", "survival"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--port"));
}

#[test]
fn test_create_rejects_malformed_env() {
    let tmp = tempfile::tempdir().unwrap();
    minedock(&tmp)
        .args(["create", "--name", "survival", "--port", "25565", "--env", "MEMORY"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEY=VALUE"));
}
