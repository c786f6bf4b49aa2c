use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("quire")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("browse"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_serve_help_shows_overrides() {
    cargo_bin_cmd!("quire")
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--host"))
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--content"));
}

#[test]
fn test_serve_rejects_invalid_port() {
    cargo_bin_cmd!("quire")
        .args(["serve", "--port", "not-a-port"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_missing_subcommand_fails() {
    cargo_bin_cmd!("quire").assert().failure();
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("quire")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
