use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_config_path_command() {
    let dir = tempdir().unwrap();
    let expected = dir.path().join("config.toml");

    cargo_bin_cmd!("quire")
        .env("QUIRE_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.display().to_string()))
        .stderr(predicate::str::contains("quire config init"));
}

#[test]
fn test_config_path_without_hint_once_created() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "").unwrap();

    cargo_bin_cmd!("quire")
        .env("QUIRE_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_config_init_creates_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    assert!(!config_path.exists());

    cargo_bin_cmd!("quire")
        .env("QUIRE_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config to"))
        .stdout(predicate::str::contains("127.0.0.1:23234"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("port = 23234"));
    assert!(contents.contains("high_performance = true"));
}

#[test]
fn test_config_init_fails_if_exists() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "# existing config").unwrap();

    cargo_bin_cmd!("quire")
        .env("QUIRE_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "port = \"twenty\"").unwrap();

    cargo_bin_cmd!("quire")
        .env("QUIRE_HOME", dir.path())
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn test_serve_reports_bind_failure() {
    let dir = tempdir().unwrap();
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port();

    cargo_bin_cmd!("quire")
        .env("QUIRE_HOME", dir.path())
        .args(["serve", "--host", "127.0.0.1", "--port", &port.to_string()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to bind"));
}

#[test]
fn test_browse_requires_terminal() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("quire")
        .env("QUIRE_HOME", dir.path())
        .arg("browse")
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires a terminal"));
}
