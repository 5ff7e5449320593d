use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_config_path_command() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("hbt")
        .env("HBT_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_creates_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    assert!(!config_path.exists());

    cargo_bin_cmd!("hbt")
        .env("HBT_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config at"));

    assert!(config_path.exists());

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("base_url"));
    assert!(contents.contains("refresh_delay_ms"));
}

#[test]
fn test_config_init_fails_if_exists() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    fs::write(&config_path, "# existing config").unwrap();

    cargo_bin_cmd!("hbt")
        .env("HBT_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_set_url_writes_value() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    cargo_bin_cmd!("hbt")
        .env("HBT_HOME", dir.path())
        .args(["config", "set-url", "https://habits.example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set base URL"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("https://habits.example.com"));
}

#[test]
fn test_config_set_url_rejects_invalid() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("hbt")
        .env("HBT_HOME", dir.path())
        .args(["config", "set-url", "not a url"])
        .assert()
        .failure();

    assert!(!dir.path().join("config.toml").exists());
}

#[test]
fn test_config_help_shows_subcommands() {
    cargo_bin_cmd!("hbt")
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("path"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("set-url"));
}
