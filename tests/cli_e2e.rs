//! End-to-end CLI tests for the mtscrape binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command isolated from the user's config file and log settings.
fn mtscrape(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mtscrape").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_binary_without_sources_returns_zero() {
    let home = TempDir::new().unwrap();
    mtscrape(&home)
        .assert()
        .success()
        .stderr(predicate::str::contains("Nothing to do"));
}

#[test]
fn test_binary_help_displays_usage() {
    let home = TempDir::new().unwrap();
    mtscrape(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Capture programmes from the ZDF Mediathek"))
        .stdout(predicate::str::contains("--category"));
}

#[test]
fn test_binary_version_displays_version() {
    let home = TempDir::new().unwrap();
    mtscrape(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mtscrape"));
}

#[test]
fn test_binary_invalid_flag_returns_usage_error() {
    let home = TempDir::new().unwrap();
    mtscrape(&home)
        .arg("--invalid-flag")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_binary_invalid_pattern_is_fatal() {
    let home = TempDir::new().unwrap();
    mtscrape(&home)
        .args(["-m", "(unclosed", "-C", "208"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid title pattern"));
}

#[test]
fn test_binary_invalid_config_file_is_fatal() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("mtscrape");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "bogus_key = 1\n").unwrap();

    mtscrape(&home)
        .args(["-I", "1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config"));
}

#[test]
fn test_binary_uncreatable_output_dir_is_fatal() {
    let home = TempDir::new().unwrap();
    let blocker = home.path().join("file");
    std::fs::write(&blocker, b"x").unwrap();

    mtscrape(&home)
        .args(["-d"])
        .arg(blocker.join("out"))
        .args(["-A", "INVALID:livestream"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot create output directory"));
}

#[test]
fn test_binary_output_dir_that_is_a_file_is_fatal() {
    let home = TempDir::new().unwrap();
    let not_a_dir = home.path().join("not_a_dir");
    std::fs::write(&not_a_dir, b"x").unwrap();

    mtscrape(&home)
        .arg("-d")
        .arg(&not_a_dir)
        .args(["-A", "INVALID:livestream"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn test_binary_unsupported_source_is_skipped() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    mtscrape(&home)
        .arg("-d")
        .arg(out.path())
        .args(["-A", "INVALID:livestream"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[skip] this looks like a livestream source"));
}

#[test]
fn test_binary_quiet_hides_info() {
    let home = TempDir::new().unwrap();
    mtscrape(&home)
        .arg("-q")
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}
