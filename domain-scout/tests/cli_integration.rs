// domain-scout/tests/cli_integration.rs

//! CLI tests that never reach the real upstream: argument validation,
//! presets, config errors, and lookups against a closed local port.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Nothing listens on port 1, so every lookup fails fast.
const DEAD_ENDPOINT: &str = "http://127.0.0.1:1";

/// A command isolated from the user's config files and DS_* variables.
fn scout(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("domain-scout").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("RUST_LOG");
    for var in [
        "DS_ENDPOINT",
        "DS_FLAVOR",
        "DS_API_KEY",
        "DS_API_HOST",
        "DS_TIMEOUT",
        "DS_DELAY",
        "DS_PRESET",
        "DS_TLD",
        "DS_CACHE",
        "DS_CACHE_CAPACITY",
        "DS_CACHE_TTL",
        "DS_CONFIG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_shows_flags() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--check"))
        .stdout(predicate::str::contains("--expand"))
        .stdout(predicate::str::contains("--available-only"))
        .stdout(predicate::str::contains("--no-cache"));
}

#[test]
fn test_list_presets() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .arg("--list-presets")
        .assert()
        .success()
        .stdout(predicate::str::contains("popular"))
        .stdout(predicate::str::contains("startup"))
        .stdout(predicate::str::contains("(12)"));
}

#[test]
fn test_missing_query_error() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("You must specify a search query"));
}

#[test]
fn test_conflicting_tld_sources_error() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .args(["test", "-t", "com", "--preset", "startup"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot specify multiple TLD sources"));
}

#[test]
fn test_multiple_output_formats_error() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .args(["test", "--json", "--txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("multiple output formats"));
}

#[test]
fn test_invalid_timeout_error() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .args(["test", "--timeout", "whenever"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --timeout"));
}

#[test]
fn test_unknown_preset_error() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .args(["test", "--check", "--preset", "nope", "--endpoint", DEAD_ENDPOINT])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown preset 'nope'"));
}

#[test]
fn test_invalid_config_file_error() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("bad.toml");
    fs::write(&path, "[cache]\ncapacity = 0\n").unwrap();

    scout(&home)
        .args(["test", "--config", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("capacity"));
}

#[test]
fn test_local_config_is_discovered() {
    let home = TempDir::new().unwrap();
    fs::write(
        home.path().join("domain-scout.toml"),
        "[lookup]\npreset = \"unheard-of\"\n",
    )
    .unwrap();

    scout(&home)
        .args(["test", "--check", "--endpoint", DEAD_ENDPOINT])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unheard-of"));
}

#[test]
fn test_check_with_unreachable_upstream_drops_failures() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .args([
            "example",
            "--check",
            "-t",
            "com,net",
            "--endpoint",
            DEAD_ENDPOINT,
            "--timeout",
            "2s",
            "--json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"results\": []"));
}

#[test]
fn test_search_with_unreachable_upstream_fails() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .args(["example", "--endpoint", DEAD_ENDPOINT, "--timeout", "2s"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_csv_export_to_file() {
    let home = TempDir::new().unwrap();
    let out = home.path().join("results.csv");

    scout(&home)
        .args([
            "example",
            "--check",
            "-t",
            "com",
            "--endpoint",
            DEAD_ENDPOINT,
            "--timeout",
            "2s",
            "-o",
            out.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported to"));

    let content = fs::read_to_string(out).unwrap();
    assert_eq!(content, "domain,zone,status,summary\n");
}
