//! Binary-level tests. Everything here runs offline: either nothing needs a
//! server, or the demo credentials select the in-memory client.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `guardbar` isolated from the environment and the user's config file
fn guardbar(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("guardbar").unwrap();
    for var in [
        "GUARDBAR_HOST",
        "GUARDBAR_PORT",
        "GUARDBAR_USERNAME",
        "GUARDBAR_PASSWORD",
        "GUARDBAR_CONFIG",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd.arg("--config")
        .arg(config_dir.path().join("config.toml"))
        .arg("--no-color");
    cmd
}

fn demo(config_dir: &TempDir) -> Command {
    let mut cmd = guardbar(config_dir);
    cmd.args(["--host", "localhost", "--username", "demo", "--password", "testing"]);
    cmd
}

#[test]
fn test_help() {
    let dir = TempDir::new().unwrap();
    guardbar(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("AdGuard Home"));
}

#[test]
fn test_unconfigured_prints_setup_instructions() {
    let dir = TempDir::new().unwrap();
    guardbar(&dir)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"))
        .stderr(predicate::str::contains("guardbar config set host"));
}

#[test]
fn test_demo_status() {
    let dir = TempDir::new().unwrap();
    demo(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ad Blocking: ON"))
        .stdout(predicate::str::contains("5,678"))
        .stdout(predicate::str::contains("21.7%"));
}

#[test]
fn test_demo_status_json() {
    let dir = TempDir::new().unwrap();
    let output = demo(&dir)
        .args(["status", "-o", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["reconciled"]["icon"], "protection_on");
    assert_eq!(json["stats"]["num_blocked_filtering"], 1234);
    assert_eq!(json["status"]["version"], "v0.107.52");
}

#[test]
fn test_demo_toggles() {
    let dir = TempDir::new().unwrap();
    demo(&dir)
        .arg("disable")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ad Blocking: OFF"));

    demo(&dir)
        .arg("enable")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ad Blocking: ON"));
}

#[test]
fn test_demo_disable_for_reenables() {
    let dir = TempDir::new().unwrap();
    demo(&dir)
        .args(["disable", "--for", "1s"])
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success()
        .stdout(predicate::str::contains("Re-enabling in"))
        .stdout(predicate::str::contains("Ad Blocking: ON"));
}

#[test]
fn test_disable_rejects_bad_durations() {
    let dir = TempDir::new().unwrap();
    demo(&dir)
        .args(["disable", "--for", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("greater than zero"));

    demo(&dir)
        .args(["disable", "--for", "5d"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown duration unit"));
}

#[test]
fn test_presets() {
    let dir = TempDir::new().unwrap();
    guardbar(&dir)
        .arg("presets")
        .assert()
        .success()
        .stdout(predicate::str::contains("30 seconds"))
        .stdout(predicate::str::contains("2 hours"));

    let output = guardbar(&dir)
        .args(["presets", "-o", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 8);
    assert_eq!(rows[0]["label"], "30 seconds");
    assert_eq!(rows[0]["seconds"], 30);
    assert_eq!(rows[0]["enabled"], true);
}

#[test]
fn test_demo_connection_test() {
    let dir = TempDir::new().unwrap();
    demo(&dir)
        .arg("test")
        .assert()
        .success()
        .stdout(predicate::str::contains("Demo credentials"));
}

#[test]
fn test_config_set_and_show() {
    let dir = TempDir::new().unwrap();

    guardbar(&dir)
        .args(["config", "set", "host", "192.168.1.2"])
        .assert()
        .success();
    guardbar(&dir)
        .args(["config", "set", "password", "hunter2"])
        .assert()
        .success();
    guardbar(&dir)
        .args(["config", "set", "presets", "30 seconds,2h"])
        .assert()
        .success();

    guardbar(&dir)
        .args(["config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("192.168.1.2"))
        .stdout(predicate::str::contains("2 hours"))
        .stdout(predicate::str::contains("hunter2").not());

    let saved = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(saved.contains("host = \"192.168.1.2\""));
}

#[test]
fn test_config_set_unknown_key() {
    let dir = TempDir::new().unwrap();
    guardbar(&dir)
        .args(["config", "set", "api_key", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_config_path_honors_override() {
    let dir = TempDir::new().unwrap();
    guardbar(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_file_supplies_connection() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "host = \"localhost\"\nusername = \"demo\"\npassword = \"testing\"\n",
    )
    .unwrap();

    guardbar(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ad Blocking: ON"));
}
