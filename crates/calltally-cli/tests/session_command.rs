use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn get_calltally_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("calltally")
}

fn calltally(dir: &TempDir) -> Command {
    let mut cmd = Command::new(get_calltally_bin());
    cmd.env_remove("CALLTALLY_PORT")
        .env_remove("CALLTALLY_CONFIG")
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .arg("--session-file")
        .arg(dir.path().join("session.json"));
    cmd
}

#[test]
fn test_session_get_when_empty() {
    let dir = TempDir::new().unwrap();

    calltally(&dir)
        .args(["session", "get"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved order numbers"));
}

#[test]
fn test_session_set_get_clear() {
    let dir = TempDir::new().unwrap();

    calltally(&dir)
        .args(["session", "set", "1001,1002"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved order numbers: 1001,1002"));

    let saved = std::fs::read_to_string(dir.path().join("session.json")).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(saved["lastOrderNumber"], "1001,1002");

    calltally(&dir)
        .args(["-f", "json", "session", "get"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""lastOrderNumber":"1001,1002""#));

    calltally(&dir)
        .args(["session", "clear"])
        .assert()
        .success();

    calltally(&dir)
        .args(["session", "get"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved order numbers"));
}

#[test]
fn test_session_set_rejects_malformed_orders() {
    let dir = TempDir::new().unwrap();

    calltally(&dir)
        .args(["session", "set", "1001,abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid order numbers: 1001,abc"));

    assert!(!dir.path().join("session.json").exists());
}

#[test]
fn test_session_keeps_unrelated_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

    calltally(&dir)
        .args(["session", "set", "7"])
        .assert()
        .success();

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["theme"], "dark");
    assert_eq!(saved["lastOrderNumber"], "7");
}
