use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[allow(deprecated)]
fn get_calltally_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("calltally")
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// A command isolated from the user's settings and session files
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
fn test_tally_command_help() {
    let mut cmd = Command::new(get_calltally_bin());
    cmd.arg("tally").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Tally call outcomes from the first matching order onward",
        ))
        .stdout(predicate::str::contains("--html"))
        .stdout(predicate::str::contains("--no-save"));
}

#[test]
fn test_tally_from_first_matching_order() {
    let dir = TempDir::new().unwrap();

    calltally(&dir)
        .arg("tally")
        .arg("1001")
        .arg("--html")
        .arg(fixture("orders.html"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Результаты анализа:"))
        .stdout(predicate::str::contains("Всего звонков: 3"))
        .stdout(predicate::str::contains("Успех: 2"))
        .stdout(predicate::str::contains("Не алло: 1"))
        .stdout(predicate::str::contains("Отказ от общения: 1"))
        .stdout(predicate::str::contains("Не заполнен: 1"));
}

#[test]
fn test_tally_starts_at_any_listed_order() {
    let dir = TempDir::new().unwrap();

    // 1003 appears before 1005, so counting starts there.
    calltally(&dir)
        .arg("tally")
        .arg("1005,1003")
        .arg("--html")
        .arg(fixture("orders.html"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Всего звонков: 1"))
        .stdout(predicate::str::contains("Успех: 1"))
        .stdout(predicate::str::contains("Отказ от общения: 1"));
}

#[test]
fn test_tally_unknown_order_is_not_an_error() {
    let dir = TempDir::new().unwrap();

    calltally(&dir)
        .arg("tally")
        .arg("9999")
        .arg("--html")
        .arg(fixture("orders.html"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Заявка не найдена или произошла ошибка"));
}

#[test]
fn test_tally_missing_table_reads_as_not_found() {
    let dir = TempDir::new().unwrap();
    let page = dir.path().join("empty.html");
    std::fs::write(&page, "<html><body><p>nothing here</p></body></html>").unwrap();

    calltally(&dir)
        .arg("tally")
        .arg("1001")
        .arg("--html")
        .arg(&page)
        .assert()
        .success()
        .stdout(predicate::str::contains("Заявка не найдена или произошла ошибка"));
}

#[test]
fn test_tally_rejects_malformed_orders() {
    let dir = TempDir::new().unwrap();

    for orders in ["abc", "1001,", "10 01", "1001;1002"] {
        calltally(&dir)
            .arg("tally")
            .arg(orders)
            .arg("--html")
            .arg(fixture("orders.html"))
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "Введите номера заявок через запятую (только цифры)",
            ));
    }

    assert!(!dir.path().join("session.json").exists());
}

#[test]
fn test_tally_json_output() {
    let dir = TempDir::new().unwrap();

    let output = calltally(&dir)
        .arg("--format")
        .arg("json")
        .arg("tally")
        .arg("1001")
        .arg("--html")
        .arg(fixture("orders.html"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["orders"], "1001");
    assert_eq!(json["found"], true);
    assert_eq!(json["totalCalls"], 3);
    assert_eq!(json["counts"]["success"], 2);
    assert_eq!(json["counts"]["noAnswer"], 1);
    assert_eq!(json["counts"]["refused"], 1);
    assert_eq!(json["counts"]["notFilled"], 1);
}

#[test]
fn test_tally_json_output_when_not_found() {
    let dir = TempDir::new().unwrap();

    let output = calltally(&dir)
        .args(["-f", "json", "tally", "9999", "--html"])
        .arg(fixture("orders.html"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["found"], false);
    assert!(json.get("counts").is_none());
    assert!(json.get("error").is_none());
}

#[test]
fn test_tally_remembers_orders() {
    let dir = TempDir::new().unwrap();

    calltally(&dir)
        .args(["tally", " 1001,1002 ", "--html"])
        .arg(fixture("orders.html"))
        .assert()
        .success();

    calltally(&dir)
        .args(["session", "get"])
        .assert()
        .success()
        .stdout(predicate::str::diff("1001,1002\n"));
}

#[test]
fn test_tally_no_save_leaves_session_alone() {
    let dir = TempDir::new().unwrap();

    calltally(&dir)
        .args(["session", "set", "2002"])
        .assert()
        .success();

    calltally(&dir)
        .args(["tally", "1001", "--no-save", "--html"])
        .arg(fixture("orders.html"))
        .assert()
        .success();

    calltally(&dir)
        .args(["session", "get"])
        .assert()
        .success()
        .stdout(predicate::str::diff("2002\n"));
}

#[test]
fn test_tally_missing_html_file() {
    let dir = TempDir::new().unwrap();

    calltally(&dir)
        .args(["tally", "1001", "--html"])
        .arg(dir.path().join("missing.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not read HTML file"));
}
