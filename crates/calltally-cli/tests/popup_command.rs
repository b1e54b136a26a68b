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
fn test_popup_command_help() {
    let mut cmd = Command::new(get_calltally_bin());
    cmd.arg("popup").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Interactive popup"))
        .stdout(predicate::str::contains("--html"))
        .stdout(predicate::str::contains("--window"))
        .stdout(predicate::str::contains("--launch"));
}

#[test]
fn test_popup_shows_master_and_tally() {
    let dir = TempDir::new().unwrap();

    calltally(&dir)
        .args(["popup", "--html"])
        .arg(fixture("orders.html"))
        .write_stdin("1001\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Мастер: Иванов Иван Иванович"))
        .stdout(predicate::str::contains("Анализ заявок начиная с 1001..."))
        .stdout(predicate::str::contains("Всего звонков: 3"));
}

#[test]
fn test_popup_restores_last_orders() {
    let dir = TempDir::new().unwrap();

    calltally(&dir)
        .args(["session", "set", "1003"])
        .assert()
        .success();

    // An empty line submits what the field was restored to.
    calltally(&dir)
        .args(["popup", "--html"])
        .arg(fixture("orders.html"))
        .write_stdin("\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[1003] >"))
        .stdout(predicate::str::contains("Отказ от общения: 1"));
}

#[test]
fn test_popup_invalid_then_valid_input() {
    let dir = TempDir::new().unwrap();

    calltally(&dir)
        .args(["popup", "--html"])
        .arg(fixture("orders.html"))
        .write_stdin("10a1\n9999\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Введите номера заявок через запятую (только цифры)",
        ))
        .stdout(predicate::str::contains("Заявка не найдена или произошла ошибка"));

    calltally(&dir)
        .args(["session", "get"])
        .assert()
        .success()
        .stdout(predicate::str::diff("9999\n"));
}

#[test]
fn test_popup_reports_name_table_failure() {
    let dir = TempDir::new().unwrap();

    calltally(&dir)
        .arg("--names")
        .arg(dir.path().join("missing.json"))
        .args(["popup", "--html"])
        .arg(fixture("orders.html"))
        .write_stdin(":q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ошибка загрузки данных мастеров"));
}

#[test]
fn test_popup_window_needs_browser() {
    let mut cmd = Command::new(get_calltally_bin());
    cmd.args(["popup", "--html", "page.html", "--window"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
