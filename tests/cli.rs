//! Integration tests for the pakager binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pakager_cmd() -> Command {
    Command::cargo_bin("pakager").expect("Failed to find pakager binary")
}

fn project(package_json: &str) -> TempDir {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("myapp"), b"binary").unwrap();
    std::fs::write(tmp.path().join("package.json"), package_json).unwrap();
    tmp
}

const VALID: &str = r#"{
  "name": "MyApp",
  "author": "Jane",
  "version": "1.0.0",
  "pakager": { "mac": { "binary": "myapp" } }
}"#;

#[test]
fn check_prints_resolved_config() {
    let tmp = project(VALID);
    pakager_cmd()
        .arg(tmp.path())
        .arg("--check")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"appId\": \"com.pakager.MyApp\""))
        .stdout(predicate::str::contains("\"realName\": \"MyApp\""))
        .stderr(predicate::str::contains("pakager.mac.icon"));
}

#[test]
fn verbose_reports_config_location() {
    let tmp = project(VALID);
    pakager_cmd()
        .arg(tmp.path())
        .args(["--check", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Located config"));

    pakager_cmd()
        .arg(tmp.path())
        .arg("--check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Located config").not());
}

#[test]
fn invalid_config_lists_errors_and_fails() {
    let tmp = project(
        r#"{
  "pakager": { "mac": { "binary": "missing", "formats": ["dmg", "dmg"] } }
}"#,
    );
    pakager_cmd()
        .arg(tmp.path().join("package.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid config"))
        .stderr(predicate::str::contains("  - pakager.mac.binary:"))
        .stderr(predicate::str::contains("duplicate value \"dmg\""))
        .stderr(predicate::str::contains("  - name:"));

    assert!(!tmp.path().join("dist").exists());
}

#[test]
fn missing_config_file_fails() {
    let tmp = tempfile::tempdir().unwrap();
    pakager_cmd()
        .arg(tmp.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn builds_zip_archive() {
    let tmp = project(
        r#"{
  "name": "MyApp",
  "author": "Jane",
  "version": "1.0.0",
  "pakager": { "mac": { "binary": "myapp", "formats": ["zip"] } }
}"#,
    );
    pakager_cmd()
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("MyApp-1.0.0.zip"));

    assert!(tmp.path().join("dist/MyApp-1.0.0.zip").is_file());
    assert!(!tmp.path().join("dist/MyApp.app").exists());
}
