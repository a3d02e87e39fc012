//! Integration tests for the `validate` command.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_validate_accepts_good_file() {
    let env = TestEnv::new();
    let path = env.write_data_file(
        "good.yaml",
        "booking:\n  service_open: '12:00'\n  service_close: '14:00'\n  slot_step_minutes: 30\n",
    );

    env.command()
        .arg("--verbose")
        .arg("validate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stderr(predicate::str::contains("5 slot(s) every 30 min"));
}

#[test]
fn test_validate_rejects_unknown_keys() {
    let env = TestEnv::new();
    let path = env.write_data_file("typo.yaml", "booking:\n  duration: 90\n");

    env.command()
        .arg("validate")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Parse error"));
}

#[test]
fn test_validate_rejects_inconsistent_values() {
    let env = TestEnv::new();
    let path = env.write_data_file(
        "bad.yaml",
        "reconcile:\n  interval_seconds: 0\n",
    );

    env.command()
        .arg("validate")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("reconcile.interval_seconds"));
}

/// Validating does not touch the store.
#[test]
fn test_validate_needs_no_store() {
    let env = TestEnv::new();
    let path = env.path().join("tablebook.yaml");
    std::fs::write(&path, "output_format: tsv\n").unwrap();

    env.command().arg("validate").arg(&path).assert().success();
    assert!(!env.data_dir.exists());
}
