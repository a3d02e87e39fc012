//! Integration tests for the `init` command.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_init_creates_store() {
    let env = TestEnv::new();

    env.command()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized tablebook in"))
        .stdout(predicate::str::contains("Created data directory"))
        .stdout(predicate::str::contains("Created store"));

    assert!(env.data_dir.join("tablebook.db").exists());
    assert!(!env.data_dir.join("config.yaml").exists());
}

#[test]
fn test_init_with_config() {
    let env = TestEnv::new();

    env.command()
        .args(["init", "--with-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created default configuration file"));

    let config = env.data_dir.join("config.yaml");
    assert!(config.exists());

    // The generated file is valid and leaves the default window in place.
    env.command()
        .arg("validate")
        .arg(&config)
        .assert()
        .success();
    let (restaurant, _) = env.seed(&[(1, 2)]);
    assert_eq!(env.slots(&restaurant, 2).len(), 49);
}

#[test]
fn test_init_twice_requires_overwrite() {
    let env = TestEnv::new();
    env.command().arg("init").assert().success();

    env.command()
        .arg("init")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("--overwrite"));
}

#[test]
fn test_init_overwrite_discards_data() {
    let env = TestEnv::new();
    env.seed(&[(1, 4)]);

    env.command()
        .args(["init", "--overwrite"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recreated store"));

    env.command()
        .args(["restaurant", "list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[test]
fn test_init_keeps_existing_config() {
    let env = TestEnv::new();
    env.write_data_file("config.yaml", "output_format: csv\n");

    env.command()
        .args(["init", "--with-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    let content = std::fs::read_to_string(env.data_dir.join("config.yaml")).unwrap();
    assert_eq!(content, "output_format: csv\n");
}

#[test]
fn test_init_dry_run() {
    let env = TestEnv::new();

    env.command()
        .args(["init", "--dry-run", "--with-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry-run mode"))
        .stdout(predicate::str::contains("Create data directory"))
        .stdout(predicate::str::contains("Create configuration file"));

    assert!(!env.data_dir.exists());
}

/// Any store command creates the store on first use.
#[test]
fn test_autoinit_on_first_use() {
    let env = TestEnv::new();
    assert!(!env.data_dir.exists());

    env.command()
        .args(["restaurant", "list"])
        .assert()
        .success();
    assert!(env.data_dir.join("tablebook.db").exists());
}
