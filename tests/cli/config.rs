use crate::support::{migsize, stdout_json, write_file};
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_config_defaults() {
    let dir = tempdir().unwrap();

    migsize(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("# built-in defaults"))
        .stdout(predicate::str::contains("raid_policy = \"raid1_ftt1\""))
        .stdout(predicate::str::contains("swap_deflation = 0.95"));
}

#[test]
fn test_config_explicit_path() {
    let dir = tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "site.toml",
        "[defaults]\nraid_policy = \"raid5\"\ntargets = [\"aws\", \"azure\"]\n",
    );

    let output = migsize(dir.path())
        .args(["--format", "json", "--config"])
        .arg(&path)
        .arg("config")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["source"], path.display().to_string());
    assert_eq!(json["config"]["defaults"]["raid_policy"], "raid5");
    assert_eq!(json["config"]["defaults"]["targets"][1], "azure");
}

#[test]
fn test_config_from_environment() {
    let dir = tempdir().unwrap();
    let path = write_file(dir.path(), "env.toml", "[defaults]\nprecision = 4\n");

    migsize(dir.path())
        .env("MIGSIZE_CONFIG", &path)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("precision = 4"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = tempdir().unwrap();

    migsize(dir.path())
        .args(["--config", "absent.toml", "config"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read config absent.toml"));
}

#[test]
fn test_invalid_config_value_is_usage_error() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "migsize.toml", "[raid_overheads]\nbroken = 0.5\n");

    migsize(dir.path())
        .arg("platforms")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("raid_overheads.broken"));
}

#[test]
fn test_malformed_config_is_toml_error() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "migsize.toml", "[defaults\n");

    migsize(dir.path())
        .args(["--format", "json", "config"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("toml_error"));
}
