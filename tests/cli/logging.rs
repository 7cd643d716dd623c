use crate::support::migsize;
use predicates::prelude::*;
use tempfile::tempdir;

// ============================================================================
// Logging flag tests
// ============================================================================

#[test]
fn test_log_level_debug_shows_debug_messages() {
    let dir = tempdir().unwrap();

    migsize(dir.path())
        .args(["--log-level", "debug", "size", "100"])
        .assert()
        .success()
        .stderr(predicate::str::contains("parse_args"))
        .stderr(predicate::str::contains("resolve"));
}

#[test]
fn test_log_level_warn_hides_debug_messages() {
    let dir = tempdir().unwrap();

    migsize(dir.path())
        .args(["--log-level", "warn", "size", "100"])
        .assert()
        .success()
        .stderr(predicate::str::contains("parse_args").not());
}

#[test]
fn test_verbose_shows_debug_messages() {
    let dir = tempdir().unwrap();

    migsize(dir.path())
        .args(["--verbose", "size", "100"])
        .assert()
        .success()
        .stderr(predicate::str::contains("parse_args"));
}

#[test]
fn test_logs_never_reach_stdout() {
    let dir = tempdir().unwrap();

    migsize(dir.path())
        .args(["--verbose", "--format", "json", "size", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("parse_args").not());
}

#[test]
fn test_log_json_format() {
    let dir = tempdir().unwrap();

    migsize(dir.path())
        .args(["--log-json", "--log-level", "debug", "size", "100"])
        .assert()
        .success()
        .stderr(predicate::str::contains("\"level\":\"DEBUG\""));
}

#[test]
fn test_fallback_warning_logged_by_default() {
    let dir = tempdir().unwrap();

    migsize(dir.path())
        .args(["size", "100", "--raid", "raid50"])
        .assert()
        .success()
        .stderr(predicate::str::contains("unknown RAID policy"));
}

#[test]
fn test_migsize_log_env_overrides_flags() {
    let dir = tempdir().unwrap();

    migsize(dir.path())
        .env("MIGSIZE_LOG", "migsize=debug")
        .args(["size", "100"])
        .assert()
        .success()
        .stderr(predicate::str::contains("parse_args"));
}
