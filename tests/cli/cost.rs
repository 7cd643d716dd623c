use crate::support::{migsize, stdout_json, write_file};
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_cost_aws() {
    let dir = tempdir().unwrap();

    migsize(dir.path())
        .args(["cost", "--target", "aws", "--cpus", "4", "--disk", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("aws: $148.24/month"))
        .stdout(predicate::str::contains("compute: $138.24 (4 vCPU)"))
        .stdout(predicate::str::contains("storage: $10.00 (100 GB)"));
}

#[test]
fn test_cost_alias_json() {
    let dir = tempdir().unwrap();

    let output = migsize(dir.path())
        .args([
            "--format", "json", "cost", "-t", "gce", "--cpus", "2", "--disk", "50",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["platform"], "gcp");
    assert!((json["storage_monthly"].as_f64().unwrap() - 8.5).abs() < 1e-9);
    assert_eq!(json["priced"], true);
}

#[test]
fn test_cost_pricing_override() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "migsize.toml",
        "[pricing.vmware]\nvcpu_hourly = 0.01\nstorage_gb_monthly = 0.02\n",
    );

    migsize(dir.path())
        .args([
            "--format", "csv", "cost", "-t", "vmware", "--cpus", "1", "--disk", "100",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("vmware,7.20,2.00,9.20"));
}

#[test]
fn test_cost_unknown_platform_is_usage_error() {
    let dir = tempdir().unwrap();

    migsize(dir.path())
        .args(["cost", "-t", "mainframe", "--cpus", "1", "--disk", "10"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown platform: mainframe"));
}
