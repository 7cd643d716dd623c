use crate::support::{migsize, stdout_json, write_file, EXACT_CONFIG};
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_size_mirror_on_used_size() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "migsize.toml", EXACT_CONFIG);

    migsize(dir.path())
        .args(["size", "1000", "--size-type", "used", "--raid", "raid1_ftt1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Reported size: 1000.00 GB (used, raid1_ftt1)",
        ))
        .stdout(predicate::str::contains("Logical size: 500.00 GB"))
        .stdout(predicate::str::contains("Target size:  500.00 GB (-50.0%)"))
        .stdout(predicate::str::contains("- Primary data (÷2.00 RAID)"))
        .stdout(predicate::str::contains("- VMware thin provisioning"));
}

#[test]
fn test_size_json_reexpansion_to_azure() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "migsize.toml", EXACT_CONFIG);

    let output = migsize(dir.path())
        .args([
            "--format",
            "json",
            "size",
            "225.56",
            "--size-type",
            "used",
            "--raid",
            "none",
            "--dedup-ratio",
            "1.5",
            "--compression-ratio",
            "1.2",
            "-t",
            "vmware",
            "-t",
            "azure",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    let estimates = json["estimates"].as_array().unwrap();
    let thin = estimates[0]["target_size"].as_f64().unwrap();
    assert!((thin - 406.008).abs() < 1e-6);
    assert_eq!(estimates[1]["platform"], "azure");
    assert_eq!(estimates[1]["target_size"].as_f64().unwrap(), 512.0);
    assert_eq!(json["policy"]["dedup_ratio"].as_f64().unwrap(), 1.5);
}

#[test]
fn test_size_gcp_minimum() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "migsize.toml", EXACT_CONFIG);

    migsize(dir.path())
        .args([
            "--format", "csv", "size", "3.2", "--size-type", "used", "--raid", "none", "-t",
            "gcp",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("-,gcp,3.20,3.20,10.00,6.80,212.5,"))
        .stdout(predicate::str::contains("Raised to minimum 10 GiB"));
}

#[test]
fn test_size_azure_cap_is_flagged() {
    let dir = tempdir().unwrap();

    let output = migsize(dir.path())
        .args([
            "--format",
            "json",
            "size",
            "50000",
            "--size-type",
            "used",
            "--raid",
            "none",
            "-t",
            "azure",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    let estimate = &json["estimates"][0];
    assert_eq!(estimate["target_size"].as_f64().unwrap(), 32767.0);
    let notes: Vec<&str> = estimate["notes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n.as_str().unwrap())
        .collect();
    assert!(notes.contains(&"Exceeds largest tier; capped at 32767 GiB (split across disks)"));
}

#[test]
fn test_size_zero() {
    let dir = tempdir().unwrap();

    let output = migsize(dir.path())
        .args(["--format", "json", "size", "0", "-t", "gcp"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    let estimate = &json["estimates"][0];
    assert_eq!(estimate["target_size"].as_f64().unwrap(), 0.0);
    assert_eq!(estimate["delta_pct"].as_f64().unwrap(), 0.0);
    assert_eq!(estimate["notes"][0], "Zero reported size");
}

#[test]
fn test_size_negative_is_usage_error() {
    let dir = tempdir().unwrap();

    migsize(dir.path())
        .args(["size", "-5"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid size"));
}

#[test]
fn test_size_snapshots_and_no_reclaim() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "migsize.toml", EXACT_CONFIG);

    migsize(dir.path())
        .args([
            "size",
            "1000",
            "--size-type",
            "used",
            "--no-reclaim",
            "--snapshots",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logical size: 450.00 GB"))
        .stdout(predicate::str::contains("Target size:  405.00 GB (-59.5%)"))
        .stdout(predicate::str::contains("- Unreclaimed blocks ×0.90"))
        .stdout(predicate::str::contains("- Snapshot consolidation ×0.90"));
}
