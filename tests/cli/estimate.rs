use std::fs;

use crate::support::{migsize, stdout_json, write_file, EXACT_CONFIG};
use predicates::prelude::*;
use tempfile::tempdir;

const INVENTORY: &str = "host,size\nweb01,1000\ndb01,500\n";

// ============================================================================
// CSV output
// ============================================================================

#[test]
fn test_estimate_csv_to_stdout() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "vms.csv", INVENTORY);

    migsize(dir.path())
        .args(["--format", "csv", "estimate", "vms.csv", "--size-type", "used"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "host,platform,source_size,logical_size,target_size,delta,delta_pct,notes\n",
        ))
        .stdout(predicate::str::contains(
            "web01,vmware,1000.00,500.00,475.00,-525.00,-52.5,\
             Primary data (÷2.00 RAID); Swap excluded ×0.95; VMware thin provisioning",
        ))
        .stdout(predicate::str::contains("db01,vmware,500.00,250.00,237.50"))
        .stderr(predicate::str::contains("ESTIMATION SUMMARY"))
        .stderr(predicate::str::contains(
            "Size reduction: 787.50 GB (52.5% smaller)",
        ));
}

#[test]
fn test_estimate_accepts_byte_order_mark() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "vms.csv", "\u{feff}Host,Size\r\nweb01,100\r\n");
    write_file(dir.path(), "migsize.toml", EXACT_CONFIG);

    migsize(dir.path())
        .args(["--format", "csv", "estimate", "vms.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("web01,vmware,100.00,50.00,50.00"));
}

#[test]
fn test_estimate_writes_output_file() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "vms.csv", INVENTORY);
    write_file(dir.path(), "migsize.toml", EXACT_CONFIG);

    migsize(dir.path())
        .args([
            "estimate",
            "vms.csv",
            "-o",
            "out.csv",
            "--size-type",
            "used",
            "--target",
            "aws",
            "--target",
            "azure",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to out.csv"));

    let written = fs::read_to_string(dir.path().join("out.csv")).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("web01,aws,1000.00,500.00,500.00,-500.00,-50.0,"));
    assert!(lines[2].starts_with("web01,azure,1000.00,500.00,512.00,-488.00,-48.8,"));
    assert!(lines[3].starts_with("db01,aws,500.00,250.00,250.00,"));
    assert!(lines[4].starts_with("db01,azure,500.00,250.00,256.00,"));
}

#[test]
fn test_estimate_precision_flag() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "vms.csv", "host,size\nvm1,100\n");
    write_file(dir.path(), "migsize.toml", EXACT_CONFIG);

    migsize(dir.path())
        .args([
            "--format",
            "csv",
            "--quiet",
            "estimate",
            "vms.csv",
            "--size-type",
            "used",
            "--raid",
            "raid5",
            "--precision",
            "0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("vm1,vmware,100,75,75,-25,-24.8,"));
}

#[test]
fn test_estimate_bytes_unit() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "vms.csv", "host,size\nvm1,214748364800\n");
    write_file(dir.path(), "migsize.toml", EXACT_CONFIG);

    migsize(dir.path())
        .args([
            "--format",
            "csv",
            "-q",
            "estimate",
            "vms.csv",
            "--unit",
            "bytes",
            "--size-type",
            "used",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("vm1,vmware,200.00,100.00,100.00"));
}

#[test]
fn test_estimate_thin_ratio_and_dedup() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "vms.csv", "host,size\nvm1,500\n");
    write_file(dir.path(), "migsize.toml", EXACT_CONFIG);

    let output = migsize(dir.path())
        .args([
            "--format",
            "json",
            "estimate",
            "vms.csv",
            "--thin-ratio",
            "0.6",
            "--raid",
            "raid5",
            "--dedup-ratio",
            "1.5",
            "--compression-ratio",
            "1.2",
            "--target",
            "azure",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    let estimate = &json["estimates"][0];
    assert_eq!(estimate["host"], "vm1");
    assert_eq!(estimate["platform"], "azure");
    let logical = estimate["logical_size"].as_f64().unwrap();
    assert!((logical - 225.56).abs() < 0.005);
    assert_eq!(estimate["target_size"].as_f64().unwrap(), 512.0);
    assert_eq!(json["summary"]["failed"], 0);
    assert!(json["generated_at"].is_string());
}

// ============================================================================
// Human output
// ============================================================================

#[test]
fn test_estimate_human_table_with_breakdown() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "vms.csv", "host,size,raid_policy\nvm1,100,raid6\n");
    write_file(dir.path(), "migsize.toml", EXACT_CONFIG);

    migsize(dir.path())
        .args(["estimate", "vms.csv", "--size-type", "used", "--breakdown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("HOST"))
        .stdout(predicate::str::contains("vm1"))
        .stdout(predicate::str::contains("- Primary data (÷1.50 RAID)"))
        .stdout(predicate::str::contains("ESTIMATION SUMMARY"))
        .stdout(predicate::str::contains("Hosts: 1 (1 estimated, 0 failed)"));
}

#[test]
fn test_estimate_unknown_raid_is_flagged() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "vms.csv", "host,size,raid_policy\nvm1,100,raid50\n");

    migsize(dir.path())
        .args(["--format", "csv", "estimate", "vms.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\"Unknown RAID policy 'raid50', assumed ×2.00; ",
        ))
        .stderr(predicate::str::contains("Cautions: 1"));
}

#[test]
fn test_estimate_unknown_platform_falls_back() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "vms.csv", "host,size\nvm1,100\n");

    migsize(dir.path())
        .args(["--format", "csv", "estimate", "vms.csv", "--target", "mainframe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vm1,vmware,"))
        .stdout(predicate::str::contains(
            "Unknown platform 'mainframe', used vmware rules",
        ));
}

#[test]
fn test_estimate_with_cpus_reports_cost() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "vms.csv", "host,size,cpus\nvm1,200,4\n");
    write_file(dir.path(), "migsize.toml", EXACT_CONFIG);

    migsize(dir.path())
        .args(["estimate", "vms.csv", "--size-type", "used", "-t", "aws"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Monthly cost: $148.24 (compute $138.24, storage $10.00)",
        ));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_bad_rows_still_produce_output_then_exit_3() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "vms.csv", "host,size\nvm1,100\nvm2,abc\n");

    migsize(dir.path())
        .args(["--format", "csv", "estimate", "vms.csv"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("vm1,vmware,"))
        .stdout(predicate::str::contains("vm2").not())
        .stderr(predicate::str::contains("warning: line 3 (vm2)"))
        .stderr(predicate::str::contains("1 of 2 records could not be estimated"));
}

#[test]
fn test_missing_size_column_is_data_error() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "vms.csv", "host,capacity\nvm1,100\n");

    migsize(dir.path())
        .args(["estimate", "vms.csv"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("missing required column 'size'"));
}

#[test]
fn test_missing_input_file() {
    let dir = tempdir().unwrap();

    migsize(dir.path())
        .args(["--format", "json", "estimate", "nope.csv"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("\"type\": \"failed_operation_with_target\"").or(
            predicate::str::contains("\"type\":\"failed_operation_with_target\""),
        ));
}

#[test]
fn test_invalid_thin_ratio_is_usage_error() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "vms.csv", INVENTORY);

    migsize(dir.path())
        .args(["estimate", "vms.csv", "--thin-ratio", "1.5"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("thin_fill_ratio"));
}

#[test]
fn test_reduction_ratio_below_one_is_usage_error() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "vms.csv", INVENTORY);

    migsize(dir.path())
        .args(["estimate", "vms.csv", "--compression-ratio", "0.5"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "compression_ratio = 0.5 (must be >= 1.0)",
        ));
}

#[test]
fn test_json_inventory() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "vms.json",
        r#"[{"name": "vm1", "reported_size": 1000, "size_basis": "used"},
            {"name": "vm2", "reported_size": 0}]"#,
    );
    write_file(dir.path(), "migsize.toml", EXACT_CONFIG);

    let output = migsize(dir.path())
        .args(["--format", "json", "estimate", "vms.json", "-t", "gcp"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    let estimates = json["estimates"].as_array().unwrap();
    assert_eq!(estimates.len(), 2);
    assert_eq!(estimates[0]["target_size"].as_f64().unwrap(), 500.0);
    assert_eq!(estimates[1]["target_size"].as_f64().unwrap(), 0.0);
    assert_eq!(json["summary"]["platforms"][0]["hosts"], 2);
}
