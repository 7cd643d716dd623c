use crate::support::{migsize, stdout_json, write_file};
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_platforms_lists_builtins() {
    let dir = tempdir().unwrap();

    migsize(dir.path())
        .arg("platforms")
        .assert()
        .success()
        .stdout(predicate::str::contains("Platforms (default: vmware):"))
        .stdout(predicate::str::contains("aws"))
        .stdout(predicate::str::contains("sizing: minimum(10) + ceiling(1)"))
        .stdout(predicate::str::contains("raid5_ftt1"))
        .stdout(predicate::str::contains("×1.33"));
}

#[test]
fn test_platforms_json() {
    let dir = tempdir().unwrap();

    let output = migsize(dir.path())
        .args(["--format", "json", "platforms"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["default_platform"], "vmware");
    let names: Vec<&str> = json["platforms"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["aws", "azure", "gcp", "vmware"]);
    assert_eq!(json["platforms"][1]["transform"]["kind"], "tier");
    assert_eq!(json["raid_policies"].as_array().unwrap().len(), 6);
}

#[test]
fn test_platforms_include_configured_rules() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "migsize.toml",
        r#"
[raid_overheads]
raid5_ftt2 = 1.25

[platforms.proxmox]
label = "Proxmox on Ceph"
transform = { kind = "ceiling", granularity = 4.0 }
"#,
    );

    migsize(dir.path())
        .args(["--format", "csv", "platforms"])
        .assert()
        .success()
        .stdout(predicate::str::contains("platform,proxmox,ceiling(4)"))
        .stdout(predicate::str::contains("raid_policy,raid5_ftt2,1.25"));
}

#[test]
fn test_resolve_alias_and_raid_token() {
    let dir = tempdir().unwrap();

    migsize(dir.path())
        .args(["platforms", "ebs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ebs: platform aws"));

    migsize(dir.path())
        .args(["platforms", "RAID6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("RAID6: RAID policy, overhead ×1.5"));

    migsize(dir.path())
        .args(["platforms", "raid1-ftt2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("overhead ×3"));
}

#[test]
fn test_resolve_unknown_identifier_notes_default() {
    let dir = tempdir().unwrap();

    let output = migsize(dir.path())
        .args(["--format", "json", "platforms", "mainframe"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["kind"], "platform");
    assert_eq!(json["platform"]["name"], "vmware");
    assert_eq!(
        json["note"],
        "Unknown platform 'mainframe', used vmware rules"
    );
}

#[test]
fn test_configured_platform_name_is_normalized() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "migsize.toml",
        "[platforms.Block8]\ntransform = { kind = \"ceiling\", granularity = 8.0 }\n",
    );

    migsize(dir.path())
        .args(["--format", "csv", "size", "100", "--size-type", "used"])
        .args(["--target", "BLOCK8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\n-,block8,100.00,50.00,48.00,"));
}
