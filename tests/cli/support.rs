use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::{cargo::cargo_bin_cmd, Command};

/// Get a Command for migsize, isolated from the caller's config and log
/// environment and run inside `dir`
pub fn migsize(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("migsize");
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("HOME", dir)
        .env_remove("MIGSIZE_CONFIG")
        .env_remove("MIGSIZE_LOG")
        .env_remove("RUST_LOG");
    cmd
}

/// Write a file under `dir` and return its path
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Config that turns off swap deflation so sizes follow the bare formulas
pub const EXACT_CONFIG: &str = "[defaults]\nswap_deflation = 1.0\n";

/// Parse stdout as JSON
pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}
