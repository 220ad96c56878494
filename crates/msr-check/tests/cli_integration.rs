//! Integration tests for the tdx-msr-check CLI.

use clap as _;
use env_logger as _;
#[cfg(unix)]
use libc as _;
use log as _;
use msr_check as _;
use msr_engine as _;
use serde as _;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use thiserror as _;

fn binary_path() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop();
    path.pop();
    path.join("tdx-msr-check")
}

fn create_temp_file(dir: &std::path::Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn check(args: &[&str]) -> Output {
    Command::new(binary_path())
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run tdx-msr-check")
}

const REGISTRY: &str = r#"[
    {"name": "IA32_TSC_read", "versions": ["1.0", "1.5", "2.0"], "msr": 16,
     "access": "read", "baseline": "none"},
    {"name": "IA32_VMX_BASIC_read", "versions": ["1.5", "2.0"], "msr": 1152,
     "access": "read", "baseline": "none"},
    {"name": "IA32_X2APIC_IRRX_write", "versions": ["1.5", "2.0"], "msr": 2080,
     "access": "write", "width": 8, "baseline": "gp"}
]"#;

#[test]
fn list_prints_the_builtin_table() {
    let output = check(&["list", "--version", "1.5", "--filter", "X2APIC"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("IA32_X2APIC_SELF_IPI_read"));
    assert!(stdout.contains("IA32_X2APIC_IRRX_write"));
    assert!(!stdout.contains("IA32_TSC_read"));
}

#[test]
fn conforming_runs_pass_for_every_version() {
    for version in ["1.0", "1.5", "2.0"] {
        let output = check(&["run", "--version", version, "--conforming"]);

        assert_eq!(output.status.code(), Some(0), "version {version}");
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains(&format!("TDX {version}:")));
        assert!(stdout.contains(" 0 failed"));
    }
}

#[test]
fn mismatching_profile_exits_with_one() {
    let temp_dir = tempfile::tempdir().unwrap();
    let registry = create_temp_file(temp_dir.path(), "cases.json", REGISTRY);
    let profile = create_temp_file(
        temp_dir.path(),
        "profile.json",
        r#"{"msrs": [
            {"msr": 16, "value": 1234},
            {"msr": 1152, "read": "gp", "write": "gp"},
            {"msr": 2083, "write": "no_fault"}
        ]}"#,
    );

    let output = check(&[
        "run",
        "--version",
        "1.5",
        "--registry",
        registry.to_str().unwrap(),
        "--profile",
        profile.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("PASS IA32_TSC_read"));
    assert!(stdout.contains("FAIL IA32_VMX_BASIC_read"));
    assert!(stdout.contains("FAIL IA32_X2APIC_IRRX_write"));
    assert!(stdout.contains("0x823"));
    assert!(stdout.contains("1 passed, 2 failed, 3 total"));
}

#[test]
fn json_report_is_written() {
    let temp_dir = tempfile::tempdir().unwrap();
    let registry = create_temp_file(temp_dir.path(), "cases.json", REGISTRY);
    let report = temp_dir.path().join("report.json");

    let output = check(&[
        "run",
        "--version",
        "2.0",
        "--registry",
        registry.to_str().unwrap(),
        "--conforming",
        "--access",
        "read",
        "--json",
        report.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    let text = fs::read_to_string(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["backend"], "conforming");
    assert_eq!(value["version"], "2.0");
    assert_eq!(value["summary"]["total"], 2);
    assert_eq!(value["results"][0]["name"], "IA32_TSC_read");
}

#[test]
fn invalid_registry_exits_with_two() {
    let temp_dir = tempfile::tempdir().unwrap();
    let registry = create_temp_file(
        temp_dir.path(),
        "conflict.json",
        r#"[
            {"name": "A_read", "versions": ["1.5"], "msr": 16,
             "access": "read", "baseline": "none"},
            {"name": "B_read", "versions": ["1.5", "2.0"], "msr": 16,
             "access": "read", "baseline": "gp"}
        ]"#,
    );

    let output = check(&[
        "run",
        "--version",
        "2.0",
        "--registry",
        registry.to_str().unwrap(),
        "--conforming",
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid registry"));
}

#[test]
fn destructive_write_cases_are_refused() {
    let temp_dir = tempfile::tempdir().unwrap();
    let registry = create_temp_file(
        temp_dir.path(),
        "efer.json",
        r#"[{"name": "IA32_EFER_write", "versions": ["1.0"],
             "msr": 3221225600, "access": "write"}]"#,
    );

    let output = check(&["list", "--registry", registry.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("IA32_EFER_write"));
}

#[test]
fn containment_escape_aborts_with_two() {
    let temp_dir = tempfile::tempdir().unwrap();
    let registry = create_temp_file(temp_dir.path(), "cases.json", REGISTRY);
    let profile = create_temp_file(
        temp_dir.path(),
        "escape.json",
        r#"{"msrs": [{"msr": 16}, {"msr": 1152, "uncontained": true}]}"#,
    );

    let output = check(&[
        "run",
        "--version",
        "1.5",
        "--registry",
        registry.to_str().unwrap(),
        "--profile",
        profile.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("run aborted"));
    assert!(stderr.contains("IA32_VMX_BASIC_read"));
}

#[test]
fn missing_profile_exits_with_two() {
    let temp_dir = tempfile::tempdir().unwrap();
    let missing = temp_dir.path().join("absent.json");

    let output = check(&[
        "run",
        "--version",
        "1.0",
        "--profile",
        missing.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("absent.json"));
}

#[test]
fn unknown_version_is_a_usage_error() {
    let output = check(&["run", "--version", "1.4", "--conforming"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("1.4"));
}
