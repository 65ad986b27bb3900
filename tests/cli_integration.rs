//! End-to-end tests of the command-line binary.

mod common;

use std::fs;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_network-explorer"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("binary runs")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn default_run_prints_sample_summary() {
    let output = run(&[]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("--- System Summary ---"));
    assert!(text.contains("Network name: AC-DC-Meshed"));
}

#[test]
fn temporal_flags_select_the_chart() {
    let output = run(&[
        "--sample",
        "scigrid_de",
        "--component",
        "generators",
        "--mode",
        "carrier",
    ]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("--- Generator p by type ---"));
}

#[test]
fn csv_folder_export_writes_chart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let network = dir.path().join("net");
    fs::create_dir(&network).expect("mkdir");
    common::write_csv_network(&network);
    let export = dir.path().join("total.csv");

    let output = run(&[
        "--network",
        network.to_str().expect("utf-8 path"),
        "--view",
        "temporal",
        "--mode",
        "sum",
        "--export",
        export.to_str().expect("utf-8 path"),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let csv = fs::read_to_string(&export).expect("export written");
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("snapshot,total"));
    assert_eq!(lines.count(), 3);
}

#[test]
fn unreadable_network_exits_with_status_1() {
    let output = run(&["--network", "/nonexistent/network.json"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot read"));
    assert!(output.stdout.is_empty());
}

#[test]
fn conflicting_sources_are_rejected() {
    let output = run(&["--network", "a", "--sample", "scigrid_de"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("mutually exclusive"));
}

#[test]
fn invalid_config_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("explorer.toml");
    fs::write(&path, "[display]\nmax_rows = 0\n").expect("write config");

    let output = run(&["--config", path.to_str().expect("utf-8 path")]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("display.max_rows"));
}

#[test]
fn config_selects_default_sample() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("explorer.toml");
    fs::write(&path, "[load]\nsample = \"storage_hvdc\"\n").expect("write config");

    let output = run(&["--config", path.to_str().expect("utf-8 path"), "--view", "metadata"]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("--- Network Configuration ---"));
}
