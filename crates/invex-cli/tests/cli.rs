//! Command line behaviour of the `invex` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const RECEIPT: &str = "OJC MARKETING SDN BHD\nNO JALAN BAYU 4, BANDAR SERI ALAM, 81750 MASAI, JOHOR\nDATE: 15/01/2019\nRECEIPT NO: PEGIV-1030765\nTOTAL: 193.00\n";

fn invex() -> Command {
    let mut cmd = Command::cargo_bin("invex").unwrap();
    // Keep tests away from the user's config file.
    cmd.env("XDG_CONFIG_HOME", std::env::temp_dir().join("invex-cli-tests"));
    cmd
}

#[test]
fn test_process_text_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("receipt.txt");
    fs::write(&input, RECEIPT).unwrap();

    let output = invex().arg("process").arg(&input).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["vendor"], "OJC MARKETING SDN BHD");
    assert_eq!(json["date"], "15/01/2019");
    assert_eq!(json["receipt_number"], "PEGIV-1030765");
    assert_eq!(json["total_amount"], 193.0);
    assert_eq!(json["validation_passed"], true);
}

#[test]
fn test_process_stdin() {
    invex()
        .args(["process", "-", "--format", "text"])
        .write_stdin(RECEIPT)
        .assert()
        .success()
        .stdout(predicate::str::contains("Vendor:  OJC MARKETING SDN BHD"))
        .stdout(predicate::str::contains("Validation: passed"));
}

#[test]
fn test_process_csv_to_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("receipt.txt");
    let output = dir.path().join("out.csv");
    fs::write(&input, RECEIPT).unwrap();

    invex()
        .arg("process")
        .arg(&input)
        .args(["-f", "csv", "-o"])
        .arg(&output)
        .assert()
        .success();

    let csv = fs::read_to_string(&output).unwrap();
    assert!(csv.starts_with("receipt_number,date,vendor"));
    assert!(csv.contains("PEGIV-1030765,15/01/2019,OJC MARKETING SDN BHD"));
}

#[test]
fn test_process_empty_input_is_not_an_error() {
    let output = invex().args(["process", "-"]).write_stdin("").output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["vendor"].is_null());
    assert_eq!(json["extraction_confidence"], 0);
    assert_eq!(json["validation_passed"], false);
}

#[test]
fn test_process_missing_file_fails() {
    invex()
        .args(["process", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_process_unsupported_extension_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("receipt.png");
    fs::write(&input, [0u8, 1, 2]).unwrap();

    invex()
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported document format"));
}

#[test]
fn test_batch_writes_one_file_per_document() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    fs::write(dir.path().join("a.txt"), RECEIPT).unwrap();
    fs::write(dir.path().join("b.txt"), "TOTAL: 50.00\n120.00\n").unwrap();
    fs::write(dir.path().join("broken.json"), "{not json").unwrap();

    let pattern = format!("{}/*", dir.path().display());

    invex()
        .args(["batch", &pattern, "--summary", "--continue-on-error", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("2 successful, 1 failed"));

    let b: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("b.json")).unwrap()).unwrap();
    assert_eq!(b["total_amount"], 50.0);
    assert!(out.join("a.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 4);
    assert!(summary.contains("broken.json,error"));
}

#[test]
fn test_batch_stops_on_error_by_default() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("broken.json"), "{not json").unwrap();

    let pattern = format!("{}/*.json", dir.path().display());
    invex().args(["batch", &pattern]).assert().failure();
}

#[test]
fn test_config_init_get_set() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    let path_arg = path.to_str().unwrap();

    invex()
        .args(["-c", path_arg, "config", "init"])
        .assert()
        .success();
    assert!(path.exists());

    invex()
        .args(["-c", path_arg, "config", "get", "extraction.label_window"])
        .assert()
        .success()
        .stdout(predicate::str::contains("40"));

    invex()
        .args(["-c", path_arg, "config", "set", "extraction.total_selection", "largest"])
        .assert()
        .success();

    invex()
        .args(["-c", path_arg, "config", "get", "extraction.total_selection"])
        .assert()
        .success()
        .stdout(predicate::str::contains("largest"));

    invex()
        .args(["-c", path_arg, "config", "set", "extraction.no_such_key", "1"])
        .assert()
        .failure();
}

#[test]
fn test_config_changes_selection() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"extraction": {"total_selection": "largest"}}"#).unwrap();

    let output = invex()
        .args(["-c", config.to_str().unwrap(), "process", "-"])
        .write_stdin("TOTAL: 50.00\n120.00\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["total_amount"], 120.0);
}
