mod common;

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use common::{unique_temp_dir, write, write_fixture};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_arkledger")
}

/// Run the binary inside `root` so the default relative paths resolve to the fixture.
fn run_in(root: &Path, args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut command = Command::new(bin());
    command
        .current_dir(root)
        .args(args)
        .env_remove("ARKLEDGER_CONFIG")
        .env_remove("ARKLEDGER_DATA_DIR")
        .env_remove("ARKLEDGER_ROSTER")
        .env_remove("ARKLEDGER_REPORTS_DIR")
        .env_remove("ARKLEDGER_WORKERS")
        .env_remove("ARKLEDGER_ON_UNKNOWN")
        .env("ARKLEDGER_LOG", "arkledger=warn");
    for (key, value) in env {
        command.env(key, value);
    }
    command.output().expect("arkledger should run")
}

#[test]
fn missing_command_prints_usage() {
    let root = unique_temp_dir("usage");
    let output = run_in(&root, &[], &[]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: arkledger"));

    let output = run_in(&root, &["operator"], &[]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("usage: arkledger operator"));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn totals_command_emits_json() {
    let root = unique_temp_dir("totals");
    write_fixture(&root);

    let output = run_in(&root, &["totals"], &[("ARKLEDGER_WORKERS", "2")]);
    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("totals should emit json");
    assert_eq!(payload["total"]["LMD"], 220000);
    assert_eq!(payload["needed"]["LMD"], 180000);
    assert_eq!(payload["spent"]["Sniper Chip"], 8);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn operator_command_resolves_names_loosely() {
    let root = unique_temp_dir("operator");
    write_fixture(&root);

    let output = run_in(&root, &["operator", "EXUSIAI"], &[]);
    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("operator should emit json");
    assert_eq!(payload["name"], "Exusiai");
    assert_eq!(payload["overall_percentage"], 43.76);
    assert_eq!(payload["needed_resources"]["Skill Summary - 3"], 15);

    let output = run_in(&root, &["operator", "Nobody"], &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown operator 'Nobody'"));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn report_command_writes_reports_and_manifest() {
    let root = unique_temp_dir("report");
    write_fixture(&root);

    let output = run_in(&root, &["report"], &[("ARKLEDGER_REPORTS_DIR", "out")]);
    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("resources-report.csv (7 rows)"));
    assert!(stdout.contains("resources-by-operator-report.csv (2 rows)"));

    let manifest: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(root.join("out/report-manifest.json")).expect("manifest written"),
    )
    .expect("manifest is json");
    assert_eq!(manifest["roster_size"], 2);
    assert_eq!(manifest["outputs"].as_array().map(Vec::len), Some(3));
    assert!(stdout.contains("resources-report.xlsx (7 rows)"));
    assert_eq!(manifest["datasets"][0]["entries"], 2);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn unknown_roster_entry_aborts_unless_skipped() {
    let root = unique_temp_dir("skip");
    write_fixture(&root);
    write(
        &root,
        "files/user_operators.csv",
        "name;elite_level;level\nExusiai;1;2\nGhost;0;1\n",
    );

    let output = run_in(&root, &["report"], &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown operator 'Ghost'"));

    let output = run_in(&root, &["report"], &[("ARKLEDGER_ON_UNKNOWN", "skip")]);
    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));
    let manifest: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(root.join("files/reports/report-manifest.json"))
            .expect("manifest written"),
    )
    .expect("manifest is json");
    assert_eq!(manifest["skipped"][0]["name"], "Ghost");

    let _ = fs::remove_dir_all(root);
}

#[test]
fn validate_command_reports_problems() {
    let root = unique_temp_dir("validate");
    write_fixture(&root);

    let output = run_in(&root, &["validate"], &[]);
    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stdout));
    assert!(String::from_utf8_lossy(&output.stdout).contains("validation: 0 error(s)"));

    write(
        &root,
        "files/user_operators.csv",
        "name;elite_level;level;skill_level\nExusiai;2;9;8\n",
    );
    let output = run_in(&root, &["validate"], &[]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("skill level 8 above 7"));
    assert!(stdout.contains("level 9 above"));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn explicit_config_file_must_exist() {
    let root = unique_temp_dir("config");
    let output = run_in(&root, &["totals"], &[("ARKLEDGER_CONFIG", "missing.yaml")]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("config error"));

    let _ = fs::remove_dir_all(root);
}
