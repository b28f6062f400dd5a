//! E2E tests for the command line

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn taxcomp(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_taxcomp"))
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn taxcomp_stdin(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_taxcomp"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn command");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().expect("Failed to wait for command")
}

/// Decimal amounts serialize as strings; compare them by value
fn amount(value: &serde_json::Value) -> f64 {
    value.as_str().unwrap().parse().unwrap()
}

/// Table output shows both regimes and the recommendation
#[test]
fn compare_table_output() {
    let output = taxcomp(&["compare", "tests/data/profiles.json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("PROFILE 1"));
    assert!(stdout.contains("PROFILE 2"));
    assert!(stdout.contains("Old regime"));
    assert!(stdout.contains("106600"));
    assert!(stdout.contains("54600"));
    assert!(stdout.contains("RECOMMENDED: New regime (saves 52000)"));
    assert!(stdout.contains("RECOMMENDED: Old regime (saves 85800)"));
}

/// JSON output carries the full breakdown for each profile
#[test]
fn compare_json_output() {
    let output = taxcomp(&["compare", "tests/data/profiles.json", "--json"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let outcomes = json.as_array().unwrap();
    assert_eq!(outcomes.len(), 2);

    let second = &outcomes[1]["result"];
    assert_eq!(second["recommended"], "Old");
    assert_eq!(amount(&second["old"]["taxable_income"]), 725000.0);
    assert_eq!(amount(&second["old"]["deductions"]["hra_exemption"]), 300000.0);
    assert_eq!(amount(&second["old"]["total_tax"]), 59800.0);
    assert_eq!(amount(&second["new"]["total_tax"]), 145600.0);
    assert_eq!(amount(&second["savings"]), 85800.0);
}

/// CSV input and CSV output
#[test]
fn compare_csv_round() {
    let output = taxcomp(&["compare", "tests/data/profiles.csv", "--csv"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(
        lines[0],
        "profile,old_taxable_income,old_tax,new_taxable_income,new_tax,savings,recommended"
    );
    assert_eq!(lines[1], "1,950000,106600,950000,54600,52000,New");
    assert_eq!(lines[2], "2,550000,20800,550000,0,20800,New");
}

/// A bad age bracket fails that profile but still reports the others
#[test]
fn compare_reports_invalid_profile() {
    let output = taxcomp(&["compare", "tests/data/invalid_age.json", "--json"]);
    assert!(!output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["result"]["recommended"], "New");
    assert_eq!(json[1]["error"], "unrecognized age bracket: 'toddler'");
    assert!(json[1].get("result").is_none());
}

/// Profiles can be piped in
#[test]
fn compare_from_stdin() {
    let output = taxcomp_stdin(
        &["compare", "--json"],
        r#"{"gross_salary": 1000000, "age_bracket": "Below 60"}"#,
    );
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(amount(&json[0]["result"]["savings"]), 52000.0);
}

#[test]
fn compare_empty_stdin_fails() {
    let output = taxcomp_stdin(&["compare"], "");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No input received"));
}

#[test]
fn validate_clean_profiles() {
    let output = taxcomp(&["validate", "tests/data/profiles.csv"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("No issues found."));
}

#[test]
fn validate_reports_warnings() {
    let output = taxcomp(&["validate", "tests/data/clamped.json", "--json"]);
    assert!(!output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["profile_count"], 1);
    let types: Vec<_> = json["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["type"].as_str().unwrap().to_string())
        .collect();
    assert!(types.contains(&"negative_amount".to_string()));
    assert!(types.contains(&"deduction_capped".to_string()));
    assert!(types.contains(&"hra_without_rent".to_string()));
    assert!(json["issues"]
        .as_array()
        .unwrap()
        .iter()
        .all(|i| i["severity"] == "warning"));
}

#[test]
fn validate_reports_errors() {
    let output = taxcomp(&["validate", "tests/data/invalid_age.json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(!output.status.success());
    assert!(stdout.contains("[ERROR] profile 2"));
    assert!(stdout.contains("1 blocking"));
}

/// Clamped profiles still compare
#[test]
fn compare_clamped_profile() {
    let output = taxcomp(&["compare", "tests/data/clamped.json", "--json"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(amount(&json[0]["result"]["old"]["deductions"]["hra_exemption"]), 0.0);
}

#[test]
fn rules_lists_both_regimes() {
    let output = taxcomp(&["rules"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("OLD REGIME"));
    assert!(stdout.contains("NEW REGIME"));
    assert!(stdout.contains("80CCD(1B)"));
    assert!(stdout.contains("37%"));
}

#[test]
fn rules_json_for_senior() {
    let output = taxcomp(&["rules", "--regime", "old", "--age", "60to80", "--json"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let tables = json.as_array().unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0]["regime"], "Old");
    assert_eq!(tables[0]["slabs"][1]["from"], "300000");
    assert_eq!(tables[0]["rebate"]["type"], "Cliff");
}

#[test]
fn schema_csv_header() {
    let output = taxcomp(&["schema", "csv-header"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(
        stdout.trim(),
        "gross_salary,basic_salary,hra_received,rent_paid,is_metro,age_bracket,\
         section_80c,health_insurance,nps_contribution,home_loan_interest,savings_interest"
    );
}

#[test]
fn schema_json_schema() {
    let output = taxcomp(&["schema"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["title"], "ProfileInput");
}

/// An amount beyond any representable value is capped, not fatal
#[test]
fn compare_out_of_range_amount() {
    for file in ["tests/data/huge.json", "tests/data/huge.csv"] {
        let output = taxcomp(&["compare", file, "--json"]);
        assert!(output.status.success(), "Command failed: {:?}", output);

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(amount(&json[0]["result"]["savings"]), 52000.0);
        assert_eq!(amount(&json[1]["result"]["old"]["gross_income"]), 1e15);
        assert_eq!(json[1]["result"]["recommended"], "New");
    }
}

#[test]
fn validate_reports_saturated_amount() {
    let output = taxcomp(&["validate", "tests/data/huge.json", "--json"]);
    assert!(!output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["issue_count"], 1);
    assert_eq!(json["issues"][0]["profile"], 2);
    assert_eq!(json["issues"][0]["type"], "amount_saturated");
}
