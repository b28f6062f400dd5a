//! Validate command - surface input problems without computing tax

use super::read_profiles;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use taxcomp::core::{profile_warnings, FinancialProfile};

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Profile file (JSON or CSV). Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Serialize)]
struct ValidationIssue {
    profile: usize,
    severity: Severity,
    #[serde(rename = "type")]
    issue_type: String,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Severity {
    /// Profile cannot be compared
    Error,
    /// Profile is compared with clamped values
    Warning,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput {
    profile_count: usize,
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let records = read_profiles(&self.file)?;

        let issues: Vec<ValidationIssue> = records
            .iter()
            .flat_map(|record| match FinancialProfile::try_from(&record.input) {
                Ok(profile) => profile_warnings(&record.input, &profile)
                    .into_iter()
                    .map(|w| ValidationIssue {
                        profile: record.number,
                        severity: Severity::Warning,
                        issue_type: w.type_name().to_string(),
                        message: w.message(),
                    })
                    .collect::<Vec<_>>(),
                Err(e) => vec![ValidationIssue {
                    profile: record.number,
                    severity: Severity::Error,
                    issue_type: "invalid_input".to_string(),
                    message: e.to_string(),
                }],
            })
            .collect();

        if self.json {
            let output = ValidationOutput {
                profile_count: records.len(),
                issue_count: issues.len(),
                issues,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            if output.issue_count > 0 {
                std::process::exit(1);
            }
        } else {
            print_text(&issues, records.len());
            if !issues.is_empty() {
                std::process::exit(1);
            }
        }
        Ok(())
    }
}

fn print_text(issues: &[ValidationIssue], profile_count: usize) {
    println!();
    println!("VALIDATION ({} profile(s))", profile_count);
    println!();

    if issues.is_empty() {
        println!("  No issues found.");
        println!();
        return;
    }

    for issue in issues {
        let tag = match issue.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        println!("  [{}] profile {}: {}", tag, issue.profile, issue.message);
    }
    println!();

    let errors = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    println!("  {} issue(s), {} blocking", issues.len(), errors);
    println!();
}
