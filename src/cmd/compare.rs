//! Compare command - tax under both regimes for each profile

use super::{format_amount, read_profiles, ProfileRecord};
use clap::Args;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};
use taxcomp::core::{
    compare_regimes, profile_warnings, ComparisonResult, FinancialProfile, RegimeResult,
};

#[derive(Args, Debug)]
pub struct CompareCommand {
    /// Profile file (JSON or CSV). Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Output as JSON instead of formatted tables
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output one CSV row per profile
    #[arg(long)]
    csv: bool,
}

/// Outcome for one input profile
#[derive(Debug, Serialize)]
struct ProfileOutcome {
    profile: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<ComparisonResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Line item row: one stage of the computation under both regimes
#[derive(Debug, Clone, Tabled)]
struct BreakdownRow {
    #[tabled(rename = "")]
    label: &'static str,
    #[tabled(rename = "Old regime")]
    old: String,
    #[tabled(rename = "New regime")]
    new: String,
}

/// CSV summary row
#[derive(Debug, Serialize)]
struct SummaryRecord {
    profile: usize,
    old_taxable_income: String,
    old_tax: String,
    new_taxable_income: String,
    new_tax: String,
    savings: String,
    recommended: String,
}

impl CompareCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let records = read_profiles(&self.file)?;
        let outcomes: Vec<ProfileOutcome> = records.iter().map(compare_record).collect();
        let failures = outcomes.iter().filter(|o| o.error.is_some()).count();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&outcomes)?);
        } else if self.csv {
            self.write_csv(&outcomes)?;
        } else {
            self.print_tables(&outcomes);
        }

        if failures > 0 {
            anyhow::bail!("{failures} of {} profile(s) could not be compared", outcomes.len());
        }
        Ok(())
    }

    fn print_tables(&self, outcomes: &[ProfileOutcome]) {
        for outcome in outcomes {
            println!();
            println!("PROFILE {}", outcome.profile);
            match (&outcome.result, &outcome.error) {
                (Some(result), _) => print_comparison(result),
                (None, Some(error)) => println!("  Error: {error}"),
                (None, None) => {}
            }
        }
        println!();
    }

    fn write_csv(&self, outcomes: &[ProfileOutcome]) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(io::stdout());
        for outcome in outcomes {
            let Some(result) = &outcome.result else {
                continue;
            };
            wtr.serialize(SummaryRecord {
                profile: outcome.profile,
                old_taxable_income: format_amount(result.old.taxable_income),
                old_tax: format_amount(result.old.total_tax),
                new_taxable_income: format_amount(result.new.taxable_income),
                new_tax: format_amount(result.new.total_tax),
                savings: format_amount(result.savings),
                recommended: result.recommended.to_string(),
            })?;
        }
        wtr.flush()?;
        Ok(())
    }
}

fn compare_record(record: &ProfileRecord) -> ProfileOutcome {
    match FinancialProfile::try_from(&record.input) {
        Ok(profile) => {
            for warning in profile_warnings(&record.input, &profile) {
                log::warn!("profile {}: {}", record.number, warning.message());
            }
            ProfileOutcome {
                profile: record.number,
                result: Some(compare_regimes(&profile)),
                error: None,
            }
        }
        Err(e) => {
            log::error!("profile {}: {e}", record.number);
            ProfileOutcome {
                profile: record.number,
                result: None,
                error: Some(e.to_string()),
            }
        }
    }
}

fn breakdown_rows(old: &RegimeResult, new: &RegimeResult) -> Vec<BreakdownRow> {
    let row = |label, f: fn(&RegimeResult) -> rust_decimal::Decimal| BreakdownRow {
        label,
        old: format_amount(f(old)),
        new: format_amount(f(new)),
    };

    vec![
        row("Gross income", |r| r.gross_income),
        row("Standard deduction", |r| r.deductions.standard),
        row("HRA exemption", |r| r.deductions.hra_exemption),
        row("Itemized deductions", |r| r.deductions.itemized_total()),
        row("Taxable income", |r| r.taxable_income),
        row("Slab tax", |r| r.slab_tax),
        row("Rebate / relief", |r| r.rebate),
        row("Surcharge", |r| r.surcharge),
        row("Cess", |r| r.cess),
        row("Total tax", |r| r.total_tax),
    ]
}

fn print_comparison(result: &ComparisonResult) {
    let table = Table::new(breakdown_rows(&result.old, &result.new))
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);

    println!(
        "RECOMMENDED: {} regime (saves {})",
        result.recommended,
        format_amount(result.savings)
    );
}
