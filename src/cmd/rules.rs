//! Rules command - print the statutory tables each regime uses

use super::format_amount;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};
use taxcomp::core::{AgeBracket, DeductionCategory, RebateRule, Regime, RegimeRules, SlabSchedule};

#[derive(Args, Debug)]
pub struct RulesCommand {
    /// Only show this regime
    #[arg(short, long, value_enum)]
    regime: Option<RegimeArg>,

    /// Age bracket for the Old regime slabs and deduction caps
    #[arg(short, long, value_enum, default_value_t = AgeArg::Below60)]
    age: AgeArg,

    /// Output as JSON instead of formatted tables
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RegimeArg {
    Old,
    New,
}

impl From<RegimeArg> for Regime {
    fn from(arg: RegimeArg) -> Self {
        match arg {
            RegimeArg::Old => Regime::Old,
            RegimeArg::New => Regime::New,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum AgeArg {
    #[default]
    #[value(name = "below60")]
    Below60,
    #[value(name = "60to80")]
    From60To80,
    #[value(name = "above80")]
    Above80,
}

impl From<AgeArg> for AgeBracket {
    fn from(arg: AgeArg) -> Self {
        match arg {
            AgeArg::Below60 => AgeBracket::Below60,
            AgeArg::From60To80 => AgeBracket::From60To80,
            AgeArg::Above80 => AgeBracket::Above80,
        }
    }
}

#[derive(Debug, Clone, Tabled, Serialize)]
struct BandRow {
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Rate")]
    rate: String,
}

#[derive(Debug, Clone, Tabled, Serialize)]
struct CapRow {
    #[tabled(rename = "Section")]
    section: String,
    #[tabled(rename = "Cap")]
    cap: String,
}

/// JSON output for one regime
#[derive(Debug, Serialize)]
struct RegimeTables {
    regime: Regime,
    age_bracket: AgeBracket,
    slabs: Vec<BandRow>,
    rebate: RebateRule,
    surcharge: Vec<BandRow>,
    cess_rate: String,
    deduction_caps: Vec<CapRow>,
}

impl RulesCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let age: AgeBracket = self.age.into();
        let regimes = match self.regime {
            Some(regime) => vec![Regime::from(regime)],
            None => Regime::ALL.to_vec(),
        };
        let tables: Vec<RegimeTables> = regimes
            .into_iter()
            .map(|regime| regime_tables(&regime.rules(), age))
            .collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&tables)?);
        } else {
            tables.iter().for_each(print_tables);
        }
        Ok(())
    }
}

fn regime_tables(rules: &RegimeRules, age: AgeBracket) -> RegimeTables {
    let deduction_caps = if rules.itemized_deductions {
        DeductionCategory::ALL
            .iter()
            .map(|c| CapRow {
                section: c.to_string(),
                cap: format_amount(c.cap(age)),
            })
            .collect()
    } else {
        Vec::new()
    };

    let steps = rules.surcharge.steps();
    let surcharge = steps
        .iter()
        .enumerate()
        .map(|(i, step)| BandRow {
            from: format_amount(step.above),
            to: steps
                .get(i + 1)
                .map_or("-".to_string(), |next| format_amount(next.above)),
            rate: format_rate(step.rate),
        })
        .collect();

    RegimeTables {
        regime: rules.regime,
        age_bracket: age,
        slabs: slab_rows(&rules.schedule(age)),
        rebate: rules.rebate,
        surcharge,
        cess_rate: format_rate(rules.cess_rate),
        deduction_caps,
    }
}

fn slab_rows(schedule: &SlabSchedule) -> Vec<BandRow> {
    schedule
        .ranges()
        .filter(|(lower, upper, _)| upper.map_or(true, |upper| upper > *lower))
        .map(|(lower, upper, rate)| BandRow {
            from: format_amount(lower),
            to: upper.map_or("-".to_string(), format_amount),
            rate: format_rate(rate),
        })
        .collect()
}

fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * dec!(100)).normalize())
}

fn print_tables(tables: &RegimeTables) {
    println!();
    println!("{} REGIME ({})", tables.regime.to_string().to_uppercase(), tables.age_bracket);
    println!();
    println!("Slabs");
    println!("{}", styled(Table::new(&tables.slabs)));

    let rebate = match tables.rebate {
        RebateRule::Cliff { threshold } => {
            format!("no tax up to {}", format_amount(threshold))
        }
        RebateRule::MarginalRelief { threshold } => format!(
            "no tax up to {}, then at most the income above it",
            format_amount(threshold)
        ),
    };
    println!("Rebate: {rebate}");
    println!();
    println!("Surcharge on income above");
    println!("{}", styled(Table::new(&tables.surcharge)));
    println!("Cess: {} of tax and surcharge", tables.cess_rate);

    if !tables.deduction_caps.is_empty() {
        println!();
        println!("Deduction caps");
        println!("{}", styled(Table::new(&tables.deduction_caps)));
    }
}

fn styled(mut table: Table) -> String {
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string()
}
