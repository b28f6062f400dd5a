use super::profile::AgeBracket;
use super::rebate::RebateRule;
use super::slab::{new_regime_schedule, old_regime_schedule, SlabSchedule};
use super::surcharge::{SurchargeSchedule, CESS_RATE};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two mutually exclusive tax regimes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Regime {
    /// Itemized deductions, age based exemption limit
    Old,
    /// Standard deduction only, wider slabs
    New,
}

impl Regime {
    pub const ALL: [Regime; 2] = [Regime::Old, Regime::New];

    pub fn rules(self) -> RegimeRules {
        RegimeRules::for_regime(self)
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regime::Old => write!(f, "Old"),
            Regime::New => write!(f, "New"),
        }
    }
}

/// Rule table of one regime.
///
/// Yearly statutory changes are edits to these values, not to the
/// calculation code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegimeRules {
    pub regime: Regime,
    /// Whether rent allowance exemption and itemized deductions apply
    pub itemized_deductions: bool,
    pub rebate: RebateRule,
    pub surcharge: SurchargeSchedule,
    pub cess_rate: Decimal,
}

impl RegimeRules {
    pub fn for_regime(regime: Regime) -> Self {
        match regime {
            Regime::Old => RegimeRules::old_regime(),
            Regime::New => RegimeRules::new_regime(),
        }
    }

    pub fn old_regime() -> Self {
        RegimeRules {
            regime: Regime::Old,
            itemized_deductions: true,
            rebate: RebateRule::Cliff {
                threshold: dec!(500000),
            },
            surcharge: SurchargeSchedule::with_top_rate(dec!(0.37)),
            cess_rate: CESS_RATE,
        }
    }

    pub fn new_regime() -> Self {
        RegimeRules {
            regime: Regime::New,
            itemized_deductions: false,
            rebate: RebateRule::MarginalRelief {
                threshold: dec!(700000),
            },
            surcharge: SurchargeSchedule::with_top_rate(dec!(0.25)),
            cess_rate: CESS_RATE,
        }
    }

    /// Slab schedule for a taxpayer of the given age
    pub fn schedule(&self, age: AgeBracket) -> SlabSchedule {
        match self.regime {
            Regime::Old => old_regime_schedule(age),
            Regime::New => new_regime_schedule(),
        }
    }
}
