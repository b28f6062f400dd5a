//! Income rebate near the no-tax threshold

use rust_decimal::Decimal;
use serde::Serialize;

/// How tax is removed for incomes near a regime's no-tax threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum RebateRule {
    /// Tax is zero up to and including `threshold`, then due in full.
    Cliff { threshold: Decimal },
    /// Tax is zero up to `threshold`; above it, tax never exceeds the
    /// income over the threshold.
    MarginalRelief { threshold: Decimal },
}

impl RebateRule {
    pub fn threshold(&self) -> Decimal {
        match self {
            RebateRule::Cliff { threshold } | RebateRule::MarginalRelief { threshold } => {
                *threshold
            }
        }
    }

    /// Tax payable after the rebate, before surcharge and cess
    pub fn apply(&self, slab_tax: Decimal, taxable_income: Decimal) -> Decimal {
        let threshold = self.threshold();
        if taxable_income <= threshold {
            return Decimal::ZERO;
        }
        match self {
            RebateRule::Cliff { .. } => slab_tax,
            RebateRule::MarginalRelief { .. } => slab_tax.min(taxable_income - threshold),
        }
    }
}
