//! Income banded surcharge, health and education cess, final rounding

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

/// Health and education cess on tax plus surcharge
pub const CESS_RATE: Decimal = dec!(0.04);

/// Surcharge `rate` applies once taxable income exceeds `above`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SurchargeStep {
    pub above: Decimal,
    pub rate: Decimal,
}

/// Ordered surcharge steps. There is no marginal relief at the steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurchargeSchedule {
    steps: Vec<SurchargeStep>,
}

impl SurchargeSchedule {
    pub fn new(steps: Vec<SurchargeStep>) -> Self {
        debug_assert!(steps.windows(2).all(|w| w[0].above <= w[1].above));
        SurchargeSchedule { steps }
    }

    /// 10% above 50 lakh, 15% above 1 crore, 25% above 2 crore, then
    /// `top_rate` above 5 crore
    pub fn with_top_rate(top_rate: Decimal) -> Self {
        SurchargeSchedule::new(vec![
            SurchargeStep {
                above: dec!(5000000),
                rate: dec!(0.10),
            },
            SurchargeStep {
                above: dec!(10000000),
                rate: dec!(0.15),
            },
            SurchargeStep {
                above: dec!(20000000),
                rate: dec!(0.25),
            },
            SurchargeStep {
                above: dec!(50000000),
                rate: top_rate,
            },
        ])
    }

    pub fn steps(&self) -> &[SurchargeStep] {
        &self.steps
    }

    pub fn rate_for(&self, taxable_income: Decimal) -> Decimal {
        self.steps
            .iter()
            .rev()
            .find(|step| taxable_income > step.above)
            .map_or(Decimal::ZERO, |step| step.rate)
    }

    pub fn surcharge(&self, tax: Decimal, taxable_income: Decimal) -> Decimal {
        tax * self.rate_for(taxable_income)
    }
}

pub fn cess(tax_with_surcharge: Decimal, rate: Decimal) -> Decimal {
    tax_with_surcharge * rate
}

/// Round half up to whole currency units
pub fn round_tax(amount: Decimal) -> Decimal {
    amount
        .max(Decimal::ZERO)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
