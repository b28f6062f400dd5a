use super::hra::hra_exemption;
use super::profile::{AgeBracket, ClaimedDeductions, FinancialProfile};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::Serialize;
use std::fmt;

/// Granted unconditionally under both regimes
pub const STANDARD_DEDUCTION: Decimal = dec!(50000);

/// Itemized deduction categories, allowed under the Old regime only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema)]
pub enum DeductionCategory {
    /// 80C: provident fund, life insurance, ELSS and similar savings
    Section80C,
    /// 80D: health insurance premium
    HealthInsurance,
    /// 80CCD(1B): additional pension contribution
    NpsContribution,
    /// 24(b): interest on a housing loan
    HomeLoanInterest,
    /// 80TTA for non seniors, 80TTB for seniors
    SavingsInterest,
}

impl DeductionCategory {
    pub const ALL: [DeductionCategory; 5] = [
        DeductionCategory::Section80C,
        DeductionCategory::HealthInsurance,
        DeductionCategory::NpsContribution,
        DeductionCategory::HomeLoanInterest,
        DeductionCategory::SavingsInterest,
    ];

    /// Amount claimed for this category
    pub fn claimed(self, claims: &ClaimedDeductions) -> Decimal {
        match self {
            DeductionCategory::Section80C => claims.section_80c,
            DeductionCategory::HealthInsurance => claims.health_insurance,
            DeductionCategory::NpsContribution => claims.nps_contribution,
            DeductionCategory::HomeLoanInterest => claims.home_loan_interest,
            DeductionCategory::SavingsInterest => claims.savings_interest,
        }
    }

    /// Annual ceiling for this category
    pub fn cap(self, age: AgeBracket) -> Decimal {
        let cap = DEDUCTION_CAPS
            .iter()
            .find(|c| c.category == self)
            .map(|c| if age.is_senior() { c.senior } else { c.below_60 });
        cap.unwrap_or(Decimal::ZERO)
    }
}

impl fmt::Display for DeductionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeductionCategory::Section80C => "80C",
            DeductionCategory::HealthInsurance => "80D",
            DeductionCategory::NpsContribution => "80CCD(1B)",
            DeductionCategory::HomeLoanInterest => "24(b)",
            DeductionCategory::SavingsInterest => "80TTA/80TTB",
        };
        write!(f, "{label}")
    }
}

/// Statutory ceiling of one category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeductionCap {
    pub category: DeductionCategory,
    pub below_60: Decimal,
    pub senior: Decimal,
}

pub const DEDUCTION_CAPS: [DeductionCap; 5] = [
    DeductionCap {
        category: DeductionCategory::Section80C,
        below_60: dec!(150000),
        senior: dec!(150000),
    },
    DeductionCap {
        category: DeductionCategory::HealthInsurance,
        below_60: dec!(25000),
        senior: dec!(50000),
    },
    DeductionCap {
        category: DeductionCategory::NpsContribution,
        below_60: dec!(50000),
        senior: dec!(50000),
    },
    DeductionCap {
        category: DeductionCategory::HomeLoanInterest,
        below_60: dec!(200000),
        senior: dec!(200000),
    },
    // one field models both 80TTA and the broader 80TTB for seniors
    DeductionCap {
        category: DeductionCategory::SavingsInterest,
        below_60: dec!(10000),
        senior: dec!(50000),
    },
];

/// Clamp a raw claim into `[0, cap]`
pub fn cap_deduction(category: DeductionCategory, age: AgeBracket, claimed: Decimal) -> Decimal {
    claimed.max(Decimal::ZERO).min(category.cap(age))
}

/// One itemized line of a deduction breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub struct AllowedDeduction {
    pub category: DeductionCategory,
    #[schemars(with = "f64")]
    pub claimed: Decimal,
    #[schemars(with = "f64")]
    pub allowed: Decimal,
}

/// Everything subtracted from gross salary under one regime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct DeductionBreakdown {
    #[schemars(with = "f64")]
    pub standard: Decimal,
    #[schemars(with = "f64")]
    pub hra_exemption: Decimal,
    pub itemized: Vec<AllowedDeduction>,
}

impl DeductionBreakdown {
    /// Standard deduction and nothing else (New regime)
    pub fn standard_only() -> Self {
        DeductionBreakdown {
            standard: STANDARD_DEDUCTION,
            hra_exemption: Decimal::ZERO,
            itemized: Vec::new(),
        }
    }

    pub fn itemized_total(&self) -> Decimal {
        self.itemized.iter().map(|d| d.allowed).sum()
    }

    pub fn total(&self) -> Decimal {
        self.standard + self.hra_exemption + self.itemized_total()
    }
}

/// Standard deduction, rent allowance exemption and capped itemized claims
/// (Old regime)
pub fn aggregate_deductions(profile: &FinancialProfile) -> DeductionBreakdown {
    let hra_exemption = hra_exemption(
        profile.basic_salary,
        profile.hra_received,
        profile.rent_paid,
        profile.locality,
    );

    let itemized = DeductionCategory::ALL
        .iter()
        .map(|&category| {
            let claimed = category.claimed(&profile.deductions);
            AllowedDeduction {
                category,
                claimed,
                allowed: cap_deduction(category, profile.age_bracket, claimed),
            }
        })
        .collect();

    DeductionBreakdown {
        standard: STANDARD_DEDUCTION,
        hra_exemption,
        itemized,
    }
}
