use super::deductions::{cap_deduction, DeductionCategory};
use super::profile::{FinancialProfile, ProfileInput, MAX_AMOUNT};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input quirks noticed while computing. None of them change the numbers;
/// amounts are always clamped rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Warning {
    /// A negative amount was treated as zero.
    NegativeAmountClamped { field: String },
    /// An amount was larger than any real salary and was saturated.
    AmountSaturated { field: String },
    /// An itemized claim exceeds its statutory ceiling.
    DeductionCapped {
        category: String,
        #[schemars(with = "f64")]
        claimed: Decimal,
        #[schemars(with = "f64")]
        allowed: Decimal,
    },
    /// Rent allowance was received but no rent was paid, so none of it is exempt.
    HraWithoutRent,
}

impl Warning {
    pub fn message(&self) -> String {
        match self {
            Warning::NegativeAmountClamped { field } => {
                format!("{field} is negative and was treated as zero")
            }
            Warning::AmountSaturated { field } => {
                format!("{field} exceeds {MAX_AMOUNT} and was capped")
            }
            Warning::DeductionCapped {
                category,
                claimed,
                allowed,
            } => format!("{category} claim of {claimed} is capped at {allowed}"),
            Warning::HraWithoutRent => {
                "rent allowance received without rent paid is fully taxable".to_string()
            }
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Warning::NegativeAmountClamped { .. } => "negative_amount",
            Warning::AmountSaturated { .. } => "amount_saturated",
            Warning::DeductionCapped { .. } => "deduction_capped",
            Warning::HraWithoutRent => "hra_without_rent",
        }
    }
}

/// Warnings for `profile`, validated from `input`, in field order.
///
/// Saturation is judged on the raw input, since the validated profile only
/// holds the capped value.
pub fn profile_warnings(input: &ProfileInput, profile: &FinancialProfile) -> Vec<Warning> {
    let mut warnings = Vec::new();

    for ((field, raw), (_, value)) in input.amounts().into_iter().zip(profile.amounts()) {
        if raw.is_some_and(|raw| raw.abs() > MAX_AMOUNT) {
            warnings.push(Warning::AmountSaturated {
                field: field.to_string(),
            });
        } else if value < Decimal::ZERO {
            warnings.push(Warning::NegativeAmountClamped {
                field: field.to_string(),
            });
        }
    }

    for category in DeductionCategory::ALL {
        let claimed = category.claimed(&profile.deductions);
        let allowed = cap_deduction(category, profile.age_bracket, claimed);
        if claimed > allowed && allowed > Decimal::ZERO {
            warnings.push(Warning::DeductionCapped {
                category: category.to_string(),
                claimed,
                allowed,
            });
        }
    }

    if profile.hra_received > Decimal::ZERO && profile.rent_paid <= Decimal::ZERO {
        warnings.push(Warning::HraWithoutRent);
    }

    warnings
}
