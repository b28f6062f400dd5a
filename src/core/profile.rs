use super::schema::{FieldKind, InputField};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use rust_decimal::prelude::FromPrimitive;
use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use taxcomp_derive::InputSchema;

/// Largest magnitude accepted for any amount. Larger values are saturated.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Structural problems that stop a comparison before it starts.
///
/// Numeric fields never produce one of these: out of range amounts are
/// clamped by the components that consume them.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum InvalidInputError {
    #[error("age bracket is required")]
    MissingAgeBracket,
    #[error("unrecognized age bracket: '{0}'")]
    UnknownAgeBracket(String),
}

/// Age tier of the taxpayer, ordered youngest first
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum AgeBracket {
    #[serde(rename = "below_60")]
    Below60,
    #[serde(rename = "60_to_80")]
    From60To80,
    #[serde(rename = "above_80")]
    Above80,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 3] = [
        AgeBracket::Below60,
        AgeBracket::From60To80,
        AgeBracket::Above80,
    ];

    /// Senior and super senior citizens get the higher deduction ceilings
    pub fn is_senior(self) -> bool {
        self > AgeBracket::Below60
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AgeBracket::Below60 => "below_60",
            AgeBracket::From60To80 => "60_to_80",
            AgeBracket::Above80 => "above_80",
        }
    }
}

impl FromStr for AgeBracket {
    type Err = InvalidInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "" => Err(InvalidInputError::MissingAgeBracket),
            "below_60" | "below60" | "<60" | "under_60" => Ok(AgeBracket::Below60),
            "60_to_80" | "60to80" | "60_80" | "senior" => Ok(AgeBracket::From60To80),
            "above_80" | "above80" | "80+" | "over_80" | "super_senior" => Ok(AgeBracket::Above80),
            _ => Err(InvalidInputError::UnknownAgeBracket(s.trim().to_string())),
        }
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AgeBracket::Below60 => "below 60",
            AgeBracket::From60To80 => "60 to 80",
            AgeBracket::Above80 => "80 and above",
        };
        write!(f, "{label}")
    }
}

/// Whether the rented home is in a metro city
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum Locality {
    Metro,
    #[default]
    NonMetro,
}

impl Locality {
    pub fn from_flag(is_metro: bool) -> Self {
        if is_metro {
            Locality::Metro
        } else {
            Locality::NonMetro
        }
    }
}

/// Raw profile record as read from JSON or CSV.
///
/// Every amount is optional; a missing, null or blank amount counts as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, InputSchema)]
pub struct ProfileInput {
    /// Gross annual salary
    #[serde(default, deserialize_with = "deserialize_amount")]
    #[schemars(with = "Option<f64>")]
    pub gross_salary: Option<Decimal>,
    /// Basic annual salary
    #[serde(default, deserialize_with = "deserialize_amount")]
    #[schemars(with = "Option<f64>")]
    pub basic_salary: Option<Decimal>,
    /// House rent allowance received in the year
    #[serde(default, deserialize_with = "deserialize_amount")]
    #[schemars(with = "Option<f64>")]
    pub hra_received: Option<Decimal>,
    /// Rent paid in the year
    #[serde(default, deserialize_with = "deserialize_amount")]
    #[schemars(with = "Option<f64>")]
    pub rent_paid: Option<Decimal>,
    /// Rented home is in a metro city
    #[serde(default)]
    pub is_metro: Option<bool>,
    /// below_60, 60_to_80 or above_80
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    #[schemars(with = "String")]
    pub age_bracket: String,
    /// Section 80C savings and insurance
    #[serde(default, deserialize_with = "deserialize_amount")]
    #[schemars(with = "Option<f64>")]
    pub section_80c: Option<Decimal>,
    /// Section 80D health insurance premium
    #[serde(default, deserialize_with = "deserialize_amount")]
    #[schemars(with = "Option<f64>")]
    pub health_insurance: Option<Decimal>,
    /// Section 80CCD(1B) additional pension contribution
    #[serde(default, deserialize_with = "deserialize_amount")]
    #[schemars(with = "Option<f64>")]
    pub nps_contribution: Option<Decimal>,
    /// Section 24(b) housing loan interest
    #[serde(default, deserialize_with = "deserialize_amount")]
    #[schemars(with = "Option<f64>")]
    pub home_loan_interest: Option<Decimal>,
    /// Section 80TTA/80TTB savings interest
    #[serde(default, deserialize_with = "deserialize_amount")]
    #[schemars(with = "Option<f64>")]
    pub savings_interest: Option<Decimal>,
}

impl ProfileInput {
    /// All amounts keyed by their input field name, as read
    pub fn amounts(&self) -> [(&'static str, Option<Decimal>); 9] {
        [
            ("gross_salary", self.gross_salary),
            ("basic_salary", self.basic_salary),
            ("hra_received", self.hra_received),
            ("rent_paid", self.rent_paid),
            ("section_80c", self.section_80c),
            ("health_insurance", self.health_insurance),
            ("nps_contribution", self.nps_contribution),
            ("home_loan_interest", self.home_loan_interest),
            ("savings_interest", self.savings_interest),
        ]
    }
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<SaturatingAmount>::deserialize(deserializer)?.map(|amount| amount.0))
}

/// Amount read from a JSON number, a CSV cell or a numeric string. Numbers
/// beyond the range of `Decimal` saturate to `Decimal::MAX` or `Decimal::MIN`
/// instead of failing the record; validation then caps them at `MAX_AMOUNT`.
struct SaturatingAmount(Decimal);

impl<'de> Deserialize<'de> for SaturatingAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor).map(SaturatingAmount)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Decimal;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number or numeric string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Decimal, E> {
        Ok(Decimal::from(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Decimal, E> {
        Ok(Decimal::from(value))
    }

    fn visit_i128<E: de::Error>(self, value: i128) -> Result<Decimal, E> {
        Ok(Decimal::from_i128(value).unwrap_or_else(|| out_of_range(value < 0)))
    }

    fn visit_u128<E: de::Error>(self, value: u128) -> Result<Decimal, E> {
        Ok(Decimal::from_u128(value).unwrap_or_else(|| out_of_range(false)))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Decimal, E> {
        if value.is_nan() {
            return Err(E::invalid_value(Unexpected::Float(value), &self));
        }
        // shortest round-trip text keeps 0.1 as 0.1
        let decimal = value
            .to_string()
            .parse::<Decimal>()
            .ok()
            .or_else(|| Decimal::from_f64(value));
        Ok(decimal.unwrap_or_else(|| out_of_range(value.is_sign_negative())))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Decimal, E> {
        let trimmed = value.trim();
        if let Ok(decimal) = trimmed.parse::<Decimal>() {
            return Ok(decimal);
        }
        match trimmed.parse::<f64>() {
            Ok(float) => self.visit_f64(float),
            Err(_) => Err(E::invalid_value(Unexpected::Str(value), &self)),
        }
    }
}

fn out_of_range(negative: bool) -> Decimal {
    let saturated = if negative { Decimal::MIN } else { Decimal::MAX };
    log::warn!("amount out of range, read as {saturated}");
    saturated
}

fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Itemized deduction claims, exactly as supplied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ClaimedDeductions {
    #[schemars(with = "f64")]
    pub section_80c: Decimal,
    #[schemars(with = "f64")]
    pub health_insurance: Decimal,
    #[schemars(with = "f64")]
    pub nps_contribution: Decimal,
    #[schemars(with = "f64")]
    pub home_loan_interest: Decimal,
    #[schemars(with = "f64")]
    pub savings_interest: Decimal,
}

/// Validated, immutable financial profile for one comparison.
///
/// Amounts keep their sign; each calculator clamps what it consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct FinancialProfile {
    #[schemars(with = "f64")]
    pub gross_salary: Decimal,
    #[schemars(with = "f64")]
    pub basic_salary: Decimal,
    #[schemars(with = "f64")]
    pub hra_received: Decimal,
    #[schemars(with = "f64")]
    pub rent_paid: Decimal,
    pub locality: Locality,
    pub age_bracket: AgeBracket,
    pub deductions: ClaimedDeductions,
}

impl FinancialProfile {
    /// Profile with only a gross salary, everything else zero
    pub fn salaried(gross_salary: Decimal, age_bracket: AgeBracket) -> Self {
        FinancialProfile {
            gross_salary,
            basic_salary: Decimal::ZERO,
            hra_received: Decimal::ZERO,
            rent_paid: Decimal::ZERO,
            locality: Locality::NonMetro,
            age_bracket,
            deductions: ClaimedDeductions::default(),
        }
    }

    /// All amounts keyed by their input field name
    pub fn amounts(&self) -> [(&'static str, Decimal); 9] {
        [
            ("gross_salary", self.gross_salary),
            ("basic_salary", self.basic_salary),
            ("hra_received", self.hra_received),
            ("rent_paid", self.rent_paid),
            ("section_80c", self.deductions.section_80c),
            ("health_insurance", self.deductions.health_insurance),
            ("nps_contribution", self.deductions.nps_contribution),
            ("home_loan_interest", self.deductions.home_loan_interest),
            ("savings_interest", self.deductions.savings_interest),
        ]
    }
}

impl TryFrom<&ProfileInput> for FinancialProfile {
    type Error = InvalidInputError;

    fn try_from(input: &ProfileInput) -> Result<Self, Self::Error> {
        let age_bracket: AgeBracket = input.age_bracket.parse()?;

        Ok(FinancialProfile {
            gross_salary: amount("gross_salary", input.gross_salary),
            basic_salary: amount("basic_salary", input.basic_salary),
            hra_received: amount("hra_received", input.hra_received),
            rent_paid: amount("rent_paid", input.rent_paid),
            locality: Locality::from_flag(input.is_metro.unwrap_or(false)),
            age_bracket,
            deductions: ClaimedDeductions {
                section_80c: amount("section_80c", input.section_80c),
                health_insurance: amount("health_insurance", input.health_insurance),
                nps_contribution: amount("nps_contribution", input.nps_contribution),
                home_loan_interest: amount("home_loan_interest", input.home_loan_interest),
                savings_interest: amount("savings_interest", input.savings_interest),
            },
        })
    }
}

impl TryFrom<ProfileInput> for FinancialProfile {
    type Error = InvalidInputError;

    fn try_from(input: ProfileInput) -> Result<Self, Self::Error> {
        FinancialProfile::try_from(&input)
    }
}

/// Absent amounts become zero, huge ones saturate at `MAX_AMOUNT`
fn amount(field: &str, value: Option<Decimal>) -> Decimal {
    let value = value.unwrap_or(Decimal::ZERO);
    if value.abs() > MAX_AMOUNT {
        log::warn!("{field} of {value} saturated to {MAX_AMOUNT}");
        if value.is_sign_negative() {
            -MAX_AMOUNT
        } else {
            MAX_AMOUNT
        }
    } else {
        value
    }
}
