//! House rent allowance exemption (Old regime only)

use super::profile::Locality;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Share of basic salary that caps the exemption in a metro city
pub const METRO_BASIC_SHARE: Decimal = dec!(0.50);
/// Share of basic salary that caps the exemption elsewhere
pub const NON_METRO_BASIC_SHARE: Decimal = dec!(0.40);
/// Rent below this share of basic salary earns no exemption
pub const RENT_BASIC_SHARE: Decimal = dec!(0.10);

impl Locality {
    pub fn basic_share(self) -> Decimal {
        match self {
            Locality::Metro => METRO_BASIC_SHARE,
            Locality::NonMetro => NON_METRO_BASIC_SHARE,
        }
    }
}

/// Exempt portion of the house rent allowance.
///
/// The least of: the allowance received, the locality share of basic salary,
/// and rent paid in excess of 10% of basic salary. Every input is floored at
/// zero before it is used, so negative inputs are clamped rather than rejected.
pub fn hra_exemption(
    basic_salary: Decimal,
    hra_received: Decimal,
    rent_paid: Decimal,
    locality: Locality,
) -> Decimal {
    let basic = basic_salary.max(Decimal::ZERO);
    let received = hra_received.max(Decimal::ZERO);
    let rent = rent_paid.max(Decimal::ZERO);

    let basic_cap = locality.basic_share() * basic;
    let excess_rent = (rent - RENT_BASIC_SHARE * basic).max(Decimal::ZERO);

    received.min(basic_cap).min(excess_rent)
}
