use super::deductions::{aggregate_deductions, DeductionBreakdown};
use super::profile::{FinancialProfile, InvalidInputError, ProfileInput};
use super::regime::{Regime, RegimeRules};
use super::surcharge::{cess, round_tax};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::Serialize;
use std::thread;

/// Tax computed under one regime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct RegimeResult {
    pub regime: Regime,
    #[schemars(with = "f64")]
    pub gross_income: Decimal,
    pub deductions: DeductionBreakdown,
    /// Gross income less deductions, floored at zero
    #[schemars(with = "f64")]
    pub taxable_income: Decimal,
    #[schemars(with = "f64")]
    pub slab_tax: Decimal,
    /// Tax removed by the rebate or marginal relief
    #[schemars(with = "f64")]
    pub rebate: Decimal,
    #[schemars(with = "f64")]
    pub surcharge: Decimal,
    #[schemars(with = "f64")]
    pub cess: Decimal,
    /// Final payable tax in whole currency units
    #[schemars(with = "f64")]
    pub total_tax: Decimal,
}

/// Both regimes side by side with the cheaper one recommended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ComparisonResult {
    pub old: RegimeResult,
    pub new: RegimeResult,
    /// Absolute difference between the two totals
    #[schemars(with = "f64")]
    pub savings: Decimal,
    pub recommended: Regime,
}

impl ComparisonResult {
    pub fn from_results(old: RegimeResult, new: RegimeResult) -> Self {
        // Old wins exact ties
        let recommended = if old.total_tax <= new.total_tax {
            Regime::Old
        } else {
            Regime::New
        };
        let savings = (old.total_tax - new.total_tax).abs();
        ComparisonResult {
            old,
            new,
            savings,
            recommended,
        }
    }
}

/// Compute tax for `profile` under one regime's rules.
pub fn compute_with_rules(profile: &FinancialProfile, rules: &RegimeRules) -> RegimeResult {
    let deductions = if rules.itemized_deductions {
        aggregate_deductions(profile)
    } else {
        DeductionBreakdown::standard_only()
    };

    let gross_income = profile.gross_salary.max(Decimal::ZERO);
    let taxable_income = (gross_income - deductions.total()).max(Decimal::ZERO);

    let slab_tax = rules.schedule(profile.age_bracket).tax(taxable_income);
    let tax = rules.rebate.apply(slab_tax, taxable_income);
    let surcharge = rules.surcharge.surcharge(tax, taxable_income);
    let cess = cess(tax + surcharge, rules.cess_rate);
    let total_tax = round_tax(tax + surcharge + cess);

    log::debug!(
        "{} regime: taxable {}, slab tax {}, after rebate {}, surcharge {}, cess {}, total {}",
        rules.regime,
        taxable_income,
        slab_tax,
        tax,
        surcharge,
        cess,
        total_tax
    );

    RegimeResult {
        regime: rules.regime,
        gross_income,
        deductions,
        taxable_income,
        slab_tax,
        rebate: slab_tax - tax,
        surcharge,
        cess,
        total_tax,
    }
}

/// Compute tax for `profile` under `regime`. Pure: no state is shared
/// between calls, so regimes may be computed in any order.
pub fn compute_regime(profile: &FinancialProfile, regime: Regime) -> RegimeResult {
    compute_with_rules(profile, &regime.rules())
}

/// Compute both regimes and recommend the cheaper one
pub fn compare_regimes(profile: &FinancialProfile) -> ComparisonResult {
    let old = compute_regime(profile, Regime::Old);
    let new = compute_regime(profile, Regime::New);
    ComparisonResult::from_results(old, new)
}

/// Same as [`compare_regimes`], with the two regimes on separate threads
pub fn compare_regimes_parallel(profile: &FinancialProfile) -> ComparisonResult {
    thread::scope(|scope| {
        let old = scope.spawn(|| compute_regime(profile, Regime::Old));
        let new = compute_regime(profile, Regime::New);
        let old = match old.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        };
        ComparisonResult::from_results(old, new)
    })
}

/// Validate a raw profile and compare both regimes.
///
/// Fails only when the age bracket is missing or unrecognized, before any
/// tax is computed. Amounts are never rejected.
pub fn compute_comparison(input: &ProfileInput) -> Result<ComparisonResult, InvalidInputError> {
    let profile = FinancialProfile::try_from(input)?;
    Ok(compare_regimes(&profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::profile::{AgeBracket, ClaimedDeductions, Locality};
    use proptest::prelude::{any, prop_assert, prop_assert_eq, proptest};
    use rust_decimal_macros::dec;

    fn profile(gross: Decimal) -> FinancialProfile {
        FinancialProfile::salaried(gross, AgeBracket::Below60)
    }

    /// Profile whose taxable income is exactly `taxable` under the Old regime
    fn old_taxable(taxable: Decimal) -> FinancialProfile {
        profile(taxable + dec!(50000))
    }

    #[test]
    fn scenario_one_million_no_deductions() {
        let result = compare_regimes(&profile(dec!(1000000)));

        assert_eq!(result.old.taxable_income, dec!(950000));
        assert_eq!(result.old.slab_tax, dec!(102500));
        assert_eq!(result.old.cess, dec!(4100));
        assert_eq!(result.old.total_tax, dec!(106600));

        assert_eq!(result.new.taxable_income, dec!(950000));
        assert_eq!(result.new.slab_tax, dec!(52500));
        assert_eq!(result.new.cess, dec!(2100));
        assert_eq!(result.new.total_tax, dec!(54600));

        assert_eq!(result.recommended, Regime::New);
        assert_eq!(result.savings, dec!(52000));
    }

    #[test]
    fn scenario_six_lakh_is_past_the_old_cliff() {
        let result = compare_regimes(&profile(dec!(600000)));

        // 550,000 is above the 500,000 cliff: 12,500 + 10,000 + 4% cess
        assert_eq!(result.old.taxable_income, dec!(550000));
        assert_eq!(result.old.rebate, Decimal::ZERO);
        assert_eq!(result.old.total_tax, dec!(23400));

        assert_eq!(result.new.taxable_income, dec!(550000));
        assert_eq!(result.new.rebate, dec!(12500));
        assert_eq!(result.new.total_tax, Decimal::ZERO);

        assert_eq!(result.recommended, Regime::New);
        assert_eq!(result.savings, dec!(23400));
    }

    #[test]
    fn old_regime_cliff_at_five_lakh() {
        let at = compute_regime(&old_taxable(dec!(500000)), Regime::Old);
        assert_eq!(at.taxable_income, dec!(500000));
        assert_eq!(at.total_tax, Decimal::ZERO);
        assert_eq!(at.rebate, dec!(12500));

        let over = compute_regime(&old_taxable(dec!(500001)), Regime::Old);
        assert_eq!(over.taxable_income, dec!(500001));
        // 12,500.20 + 4% cess = 13,000.208
        assert_eq!(over.total_tax, dec!(13000));
    }

    #[test]
    fn new_regime_zero_at_seven_lakh() {
        let result = compute_regime(&profile(dec!(750000)), Regime::New);
        assert_eq!(result.taxable_income, dec!(700000));
        assert_eq!(result.total_tax, Decimal::ZERO);
    }

    #[test]
    fn new_regime_marginal_relief_just_over_threshold() {
        let result = compute_regime(&profile(dec!(750100)), Regime::New);
        assert_eq!(result.taxable_income, dec!(700100));
        assert_eq!(result.slab_tax, dec!(25010));
        assert_eq!(result.slab_tax - result.rebate, dec!(100));
        // 100 + 4% cess
        assert_eq!(result.total_tax, dec!(104));
    }

    #[test]
    fn new_regime_relief_ends_once_slab_tax_is_lower() {
        let result = compute_regime(&profile(dec!(850000)), Regime::New);
        assert_eq!(result.taxable_income, dec!(800000));
        assert_eq!(result.slab_tax, dec!(35000));
        assert_eq!(result.rebate, Decimal::ZERO);
    }

    #[test]
    fn section_80c_contributes_at_most_150k() {
        let mut p = profile(dec!(2000000));
        p.deductions.section_80c = dec!(500000);
        let result = compute_regime(&p, Regime::Old);
        assert_eq!(result.deductions.total(), dec!(200000));
        assert_eq!(result.taxable_income, dec!(1800000));
    }

    #[test]
    fn new_regime_ignores_itemized_deductions_and_hra() {
        let p = FinancialProfile {
            gross_salary: dec!(1500000),
            basic_salary: dec!(600000),
            hra_received: dec!(240000),
            rent_paid: dec!(300000),
            locality: Locality::Metro,
            age_bracket: AgeBracket::Below60,
            deductions: ClaimedDeductions {
                section_80c: dec!(150000),
                health_insurance: dec!(25000),
                nps_contribution: dec!(50000),
                home_loan_interest: dec!(200000),
                savings_interest: dec!(10000),
            },
        };

        let result = compare_regimes(&p);
        assert_eq!(result.new.taxable_income, dec!(1450000));
        assert_eq!(result.new.deductions, DeductionBreakdown::standard_only());

        // 50k + hra 240k + 435k itemized
        assert_eq!(result.old.deductions.total(), dec!(725000));
        assert_eq!(result.old.taxable_income, dec!(775000));
        // 12,500 + 55,000 + 4% cess
        assert_eq!(result.old.total_tax, dec!(70200));
        assert_eq!(result.recommended, Regime::Old);
    }

    #[test]
    fn tie_recommends_old_regime() {
        // both regimes pay nothing
        let result = compare_regimes(&profile(dec!(300000)));
        assert_eq!(result.old.total_tax, result.new.total_tax);
        assert_eq!(result.savings, Decimal::ZERO);
        assert_eq!(result.recommended, Regime::Old);
    }

    #[test]
    fn tie_with_nonzero_tax_recommends_old_regime() {
        let old = compute_regime(&profile(dec!(1000000)), Regime::Old);
        let mut new = old.clone();
        new.regime = Regime::New;
        let result = ComparisonResult::from_results(old, new);
        assert_eq!(result.recommended, Regime::Old);
        assert_eq!(result.savings, Decimal::ZERO);
    }

    #[test]
    fn senior_surcharge_bands() {
        // taxable 60M: old slab 17,810,000 at 37%, new 17,700,000 at 25%
        let p = FinancialProfile::salaried(dec!(60050000), AgeBracket::From60To80);
        let result = compare_regimes(&p);

        assert_eq!(result.old.slab_tax, dec!(17810000));
        assert_eq!(result.old.surcharge, dec!(6589700));
        assert_eq!(result.new.slab_tax, dec!(17700000));
        assert_eq!(result.new.surcharge, dec!(4425000));
        assert_eq!(result.recommended, Regime::New);
    }

    #[test]
    fn surcharge_cliff_has_no_relief() {
        let at = compute_regime(&profile(dec!(5050000)), Regime::New);
        let over = compute_regime(&profile(dec!(5050001)), Regime::New);
        assert_eq!(at.surcharge, Decimal::ZERO);
        assert!(over.surcharge > Decimal::ZERO);
        assert!(over.total_tax - at.total_tax > dec!(100000));
    }

    #[test]
    fn negative_gross_pays_nothing() {
        let result = compare_regimes(&profile(dec!(-1000000)));
        assert_eq!(result.old.taxable_income, Decimal::ZERO);
        assert_eq!(result.new.total_tax, Decimal::ZERO);
    }

    #[test]
    fn negative_basic_with_huge_rent_does_not_overflow() {
        let mut p = profile(dec!(1000000));
        p.basic_salary = Decimal::MIN;
        p.hra_received = dec!(1);
        p.rent_paid = Decimal::MAX;
        p.locality = Locality::Metro;

        let result = compare_regimes(&p);
        assert_eq!(result.old.deductions.hra_exemption, Decimal::ZERO);
        assert_eq!(result.old.total_tax, dec!(106600));
    }

    #[test]
    fn compute_comparison_rejects_missing_age() {
        let input = ProfileInput {
            gross_salary: Some(dec!(1000000)),
            ..Default::default()
        };
        assert_eq!(
            compute_comparison(&input),
            Err(InvalidInputError::MissingAgeBracket)
        );
    }

    #[test]
    fn compute_comparison_from_raw_input() {
        let input = ProfileInput {
            gross_salary: Some(dec!(1000000)),
            age_bracket: "below_60".to_string(),
            ..Default::default()
        };
        let result = compute_comparison(&input).unwrap();
        assert_eq!(result.savings, dec!(52000));
    }

    #[test]
    fn regimes_are_order_independent() {
        let p = profile(dec!(1800000));
        let new_first = compute_regime(&p, Regime::New);
        let old_second = compute_regime(&p, Regime::Old);
        let result = compare_regimes(&p);
        assert_eq!(result.new, new_first);
        assert_eq!(result.old, old_second);
    }

    #[test]
    fn parallel_matches_sequential() {
        let p = profile(dec!(2750000));
        assert_eq!(compare_regimes_parallel(&p), compare_regimes(&p));
    }

    fn arbitrary_profile(amounts: [u64; 9], metro: bool, age: usize) -> FinancialProfile {
        FinancialProfile {
            gross_salary: Decimal::from(amounts[0]),
            basic_salary: Decimal::from(amounts[1]),
            hra_received: Decimal::from(amounts[2]),
            rent_paid: Decimal::from(amounts[3]),
            locality: Locality::from_flag(metro),
            age_bracket: AgeBracket::ALL[age % 3],
            deductions: ClaimedDeductions {
                section_80c: Decimal::from(amounts[4]),
                health_insurance: Decimal::from(amounts[5]),
                nps_contribution: Decimal::from(amounts[6]),
                home_loan_interest: Decimal::from(amounts[7]),
                savings_interest: Decimal::from(amounts[8]),
            },
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_taxable_income_and_tax_never_negative(
            amounts in proptest::array::uniform9(0u64..80_000_000),
            metro in any::<bool>(),
            age in 0usize..3
        ) {
            let result = compare_regimes(&arbitrary_profile(amounts, metro, age));
            for r in [&result.old, &result.new] {
                prop_assert!(r.taxable_income >= Decimal::ZERO);
                prop_assert!(r.total_tax >= Decimal::ZERO);
                prop_assert!(r.rebate >= Decimal::ZERO);
                prop_assert_eq!(r.total_tax, r.total_tax.trunc());
            }
            prop_assert_eq!(result.savings, (result.old.total_tax - result.new.total_tax).abs());
        }

        #[test]
        fn prop_comparison_is_deterministic(
            amounts in proptest::array::uniform9(0u64..80_000_000),
            metro in any::<bool>(),
            age in 0usize..3
        ) {
            let p = arbitrary_profile(amounts, metro, age);
            prop_assert_eq!(compare_regimes(&p), compare_regimes(&p));
            prop_assert_eq!(compare_regimes_parallel(&p), compare_regimes(&p));
        }

        #[test]
        fn prop_marginal_relief_bounds_new_regime_tax(excess in 1u64..200_000) {
            let taxable = Decimal::from(700_000u64 + excess);
            let result = compute_regime(&profile(taxable + dec!(50000)), Regime::New);
            let after_rebate = result.slab_tax - result.rebate;
            prop_assert!(after_rebate <= Decimal::from(excess));
            if result.slab_tax > Decimal::from(excess) {
                prop_assert_eq!(after_rebate, Decimal::from(excess));
            }
        }

        #[test]
        fn prop_capped_deductions_within_ceilings(
            amounts in proptest::array::uniform9(0u64..80_000_000),
            age in 0usize..3
        ) {
            let result = compute_regime(&arbitrary_profile(amounts, false, age), Regime::Old);
            for d in &result.deductions.itemized {
                prop_assert!(d.allowed >= Decimal::ZERO);
                prop_assert!(d.allowed <= d.category.cap(AgeBracket::ALL[age % 3]));
            }
            prop_assert!(result.deductions.hra_exemption >= Decimal::ZERO);
        }
    }
}
