//! Progressive slab schedules and the marginal tax they levy

use super::profile::AgeBracket;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// A band starting at `from` and taxed at `rate` up to the next band's start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlabBand {
    pub from: Decimal,
    pub rate: Decimal,
}

impl SlabBand {
    pub const fn new(from: Decimal, rate: Decimal) -> Self {
        SlabBand { from, rate }
    }
}

/// Ordered slab bands of one regime. The last band is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlabSchedule {
    bands: Vec<SlabBand>,
}

impl SlabSchedule {
    /// Bands must be sorted by `from`; equal starts give an empty band.
    pub fn new(bands: Vec<SlabBand>) -> Self {
        debug_assert!(bands.windows(2).all(|w| w[0].from <= w[1].from));
        SlabSchedule { bands }
    }

    /// `(lower, upper, rate)` for each band, `upper` is `None` for the last
    pub fn ranges(&self) -> impl Iterator<Item = (Decimal, Option<Decimal>, Decimal)> + '_ {
        self.bands.iter().enumerate().map(|(i, band)| {
            let upper = self.bands.get(i + 1).map(|next| next.from);
            (band.from, upper, band.rate)
        })
    }

    /// Marginal tax on `income`: each rate applies only to the slice of
    /// income that falls inside its band.
    pub fn tax(&self, income: Decimal) -> Decimal {
        let income = income.max(Decimal::ZERO);
        self.ranges()
            .map(|(lower, upper, rate)| {
                let top = upper.map_or(income, |upper| income.min(upper));
                rate * (top - lower).max(Decimal::ZERO)
            })
            .sum()
    }
}

/// Income exempt from tax under the Old regime for each age bracket
pub fn old_regime_exemption_limit(age: AgeBracket) -> Decimal {
    match age {
        AgeBracket::Below60 => dec!(250000),
        AgeBracket::From60To80 => dec!(300000),
        AgeBracket::Above80 => dec!(500000),
    }
}

/// Old regime: nil up to the age based limit, then 5% / 20% / 30%
pub fn old_regime_schedule(age: AgeBracket) -> SlabSchedule {
    SlabSchedule::new(vec![
        SlabBand::new(Decimal::ZERO, Decimal::ZERO),
        SlabBand::new(old_regime_exemption_limit(age), dec!(0.05)),
        SlabBand::new(dec!(500000), dec!(0.20)),
        SlabBand::new(dec!(1000000), dec!(0.30)),
    ])
}

/// New regime: the same for every age bracket
pub fn new_regime_schedule() -> SlabSchedule {
    SlabSchedule::new(vec![
        SlabBand::new(Decimal::ZERO, Decimal::ZERO),
        SlabBand::new(dec!(300000), dec!(0.05)),
        SlabBand::new(dec!(600000), dec!(0.10)),
        SlabBand::new(dec!(900000), dec!(0.15)),
        SlabBand::new(dec!(1200000), dec!(0.20)),
        SlabBand::new(dec!(1500000), dec!(0.30)),
    ])
}
