use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::index::{build_index, RateSource};
use crate::deal::{Deal, RampSettings, RAMP_YEARS};
use crate::types::{non_negative, Multiple, YearKey, YearSeries};

/// Per-deal multiplier series shared by every projection component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroSeries {
    /// 0 in year 0, the curve in years 1..=4, 1.0 afterwards.
    pub revenue_ramp: YearSeries,
    pub cost_ramp: YearSeries,
    pub topline_growth_index: YearSeries,
    pub inflation_index: YearSeries,
    pub exit_year: YearKey,
}

/// Last year governed by the ramp curves; growth and inflation start after.
pub fn growth_floor_year() -> YearKey {
    YearKey::clamped(RAMP_YEARS as i64)
}

/// Expand a 4-point ramp curve over the horizon.
pub fn ramp_series(curve: &[Multiple; RAMP_YEARS]) -> YearSeries {
    YearSeries::from_fn(|year| {
        if !year.is_operating() {
            Decimal::ZERO
        } else if year.index() <= RAMP_YEARS {
            non_negative(curve[year.index() - 1])
        } else {
            Decimal::ONE
        }
    })
}

pub fn topline_growth_index(ramp: &RampSettings) -> YearSeries {
    let source = RateSource::resolve(ramp.topline_growth_pct, ramp.growth_overrides.as_ref());
    build_index(source, growth_floor_year())
}

pub fn inflation_index(ramp: &RampSettings) -> YearSeries {
    let source = RateSource::resolve(ramp.inflation_pct, ramp.inflation_overrides.as_ref());
    build_index(source, growth_floor_year())
}

pub fn resolve_macro(deal: &Deal) -> MacroSeries {
    MacroSeries {
        revenue_ramp: ramp_series(&deal.ramp.revenue_ramp),
        cost_ramp: ramp_series(&deal.ramp.cost_ramp),
        topline_growth_index: topline_growth_index(&deal.ramp),
        inflation_index: inflation_index(&deal.ramp),
        exit_year: deal.exit_year(),
    }
}
