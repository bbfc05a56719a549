use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{SeriesOverride, YearKey, YearSeries};

/// Where a per-year growth rate comes from. Rates are in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateSource<'a> {
    /// Same rate every year.
    Flat(Decimal),
    /// Explicit rate per year; years absent from the map grow at 0%.
    PerYear(&'a SeriesOverride),
}

impl<'a> RateSource<'a> {
    /// Explicit overrides win when present and non-empty; otherwise the
    /// flat figure is expanded.
    pub fn resolve(flat_pct: Decimal, overrides: Option<&'a SeriesOverride>) -> Self {
        match overrides {
            Some(map) if !map.is_empty() => RateSource::PerYear(map),
            _ => RateSource::Flat(flat_pct),
        }
    }

    /// Rate for `year` as a decimal. Rates below -100% are floored there so
    /// an index can reach zero but never turn negative.
    pub fn rate(&self, year: YearKey) -> Decimal {
        let pct = match self {
            RateSource::Flat(pct) => *pct,
            RateSource::PerYear(map) => map.get(year).unwrap_or(Decimal::ZERO),
        };
        (pct / dec!(100)).max(dec!(-1))
    }
}

/// Compounding multiplier series.
///
/// `value(y) = 1` for `y <= floor_year`, then
/// `value(y) = value(y - 1) * (1 + rate(y))`. Year 0 never grows.
pub fn build_index(rates: RateSource<'_>, floor_year: YearKey) -> YearSeries {
    let mut index = YearSeries::filled(Decimal::ONE);
    for year in YearKey::all() {
        if year <= floor_year || !year.is_operating() {
            continue;
        }
        if let Some(prev) = year.prev() {
            index.set(year, index.get(prev) * (Decimal::ONE + rates.rate(year)));
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn y(n: u8) -> YearKey {
        YearKey::new(n).unwrap()
    }

    #[test]
    fn test_flat_rate_compounds_after_floor() {
        let idx = build_index(RateSource::Flat(dec!(3)), y(4));
        for n in 0..=4 {
            assert_eq!(idx.get(y(n)), Decimal::ONE);
        }
        assert_eq!(idx.get(y(5)), dec!(1.03));
        assert_eq!(idx.get(y(6)), dec!(1.0609));
        assert_eq!(idx.get(y(7)), dec!(1.092727));
    }

    #[test]
    fn test_recurrence_holds_every_year() {
        let overrides: SeriesOverride = [(y(5), dec!(2)), (y(6), dec!(4.5)), (y(9), dec!(-1))]
            .into_iter()
            .collect();
        let source = RateSource::PerYear(&overrides);
        let idx = build_index(source, y(4));
        assert_eq!(idx.get(y(4)), Decimal::ONE);
        for n in 5..=10 {
            let expected = idx.get(y(n - 1)) * (Decimal::ONE + source.rate(y(n)));
            assert_eq!(idx.get(y(n)), expected);
        }
        // Year 7 absent from the map: no growth
        assert_eq!(idx.get(y(7)), idx.get(y(6)));
    }

    #[test]
    fn test_floor_at_zero_grows_from_year_one() {
        let idx = build_index(RateSource::Flat(dec!(10)), YearKey::BASELINE);
        assert_eq!(idx.get(YearKey::BASELINE), Decimal::ONE);
        assert_eq!(idx.get(y(1)), dec!(1.1));
        assert_eq!(idx.get(y(2)), dec!(1.21));
    }

    #[test]
    fn test_resolve_prefers_non_empty_overrides() {
        let empty = SeriesOverride::default();
        assert_eq!(RateSource::resolve(dec!(3), Some(&empty)), RateSource::Flat(dec!(3)));
        assert_eq!(RateSource::resolve(dec!(3), None), RateSource::Flat(dec!(3)));

        let map: SeriesOverride = [(y(5), dec!(8))].into_iter().collect();
        assert_eq!(RateSource::resolve(dec!(3), Some(&map)), RateSource::PerYear(&map));
    }

    #[test]
    fn test_rate_floored_at_minus_one_hundred() {
        let idx = build_index(RateSource::Flat(dec!(-250)), y(4));
        assert_eq!(idx.get(y(5)), Decimal::ZERO);
        assert_eq!(idx.get(y(10)), Decimal::ZERO);
    }
}
