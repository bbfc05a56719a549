use std::collections::BTreeMap;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Index, Mul, Sub};
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Inputs on the deal record that
/// carry a `_pct` suffix are percentages and are converted on use.
pub type Rate = Decimal;

/// Compounding or ramp multipliers (1.0 = unchanged)
pub type Multiple = Decimal;

/// Last projected year. Year 0 is the pre-opening baseline.
pub const MAX_YEAR: u8 = 10;

const YEAR_SLOTS: usize = MAX_YEAR as usize + 1;

/// Currency code
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    GBP,
    #[default]
    USD,
    EUR,
    CHF,
    JPY,
    CAD,
    AUD,
    AED,
    SGD,
    Other(String),
}

// ---------------------------------------------------------------------------
// Year keys and series
// ---------------------------------------------------------------------------

/// Projection year index in `0..=10`, written `y0`..`y10` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearKey(u8);

impl YearKey {
    pub const BASELINE: YearKey = YearKey(0);
    pub const FIRST_OPERATING: YearKey = YearKey(1);
    pub const LAST: YearKey = YearKey(MAX_YEAR);

    pub fn new(year: u8) -> Option<Self> {
        (year <= MAX_YEAR).then_some(YearKey(year))
    }

    /// Saturating constructor for untrusted year numbers.
    pub fn clamped(year: i64) -> Self {
        YearKey(year.clamp(0, MAX_YEAR as i64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_operating(self) -> bool {
        self.0 > 0
    }

    pub fn prev(self) -> Option<Self> {
        self.0.checked_sub(1).map(YearKey)
    }

    /// Every key from y0 through y10.
    pub fn all() -> impl Iterator<Item = YearKey> {
        (0..=MAX_YEAR).map(YearKey)
    }

    /// Keys y0 through `last` inclusive.
    pub fn through(last: YearKey) -> impl Iterator<Item = YearKey> {
        (0..=last.0).map(YearKey)
    }
}

impl fmt::Display for YearKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "y{}", self.0)
    }
}

impl FromStr for YearKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('y').unwrap_or(s);
        let year: u8 = digits
            .parse()
            .map_err(|_| format!("invalid year key '{s}'"))?;
        YearKey::new(year).ok_or_else(|| format!("year key '{s}' is beyond y{MAX_YEAR}"))
    }
}

impl Serialize for YearKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

/// Dense per-year values over y0..y10.
///
/// Series are always full width; truncating to an exit horizon happens where
/// the series is consumed, never here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct YearSeries([Decimal; YEAR_SLOTS]);

impl YearSeries {
    pub fn zeros() -> Self {
        Self::default()
    }

    pub fn filled(value: Decimal) -> Self {
        YearSeries([value; YEAR_SLOTS])
    }

    pub fn from_fn(mut f: impl FnMut(YearKey) -> Decimal) -> Self {
        let mut out = Self::zeros();
        for year in YearKey::all() {
            out.0[year.index()] = f(year);
        }
        out
    }

    /// Same value in every operating year, zero in the baseline year.
    pub fn operating(value: Decimal) -> Self {
        Self::from_fn(|y| if y.is_operating() { value } else { Decimal::ZERO })
    }

    pub fn get(&self, year: YearKey) -> Decimal {
        self.0[year.index()]
    }

    pub fn set(&mut self, year: YearKey, value: Decimal) {
        self.0[year.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (YearKey, Decimal)> + '_ {
        YearKey::all().map(move |y| (y, self.0[y.index()]))
    }

    pub fn values(&self) -> &[Decimal] {
        &self.0
    }

    pub fn map(&self, mut f: impl FnMut(Decimal) -> Decimal) -> Self {
        Self::from_fn(|y| f(self.get(y)))
    }

    pub fn zip_with(&self, other: &YearSeries, mut f: impl FnMut(Decimal, Decimal) -> Decimal) -> Self {
        Self::from_fn(|y| f(self.get(y), other.get(y)))
    }

    pub fn scale(&self, factor: Decimal) -> Self {
        self.map(|v| v * factor)
    }

    /// Copy with every year after `last` set to zero.
    pub fn truncated(&self, last: YearKey) -> Self {
        Self::from_fn(|y| if y <= last { self.get(y) } else { Decimal::ZERO })
    }

    pub fn total(&self) -> Decimal {
        self.0.iter().copied().sum()
    }
}

impl Index<YearKey> for YearSeries {
    type Output = Decimal;

    fn index(&self, year: YearKey) -> &Decimal {
        &self.0[year.index()]
    }
}

impl Add for YearSeries {
    type Output = YearSeries;

    fn add(self, rhs: YearSeries) -> YearSeries {
        self.zip_with(&rhs, |a, b| a + b)
    }
}

impl Sub for YearSeries {
    type Output = YearSeries;

    fn sub(self, rhs: YearSeries) -> YearSeries {
        self.zip_with(&rhs, |a, b| a - b)
    }
}

/// Element-wise product, used to stack ramp and index multipliers.
impl Mul for YearSeries {
    type Output = YearSeries;

    fn mul(self, rhs: YearSeries) -> YearSeries {
        self.zip_with(&rhs, |a, b| a * b)
    }
}

impl Sum for YearSeries {
    fn sum<I: Iterator<Item = YearSeries>>(iter: I) -> YearSeries {
        iter.fold(YearSeries::zeros(), |acc, s| acc + s)
    }
}

impl<'a> Sum<&'a YearSeries> for YearSeries {
    fn sum<I: Iterator<Item = &'a YearSeries>>(iter: I) -> YearSeries {
        iter.fold(YearSeries::zeros(), |acc, s| acc + *s)
    }
}

impl Serialize for YearSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(YEAR_SLOTS))?;
        for (year, value) in self.iter() {
            map.serialize_entry(&year.to_string(), &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for YearSeries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let sparse = BTreeMap::<YearKey, Decimal>::deserialize(deserializer)?;
        let mut out = YearSeries::zeros();
        for (year, value) in sparse {
            out.set(year, value);
        }
        Ok(out)
    }
}

/// Sparse per-year rate overrides, in percent, keyed `y1`..`y10`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesOverride(pub BTreeMap<YearKey, Decimal>);

impl SeriesOverride {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, year: YearKey) -> Option<Decimal> {
        self.0.get(&year).copied()
    }
}

impl FromIterator<(YearKey, Decimal)> for SeriesOverride {
    fn from_iter<I: IntoIterator<Item = (YearKey, Decimal)>>(iter: I) -> Self {
        SeriesOverride(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Input sanitising
// ---------------------------------------------------------------------------

/// Negative drivers (counts, prices, amounts) collapse to zero.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Percentages are bounded to 0..=100.
pub fn clamp_pct(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, dec!(100))
}

/// Percentage input (e.g. 35) to a bounded decimal rate (0.35).
pub fn pct_to_rate(value: Decimal) -> Rate {
    clamp_pct(value) / dec!(100)
}

/// Division that defines x / 0 as 0.
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

// ---------------------------------------------------------------------------
// Output envelope
// ---------------------------------------------------------------------------

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_year_key_parsing() {
        assert_eq!("y3".parse::<YearKey>().unwrap(), YearKey::new(3).unwrap());
        assert_eq!("7".parse::<YearKey>().unwrap(), YearKey::new(7).unwrap());
        assert!("y11".parse::<YearKey>().is_err());
        assert!("year".parse::<YearKey>().is_err());
    }

    #[test]
    fn test_year_key_clamped() {
        assert_eq!(YearKey::clamped(-4), YearKey::BASELINE);
        assert_eq!(YearKey::clamped(25), YearKey::LAST);
        assert_eq!(YearKey::clamped(5).value(), 5);
    }

    #[test]
    fn test_series_serializes_as_dense_year_map() {
        let series = YearSeries::operating(dec!(2));
        let json = serde_json::to_value(series).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 11);
        assert_eq!(obj["y0"], serde_json::json!("0"));
        assert_eq!(obj["y10"], serde_json::json!("2"));
    }

    #[test]
    fn test_series_deserializes_sparse_map() {
        let series: YearSeries = serde_json::from_str(r#"{"y2": "1.5", "y9": 3}"#).unwrap();
        assert_eq!(series.get(YearKey::new(2).unwrap()), dec!(1.5));
        assert_eq!(series.get(YearKey::new(9).unwrap()), dec!(3));
        assert_eq!(series.get(YearKey::new(3).unwrap()), Decimal::ZERO);
    }

    #[test]
    fn test_series_arithmetic() {
        let a = YearSeries::operating(dec!(10));
        let b = YearSeries::operating(dec!(4));
        assert_eq!((a - b).get(YearKey::LAST), dec!(6));
        assert_eq!((a * b).get(YearKey::LAST), dec!(40));
        assert_eq!([a, b].iter().sum::<YearSeries>().total(), dec!(140));
    }

    #[test]
    fn test_truncated_zeroes_tail_only() {
        let s = YearSeries::operating(dec!(5)).truncated(YearKey::new(3).unwrap());
        assert_eq!(s.get(YearKey::new(3).unwrap()), dec!(5));
        assert_eq!(s.get(YearKey::new(4).unwrap()), Decimal::ZERO);
    }

    #[test]
    fn test_sanitisers() {
        assert_eq!(non_negative(dec!(-3)), Decimal::ZERO);
        assert_eq!(clamp_pct(dec!(140)), dec!(100));
        assert_eq!(pct_to_rate(dec!(35)), dec!(0.35));
        assert_eq!(safe_div(dec!(1), Decimal::ZERO), Decimal::ZERO);
    }
}
