use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{non_negative, pct_to_rate, safe_div, Money};

const DAYS_PER_YEAR: Decimal = dec!(365);

fn default_days_open() -> Decimal {
    DAYS_PER_YEAR
}

fn default_guests_per_room() -> Decimal {
    dec!(1.5)
}

/// One outlet service period (breakfast, lunch, dinner, bar ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPeriod {
    pub name: String,
    /// Share of in-house guests who take this meal, percent.
    #[serde(default)]
    pub guest_capture_pct: Decimal,
    /// Average spend per in-house cover.
    #[serde(default)]
    pub average_check: Money,
    /// Walk-in covers per open day.
    #[serde(default)]
    pub external_covers_per_day: Decimal,
    /// Average spend per walk-in cover; defaults to `average_check`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_average_check: Option<Money>,
    #[serde(default = "default_days_open")]
    pub days_open: Decimal,
}

impl MealPeriod {
    fn open_share(&self) -> Decimal {
        non_negative(self.days_open).min(DAYS_PER_YEAR) / DAYS_PER_YEAR
    }

    /// Annual in-house covers given the stabilized rooms sold.
    pub fn guest_covers(&self, rooms_sold: Decimal, guests_per_room: Decimal) -> Decimal {
        non_negative(rooms_sold)
            * non_negative(guests_per_room)
            * pct_to_rate(self.guest_capture_pct)
            * self.open_share()
    }

    pub fn external_covers(&self) -> Decimal {
        non_negative(self.external_covers_per_day) * non_negative(self.days_open).min(DAYS_PER_YEAR)
    }

    pub fn annual_revenue(&self, rooms_sold: Decimal, guests_per_room: Decimal) -> Money {
        let external_check = self.external_average_check.unwrap_or(self.average_check);
        self.guest_covers(rooms_sold, guests_per_room) * non_negative(self.average_check)
            + self.external_covers() * non_negative(external_check)
    }
}

/// Food & beverage drivers. Meal periods are authoritative; see
/// [`FnbSimple`] for the aggregate view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FnbRecord")]
pub struct FnbModel {
    pub meal_periods: Vec<MealPeriod>,
    pub guests_per_occupied_room: Decimal,
}

/// Aggregate F&B view: one blended outlet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FnbSimple {
    pub covers_per_day: Decimal,
    pub average_check: Money,
    #[serde(default = "default_days_open")]
    pub days_open: Decimal,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FnbRecord {
    Advanced {
        meal_periods: Vec<MealPeriod>,
        #[serde(default = "default_guests_per_room")]
        guests_per_occupied_room: Decimal,
    },
    Simple(FnbSimple),
}

impl From<FnbRecord> for FnbModel {
    fn from(record: FnbRecord) -> Self {
        match record {
            FnbRecord::Advanced {
                meal_periods,
                guests_per_occupied_room,
            } => FnbModel {
                meal_periods,
                guests_per_occupied_room,
            },
            FnbRecord::Simple(simple) => simple.expand(),
        }
    }
}

impl FnbSimple {
    /// A single all-day outlet fed entirely by the blended cover count.
    pub fn expand(self) -> FnbModel {
        FnbModel {
            meal_periods: vec![MealPeriod {
                name: "All Day Dining".into(),
                guest_capture_pct: Decimal::ZERO,
                average_check: self.average_check,
                external_covers_per_day: self.covers_per_day,
                external_average_check: None,
                days_open: self.days_open,
            }],
            guests_per_occupied_room: default_guests_per_room(),
        }
    }

    pub fn annual_revenue(&self) -> Money {
        non_negative(self.covers_per_day)
            * non_negative(self.average_check)
            * non_negative(self.days_open).min(DAYS_PER_YEAR)
    }
}

impl FnbModel {
    /// Stabilized annual F&B revenue at the baseline rooms-sold volume.
    pub fn stabilized_revenue(&self, rooms_sold: Decimal) -> Money {
        self.meal_periods
            .iter()
            .map(|p| p.annual_revenue(rooms_sold, self.guests_per_occupied_room))
            .sum()
    }

    pub fn annual_covers(&self, rooms_sold: Decimal) -> Decimal {
        self.meal_periods
            .iter()
            .map(|p| p.guest_covers(rooms_sold, self.guests_per_occupied_room) + p.external_covers())
            .sum()
    }

    /// Lossy projection to the blended view. Revenue is preserved; the
    /// split between guests and walk-ins is not.
    pub fn to_simple(&self, rooms_sold: Decimal) -> FnbSimple {
        let covers = self.annual_covers(rooms_sold);
        FnbSimple {
            covers_per_day: covers / DAYS_PER_YEAR,
            average_check: safe_div(self.stabilized_revenue(rooms_sold), covers),
            days_open: DAYS_PER_YEAR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakfast_and_dinner() -> FnbModel {
        FnbModel {
            meal_periods: vec![
                MealPeriod {
                    name: "Breakfast".into(),
                    guest_capture_pct: dec!(60),
                    average_check: dec!(20),
                    external_covers_per_day: dec!(10),
                    external_average_check: Some(dec!(25)),
                    days_open: dec!(365),
                },
                MealPeriod {
                    name: "Dinner".into(),
                    guest_capture_pct: dec!(30),
                    average_check: dec!(50),
                    external_covers_per_day: dec!(20),
                    external_average_check: None,
                    days_open: dec!(365),
                },
            ],
            guests_per_occupied_room: dec!(1.5),
        }
    }

    #[test]
    fn test_stabilized_revenue() {
        let model = breakfast_and_dinner();
        // 1000 rooms sold * 1.5 guests = 1500 guests
        // Breakfast: 1500 * 0.6 * 20 = 18000 ; 10 * 365 * 25 = 91250
        // Dinner:    1500 * 0.3 * 50 = 22500 ; 20 * 365 * 50 = 365000
        assert_eq!(model.stabilized_revenue(dec!(1000)), dec!(496750));
    }

    #[test]
    fn test_partial_year_outlet() {
        let period = MealPeriod {
            name: "Terrace".into(),
            guest_capture_pct: dec!(10),
            average_check: dec!(30),
            external_covers_per_day: dec!(4),
            external_average_check: None,
            days_open: dec!(73),
        };
        // guests: 3650 * 1 * 0.1 * 0.2 = 73 covers * 30 ; walk-ins 4 * 73 * 30
        assert_eq!(period.annual_revenue(dec!(3650), dec!(1)), dec!(2190) + dec!(8760));
    }

    #[test]
    fn test_simple_projection_preserves_revenue() {
        let model = breakfast_and_dinner();
        let simple = model.to_simple(dec!(1000));
        let diff = simple.annual_revenue() - model.stabilized_revenue(dec!(1000));
        assert!(diff.abs() < dec!(0.000001));
    }

    #[test]
    fn test_simple_expansion() {
        let simple = FnbSimple {
            covers_per_day: dec!(100),
            average_check: dec!(40),
            days_open: dec!(365),
        };
        let model = simple.expand();
        assert_eq!(model.meal_periods.len(), 1);
        assert_eq!(model.stabilized_revenue(dec!(99999)), dec!(1460000));
    }

    #[test]
    fn test_wire_accepts_either_form() {
        let simple: FnbModel =
            serde_json::from_str(r#"{"covers_per_day": "50", "average_check": "30"}"#).unwrap();
        assert_eq!(simple.stabilized_revenue(Decimal::ZERO), dec!(547500));

        let advanced: FnbModel = serde_json::from_str(
            r#"{"meal_periods": [{"name": "Bar", "external_covers_per_day": "10", "average_check": "12"}]}"#,
        )
        .unwrap();
        assert_eq!(advanced.guests_per_occupied_room, dec!(1.5));
        assert_eq!(advanced.stabilized_revenue(Decimal::ZERO), dec!(43800));
    }
}
