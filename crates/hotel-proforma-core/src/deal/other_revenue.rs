use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{non_negative, pct_to_rate, Money};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaModel {
    pub treatments_per_day: Decimal,
    pub average_price: Money,
    #[serde(default = "default_days_open")]
    pub days_open: Decimal,
}

fn default_days_open() -> Decimal {
    dec!(365)
}

impl SpaModel {
    pub fn stabilized_revenue(&self) -> Money {
        non_negative(self.treatments_per_day)
            * non_negative(self.average_price)
            * non_negative(self.days_open).min(dec!(365))
    }
}

/// Miscellaneous income (parking, retail, resort fees ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OtherRevenueDriver {
    /// Percent of stabilized rooms revenue.
    PctRoomsRevenue(Decimal),
    /// Fixed stabilized amount per year.
    FixedAnnual(Money),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtherRevenueModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spa: Option<SpaModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<OtherRevenueDriver>,
}

impl OtherRevenueModel {
    pub fn stabilized_spa(&self) -> Money {
        self.spa.as_ref().map(SpaModel::stabilized_revenue).unwrap_or_default()
    }

    pub fn stabilized_other(&self, stabilized_rooms_revenue: Money) -> Money {
        match &self.other {
            Some(OtherRevenueDriver::PctRoomsRevenue(pct)) => {
                non_negative(stabilized_rooms_revenue) * pct_to_rate(*pct)
            }
            Some(OtherRevenueDriver::FixedAnnual(amount)) => non_negative(*amount),
            None => Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spa_revenue() {
        let spa = SpaModel {
            treatments_per_day: dec!(12),
            average_price: dec!(90),
            days_open: dec!(360),
        };
        assert_eq!(spa.stabilized_revenue(), dec!(388800));
    }

    #[test]
    fn test_other_driver_variants() {
        let pct = OtherRevenueModel {
            spa: None,
            other: Some(OtherRevenueDriver::PctRoomsRevenue(dec!(4))),
        };
        assert_eq!(pct.stabilized_other(dec!(1000000)), dec!(40000));

        let fixed = OtherRevenueModel {
            spa: None,
            other: Some(OtherRevenueDriver::FixedAnnual(dec!(-10))),
        };
        assert_eq!(fixed.stabilized_other(dec!(1000000)), Decimal::ZERO);
        assert_eq!(fixed.stabilized_spa(), Decimal::ZERO);
    }

    #[test]
    fn test_driver_wire_format() {
        let driver: OtherRevenueDriver =
            serde_json::from_str(r#"{"kind": "fixed_annual", "value": "75000"}"#).unwrap();
        assert_eq!(driver, OtherRevenueDriver::FixedAnnual(dec!(75000)));
    }
}
