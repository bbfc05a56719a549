use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{non_negative, pct_to_rate, safe_div, Money, Rate};

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// One room type in the key count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomType {
    pub name: String,
    pub count: i64,
    /// Relative price point; 1.0 is the house average.
    #[serde(default = "default_price_weight")]
    pub price_weight: Decimal,
}

fn default_price_weight() -> Decimal {
    Decimal::ONE
}

/// Rate assigned to one room type by [`RoomInventory::rate_mix`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTypeRate {
    pub name: String,
    pub count: i64,
    pub adr: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomInventory(pub Vec<RoomType>);

impl RoomInventory {
    /// Physical keys. Negative counts do not subtract.
    pub fn total_rooms(&self) -> Decimal {
        self.0.iter().map(|r| Decimal::from(r.count.max(0))).sum()
    }

    /// Spread `base_adr` across room types by price weight such that the
    /// key-weighted average equals `base_adr`.
    pub fn rate_mix(&self, base_adr: Money) -> Vec<RoomTypeRate> {
        let weighted_keys: Decimal = self
            .0
            .iter()
            .map(|r| Decimal::from(r.count.max(0)) * non_negative(r.price_weight))
            .sum();
        let total = self.total_rooms();

        self.0
            .iter()
            .map(|r| {
                let adr = if weighted_keys.is_zero() {
                    base_adr
                } else {
                    base_adr * non_negative(r.price_weight) * total / weighted_keys
                };
                RoomTypeRate {
                    name: r.name.clone(),
                    count: r.count.max(0),
                    adr,
                }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Monthly baseline
// ---------------------------------------------------------------------------

/// One month of the stabilized seasonality model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRoomRow {
    pub month: u8,
    pub days: u32,
    pub adr: Money,
    /// Occupancy in percent, 0..=100.
    pub occupancy_pct: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomRevenueModel {
    pub months: Vec<MonthlyRoomRow>,
}

/// Stabilized annual roll-up of the monthly model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomsBaseline {
    pub rooms_available: Decimal,
    pub rooms_sold: Decimal,
    pub rooms_revenue: Money,
    /// Rooms revenue / rooms sold.
    pub adr: Money,
    /// Rooms sold / rooms available, as a decimal.
    pub occupancy: Rate,
}

impl RoomRevenueModel {
    /// Twelve months with the same days-in-month, ADR and occupancy.
    pub fn flat(adr: Money, occupancy_pct: Decimal) -> Self {
        const DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        Self {
            months: DAYS
                .iter()
                .enumerate()
                .map(|(i, days)| MonthlyRoomRow {
                    month: i as u8 + 1,
                    days: *days,
                    adr,
                    occupancy_pct,
                })
                .collect(),
        }
    }

    pub fn baseline(&self, total_rooms: Decimal) -> RoomsBaseline {
        let keys = non_negative(total_rooms);
        let mut available = Decimal::ZERO;
        let mut sold = Decimal::ZERO;
        let mut revenue = Decimal::ZERO;

        for row in &self.months {
            let month_available = keys * Decimal::from(row.days);
            let month_sold = month_available * pct_to_rate(row.occupancy_pct);
            available += month_available;
            sold += month_sold;
            revenue += month_sold * non_negative(row.adr);
        }

        RoomsBaseline {
            rooms_available: available,
            rooms_sold: sold,
            rooms_revenue: revenue,
            adr: safe_div(revenue, sold),
            occupancy: safe_div(sold, available).min(dec!(1)),
        }
    }
}
