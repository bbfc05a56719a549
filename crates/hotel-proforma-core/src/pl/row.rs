use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{safe_div, Money, YearKey, YearSeries};

/// Stable ids for the fixed rows of the statement. Department rows derive
/// theirs from the department key (`payroll_rooms`, `total_rooms`).
pub mod ids {
    pub const ROOMS_OPEN: &str = "rooms_open";
    pub const ROOMS_AVAILABLE: &str = "rooms_available";
    pub const ROOMS_SOLD: &str = "rooms_sold";
    pub const ADR: &str = "adr";
    pub const OCCUPANCY: &str = "occupancy";
    pub const REVPAR: &str = "revpar";

    pub const REV_ROOMS: &str = "rev_rooms";
    pub const REV_FNB: &str = "rev_fnb";
    pub const REV_SPA: &str = "rev_spa";
    pub const REV_OTHER: &str = "rev_other";
    pub const TOTAL_REVENUE: &str = "total_revenue";

    pub const TOTAL_DIRECT_COSTS: &str = "total_direct_costs";
    pub const GOI: &str = "goi";
    pub const TOTAL_INDIRECT_COSTS: &str = "total_indirect_costs";
    pub const GOP: &str = "gop";
    pub const TOTAL_FIXED_CHARGES: &str = "total_fixed_charges";
    pub const EBITDAR: &str = "ebitdar";
    pub const RENT: &str = "rent";
    pub const EBITDA: &str = "ebitda";
    pub const DEPRECIATION: &str = "depreciation";
    pub const INTEREST: &str = "interest";
    pub const NET_INCOME: &str = "net_income";
    pub const INCOME_TAX: &str = "income_tax";
    pub const NET_INCOME_AFTER_TAX: &str = "net_income_after_tax";
}

/// USALI section a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowGroup {
    Kpi,
    Revenue,
    Direct,
    Undistributed,
    Fixed,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Line,
    Subtotal,
    Total,
    Kpi,
}

/// One year of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlCell {
    pub year: YearKey,
    pub total: Decimal,
    /// Share of total revenue, as a decimal.
    pub pct_of_revenue: Decimal,
    /// Per occupied room-night.
    pub per_occupied_room: Money,
    /// Per physical room (key).
    pub per_available_room: Money,
}

impl PlCell {
    pub fn zero(year: YearKey) -> Self {
        PlCell {
            year,
            total: Decimal::ZERO,
            pct_of_revenue: Decimal::ZERO,
            per_occupied_room: Decimal::ZERO,
            per_available_room: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlRow {
    pub id: String,
    pub label: String,
    pub group: RowGroup,
    pub kind: RowKind,
    pub cells: Vec<PlCell>,
}

impl PlRow {
    pub fn cell(&self, year: YearKey) -> Option<&PlCell> {
        self.cells.iter().find(|c| c.year == year)
    }

    /// Cell total, or `None` when the year is outside the laid-out range.
    pub fn total_at(&self, year: YearKey) -> Option<Decimal> {
        self.cell(year).map(|c| c.total)
    }

    /// Row totals as a full-width series; years not laid out are zero.
    pub fn series(&self) -> YearSeries {
        let mut out = YearSeries::zeros();
        for cell in &self.cells {
            out.set(cell.year, cell.total);
        }
        out
    }
}

pub fn find_row<'a>(rows: &'a [PlRow], id: &str) -> Option<&'a PlRow> {
    rows.iter().find(|r| r.id == id)
}

/// Denominators for the per-cell ratios.
#[derive(Debug, Clone, Copy)]
pub struct RatioBasis {
    pub total_revenue: YearSeries,
    pub rooms_sold: YearSeries,
    pub keys: Decimal,
}

/// Lays rows out over `y0..=last`.
#[derive(Debug, Clone, Copy)]
pub struct RowBuilder {
    pub basis: RatioBasis,
    pub last: YearKey,
}

impl RowBuilder {
    fn cells(&self, values: &YearSeries, with_ratios: bool) -> Vec<PlCell> {
        YearKey::through(self.last)
            .map(|year| {
                let total = values.get(year);
                if !with_ratios {
                    return PlCell {
                        total,
                        ..PlCell::zero(year)
                    };
                }
                PlCell {
                    year,
                    total,
                    pct_of_revenue: safe_div(total, self.basis.total_revenue.get(year)),
                    per_occupied_room: safe_div(total, self.basis.rooms_sold.get(year)),
                    per_available_room: safe_div(total, self.basis.keys),
                }
            })
            .collect()
    }

    pub fn row(
        &self,
        id: impl Into<String>,
        label: impl Into<String>,
        group: RowGroup,
        kind: RowKind,
        values: &YearSeries,
    ) -> PlRow {
        PlRow {
            id: id.into(),
            label: label.into(),
            group,
            kind,
            cells: self.cells(values, kind != RowKind::Kpi),
        }
    }

    pub fn kpi(&self, id: &str, label: &str, values: &YearSeries) -> PlRow {
        self.row(id, label, RowGroup::Kpi, RowKind::Kpi, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn y(n: u8) -> YearKey {
        YearKey::new(n).unwrap()
    }

    fn builder() -> RowBuilder {
        RowBuilder {
            basis: RatioBasis {
                total_revenue: YearSeries::operating(dec!(1000)),
                rooms_sold: YearSeries::operating(dec!(50)),
                keys: dec!(10),
            },
            last: y(3),
        }
    }

    #[test]
    fn test_cells_cover_baseline_through_last() {
        let row = builder().row("x", "X", RowGroup::Revenue, RowKind::Line, &YearSeries::operating(dec!(250)));
        assert_eq!(row.cells.len(), 4);
        assert_eq!(row.cells[0].year, YearKey::BASELINE);
        assert_eq!(row.total_at(y(4)), None);
    }

    #[test]
    fn test_ratios() {
        let row = builder().row("x", "X", RowGroup::Direct, RowKind::Line, &YearSeries::operating(dec!(250)));
        let cell = row.cell(y(2)).unwrap();
        assert_eq!(cell.pct_of_revenue, dec!(0.25));
        assert_eq!(cell.per_occupied_room, dec!(5));
        assert_eq!(cell.per_available_room, dec!(25));
    }

    #[test]
    fn test_zero_denominators_give_zero() {
        let row = builder().row("x", "X", RowGroup::Direct, RowKind::Line, &YearSeries::filled(dec!(7)));
        let base = row.cell(YearKey::BASELINE).unwrap();
        assert_eq!(base.total, dec!(7));
        assert_eq!(base.pct_of_revenue, Decimal::ZERO);
        assert_eq!(base.per_occupied_room, Decimal::ZERO);
    }

    #[test]
    fn test_kpi_rows_carry_no_ratios() {
        let row = builder().kpi(ids::ADR, "ADR", &YearSeries::operating(dec!(140)));
        let cell = row.cell(y(1)).unwrap();
        assert_eq!(cell.total, dec!(140));
        assert_eq!(cell.pct_of_revenue, Decimal::ZERO);
        assert_eq!(cell.per_available_room, Decimal::ZERO);
    }

    #[test]
    fn test_series_and_lookup() {
        let rows = vec![builder().row(ids::EBITDA, "EBITDA", RowGroup::Summary, RowKind::Total, &YearSeries::operating(dec!(9)))];
        let ebitda = find_row(&rows, ids::EBITDA).unwrap();
        assert_eq!(ebitda.series().get(y(3)), dec!(9));
        assert_eq!(ebitda.series().get(y(4)), Decimal::ZERO);
        assert!(find_row(&rows, "missing").is_none());
    }
}
