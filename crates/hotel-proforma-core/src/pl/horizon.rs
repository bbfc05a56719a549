use super::row::{PlCell, PlRow};
use crate::types::YearKey;

/// Zero every cell after `exit_year`, ratios included. Cells up to and
/// including the exit year are returned untouched.
pub fn apply_horizon(rows: Vec<PlRow>, exit_year: YearKey) -> Vec<PlRow> {
    rows.into_iter()
        .map(|mut row| {
            for cell in row.cells.iter_mut().filter(|c| c.year > exit_year) {
                *cell = PlCell::zero(cell.year);
            }
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pl::row::{RatioBasis, RowBuilder, RowGroup, RowKind};
    use crate::types::YearSeries;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cells_beyond_exit_are_zeroed() {
        let builder = RowBuilder {
            basis: RatioBasis {
                total_revenue: YearSeries::operating(dec!(100)),
                rooms_sold: YearSeries::operating(dec!(10)),
                keys: dec!(2),
            },
            last: YearKey::LAST,
        };
        let rows = vec![builder.row("x", "X", RowGroup::Revenue, RowKind::Line, &YearSeries::operating(dec!(40)))];
        let exit = YearKey::new(6).unwrap();
        let truncated = apply_horizon(rows.clone(), exit);

        assert_eq!(truncated[0].cells.len(), rows[0].cells.len());
        for (before, after) in rows[0].cells.iter().zip(&truncated[0].cells) {
            if after.year <= exit {
                assert_eq!(before, after);
            } else {
                assert_eq!(after.total, Decimal::ZERO);
                assert_eq!(after.pct_of_revenue, Decimal::ZERO);
                assert_eq!(after.per_occupied_room, Decimal::ZERO);
                assert_eq!(after.per_available_room, Decimal::ZERO);
            }
        }
    }
}
