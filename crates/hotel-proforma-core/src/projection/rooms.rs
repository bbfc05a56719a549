use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::macro_series::{resolve_macro, MacroSeries};
use crate::deal::{Deal, RoomsBaseline};
use crate::types::{non_negative, YearKey, YearSeries};

const DAYS_PER_YEAR: Decimal = dec!(365);

/// Annual rooms KPIs. Year 0 is pre-opening and always zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomsKpis {
    pub rooms_open: YearSeries,
    pub rooms_available: YearSeries,
    pub rooms_sold: YearSeries,
    pub adr: YearSeries,
    /// Decimal occupancy, 0..=1.
    pub occupancy: YearSeries,
    pub revpar: YearSeries,
    /// Rooms revenue = rooms sold x ADR.
    pub rooms_revenue: YearSeries,
}

impl RoomsKpis {
    /// Copy with every year after `last` zeroed.
    pub fn truncated(&self, last: YearKey) -> Self {
        RoomsKpis {
            rooms_open: self.rooms_open.truncated(last),
            rooms_available: self.rooms_available.truncated(last),
            rooms_sold: self.rooms_sold.truncated(last),
            adr: self.adr.truncated(last),
            occupancy: self.occupancy.truncated(last),
            revpar: self.revpar.truncated(last),
            rooms_revenue: self.rooms_revenue.truncated(last),
        }
    }
}

/// Full-width KPI projection from a stabilized baseline.
///
/// ADR ramps and grows but is never inflated; occupancy ramps but does not
/// compound. No intermediate rounding.
pub fn project_rooms(baseline: &RoomsBaseline, total_rooms: Decimal, macros: &MacroSeries) -> RoomsKpis {
    let keys = non_negative(total_rooms);
    let mut kpis = RoomsKpis {
        rooms_open: YearSeries::zeros(),
        rooms_available: YearSeries::zeros(),
        rooms_sold: YearSeries::zeros(),
        adr: YearSeries::zeros(),
        occupancy: YearSeries::zeros(),
        revpar: YearSeries::zeros(),
        rooms_revenue: YearSeries::zeros(),
    };

    for year in YearKey::all().filter(|y| y.is_operating()) {
        let ramp = macros.revenue_ramp.get(year);
        let available = keys * DAYS_PER_YEAR;
        let adr = baseline.adr * ramp * macros.topline_growth_index.get(year);
        let occupancy = (baseline.occupancy * ramp).clamp(Decimal::ZERO, Decimal::ONE);
        let sold = available * occupancy;

        kpis.rooms_open.set(year, keys);
        kpis.rooms_available.set(year, available);
        kpis.rooms_sold.set(year, sold);
        kpis.adr.set(year, adr);
        kpis.occupancy.set(year, occupancy);
        kpis.revpar.set(year, adr * occupancy);
        kpis.rooms_revenue.set(year, sold * adr);
    }

    kpis
}

/// Rooms KPIs for a deal, through its exit horizon.
pub fn rooms_kpis(deal: &Deal) -> RoomsKpis {
    let macros = resolve_macro(deal);
    project_rooms(&deal.rooms_baseline(), deal.total_rooms(), &macros).truncated(macros.exit_year)
}
