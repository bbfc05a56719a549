use serde::{Deserialize, Serialize};

use super::macro_series::MacroSeries;
use super::rooms::RoomsKpis;
use crate::deal::Deal;
use crate::types::{Money, YearSeries};

/// Per-year revenue by operated department.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevenueStreams {
    pub rooms: YearSeries,
    pub fnb: YearSeries,
    pub spa: YearSeries,
    pub other: YearSeries,
}

impl RevenueStreams {
    pub fn total(&self) -> YearSeries {
        self.rooms + self.fnb + self.spa + self.other
    }

    /// Spa plus miscellaneous income: the base for `pct_other_revenue`
    /// cost drivers.
    pub fn other_operated(&self) -> YearSeries {
        self.spa + self.other
    }
}

/// Project a stabilized revenue figure: `stabilized x ramp x growth`.
pub fn project_revenue_like(stabilized: Money, macros: &MacroSeries) -> YearSeries {
    macros
        .revenue_ramp
        .zip_with(&macros.topline_growth_index, |ramp, growth| stabilized * ramp * growth)
}

/// Revenue streams for a deal. Rooms revenue comes from the KPI engine; the
/// other streams are stabilized at the baseline rooms volume and projected
/// with the revenue ramp and topline growth.
pub fn project_revenue(deal: &Deal, macros: &MacroSeries, rooms: &RoomsKpis) -> RevenueStreams {
    let baseline = deal.rooms_baseline();

    let fnb_stabilized = deal
        .fnb
        .as_ref()
        .map(|m| m.stabilized_revenue(baseline.rooms_sold))
        .unwrap_or_default();
    let (spa_stabilized, other_stabilized) = deal
        .other_revenue
        .as_ref()
        .map(|m| (m.stabilized_spa(), m.stabilized_other(baseline.rooms_revenue)))
        .unwrap_or_default();

    tracing::debug!(
        deal_id = %deal.id,
        fnb = %fnb_stabilized,
        spa = %spa_stabilized,
        other = %other_stabilized,
        "stabilized ancillary revenue"
    );

    RevenueStreams {
        rooms: rooms.rooms_revenue,
        fnb: project_revenue_like(fnb_stabilized, macros),
        spa: project_revenue_like(spa_stabilized, macros),
        other: project_revenue_like(other_stabilized, macros),
    }
}
