//! Year-by-year projection of a deal's operating figures.
//!
//! Every series here is full width (y0..y10). The exit horizon is applied
//! by the consumers (`pl`, `proforma`), never during projection.

pub mod costs;
pub mod index;
pub mod macro_series;
pub mod revenue;
pub mod rooms;

use serde::{Deserialize, Serialize};

pub use costs::{project_costs, CostProjection, ProjectedCost};
pub use index::{build_index, RateSource};
pub use macro_series::{resolve_macro, MacroSeries};
pub use revenue::{project_revenue, RevenueStreams};
pub use rooms::{project_rooms, rooms_kpis, RoomsKpis};

use crate::deal::Deal;

/// Everything the P&L assembler reads, projected in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub macros: MacroSeries,
    pub rooms: RoomsKpis,
    pub revenue: RevenueStreams,
    pub costs: CostProjection,
}

pub fn project(deal: &Deal) -> Projection {
    let macros = resolve_macro(deal);
    let rooms = project_rooms(&deal.rooms_baseline(), deal.total_rooms(), &macros);
    let revenue = project_revenue(deal, &macros, &rooms);
    let costs = project_costs(deal, &macros, &rooms, &revenue);

    tracing::debug!(deal_id = %deal.id, exit_year = %macros.exit_year, "projection complete");

    Projection {
        macros,
        rooms,
        revenue,
        costs,
    }
}
