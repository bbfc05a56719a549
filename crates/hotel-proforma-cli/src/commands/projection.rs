use clap::Args;
use serde_json::{json, Value};
use std::time::Instant;

use hotel_proforma_core::proforma::{build_proforma_for, calculate_pl_for, rooms_kpis_for};
use hotel_proforma_core::with_metadata;

use super::Session;

/// Arguments for the P&L statement
#[derive(Args)]
pub struct PlArgs {
    /// Last projection year to lay out (0-10); defaults to the configured horizon
    #[arg(long)]
    pub years: Option<u8>,
}

pub fn run_pl(session: &Session, args: PlArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let years = args.years.unwrap_or(session.config.horizon_years).min(10);
    let rows = calculate_pl_for(&session.deals, &session.deal_id, years)?;
    let output = with_metadata(
        "USALI departmental P&L truncated at the exit year",
        &json!({ "deal_id": session.deal_id, "years": years }),
        Vec::new(),
        start.elapsed().as_micros() as u64,
        rows,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_kpis(session: &Session) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let kpis = rooms_kpis_for(&session.deals, &session.deal_id)?;
    let output = with_metadata(
        "Rooms KPIs: keys x 365, ramped occupancy, grown ADR",
        &json!({ "deal_id": session.deal_id }),
        Vec::new(),
        start.elapsed().as_micros() as u64,
        kpis,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_proforma(session: &Session) -> Result<Value, Box<dyn std::error::Error>> {
    let output = build_proforma_for(&session.deals, &session.deal_id, &session.config)?;
    Ok(serde_json::to_value(output)?)
}
