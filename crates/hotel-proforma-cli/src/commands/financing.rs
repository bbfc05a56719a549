use clap::Args;
use serde_json::{json, Value};
use std::time::Instant;

use hotel_proforma_core::proforma::{debt_schedule_for, exit_returns_for};
use hotel_proforma_core::with_metadata;

use super::Session;

/// Arguments for the debt schedule
#[derive(Args)]
pub struct DebtArgs {
    /// Collapse the monthly schedule into loan years
    #[arg(long)]
    pub annual: bool,
}

pub fn run_debt(session: &Session, args: DebtArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let schedule = debt_schedule_for(&session.deals, &session.deal_id)?;
    let assumptions = json!({ "deal_id": session.deal_id, "annual": args.annual });
    let methodology = "Monthly fixed-rate amortization with interest-only lead-in and balloon at maturity";

    let mut result = serde_json::to_value(&schedule)?;
    if args.annual {
        if let Value::Object(map) = &mut result {
            map.insert("rows".into(), serde_json::to_value(schedule.annual_summary())?);
        }
    }

    let output = with_metadata(
        methodology,
        &assumptions,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_exit(session: &Session) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let returns = exit_returns_for(&session.deals, &session.deal_id, &session.config)?;
    let warnings = returns.warnings.clone();
    let output = with_metadata(
        "Cap-rate exit valuation with annual IRR on a single terminal flow",
        &json!({
            "deal_id": session.deal_id,
            "refinance_cap_rate": session.config.refinance_cap_rate.to_string(),
            "original_ltc": session.config.original_ltc.to_string(),
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        returns,
    );
    Ok(serde_json::to_value(output)?)
}
