use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::EngineConfig;
use crate::deal::{Deal, RoomTypeRate};
use crate::financing::{
    build_debt_schedule, build_sources_uses, calculate_exit_returns_with, reference_ebitda,
    DebtScheduleResult, ExitReturns, SourcesUsesOutput,
};
use crate::pl::{apply_horizon, assemble_rows, find_row, ids, PlRow};
use crate::projection::{project, RevenueStreams, RoomsKpis};
use crate::reader::{load_or_empty, DealReader};
use crate::types::{safe_div, with_metadata, ComputationOutput, Money, YearKey};
use crate::ProformaResult;

/// Debt service coverage for one operating year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtCoverageYear {
    pub year: YearKey,
    pub ebitda: Money,
    pub debt_service: Money,
    /// EBITDA / debt service; zero when there is no debt service.
    pub dscr: Decimal,
}

/// The full pro-forma for one deal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProformaOutput {
    pub deal_id: String,
    pub deal_name: String,
    pub exit_year: YearKey,
    pub project_cost: Money,
    pub cost_per_key: Money,
    pub cost_per_sqm: Money,
    pub kpis: RoomsKpis,
    /// Stabilized ADR split across room types.
    pub rate_mix: Vec<RoomTypeRate>,
    pub revenue: RevenueStreams,
    pub pl: Vec<PlRow>,
    pub debt: DebtScheduleResult,
    pub debt_coverage: Vec<DebtCoverageYear>,
    pub sources_uses: SourcesUsesOutput,
    pub exit: ExitReturns,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the whole pipeline for one deal: projection, P&L, debt, sources and
/// uses, exit. Never fails; problems with the inputs become warnings.
pub fn build_proforma(deal: &Deal, config: &EngineConfig) -> ComputationOutput<ProformaOutput> {
    let start = Instant::now();
    let cfg = config.sanitized();
    let mut warnings = deal.diagnostics();

    let projection = project(deal);
    let exit_year = projection.macros.exit_year;
    let pl = apply_horizon(assemble_rows(deal, &projection, cfg.horizon_years), exit_year);

    let project_cost = deal.project_cost();
    let financing = deal.financing_settings();
    let debt = build_debt_schedule(&financing, project_cost);
    let debt_coverage = debt_coverage(&pl, &debt, exit_year);
    let sources_uses = build_sources_uses(&financing, &deal.capital_budget);

    let (ebitda, fallback) = reference_ebitda(&pl, exit_year, &cfg);
    if fallback {
        warnings.push(fallback_warning(exit_year, &cfg));
    }
    let exit = calculate_exit_returns_with(&deal.exit_settings(), project_cost, ebitda, &cfg);
    warnings.extend(exit.warnings.iter().cloned());

    let baseline = deal.rooms_baseline();
    let output = ProformaOutput {
        deal_id: deal.id.clone(),
        deal_name: deal.name.clone(),
        exit_year,
        project_cost,
        cost_per_key: deal.capital_budget.cost_per_key(deal.total_rooms()),
        cost_per_sqm: deal.capital_budget.cost_per_sqm(deal.gross_floor_area),
        kpis: projection.rooms.truncated(exit_year),
        rate_mix: deal.rooms.rate_mix(baseline.adr),
        revenue: RevenueStreams {
            rooms: projection.revenue.rooms.truncated(exit_year),
            fnb: projection.revenue.fnb.truncated(exit_year),
            spa: projection.revenue.spa.truncated(exit_year),
            other: projection.revenue.other.truncated(exit_year),
        },
        pl,
        debt,
        debt_coverage,
        sources_uses,
        exit,
    };

    tracing::debug!(deal_id = %deal.id, warnings = warnings.len(), "pro-forma built");

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "USALI hotel pro-forma (ramp/growth projection, monthly amortization, cap-rate exit)",
        &serde_json::json!({
            "deal_id": deal.id,
            "horizon_years": cfg.horizon_years,
            "exit_strategy": deal.exit_settings().strategy_name(),
            "exit_year": exit_year.to_string(),
            "refinance_cap_rate": cfg.refinance_cap_rate.to_string(),
            "original_ltc": cfg.original_ltc.to_string(),
        }),
        warnings,
        elapsed,
        output,
    )
}

/// DSCR for operating years 1..=exit. Loan year `n` is paid from operating
/// year `n`.
pub fn debt_coverage(pl: &[PlRow], debt: &DebtScheduleResult, exit_year: YearKey) -> Vec<DebtCoverageYear> {
    let ebitda = find_row(pl, ids::EBITDA).map(PlRow::series).unwrap_or_default();
    YearKey::through(exit_year)
        .filter(|y| y.is_operating())
        .map(|year| {
            let debt_service = debt.debt_service_in_year(u32::from(year.value()));
            let ebitda = ebitda.get(year);
            DebtCoverageYear {
                year,
                ebitda,
                debt_service,
                dscr: safe_div(ebitda, debt_service),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Reader-backed entry points
// ---------------------------------------------------------------------------

/// P&L for a stored deal. A missing deal yields all-zero rows.
pub fn calculate_pl_for(reader: &impl DealReader, deal_id: &str, year_count: u8) -> ProformaResult<Vec<PlRow>> {
    let deal = load_or_empty(reader, deal_id)?;
    Ok(crate::pl::calculate_pl(&deal, year_count))
}

pub fn rooms_kpis_for(reader: &impl DealReader, deal_id: &str) -> ProformaResult<RoomsKpis> {
    let deal = load_or_empty(reader, deal_id)?;
    Ok(crate::projection::rooms_kpis(&deal))
}

pub fn debt_schedule_for(reader: &impl DealReader, deal_id: &str) -> ProformaResult<DebtScheduleResult> {
    let deal = load_or_empty(reader, deal_id)?;
    Ok(build_debt_schedule(&deal.financing_settings(), deal.project_cost()))
}

/// Exit returns for a stored deal, with reference EBITDA read off its P&L.
/// A missing deal uses the default reference EBITDA.
pub fn exit_returns_for(reader: &impl DealReader, deal_id: &str, config: &EngineConfig) -> ProformaResult<ExitReturns> {
    let cfg = config.sanitized();
    let Some(deal) = reader.read_deal(deal_id)? else {
        tracing::warn!(deal_id, "deal not found; using default reference EBITDA");
        let mut out = calculate_exit_returns_with(
            &Default::default(),
            Decimal::ZERO,
            cfg.default_reference_ebitda,
            &cfg,
        );
        out.warnings.push(format!(
            "Deal '{deal_id}' not found; reference EBITDA defaulted to {}",
            cfg.default_reference_ebitda
        ));
        return Ok(out);
    };

    let pl = crate::pl::calculate_pl(&deal, cfg.horizon_years);
    let (ebitda, fallback) = reference_ebitda(&pl, deal.exit_year(), &cfg);
    let mut out = calculate_exit_returns_with(&deal.exit_settings(), deal.project_cost(), ebitda, &cfg);
    if fallback {
        out.warnings.push(fallback_warning(deal.exit_year(), &cfg));
    }
    Ok(out)
}

fn fallback_warning(exit_year: YearKey, cfg: &EngineConfig) -> String {
    format!(
        "Exit year {exit_year} is beyond the {}-year horizon; reference EBITDA defaulted to {}",
        cfg.horizon_years, cfg.default_reference_ebitda
    )
}

pub fn build_proforma_for(
    reader: &impl DealReader,
    deal_id: &str,
    config: &EngineConfig,
) -> ProformaResult<ComputationOutput<ProformaOutput>> {
    let deal = load_or_empty(reader, deal_id)?;
    Ok(build_proforma(&deal, config))
}
