use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::deal::ExitSettings;
use crate::pl::{find_row, ids, PlRow};
use crate::time_value::irr;
use crate::types::{non_negative, pct_to_rate, Money, Rate, YearKey};

/// Sale at a capitalized EBITDA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleProceeds {
    pub sale_price: Money,
    pub selling_costs: Money,
    pub net_proceeds: Money,
}

/// Cash-out refinance against the stabilized value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinanceProceeds {
    pub property_value: Money,
    pub new_loan: Money,
    pub refinance_costs: Money,
    /// New loan net of costs, less the original loan repaid.
    pub net_cash_out: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitReturns {
    pub strategy: String,
    pub exit_year: YearKey,
    pub reference_ebitda: Money,
    /// IRR on equity after the original loan. `None` if it cannot be solved.
    pub irr_levered: Option<Rate>,
    /// IRR on total project cost.
    pub irr_unlevered: Option<Rate>,
    pub development_profit: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale: Option<SaleProceeds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refinance: Option<RefinanceProceeds>,
    pub warnings: Vec<String>,
}

/// EBITDA at the exit year, read off the P&L. Falls back to the configured
/// default when the row is missing or the year was not laid out. The flag
/// reports whether the fallback was used.
pub fn reference_ebitda(rows: &[PlRow], exit_year: YearKey, config: &EngineConfig) -> (Money, bool) {
    match find_row(rows, ids::EBITDA).and_then(|r| r.total_at(exit_year)) {
        Some(ebitda) => (ebitda, false),
        None => (config.default_reference_ebitda, true),
    }
}

/// Exit returns with the standard fixed assumptions.
pub fn calculate_exit_returns(exit: &ExitSettings, project_cost: Money, reference_ebitda: Money) -> ExitReturns {
    calculate_exit_returns_with(exit, project_cost, reference_ebitda, &EngineConfig::default())
}

/// Exit returns for a strategy.
///
/// The refinance valuation cap rate and the original loan-to-cost come from
/// `config`, not from the deal's financing terms. Cash flows are annual:
/// the outlay at year 0 and a single inflow at the exit year.
pub fn calculate_exit_returns_with(
    exit: &ExitSettings,
    project_cost: Money,
    reference_ebitda: Money,
    config: &EngineConfig,
) -> ExitReturns {
    let cfg = config.sanitized();
    let cost = non_negative(project_cost);
    let exit_year = exit.exit_year();
    let original_loan = cost * cfg.original_ltc;
    let equity = cost - original_loan;
    let mut warnings = Vec::new();

    let mut out = ExitReturns {
        strategy: exit.strategy_name().to_string(),
        exit_year,
        reference_ebitda,
        irr_levered: None,
        irr_unlevered: None,
        development_profit: Decimal::ZERO,
        sale: None,
        refinance: None,
        warnings: Vec::new(),
    };

    match exit {
        ExitSettings::Sale {
            exit_cap_rate_pct,
            selling_costs_pct,
            ..
        } => {
            let cap_rate = pct_to_rate(*exit_cap_rate_pct);
            let sale_price = if cap_rate.is_zero() {
                warnings.push("Exit cap rate is zero; sale price set to zero".into());
                Decimal::ZERO
            } else {
                reference_ebitda / cap_rate
            };
            let selling_costs = sale_price * pct_to_rate(*selling_costs_pct);
            let net_proceeds = sale_price - selling_costs;

            out.development_profit = net_proceeds - cost;
            out.irr_unlevered = solve("unlevered", cost, net_proceeds, exit_year, &cfg, &mut warnings);
            out.irr_levered = solve(
                "levered",
                equity,
                net_proceeds - original_loan,
                exit_year,
                &cfg,
                &mut warnings,
            );
            out.sale = Some(SaleProceeds {
                sale_price,
                selling_costs,
                net_proceeds,
            });
        }
        ExitSettings::Refinance {
            ltv_at_refinance_pct,
            refinance_costs_pct,
            ..
        } => {
            let property_value = reference_ebitda / cfg.refinance_cap_rate;
            let new_loan = property_value * pct_to_rate(*ltv_at_refinance_pct);
            let refinance_costs = new_loan * pct_to_rate(*refinance_costs_pct);
            let net_cash_out = new_loan - refinance_costs - original_loan;

            out.development_profit = property_value - cost;
            out.irr_unlevered = solve("unlevered", cost, property_value, exit_year, &cfg, &mut warnings);
            out.irr_levered = solve(
                "levered",
                equity,
                net_cash_out + (property_value - new_loan),
                exit_year,
                &cfg,
                &mut warnings,
            );
            out.refinance = Some(RefinanceProceeds {
                property_value,
                new_loan,
                refinance_costs,
                net_cash_out,
            });
        }
        ExitSettings::HoldForever => {
            out.irr_levered = Some(cfg.hold_irr_levered);
            out.irr_unlevered = Some(cfg.hold_irr_unlevered);
        }
    }

    out.warnings = warnings;
    out
}

/// IRR of `-outlay` at year 0 and `inflow` at `exit_year`.
fn solve(
    label: &str,
    outlay: Money,
    inflow: Money,
    exit_year: YearKey,
    cfg: &EngineConfig,
    warnings: &mut Vec<String>,
) -> Option<Rate> {
    let mut flows = vec![Decimal::ZERO; exit_year.index() + 1];
    flows[0] = -outlay;
    flows[exit_year.index()] += inflow;

    match irr(&flows, cfg.irr_guess) {
        Ok(rate) => Some(rate),
        Err(e) => {
            tracing::warn!(label, error = %e, "exit IRR not available");
            warnings.push(format!("{label} IRR not available: {e}"));
            None
        }
    }
}
