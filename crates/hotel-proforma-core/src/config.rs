use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate, YearKey, MAX_YEAR};

/// Cap rate used to value the asset at a refinance event, independent of the
/// deal's own exit cap rate.
pub const REFINANCE_VALUATION_CAP_RATE: Rate = dec!(0.065);

/// Loan-to-cost assumed to be outstanding when a refinance repays the
/// original construction loan.
pub const ORIGINAL_LOAN_TO_COST: Rate = dec!(0.40);

/// Reference EBITDA used when the exit-year figure cannot be read off a P&L.
pub const DEFAULT_REFERENCE_EBITDA: Money = dec!(500000);

/// Placeholder returns reported for a hold-forever strategy.
pub const HOLD_PLACEHOLDER_IRR_LEVERED: Rate = dec!(0.12);
pub const HOLD_PLACEHOLDER_IRR_UNLEVERED: Rate = dec!(0.08);

/// Tunables for a projection pass. Defaults reproduce the standard pro-forma.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of projected years laid out in P&L rows (1..=10).
    pub horizon_years: u8,
    pub default_reference_ebitda: Money,
    pub refinance_cap_rate: Rate,
    pub original_ltc: Rate,
    pub hold_irr_levered: Rate,
    pub hold_irr_unlevered: Rate,
    /// Starting guess handed to the IRR solver.
    pub irr_guess: Rate,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            horizon_years: MAX_YEAR,
            default_reference_ebitda: DEFAULT_REFERENCE_EBITDA,
            refinance_cap_rate: REFINANCE_VALUATION_CAP_RATE,
            original_ltc: ORIGINAL_LOAN_TO_COST,
            hold_irr_levered: HOLD_PLACEHOLDER_IRR_LEVERED,
            hold_irr_unlevered: HOLD_PLACEHOLDER_IRR_UNLEVERED,
            irr_guess: dec!(0.10),
        }
    }
}

impl EngineConfig {
    /// Horizon as a year key, forced into 1..=10.
    pub fn horizon(&self) -> YearKey {
        YearKey::clamped(i64::from(self.horizon_years.max(1)))
    }

    /// Copy with out-of-range values pulled back to usable bounds.
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();
        out.horizon_years = self.horizon().value();
        if out.refinance_cap_rate <= Decimal::ZERO {
            out.refinance_cap_rate = REFINANCE_VALUATION_CAP_RATE;
        }
        out.original_ltc = out.original_ltc.clamp(Decimal::ZERO, Decimal::ONE);
        out
    }
}
