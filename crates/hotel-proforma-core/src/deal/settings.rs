use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{non_negative, pct_to_rate, Money, Multiple, Rate, SeriesOverride, YearKey, MAX_YEAR};

/// Years covered by the explicit ramp curves.
pub const RAMP_YEARS: usize = 4;

// ---------------------------------------------------------------------------
// Ramp & macro
// ---------------------------------------------------------------------------

/// Which cost groups receive the cost ramp and inflation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostRampToggles {
    pub departmental: bool,
    pub undistributed: bool,
    pub other_opex: bool,
    pub payroll: bool,
}

impl Default for CostRampToggles {
    fn default() -> Self {
        Self {
            departmental: true,
            undistributed: true,
            other_opex: true,
            payroll: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RampSettings {
    /// Revenue multipliers for years 1..=4.
    pub revenue_ramp: [Multiple; RAMP_YEARS],
    /// Cost multipliers for years 1..=4.
    pub cost_ramp: [Multiple; RAMP_YEARS],
    /// Topline growth, percent per year, from year 5.
    pub topline_growth_pct: Decimal,
    /// Cost inflation, percent per year, from year 5.
    pub inflation_pct: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_overrides: Option<SeriesOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inflation_overrides: Option<SeriesOverride>,
    /// Annual depreciation as percent of project cost.
    pub depreciation_pct_of_capex: Decimal,
    pub apply_cost_ramp: CostRampToggles,
}

impl Default for RampSettings {
    fn default() -> Self {
        Self {
            revenue_ramp: [Decimal::ONE; RAMP_YEARS],
            cost_ramp: [Decimal::ONE; RAMP_YEARS],
            topline_growth_pct: Decimal::ZERO,
            inflation_pct: Decimal::ZERO,
            growth_overrides: None,
            inflation_overrides: None,
            depreciation_pct_of_capex: Decimal::ZERO,
            apply_cost_ramp: CostRampToggles::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Financing
// ---------------------------------------------------------------------------

/// Which capital goes in first during construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentOrder {
    #[default]
    EquityFirst,
    DebtFirst,
    ProRata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancingSettings {
    pub ltc_pct: Decimal,
    pub investment_order: InvestmentOrder,
    pub interest_rate_pct: Decimal,
    pub loan_term_years: u32,
    pub amortization_years: u32,
    pub interest_only_years: u32,
    pub tax_rate_pct: Decimal,
}

/// Longest loan term, amortization or interest-only period honoured, in years.
pub const MAX_LOAN_YEARS: u32 = 50;

impl FinancingSettings {
    pub fn loan_term(&self) -> u32 {
        self.loan_term_years.min(MAX_LOAN_YEARS)
    }

    /// Amortization period in years; zero means the loan term.
    pub fn amortization(&self) -> u32 {
        match self.amortization_years {
            0 => self.loan_term(),
            years => years.min(MAX_LOAN_YEARS),
        }
    }

    pub fn interest_only(&self) -> u32 {
        self.interest_only_years.min(MAX_LOAN_YEARS)
    }

    /// Whether any period was cut back to `MAX_LOAN_YEARS`.
    pub fn periods_clamped(&self) -> bool {
        [self.loan_term_years, self.amortization_years, self.interest_only_years]
            .iter()
            .any(|&y| y > MAX_LOAN_YEARS)
    }

    pub fn loan_amount(&self, project_cost: Money) -> Money {
        non_negative(project_cost) * pct_to_rate(self.ltc_pct)
    }

    pub fn equity_required(&self, project_cost: Money) -> Money {
        non_negative(project_cost) - self.loan_amount(project_cost)
    }

    pub fn interest_rate(&self) -> Rate {
        pct_to_rate(self.interest_rate_pct)
    }

    pub fn tax_rate(&self) -> Rate {
        pct_to_rate(self.tax_rate_pct)
    }
}

// ---------------------------------------------------------------------------
// Exit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitSettings {
    Sale {
        exit_year: u8,
        exit_cap_rate_pct: Decimal,
        #[serde(default)]
        selling_costs_pct: Decimal,
    },
    Refinance {
        refinance_year: u8,
        ltv_at_refinance_pct: Decimal,
        #[serde(default)]
        refinance_costs_pct: Decimal,
    },
    #[default]
    HoldForever,
}

impl ExitSettings {
    /// Last projected year kept before truncation. Hold-forever keeps the
    /// full horizon; configured years are forced into 1..=10.
    pub fn exit_year(&self) -> YearKey {
        match self {
            ExitSettings::Sale { exit_year, .. } => YearKey::clamped(i64::from((*exit_year).max(1))),
            ExitSettings::Refinance { refinance_year, .. } => {
                YearKey::clamped(i64::from((*refinance_year).max(1)))
            }
            ExitSettings::HoldForever => YearKey::clamped(i64::from(MAX_YEAR)),
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        match self {
            ExitSettings::Sale { .. } => "SALE",
            ExitSettings::Refinance { .. } => "REFINANCE",
            ExitSettings::HoldForever => "HOLD_FOREVER",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_loan_and_equity_split() {
        let fin = FinancingSettings {
            ltc_pct: dec!(60),
            ..FinancingSettings::default()
        };
        assert_eq!(fin.loan_amount(dec!(10000000)), dec!(6000000));
        assert_eq!(fin.equity_required(dec!(10000000)), dec!(4000000));
    }

    #[test]
    fn test_ltc_out_of_range_clamped() {
        let fin = FinancingSettings {
            ltc_pct: dec!(150),
            ..FinancingSettings::default()
        };
        assert_eq!(fin.loan_amount(dec!(100)), dec!(100));
        assert_eq!(fin.equity_required(dec!(100)), Decimal::ZERO);
    }

    #[test]
    fn test_exit_year_resolution() {
        let sale = ExitSettings::Sale {
            exit_year: 7,
            exit_cap_rate_pct: dec!(6.5),
            selling_costs_pct: dec!(3),
        };
        assert_eq!(sale.exit_year().value(), 7);

        let refi = ExitSettings::Refinance {
            refinance_year: 40,
            ltv_at_refinance_pct: dec!(60),
            refinance_costs_pct: dec!(1),
        };
        assert_eq!(refi.exit_year(), YearKey::LAST);
        assert_eq!(ExitSettings::HoldForever.exit_year(), YearKey::LAST);
    }

    #[test]
    fn test_exit_settings_wire_format() {
        let json = r#"{"strategy": "SALE", "exit_year": 5, "exit_cap_rate_pct": "6.5"}"#;
        let exit: ExitSettings = serde_json::from_str(json).unwrap();
        assert_eq!(
            exit,
            ExitSettings::Sale {
                exit_year: 5,
                exit_cap_rate_pct: dec!(6.5),
                selling_costs_pct: Decimal::ZERO,
            }
        );
        let hold: ExitSettings = serde_json::from_str(r#"{"strategy": "HOLD_FOREVER"}"#).unwrap();
        assert_eq!(hold, ExitSettings::HoldForever);
    }

    #[test]
    fn test_partial_ramp_settings_default_missing_fields() {
        let ramp: RampSettings = serde_json::from_str(r#"{"topline_growth_pct": 3}"#).unwrap();
        assert_eq!(ramp.revenue_ramp, [Decimal::ONE; RAMP_YEARS]);
        assert!(ramp.apply_cost_ramp.payroll);
    }
}
