//! The deal record: every assumption the projection reads.
//!
//! A `Deal` is loaded once per calculation pass and never written back.
//! All blocks are optional or defaulted so that a partially captured deal
//! still projects (to zeros where inputs are missing).

pub mod budget;
pub mod department;
pub mod fnb;
pub mod opex;
pub mod other_revenue;
pub mod payroll;
pub mod rooms;
pub mod settings;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use budget::{BudgetLine, CapitalBudget, CapitalBudgetSimple};
pub use department::{CostGroup, Department};
pub use fnb::{FnbModel, FnbSimple, MealPeriod};
pub use opex::{DriverKind, OpexItem, OpexLine, OpexModel};
pub use other_revenue::{OtherRevenueDriver, OtherRevenueModel, SpaModel};
pub use payroll::{DepartmentHeadcount, PayrollModel, PayrollRole, PayrollSimple};
pub use rooms::{MonthlyRoomRow, RoomInventory, RoomRevenueModel, RoomType, RoomTypeRate, RoomsBaseline};
pub use settings::{
    CostRampToggles, ExitSettings, FinancingSettings, InvestmentOrder, RampSettings, MAX_LOAN_YEARS,
    RAMP_YEARS,
};

use crate::types::{Currency, Money, YearKey};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub currency: Currency,
    /// Gross floor area in square metres.
    #[serde(default)]
    pub gross_floor_area: Decimal,
    #[serde(default)]
    pub rooms: RoomInventory,
    #[serde(default)]
    pub capital_budget: CapitalBudget,
    #[serde(default)]
    pub ramp: RampSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financing: Option<FinancingSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit: Option<ExitSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_revenue: Option<RoomRevenueModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fnb: Option<FnbModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_revenue: Option<OtherRevenueModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opex: Option<OpexModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payroll: Option<PayrollModel>,
}

impl Deal {
    /// A deal with nothing captured. Projects to all-zero output.
    pub fn empty(id: impl Into<String>) -> Self {
        Deal {
            id: id.into(),
            ..Deal::default()
        }
    }

    pub fn total_rooms(&self) -> Decimal {
        self.rooms.total_rooms()
    }

    pub fn project_cost(&self) -> Money {
        self.capital_budget.project_cost()
    }

    pub fn exit_settings(&self) -> ExitSettings {
        self.exit.clone().unwrap_or_default()
    }

    pub fn exit_year(&self) -> YearKey {
        self.exit_settings().exit_year()
    }

    pub fn financing_settings(&self) -> FinancingSettings {
        self.financing.clone().unwrap_or_default()
    }

    pub fn rooms_baseline(&self) -> RoomsBaseline {
        self.room_revenue
            .as_ref()
            .map(|m| m.baseline(self.total_rooms()))
            .unwrap_or_default()
    }

    /// Human-readable notes on inputs the engine will clamp or ignore.
    pub fn diagnostics(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let pct_out_of_range = |v: Decimal| v < Decimal::ZERO || v > Decimal::ONE_HUNDRED;

        if self.rooms.0.iter().any(|r| r.count < 0) {
            warnings.push("Negative room counts treated as zero".into());
        }
        if self.total_rooms().is_zero() {
            warnings.push("Deal has no rooms; rooms KPIs and per-room ratios are zero".into());
        }

        match &self.room_revenue {
            None => warnings.push("No room revenue model; rooms revenue is zero".into()),
            Some(model) => {
                if model.months.len() != 12 {
                    warnings.push(format!(
                        "Room revenue model has {} monthly rows; expected 12",
                        model.months.len()
                    ));
                }
                if model.months.iter().any(|m| pct_out_of_range(m.occupancy_pct)) {
                    warnings.push("Monthly occupancy outside 0-100% clamped".into());
                }
                if model.months.iter().any(|m| m.adr < Decimal::ZERO) {
                    warnings.push("Negative monthly ADR treated as zero".into());
                }
            }
        }

        if self
            .ramp
            .revenue_ramp
            .iter()
            .chain(self.ramp.cost_ramp.iter())
            .any(|m| *m < Decimal::ZERO)
        {
            warnings.push("Negative ramp multipliers treated as zero".into());
        }

        if let Some(opex) = &self.opex {
            for item in opex.unrecognised() {
                warnings.push(format!("Unknown opex line '{}' ignored", item.id));
            }
            for item in opex.items.iter().filter(|i| i.driver == DriverKind::Unknown) {
                warnings.push(format!("Opex line '{}' has an unknown driver; ignored", item.id));
            }
            for item in opex
                .items
                .iter()
                .filter(|i| i.driver.is_percentage() && pct_out_of_range(i.value))
            {
                warnings.push(format!("Opex line '{}' percentage outside 0-100% clamped", item.id));
            }
        }

        if let Some(payroll) = &self.payroll {
            let unknown = payroll
                .roles
                .iter()
                .filter(|r| r.department == Department::Unknown)
                .count();
            if unknown > 0 {
                warnings.push(format!("{unknown} payroll role(s) with unknown department ignored"));
            }
        }

        if let Some(fin) = &self.financing {
            if pct_out_of_range(fin.ltc_pct) {
                warnings.push("Loan-to-cost outside 0-100% clamped".into());
            }
            if fin.loan_term_years > 0 && fin.amortization_years == 0 {
                warnings.push("No amortization period; loan amortizes over its term".into());
            }
            if fin.periods_clamped() {
                warnings.push(format!("Loan periods longer than {MAX_LOAN_YEARS} years clamped"));
            }
        }

        match &self.exit {
            Some(ExitSettings::Sale {
                exit_year,
                exit_cap_rate_pct,
                ..
            }) => {
                if *exit_cap_rate_pct <= Decimal::ZERO {
                    warnings.push("Exit cap rate is zero; sale price reported as zero".into());
                }
                if !(1..=10).contains(exit_year) {
                    warnings.push(format!("Exit year {exit_year} outside 1-10 clamped"));
                }
            }
            Some(ExitSettings::Refinance { refinance_year, .. }) if !(1..=10).contains(refinance_year) => {
                warnings.push(format!("Refinance year {refinance_year} outside 1-10 clamped"));
            }
            _ => {}
        }

        warnings
    }
}
