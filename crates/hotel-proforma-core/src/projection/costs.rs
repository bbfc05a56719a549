use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::macro_series::MacroSeries;
use super::revenue::RevenueStreams;
use super::rooms::RoomsKpis;
use crate::deal::{CostGroup, CostRampToggles, Deal, Department, DriverKind, OpexItem, OpexLine};
use crate::types::{non_negative, pct_to_rate, YearSeries};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// One catalog opex line projected over the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedCost {
    pub line: OpexLine,
    pub values: YearSeries,
}

/// Projected operating costs: every catalog line, plus payroll by
/// department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostProjection {
    /// All catalog lines in catalog order, zero when not captured.
    pub opex: Vec<ProjectedCost>,
    pub payroll: BTreeMap<Department, YearSeries>,
}

impl CostProjection {
    pub fn line(&self, line: OpexLine) -> YearSeries {
        self.opex
            .iter()
            .find(|c| c.line == line)
            .map(|c| c.values)
            .unwrap_or_default()
    }

    pub fn payroll_for(&self, department: Department) -> YearSeries {
        self.payroll.get(&department).copied().unwrap_or_default()
    }

    /// Payroll plus catalog lines owned by `department`.
    pub fn department_total(&self, department: Department) -> YearSeries {
        OpexLine::for_department(department)
            .map(|l| self.line(l))
            .fold(self.payroll_for(department), |acc, s| acc + s)
    }

    pub fn group_total(&self, group: CostGroup) -> YearSeries {
        let opex: YearSeries = self
            .opex
            .iter()
            .filter(|c| c.line.cost_group() == group)
            .map(|c| c.values)
            .sum();
        let payroll: YearSeries = self
            .payroll
            .iter()
            .filter(|(d, _)| d.cost_group() == Some(group))
            .map(|(_, s)| *s)
            .sum();
        opex + payroll
    }
}

/// Volume series a cost driver is applied to.
struct DriverBases<'a> {
    revenue: &'a RevenueStreams,
    total_revenue: YearSeries,
    rooms_sold: YearSeries,
}

fn group_ramped(group: CostGroup, toggles: &CostRampToggles) -> bool {
    match group {
        CostGroup::Departmental => toggles.departmental,
        CostGroup::Undistributed => toggles.undistributed,
        CostGroup::FixedCharges => toggles.other_opex,
        CostGroup::Rent => false,
    }
}

/// Currency costs: `costRamp x inflation` when the group is ramped,
/// otherwise flat across operating years.
fn currency_factor(ramped: bool, macros: &MacroSeries) -> YearSeries {
    if ramped {
        macros.cost_ramp * macros.inflation_index
    } else {
        YearSeries::operating(Decimal::ONE)
    }
}

/// Percentage costs: `costRamp` only. Inflation is already in the revenue.
fn percentage_factor(ramped: bool, macros: &MacroSeries) -> YearSeries {
    if ramped {
        macros.cost_ramp
    } else {
        YearSeries::operating(Decimal::ONE)
    }
}

fn project_item(
    item: &OpexItem,
    group: CostGroup,
    bases: &DriverBases<'_>,
    macros: &MacroSeries,
    toggles: &CostRampToggles,
) -> YearSeries {
    let ramped = group_ramped(group, toggles);
    let pct = |stream: YearSeries| stream.scale(pct_to_rate(item.value)) * percentage_factor(ramped, macros);
    let rate = non_negative(item.value);

    match item.driver {
        DriverKind::PctRoomsRevenue => pct(bases.revenue.rooms),
        DriverKind::PctFnbRevenue => pct(bases.revenue.fnb),
        DriverKind::PctOtherRevenue => pct(bases.revenue.other_operated()),
        DriverKind::PctTotalRevenue => pct(bases.total_revenue),
        DriverKind::PerRoomNight => bases.rooms_sold.scale(rate) * currency_factor(ramped, macros),
        DriverKind::FixedPerMonth => {
            YearSeries::operating(rate * MONTHS_PER_YEAR) * currency_factor(ramped, macros)
        }
        DriverKind::Unknown => {
            tracing::warn!(id = %item.id, "opex item with unknown driver contributes zero");
            YearSeries::zeros()
        }
    }
}

/// Payroll per department: stabilized loaded cost, operating years only,
/// ramped and inflated when the payroll toggle is on.
pub fn project_payroll(deal: &Deal, macros: &MacroSeries) -> BTreeMap<Department, YearSeries> {
    let Some(payroll) = &deal.payroll else {
        return BTreeMap::new();
    };
    let factor = currency_factor(deal.ramp.apply_cost_ramp.payroll, macros);
    payroll
        .cost_by_department()
        .into_iter()
        .map(|(dept, stabilized)| (dept, factor.scale(stabilized)))
        .collect()
}

pub fn project_costs(
    deal: &Deal,
    macros: &MacroSeries,
    rooms: &RoomsKpis,
    revenue: &RevenueStreams,
) -> CostProjection {
    let bases = DriverBases {
        revenue,
        total_revenue: revenue.total(),
        rooms_sold: rooms.rooms_sold,
    };
    let toggles = &deal.ramp.apply_cost_ramp;

    if let Some(model) = &deal.opex {
        for item in model.unrecognised() {
            tracing::warn!(id = %item.id, "unknown opex line contributes zero");
        }
    }

    let opex = OpexLine::ALL
        .into_iter()
        .map(|line| {
            let values = deal
                .opex
                .iter()
                .flat_map(|m| m.items_for(line))
                .map(|item| project_item(item, line.cost_group(), &bases, macros, toggles))
                .sum();
            ProjectedCost { line, values }
        })
        .collect();

    CostProjection {
        opex,
        payroll: project_payroll(deal, macros),
    }
}
