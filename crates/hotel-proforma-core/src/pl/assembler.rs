use rust_decimal::Decimal;

use super::horizon::apply_horizon;
use super::row::{ids, PlRow, RatioBasis, RowBuilder, RowGroup, RowKind};
use crate::deal::{Deal, Department, OpexLine};
use crate::projection::{project, CostProjection, Projection};
use crate::types::{pct_to_rate, YearKey, YearSeries};

const FIXED_CHARGES: [OpexLine; 3] = [OpexLine::ManagementFee, OpexLine::PropertyTax, OpexLine::Insurance];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// USALI P&L for a deal over `y0..=year_count`, truncated at the exit year.
pub fn calculate_pl(deal: &Deal, year_count: u8) -> Vec<PlRow> {
    let projection = project(deal);
    let rows = assemble_rows(deal, &projection, year_count);
    apply_horizon(rows, projection.macros.exit_year)
}

/// Lay out the statement from an existing projection, without horizon
/// truncation.
pub fn assemble_rows(deal: &Deal, projection: &Projection, year_count: u8) -> Vec<PlRow> {
    let last = YearKey::clamped(i64::from(year_count));
    let revenue = &projection.revenue;
    let costs = &projection.costs;
    let kpis = &projection.rooms;
    let total_revenue = revenue.total();

    let b = RowBuilder {
        basis: RatioBasis {
            total_revenue,
            rooms_sold: kpis.rooms_sold,
            keys: deal.total_rooms(),
        },
        last,
    };

    let mut rows = vec![
        b.kpi(ids::ROOMS_OPEN, "Rooms Open", &kpis.rooms_open),
        b.kpi(ids::ROOMS_AVAILABLE, "Rooms Available", &kpis.rooms_available),
        b.kpi(ids::ROOMS_SOLD, "Rooms Sold", &kpis.rooms_sold),
        b.kpi(ids::ADR, "ADR", &kpis.adr),
        b.kpi(ids::OCCUPANCY, "Occupancy", &kpis.occupancy),
        b.kpi(ids::REVPAR, "RevPAR", &kpis.revpar),
        b.row(ids::REV_ROOMS, "Rooms Revenue", RowGroup::Revenue, RowKind::Line, &revenue.rooms),
        b.row(ids::REV_FNB, "F&B Revenue", RowGroup::Revenue, RowKind::Line, &revenue.fnb),
        b.row(ids::REV_SPA, "Spa Revenue", RowGroup::Revenue, RowKind::Line, &revenue.spa),
        b.row(ids::REV_OTHER, "Other Revenue", RowGroup::Revenue, RowKind::Line, &revenue.other),
        b.row(ids::TOTAL_REVENUE, "Total Revenue", RowGroup::Revenue, RowKind::Total, &total_revenue),
    ];

    let mut direct = YearSeries::zeros();
    for dept in Department::OPERATED {
        direct = direct + department_block(&b, costs, &mut rows, dept, RowGroup::Direct);
    }
    rows.push(b.row(ids::TOTAL_DIRECT_COSTS, "Total Direct Costs", RowGroup::Direct, RowKind::Total, &direct));

    let goi = total_revenue - direct;
    rows.push(b.row(ids::GOI, "Gross Operating Income", RowGroup::Summary, RowKind::Subtotal, &goi));

    let mut indirect = YearSeries::zeros();
    for dept in Department::UNDISTRIBUTED {
        indirect = indirect + department_block(&b, costs, &mut rows, dept, RowGroup::Undistributed);
    }
    rows.push(b.row(
        ids::TOTAL_INDIRECT_COSTS,
        "Total Undistributed Expenses",
        RowGroup::Undistributed,
        RowKind::Total,
        &indirect,
    ));

    let gop = goi - indirect;
    rows.push(b.row(ids::GOP, "Gross Operating Profit", RowGroup::Summary, RowKind::Subtotal, &gop));

    let mut fixed = YearSeries::zeros();
    for line in FIXED_CHARGES {
        let values = costs.line(line);
        fixed = fixed + values;
        rows.push(b.row(line.id(), line.label(), RowGroup::Fixed, RowKind::Line, &values));
    }
    rows.push(b.row(ids::TOTAL_FIXED_CHARGES, "Total Fixed Charges", RowGroup::Fixed, RowKind::Total, &fixed));

    let ebitdar = gop - fixed;
    rows.push(b.row(ids::EBITDAR, "EBITDAR", RowGroup::Summary, RowKind::Subtotal, &ebitdar));

    let rent = costs.line(OpexLine::Rent);
    rows.push(b.row(ids::RENT, OpexLine::Rent.label(), RowGroup::Fixed, RowKind::Line, &rent));

    let ebitda = ebitdar - rent;
    rows.push(b.row(ids::EBITDA, "EBITDA", RowGroup::Summary, RowKind::Total, &ebitda));

    let depreciation = depreciation_series(deal);
    let interest = interest_series(deal);
    rows.push(b.row(ids::DEPRECIATION, "Depreciation", RowGroup::Summary, RowKind::Line, &depreciation));
    rows.push(b.row(ids::INTEREST, "Interest", RowGroup::Summary, RowKind::Line, &interest));

    let net_income = ebitda - depreciation - interest;
    rows.push(b.row(ids::NET_INCOME, "Net Income", RowGroup::Summary, RowKind::Total, &net_income));

    let tax_rate = deal.financing_settings().tax_rate();
    let income_tax = net_income.map(|ni| ni.max(Decimal::ZERO) * tax_rate);
    rows.push(b.row(ids::INCOME_TAX, "Income Tax", RowGroup::Summary, RowKind::Line, &income_tax));
    rows.push(b.row(
        ids::NET_INCOME_AFTER_TAX,
        "Net Income After Tax",
        RowGroup::Summary,
        RowKind::Total,
        &(net_income - income_tax),
    ));

    tracing::debug!(deal_id = %deal.id, rows = rows.len(), last = %last, "P&L assembled");
    rows
}

/// Payroll line, catalog lines and subtotal for one department. Returns
/// the subtotal.
fn department_block(
    b: &RowBuilder,
    costs: &CostProjection,
    rows: &mut Vec<PlRow>,
    dept: Department,
    group: RowGroup,
) -> YearSeries {
    rows.push(b.row(
        format!("payroll_{}", dept.key()),
        format!("{} Payroll", dept.label()),
        group,
        RowKind::Line,
        &costs.payroll_for(dept),
    ));
    for line in OpexLine::for_department(dept) {
        rows.push(b.row(line.id(), line.label(), group, RowKind::Line, &costs.line(line)));
    }
    let subtotal = costs.department_total(dept);
    rows.push(b.row(
        format!("total_{}", dept.key()),
        format!("Total {}", dept.label()),
        group,
        RowKind::Subtotal,
        &subtotal,
    ));
    subtotal
}

/// Straight-line depreciation: a flat share of project cost every
/// operating year.
fn depreciation_series(deal: &Deal) -> YearSeries {
    let pct = pct_to_rate(deal.ramp.depreciation_pct_of_capex);
    YearSeries::operating(deal.project_cost() * pct)
}

/// Interest on the full loan amount at the contract rate, flat every
/// operating year. The amortizing view lives in the debt schedule.
fn interest_series(deal: &Deal) -> YearSeries {
    let financing = deal.financing_settings();
    let loan = financing.loan_amount(deal.project_cost());
    YearSeries::operating(loan * financing.interest_rate())
}
