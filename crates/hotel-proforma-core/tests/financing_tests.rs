use hotel_proforma_core::deal::{Deal, ExitSettings, FinancingSettings, InvestmentOrder};
use hotel_proforma_core::financing::{
    build_debt_schedule, build_sources_uses, calculate_exit_returns, calculate_exit_returns_with,
};
use hotel_proforma_core::EngineConfig;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn harbour_hotel() -> Deal {
    serde_json::from_str(include_str!("fixtures/harbour_hotel.json")).unwrap()
}

fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    assert!(
        (actual - expected).abs() < tolerance,
        "expected {expected} +/- {tolerance}, got {actual}"
    );
}

/// Grow `base` at `rate` for `years` periods.
fn compound(base: Decimal, rate: Decimal, years: u32) -> Decimal {
    (0..years).fold(base, |acc, _| acc * (Decimal::ONE + rate))
}

// ===========================================================================
// Debt schedule
// ===========================================================================

#[test]
fn test_balloon_scenario() {
    let financing = FinancingSettings {
        ltc_pct: dec!(100),
        interest_rate_pct: dec!(5.5),
        loan_term_years: 20,
        amortization_years: 25,
        ..FinancingSettings::default()
    };
    let sched = build_debt_schedule(&financing, dec!(1000000));

    assert_close(sched.monthly_payment, dec!(6140.87), dec!(0.01));
    assert!(sched.has_balloon);
    assert_eq!(sched.rows.len(), 240);
    assert_close(sched.balloon_payment, dec!(321492.21), dec!(0.01));

    let repaid: Decimal = sched.rows.iter().map(|r| r.principal).sum();
    assert_close(repaid + sched.balloon_payment, dec!(1000000), dec!(0.0001));
}

#[test]
fn test_fixture_loan_with_interest_only_year() {
    let deal = harbour_hotel();
    let sched = build_debt_schedule(&deal.financing_settings(), deal.project_cost());

    assert_eq!(deal.project_cost(), dec!(5200000));
    assert_eq!(sched.loan_amount, dec!(3120000));
    assert_eq!(sched.interest_only_months, 12);
    assert_close(sched.interest_only_payment, dec!(14300), dec!(0.000001));
    assert_eq!(sched.rows.len(), 120);
    assert!(sched.has_balloon);

    for row in &sched.rows[..12] {
        assert!(row.interest_only);
        assert_eq!(row.principal, Decimal::ZERO);
        assert_eq!(row.closing_balance, dec!(3120000));
    }
    assert!(sched.rows[12].principal > Decimal::ZERO);

    let years = sched.annual_summary();
    assert_eq!(years.len(), 10);
    assert_eq!(years[0].principal, Decimal::ZERO);
    assert_eq!(years[9].closing_balance, sched.balloon_payment);
    assert_eq!(sched.debt_service_in_year(1), years[0].payment);
    assert_eq!(sched.debt_service_in_year(11), Decimal::ZERO);
}

#[test]
fn test_balances_chain() {
    let deal = harbour_hotel();
    let sched = build_debt_schedule(&deal.financing_settings(), deal.project_cost());
    for pair in sched.rows.windows(2) {
        assert_eq!(pair[0].closing_balance, pair[1].opening_balance);
    }
    for row in &sched.rows {
        assert_eq!(row.payment, row.interest + row.principal);
        assert_eq!(row.closing_balance, row.opening_balance - row.principal);
    }
}

// ===========================================================================
// Sources & uses
// ===========================================================================

#[test]
fn test_fixture_sources_and_uses() {
    let deal = harbour_hotel();
    let su = build_sources_uses(&deal.financing_settings(), &deal.capital_budget);

    assert!(su.balanced);
    assert_eq!(su.total_uses, dec!(5200000));
    assert_eq!(su.uses.last(), Some(&("Contingency".to_string(), dec!(200000))));

    let names: Vec<(&str, Decimal, u32)> = su
        .sources
        .iter()
        .map(|s| (s.name.as_str(), s.amount, s.draw_order))
        .collect();
    assert_eq!(
        names,
        vec![("Sponsor Equity", dec!(2080000), 1), ("Senior Loan", dec!(3120000), 2)]
    );
}

#[test]
fn test_debt_first_draws_loan_first() {
    let deal = harbour_hotel();
    let financing = FinancingSettings {
        investment_order: InvestmentOrder::DebtFirst,
        ..deal.financing_settings()
    };
    let su = build_sources_uses(&financing, &deal.capital_budget);
    assert_eq!(su.sources[0].name, "Senior Loan");
    assert_eq!(su.sources[0].share, dec!(0.6));
}

// ===========================================================================
// Exit
// ===========================================================================

#[test]
fn test_sale_scenario() {
    let exit = ExitSettings::Sale {
        exit_year: 5,
        exit_cap_rate_pct: dec!(6.5),
        selling_costs_pct: dec!(3),
    };
    let r = calculate_exit_returns(&exit, dec!(5000000), dec!(500000));
    let sale = r.sale.clone().unwrap();

    assert_close(sale.sale_price, dec!(7692307.69), dec!(0.01));
    assert_close(sale.net_proceeds, dec!(7461538.46), dec!(0.01));
    assert_close(r.irr_unlevered.unwrap(), dec!(0.083357), dec!(0.0001));
    assert_close(r.irr_levered.unwrap(), dec!(0.127298), dec!(0.0001));

    // The unlevered IRR grows the outlay into the net proceeds.
    let grown = compound(dec!(5000000), r.irr_unlevered.unwrap(), 5);
    assert_close(grown, sale.net_proceeds, dec!(1));
}

#[test]
fn test_refinance_ignores_deal_rate_assumptions() {
    let exit = ExitSettings::Refinance {
        refinance_year: 3,
        ltv_at_refinance_pct: dec!(70),
        refinance_costs_pct: dec!(2),
    };
    let default = calculate_exit_returns(&exit, dec!(5000000), dec!(500000));
    let custom = calculate_exit_returns_with(
        &exit,
        dec!(5000000),
        dec!(500000),
        &EngineConfig {
            refinance_cap_rate: dec!(0.08),
            ..EngineConfig::default()
        },
    );
    let refi = custom.refinance.unwrap();
    assert_eq!(refi.property_value, dec!(6250000));
    assert_eq!(refi.new_loan, dec!(4375000));
    assert!(default.refinance.unwrap().property_value > refi.property_value);
}

#[test]
fn test_hold_forever_has_no_proceeds() {
    let r = calculate_exit_returns(&ExitSettings::HoldForever, dec!(5200000), dec!(750000));
    assert!(r.sale.is_none());
    assert!(r.refinance.is_none());
    assert_eq!(r.irr_levered, Some(dec!(0.12)));
    assert_eq!(r.irr_unlevered, Some(dec!(0.08)));
}
