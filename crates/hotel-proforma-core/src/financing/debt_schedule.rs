use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::deal::FinancingSettings;
use crate::time_value::annuity_payment;
use crate::types::{Money, Rate};

const MONTHS_PER_YEAR: u32 = 12;

/// A single month in the amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtScheduleRow {
    pub month: u32,
    /// Loan year, 1-based.
    pub year: u32,
    pub opening_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
    pub interest_only: bool,
}

/// Monthly rows rolled up to one loan year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualDebtService {
    pub year: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtScheduleResult {
    pub loan_amount: Money,
    pub monthly_rate: Rate,
    pub interest_only_months: u32,
    pub interest_only_payment: Money,
    /// Level payment once the interest-only period ends.
    pub monthly_payment: Money,
    /// Twelve stabilized monthly payments.
    pub annual_debt_service: Money,
    /// Balance outstanding at maturity when amortization outruns the term.
    pub balloon_payment: Money,
    pub has_balloon: bool,
    pub total_interest: Money,
    pub rows: Vec<DebtScheduleRow>,
}

impl DebtScheduleResult {
    fn empty(loan_amount: Money, monthly_rate: Rate) -> Self {
        DebtScheduleResult {
            loan_amount,
            monthly_rate,
            interest_only_months: 0,
            interest_only_payment: Decimal::ZERO,
            monthly_payment: Decimal::ZERO,
            annual_debt_service: Decimal::ZERO,
            balloon_payment: Decimal::ZERO,
            has_balloon: false,
            total_interest: Decimal::ZERO,
            rows: Vec::new(),
        }
    }

    pub fn annual_summary(&self) -> Vec<AnnualDebtService> {
        let mut years: Vec<AnnualDebtService> = Vec::new();
        for row in &self.rows {
            match years.last_mut() {
                Some(last) if last.year == row.year => {
                    last.payment += row.payment;
                    last.interest += row.interest;
                    last.principal += row.principal;
                    last.closing_balance = row.closing_balance;
                }
                _ => years.push(AnnualDebtService {
                    year: row.year,
                    payment: row.payment,
                    interest: row.interest,
                    principal: row.principal,
                    closing_balance: row.closing_balance,
                }),
            }
        }
        years
    }

    /// Total payments falling in loan year `year`; zero outside the schedule.
    pub fn debt_service_in_year(&self, year: u32) -> Money {
        self.rows
            .iter()
            .filter(|r| r.year == year)
            .map(|r| r.payment)
            .sum()
    }
}

/// Build a monthly fixed-rate amortization schedule.
///
/// The loan is `project_cost x LTC`. Interest-only months pay `loan x r`;
/// afterwards a level annuity retires the balance over the remaining
/// amortization months. The schedule stops at the earlier of maturity and
/// full amortization; whatever is left at maturity is the balloon.
pub fn build_debt_schedule(financing: &FinancingSettings, project_cost: Money) -> DebtScheduleResult {
    let loan = financing.loan_amount(project_cost);
    let monthly_rate = financing.interest_rate() / dec!(12);

    let term_months = financing.loan_term() * MONTHS_PER_YEAR;
    let amort_months = financing.amortization() * MONTHS_PER_YEAR;

    if loan.is_zero() || term_months == 0 {
        return DebtScheduleResult::empty(loan, monthly_rate);
    }

    let io_months = (financing.interest_only() * MONTHS_PER_YEAR).min(amort_months);
    let amortizing_months = amort_months - io_months;
    let io_payment = loan * monthly_rate;

    let monthly_payment = if amortizing_months == 0 {
        io_payment
    } else {
        match annuity_payment(loan, monthly_rate, amortizing_months) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "annuity payment unavailable; using zero");
                Decimal::ZERO
            }
        }
    };

    let schedule_months = term_months.min(amort_months);
    let mut rows = Vec::with_capacity(schedule_months as usize);
    let mut balance = loan;
    let mut total_interest = Decimal::ZERO;

    for month in 1..=schedule_months {
        let opening = balance;
        let interest = opening * monthly_rate;
        let interest_only = month <= io_months;

        let mut principal = if interest_only {
            Decimal::ZERO
        } else {
            (monthly_payment - interest).max(Decimal::ZERO).min(opening)
        };
        if month == amort_months {
            principal = opening;
        }

        balance = opening - principal;
        total_interest += interest;
        rows.push(DebtScheduleRow {
            month,
            year: (month - 1) / MONTHS_PER_YEAR + 1,
            opening_balance: opening,
            payment: interest + principal,
            interest,
            principal,
            closing_balance: balance,
            interest_only,
        });
    }

    let has_balloon = amort_months > term_months;
    let balloon_payment = if has_balloon { balance } else { Decimal::ZERO };

    tracing::debug!(
        loan = %loan,
        monthly_payment = %monthly_payment,
        balloon = %balloon_payment,
        months = schedule_months,
        "debt schedule built"
    );

    DebtScheduleResult {
        loan_amount: loan,
        monthly_rate,
        interest_only_months: io_months,
        interest_only_payment: io_payment,
        monthly_payment,
        annual_debt_service: monthly_payment * Decimal::from(MONTHS_PER_YEAR),
        balloon_payment,
        has_balloon,
        total_interest,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn financing(rate: Decimal, term: u32, amort: u32, io: u32) -> FinancingSettings {
        FinancingSettings {
            ltc_pct: dec!(100),
            interest_rate_pct: rate,
            loan_term_years: term,
            amortization_years: amort,
            interest_only_years: io,
            ..FinancingSettings::default()
        }
    }

    #[test]
    fn test_balloon_when_amortization_outruns_term() {
        let sched = build_debt_schedule(&financing(dec!(5.5), 20, 25, 0), dec!(1000000));
        assert_eq!(sched.loan_amount, dec!(1000000));
        assert!((sched.monthly_payment - dec!(6140.87)).abs() < dec!(0.01));
        assert!(sched.has_balloon);
        assert_eq!(sched.rows.len(), 240);
        assert_eq!(sched.balloon_payment, sched.rows[239].closing_balance);
        assert!((sched.balloon_payment - dec!(321492.21)).abs() < dec!(0.01));
        assert_eq!(sched.annual_debt_service, sched.monthly_payment * dec!(12));
    }

    #[test]
    fn test_fully_amortizing_loan_has_no_balloon() {
        let sched = build_debt_schedule(&financing(dec!(6.5), 30, 30, 0), dec!(750000));
        assert!(!sched.has_balloon);
        assert_eq!(sched.balloon_payment, Decimal::ZERO);
        assert_eq!(sched.rows.len(), 360);
        assert_eq!(sched.rows[359].closing_balance, Decimal::ZERO);
        assert!((sched.monthly_payment - dec!(4740.51)).abs() < dec!(0.01));
    }

    #[test]
    fn test_interest_only_period() {
        let sched = build_debt_schedule(&financing(dec!(6), 10, 10, 2), dec!(1000000));
        assert_eq!(sched.interest_only_months, 24);
        assert_eq!(sched.interest_only_payment, dec!(5000));
        for row in &sched.rows[..24] {
            assert!(row.interest_only);
            assert_eq!(row.payment, dec!(5000));
            assert_eq!(row.closing_balance, dec!(1000000));
        }
        assert!(!sched.rows[24].interest_only);
        assert!(sched.monthly_payment > dec!(5000));
        assert_eq!(sched.rows.last().unwrap().closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_interest_only_to_maturity_repays_at_end() {
        let sched = build_debt_schedule(&financing(dec!(6), 5, 5, 5), dec!(100000));
        assert_eq!(sched.monthly_payment, dec!(500));
        let last = sched.rows.last().unwrap();
        assert_eq!(last.principal, dec!(100000));
        assert_eq!(last.closing_balance, Decimal::ZERO);
        assert!(!sched.has_balloon);
    }

    #[test]
    fn test_zero_rate_straight_line() {
        let sched = build_debt_schedule(&financing(Decimal::ZERO, 1, 1, 0), dec!(1200));
        assert_eq!(sched.monthly_payment, dec!(100));
        assert!(sched.rows.iter().all(|r| r.interest.is_zero()));
        assert_eq!(sched.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_missing_amortization_uses_term() {
        let sched = build_debt_schedule(&financing(dec!(5), 10, 0, 0), dec!(500000));
        assert_eq!(sched.rows.len(), 120);
        assert!(!sched.has_balloon);
    }

    #[test]
    fn test_no_loan_gives_empty_schedule() {
        let mut f = financing(dec!(5), 10, 25, 0);
        f.ltc_pct = Decimal::ZERO;
        let sched = build_debt_schedule(&f, dec!(1000000));
        assert!(sched.rows.is_empty());
        assert_eq!(sched.annual_debt_service, Decimal::ZERO);
        assert!(!sched.has_balloon);

        let sched = build_debt_schedule(&financing(dec!(5), 0, 0, 0), dec!(1000000));
        assert!(sched.rows.is_empty());
    }

    #[test]
    fn test_annual_summary_rolls_up_months() {
        let sched = build_debt_schedule(&financing(dec!(5.5), 20, 25, 0), dec!(1000000));
        let years = sched.annual_summary();
        assert_eq!(years.len(), 20);
        assert_eq!(years[0].year, 1);
        assert_eq!(years[0].payment, sched.debt_service_in_year(1));
        assert_eq!(years[19].closing_balance, sched.balloon_payment);
        let principal: Decimal = years.iter().map(|y| y.principal).sum();
        assert!((principal - (sched.loan_amount - sched.balloon_payment)).abs() < dec!(0.000001));
        assert_eq!(sched.debt_service_in_year(21), Decimal::ZERO);
    }

    #[test]
    fn test_periods_capped_at_fifty_years() {
        let sched = build_debt_schedule(&financing(dec!(5), 400_000_000, 0, u32::MAX), dec!(100000));
        assert_eq!(sched.rows.len(), 600);
        assert_eq!(sched.interest_only_months, 600);
        assert_eq!(sched.rows.last().unwrap().closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_extreme_rate_and_amortization_do_not_overflow() {
        let sched = build_debt_schedule(&financing(dec!(100), 10, 90, 0), dec!(1000000));
        assert_eq!(sched.rows.len(), 120);
        // Fifty-year amortization at 100% barely retires principal
        assert!(sched.has_balloon);
        assert!(sched.monthly_payment >= sched.interest_only_payment);
        assert!(sched.balloon_payment > dec!(999999));
    }
}
