use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::ProformaError;
use crate::types::{Money, Rate};
use crate::ProformaResult;

const CONVERGENCE_THRESHOLD: Decimal = dec!(0.0000001);
const MAX_IRR_ITERATIONS: u32 = 100;
const MAX_BISECTION_ITERATIONS: u32 = 200;
const IRR_RATE_FLOOR: Rate = dec!(-0.99);
const IRR_RATE_CEILING: Rate = dec!(100);

/// Net Present Value of a series of annual cash flows
pub fn npv(rate: Rate, cash_flows: &[Money]) -> ProformaResult<Money> {
    if rate <= dec!(-1) {
        return Err(ProformaError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }

    checked_npv(rate, cash_flows).ok_or_else(|| ProformaError::InvalidInput {
        field: "cash_flows".into(),
        reason: format!("present value overflows at rate {rate}"),
    })
}

/// NPV with every step checked; `None` when a term leaves `Decimal` range.
fn checked_npv(rate: Rate, cash_flows: &[Money]) -> Option<Money> {
    let one_plus_r = Decimal::ONE + rate;
    let mut discount = Decimal::ONE;
    let mut result = Decimal::ZERO;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount = discount.checked_mul(one_plus_r)?;
        }
        result = result.checked_add(cf.checked_div(discount)?)?;
    }
    Some(result)
}

/// NPV and its derivative with respect to the rate, checked like `checked_npv`.
fn checked_npv_with_slope(rate: Rate, cash_flows: &[Money]) -> Option<(Money, Decimal)> {
    let one_plus_r = Decimal::ONE + rate;
    let mut discount = Decimal::ONE;
    let mut value = Decimal::ZERO;
    let mut slope = Decimal::ZERO;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount = discount.checked_mul(one_plus_r)?;
        }
        value = value.checked_add(cf.checked_div(discount)?)?;
        if t > 0 && !cf.is_zero() {
            let weighted = Decimal::from(t as i64).checked_mul(*cf)?;
            let term = weighted.checked_div(discount.checked_mul(one_plus_r)?)?;
            slope = slope.checked_sub(term)?;
        }
    }
    Some((value, slope))
}

/// Internal Rate of Return.
///
/// Newton-Raphson from `guess`, with all arithmetic checked. When a step
/// leaves `Decimal` range or stalls, the root is bracketed on a fixed rate
/// grid and bisected.
pub fn irr(cash_flows: &[Money], guess: Rate) -> ProformaResult<Rate> {
    if cash_flows.len() < 2 {
        return Err(ProformaError::InsufficientData(
            "IRR requires at least 2 cash flows".into(),
        ));
    }
    let has_outflow = cash_flows.iter().any(|cf| cf.is_sign_negative() && !cf.is_zero());
    let has_inflow = cash_flows.iter().any(|cf| cf.is_sign_positive() && !cf.is_zero());
    if !has_outflow || !has_inflow {
        return Err(ProformaError::InsufficientData(
            "IRR requires at least one outflow and one inflow".into(),
        ));
    }

    match newton_irr(cash_flows, guess) {
        Some(rate) => Ok(rate),
        None => {
            tracing::debug!("IRR Newton step failed; bisecting");
            bisect_irr(cash_flows)
        }
    }
}

fn newton_irr(cash_flows: &[Money], guess: Rate) -> Option<Rate> {
    let mut rate = guess.max(IRR_RATE_FLOOR).min(IRR_RATE_CEILING);

    for _ in 0..MAX_IRR_ITERATIONS {
        let (npv_val, dnpv) = checked_npv_with_slope(rate, cash_flows)?;
        if npv_val.abs() < CONVERGENCE_THRESHOLD {
            return Some(rate);
        }
        if dnpv.is_zero() {
            return None;
        }

        rate = rate.checked_sub(npv_val.checked_div(dnpv)?)?;

        // Guard against divergence
        if rate < IRR_RATE_FLOOR {
            rate = IRR_RATE_FLOOR;
        } else if rate > IRR_RATE_CEILING {
            rate = IRR_RATE_CEILING;
        }
    }
    None
}

fn bisect_irr(cash_flows: &[Money]) -> ProformaResult<Rate> {
    let grid = [
        IRR_RATE_FLOOR,
        dec!(-0.9),
        dec!(-0.75),
        dec!(-0.5),
        dec!(-0.25),
        Decimal::ZERO,
        dec!(0.25),
        dec!(0.5),
        Decimal::ONE,
        dec!(2),
        dec!(5),
        dec!(10),
        IRR_RATE_CEILING,
    ];

    let evaluated: Vec<(Rate, Money)> = grid
        .iter()
        .filter_map(|&r| checked_npv(r, cash_flows).map(|v| (r, v)))
        .collect();

    let bracket = evaluated.windows(2).find_map(|w| {
        let ((lo, f_lo), (hi, f_hi)) = (w[0], w[1]);
        if f_lo.is_zero() {
            Some((lo, lo, f_lo))
        } else if f_lo.is_sign_negative() != f_hi.is_sign_negative() {
            Some((lo, hi, f_lo))
        } else {
            None
        }
    });

    let Some((mut lo, mut hi, mut f_lo)) = bracket else {
        return Err(ProformaError::ConvergenceFailure {
            function: "IRR".into(),
            iterations: 0,
            last_delta: evaluated.first().map(|&(_, v)| v).unwrap_or(Decimal::MAX),
        });
    };
    if lo == hi {
        return Ok(lo);
    }

    let mut last = f_lo;
    for _ in 0..MAX_BISECTION_ITERATIONS {
        let mid = (lo + hi) / dec!(2);
        if mid == lo || mid == hi {
            return Ok(mid);
        }
        let Some(f_mid) = checked_npv(mid, cash_flows) else {
            break;
        };
        last = f_mid;
        if f_mid.abs() < CONVERGENCE_THRESHOLD {
            return Ok(mid);
        }
        if f_mid.is_sign_negative() == f_lo.is_sign_negative() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Err(ProformaError::ConvergenceFailure {
        function: "IRR".into(),
        iterations: MAX_BISECTION_ITERATIONS,
        last_delta: last,
    })
}

/// (1 + r)^n by repeated multiplication, exact for integer periods.
pub fn compound_factor(periodic_rate: Rate, periods: u32) -> ProformaResult<Decimal> {
    let growth = Decimal::ONE + periodic_rate;
    let mut compound = Decimal::ONE;
    for _ in 0..periods {
        compound = compound
            .checked_mul(growth)
            .ok_or_else(|| ProformaError::InvalidInput {
                field: "periods".into(),
                reason: format!("compound factor overflows at {periods} periods of {periodic_rate}"),
            })?;
    }
    Ok(compound)
}

/// Level payment that retires `principal` over `periods`:
/// P * r(1+r)^n / ((1+r)^n - 1). Straight-line when the rate is zero.
///
/// When `(1+r)^n` leaves `Decimal` range the factor `(1+r)^n / ((1+r)^n - 1)`
/// is 1 to working precision, so the payment is the interest alone.
pub fn annuity_payment(principal: Money, periodic_rate: Rate, periods: u32) -> ProformaResult<Money> {
    if periods == 0 {
        return Err(ProformaError::DivisionByZero {
            context: "annuity payment over zero periods".into(),
        });
    }

    if periodic_rate.is_zero() {
        return Ok(principal / Decimal::from(periods));
    }

    let interest = principal
        .checked_mul(periodic_rate)
        .ok_or_else(|| ProformaError::InvalidInput {
            field: "principal".into(),
            reason: "periodic interest overflows".into(),
        })?;

    let compound = match compound_factor(periodic_rate, periods) {
        Ok(c) => c,
        Err(_) if periodic_rate.is_sign_positive() => return Ok(interest),
        Err(e) => return Err(e),
    };
    let denominator = compound - Decimal::ONE;

    if denominator.is_zero() {
        return Err(ProformaError::DivisionByZero {
            context: "annuity payment denominator".into(),
        });
    }

    interest
        .checked_mul(compound)
        .and_then(|v| v.checked_div(denominator))
        .or_else(|| interest.checked_div(denominator).and_then(|v| v.checked_mul(compound)))
        .ok_or_else(|| ProformaError::InvalidInput {
            field: "principal".into(),
            reason: "annuity payment overflows".into(),
        })
}
