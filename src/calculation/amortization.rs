//! Fixed-payment amortization.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::error::{EngineError, EngineResult};

/// Converts an annual nominal rate to the monthly rate used for instalments.
pub fn monthly_rate(annual_rate: Decimal) -> Decimal {
    annual_rate / dec!(12)
}

/// Calculates the level instalment that amortises a loan.
///
/// `future_value` is the residual (balloon) still owed after the last
/// instalment and is paid separately, so the instalments amortise
/// `present_value − future_value / (1 + r)^n`.
///
/// - `r = 0`: `(present_value − future_value) / n`, exactly.
/// - otherwise: `r × (present_value − future_value / (1 + r)^n) / (1 − (1 + r)^−n)`.
///
/// When `(1 + r)^n` is too large to represent the discount factor is
/// treated as zero and the instalment is the interest-only perpetuity
/// `r × present_value`.
///
/// # Errors
///
/// [`EngineError::InvalidTerm`] when `term_months` is zero, and
/// [`EngineError::AmountOutOfRange`] when the instalment does not fit in a
/// `Decimal`.
///
/// # Examples
///
/// ```
/// use estimator_engine::calculation::monthly_payment;
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
///
/// let payment = monthly_payment(dec!(100000), dec!(0.02), 60, Decimal::ZERO).unwrap();
/// assert_eq!(payment.round_dp(2), dec!(2876.80));
///
/// let interest_free = monthly_payment(dec!(1200), Decimal::ZERO, 12, Decimal::ZERO).unwrap();
/// assert_eq!(interest_free, dec!(100));
/// ```
pub fn monthly_payment(
    present_value: Decimal,
    monthly_rate: Decimal,
    term_months: u32,
    future_value: Decimal,
) -> EngineResult<Decimal> {
    if term_months == 0 {
        return Err(EngineError::InvalidTerm);
    }

    let periods = Decimal::from(term_months);
    if monthly_rate.is_zero() {
        return present_value
            .checked_sub(future_value)
            .map(|net| net / periods)
            .ok_or(EngineError::AmountOutOfRange);
    }

    let growth = match Decimal::ONE
        .checked_add(monthly_rate)
        .and_then(|base| base.checked_powi(i64::from(term_months)))
    {
        Some(growth) if !growth.is_zero() => growth,
        _ => {
            return monthly_rate
                .checked_mul(present_value)
                .ok_or(EngineError::AmountOutOfRange);
        }
    };

    let annuity_factor = Decimal::ONE
        .checked_div(growth)
        .and_then(|discount| Decimal::ONE.checked_sub(discount))
        .ok_or(EngineError::AmountOutOfRange)?;
    if annuity_factor.is_zero() {
        // Rate too small to register over the term.
        return present_value
            .checked_sub(future_value)
            .map(|net| net / periods)
            .ok_or(EngineError::AmountOutOfRange);
    }

    future_value
        .checked_div(growth)
        .and_then(|discounted| present_value.checked_sub(discounted))
        .and_then(|amortised| monthly_rate.checked_mul(amortised))
        .and_then(|interest| interest.checked_div(annuity_factor))
        .ok_or(EngineError::AmountOutOfRange)
}

/// Interest paid over the life of a loan: instalments plus balloon less principal.
///
/// Never negative.
pub fn total_interest(
    instalment: Decimal,
    term_months: u32,
    balloon: Decimal,
    principal: Decimal,
) -> Decimal {
    (instalment * Decimal::from(term_months) + balloon - principal).max(Decimal::ZERO)
}
