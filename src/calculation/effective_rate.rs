//! Effective annual rate by bisection over a monthly cash-flow series.
//!
//! Bisection needs no derivative of the NPV, which can be nearly flat when
//! fees dominate the cash flows, and always converges once a sign change is
//! bracketed. The bracket search and the bisection loop are both bounded by
//! [`SolverConfig`], so a series with no root in range terminates with
//! [`EngineError::NoConvergentRate`] instead of spinning.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use tracing::debug;

use crate::config::SolverConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::CashFlowSeries;

/// Builds the cash flows a borrower sees for a loan.
///
/// Time zero is the net amount advanced (after any fee deducted upfront).
/// Each of the `term_months` repayments is the instalment plus the
/// compulsory monthly fee; the balloon is paid with the last repayment.
pub fn build_cash_flows(
    net_advance: Decimal,
    instalment: Decimal,
    monthly_fee: Decimal,
    term_months: u32,
    balloon: Decimal,
) -> CashFlowSeries {
    CashFlowSeries::loan(net_advance, instalment + monthly_fee, term_months)
        .with_final_payment(balloon)
}

/// Net present value of a series at a monthly rate.
///
/// Flows so far out that their discount factor no longer fits in a
/// `Decimal` contribute nothing and are skipped.
pub fn net_present_value(monthly_rate: Decimal, series: &CashFlowSeries) -> Decimal {
    let growth = Decimal::ONE + monthly_rate;
    let mut discount = Decimal::ONE;
    let mut npv = Decimal::ZERO;

    for (period, flow) in series.flows().iter().enumerate() {
        if period > 0 {
            match discount.checked_mul(growth) {
                Some(next) if !next.is_zero() => discount = next,
                _ => break,
            }
        }
        match flow.checked_div(discount) {
            Some(present) => npv += present,
            None => break,
        }
    }

    npv
}

fn same_sign(a: Decimal, b: Decimal) -> bool {
    (a.is_sign_positive() && b.is_sign_positive()) || (a.is_sign_negative() && b.is_sign_negative())
}

/// Solves for the monthly internal rate of return.
///
/// Searches `[lower_bound, upper_bound]`, doubling the upper bound (at most
/// `max_expansions` times, never past `upper_ceiling`) until the NPV changes
/// sign, then bisects until the bracket or the NPV is within `tolerance`.
/// If `max_iterations` is reached first the midpoint of the last bracket is
/// returned as the best approximation.
///
/// # Errors
///
/// [`EngineError::NoConvergentRate`] when the series has fewer than two
/// flows or no sign change can be bracketed.
pub fn monthly_internal_rate(
    series: &CashFlowSeries,
    solver: &SolverConfig,
) -> EngineResult<Decimal> {
    if series.len() < 2 {
        return Err(EngineError::NoConvergentRate);
    }

    let tolerance = solver.tolerance.abs();
    let mut low = solver.lower_bound;
    let mut high = solver.upper_bound.max(low);

    let mut npv_low = net_present_value(low, series);
    if npv_low.abs() <= tolerance {
        return Ok(low);
    }
    let mut npv_high = net_present_value(high, series);

    let mut expansions = 0;
    while same_sign(npv_low, npv_high) {
        if npv_high.abs() <= tolerance {
            return Ok(high);
        }
        if expansions >= solver.max_expansions || high >= solver.upper_ceiling {
            debug!(
                expansions,
                upper = %high,
                "No sign change bracketed for effective rate"
            );
            return Err(EngineError::NoConvergentRate);
        }
        let doubled = if high <= Decimal::ZERO {
            Decimal::ONE
        } else {
            high * dec!(2)
        };
        high = doubled.min(solver.upper_ceiling);
        npv_high = net_present_value(high, series);
        expansions += 1;
    }

    for _ in 0..solver.max_iterations {
        let mid = (low + high) / dec!(2);
        let npv_mid = net_present_value(mid, series);

        if npv_mid.abs() <= tolerance || (high - low) / dec!(2) <= tolerance {
            return Ok(mid);
        }

        if same_sign(npv_low, npv_mid) {
            low = mid;
            npv_low = npv_mid;
        } else {
            high = mid;
        }
    }

    debug!(
        iterations = solver.max_iterations,
        "Effective rate solver hit the iteration cap"
    );
    Ok((low + high) / dec!(2))
}

/// Annualises a monthly rate: `(1 + r)^12 − 1`.
pub fn annualise_monthly_rate(monthly_rate: Decimal) -> Decimal {
    (Decimal::ONE + monthly_rate).powi(12) - Decimal::ONE
}

/// Effective annual rate of a monthly cash-flow series.
///
/// # Examples
///
/// ```
/// use estimator_engine::calculation::{effective_annual_rate, monthly_payment};
/// use estimator_engine::config::SolverConfig;
/// use estimator_engine::models::CashFlowSeries;
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
///
/// let instalment = monthly_payment(dec!(10000), dec!(0.01), 12, Decimal::ZERO).unwrap();
/// let series = CashFlowSeries::loan(dec!(10000), instalment, 12);
///
/// let rate = effective_annual_rate(&series, &SolverConfig::default()).unwrap();
/// assert!((rate - dec!(0.126825)).abs() < dec!(0.0001));
/// ```
pub fn effective_annual_rate(
    series: &CashFlowSeries,
    solver: &SolverConfig,
) -> EngineResult<Decimal> {
    monthly_internal_rate(series, solver).map(annualise_monthly_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::monthly_payment;

    fn series_for(monthly_rate: Decimal) -> CashFlowSeries {
        let instalment = monthly_payment(dec!(100000), monthly_rate, 60, Decimal::ZERO).unwrap();
        CashFlowSeries::loan(dec!(100000), instalment, 60)
    }

    #[test]
    fn test_round_trip_recovers_known_rates() {
        for monthly in [dec!(0), dec!(0.01), dec!(0.05), dec!(0.15)] {
            let rate = effective_annual_rate(&series_for(monthly), &SolverConfig::default()).unwrap();
            let expected = annualise_monthly_rate(monthly);
            assert!(
                (rate - expected).abs() < dec!(0.0001),
                "monthly {monthly}: expected {expected}, got {rate}"
            );
        }
    }

    #[test]
    fn test_fee_raises_effective_rate_above_nominal() {
        let instalment = monthly_payment(dec!(20000), dec!(0.02), 24, Decimal::ZERO).unwrap();
        let series = build_cash_flows(dec!(20000), instalment, dec!(69), 24, Decimal::ZERO);

        let effective = effective_annual_rate(&series, &SolverConfig::default()).unwrap();
        assert!(effective > annualise_monthly_rate(dec!(0.02)));
    }

    #[test]
    fn test_bracket_expands_for_very_high_rates() {
        // 300% a month is outside the initial [0, 2] bracket.
        let instalment = monthly_payment(dec!(1000), dec!(3), 6, Decimal::ZERO).unwrap();
        let series = CashFlowSeries::loan(dec!(1000), instalment, 6);

        let monthly = monthly_internal_rate(&series, &SolverConfig::default()).unwrap();
        assert!((monthly - dec!(3)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_repayments_below_advance_have_no_convergent_rate() {
        // Negative IRR: nothing in [0, ceiling] makes the NPV zero.
        let series = CashFlowSeries::loan(dec!(1000), dec!(50), 10);
        assert_eq!(
            effective_annual_rate(&series, &SolverConfig::default()),
            Err(EngineError::NoConvergentRate)
        );
    }

    #[test]
    fn test_single_flow_has_no_convergent_rate() {
        let series = CashFlowSeries::new(vec![dec!(1000)]);
        assert_eq!(
            monthly_internal_rate(&series, &SolverConfig::default()),
            Err(EngineError::NoConvergentRate)
        );
    }

    #[test]
    fn test_iteration_cap_returns_best_midpoint() {
        let solver = SolverConfig {
            max_iterations: 3,
            ..SolverConfig::default()
        };
        let rate = monthly_internal_rate(&series_for(dec!(0.05)), &solver).unwrap();
        // Three halvings of [0, 2] leave a bracket of width 0.25 around 0.05.
        assert!(rate > Decimal::ZERO && rate < dec!(0.25));
    }

    #[test]
    fn test_npv_at_zero_is_sum_of_flows() {
        let series = CashFlowSeries::new(vec![dec!(100), dec!(-40), dec!(-70)]);
        assert_eq!(net_present_value(Decimal::ZERO, &series), dec!(-10));
    }

    #[test]
    fn test_npv_skips_flows_beyond_representable_discount() {
        let series = CashFlowSeries::loan(dec!(1000), dec!(1), 400);
        let npv = net_present_value(dec!(16), &series);
        assert!(npv > dec!(999) && npv < dec!(1000));
    }
}
