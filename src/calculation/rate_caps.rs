//! Regulatory rate ceilings and fee formulas.
//!
//! Every function here is total: inputs outside the regulated range are
//! clamped, never rejected. Callers compare input against output when they
//! need to tell the user that a cap was applied.

use rust_decimal::Decimal;

use crate::config::{AutoRatePolicy, FeeSchedule, RateCapTable};
use crate::models::LoanProduct;

/// Returns the maximum annual nominal rate for a product.
///
/// For home loans the ceiling is `min(reference + margin, hard_ceiling)`,
/// using the configured default reference rate when none is given, unless a
/// fixed mortgage cap is configured.
pub fn rate_ceiling(
    product: LoanProduct,
    reference_rate: Option<Decimal>,
    caps: &RateCapTable,
) -> Decimal {
    match product {
        LoanProduct::Personal => caps.personal,
        LoanProduct::Vehicle => caps.vehicle,
        LoanProduct::Revolving => caps.revolving,
        LoanProduct::Home => caps.mortgage.ceiling(reference_rate),
    }
}

/// Clamps a requested annual nominal rate to `[0, ceiling]`.
///
/// Capping is idempotent: capping an already capped rate returns it unchanged.
///
/// # Examples
///
/// ```
/// use estimator_engine::calculation::cap_annual_rate;
/// use estimator_engine::config::{MortgageCap, RateCapTable};
/// use estimator_engine::models::LoanProduct;
/// use rust_decimal_macros::dec;
///
/// let caps = RateCapTable {
///     personal: dec!(0.2775),
///     vehicle: dec!(0.2775),
///     revolving: dec!(0.2775),
///     mortgage: MortgageCap {
///         default_reference_rate: dec!(0.0825),
///         margin: dec!(0.12),
///         hard_ceiling: dec!(0.24),
///         fixed_cap: None,
///     },
/// };
///
/// assert_eq!(cap_annual_rate(dec!(0.32), LoanProduct::Personal, None, &caps), dec!(0.2775));
/// assert_eq!(cap_annual_rate(dec!(0.24), LoanProduct::Personal, None, &caps), dec!(0.24));
/// assert_eq!(cap_annual_rate(dec!(0.25), LoanProduct::Home, None, &caps), dec!(0.2025));
/// ```
pub fn cap_annual_rate(
    requested: Decimal,
    product: LoanProduct,
    reference_rate: Option<Decimal>,
    caps: &RateCapTable,
) -> Decimal {
    let ceiling = rate_ceiling(product, reference_rate, caps).max(Decimal::ZERO);
    requested.max(Decimal::ZERO).min(ceiling)
}

/// The monthly service fee actually charged: `min(max(requested, 0), cap)`.
pub fn service_fee_monthly(requested: Decimal, fees: &FeeSchedule) -> Decimal {
    requested
        .max(Decimal::ZERO)
        .min(fees.service_fee_monthly_cap.max(Decimal::ZERO))
}

/// The initiation fee for a product and amount.
///
/// `clamp(base + percent × max(amount − threshold, 0), 0, maximum)`.
pub fn initiation_fee(product: LoanProduct, amount: Decimal, fees: &FeeSchedule) -> Decimal {
    let rule = fees.initiation.get(product);
    let excess = (amount.max(Decimal::ZERO) - rule.threshold).max(Decimal::ZERO);
    let fee = rule.base + rule.percent * excess;
    fee.max(Decimal::ZERO).min(rule.maximum.max(Decimal::ZERO))
}

/// Derives an annual nominal rate from a credit score and pre-loan DTI.
///
/// The result is the product's base rate plus the score band adjustment
/// plus the DTI band adjustment, floored at zero. It is not capped here;
/// callers pass it through [`cap_annual_rate`] like any requested rate.
pub fn auto_annual_rate(
    product: LoanProduct,
    credit_score: u32,
    pre_loan_dti: Decimal,
    policy: &AutoRatePolicy,
) -> Decimal {
    let base = *policy.base_rates.get(product);

    let score_adjustment = policy
        .score_bands
        .iter()
        .find(|band| credit_score >= band.min_score)
        .map(|band| band.adjustment)
        .unwrap_or(policy.below_bands_adjustment);

    let dti_adjustment = policy
        .dti_bands
        .iter()
        .find(|band| band.below.is_none_or(|below| pre_loan_dti < below))
        .map(|band| band.adjustment)
        .unwrap_or(Decimal::ZERO);

    (base + score_adjustment + dti_adjustment).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DtiRateBand, InitiationFeeRule, MortgageCap, ProductTable, ScoreBand};
    use rust_decimal_macros::dec;

    fn caps() -> RateCapTable {
        RateCapTable {
            personal: dec!(0.2775),
            vehicle: dec!(0.2775),
            revolving: dec!(0.2775),
            mortgage: MortgageCap {
                default_reference_rate: dec!(0.0825),
                margin: dec!(0.12),
                hard_ceiling: dec!(0.24),
                fixed_cap: None,
            },
        }
    }

    fn fee_rule(base: Decimal, percent: Decimal, threshold: Decimal, maximum: Decimal) -> InitiationFeeRule {
        InitiationFeeRule {
            base,
            percent,
            threshold,
            maximum,
        }
    }

    fn fees() -> FeeSchedule {
        let unsecured = fee_rule(dec!(165), dec!(0.10), dec!(1000), dec!(1050));
        let none = fee_rule(dec!(0), dec!(0), dec!(0), dec!(0));
        FeeSchedule {
            service_fee_monthly_cap: dec!(69),
            finance_initiation_fee: true,
            initiation: ProductTable {
                personal: unsecured.clone(),
                vehicle: none.clone(),
                home: none,
                revolving: unsecured,
            },
        }
    }

    fn policy() -> AutoRatePolicy {
        AutoRatePolicy {
            base_rates: ProductTable {
                personal: dec!(0.18),
                vehicle: dec!(0.15),
                home: dec!(0.1375),
                revolving: dec!(0.205),
            },
            score_bands: vec![
                ScoreBand { min_score: 780, adjustment: dec!(-0.03) },
                ScoreBand { min_score: 720, adjustment: dec!(-0.015) },
                ScoreBand { min_score: 660, adjustment: dec!(0) },
                ScoreBand { min_score: 600, adjustment: dec!(0.0125) },
                ScoreBand { min_score: 540, adjustment: dec!(0.025) },
            ],
            below_bands_adjustment: dec!(0.04),
            dti_bands: vec![
                DtiRateBand { below: Some(dec!(0.30)), adjustment: dec!(-0.0025) },
                DtiRateBand { below: Some(dec!(0.40)), adjustment: dec!(0) },
                DtiRateBand { below: Some(dec!(0.50)), adjustment: dec!(0.005) },
                DtiRateBand { below: Some(dec!(0.55)), adjustment: dec!(0.01) },
                DtiRateBand { below: None, adjustment: dec!(0.0175) },
            ],
        }
    }

    #[test]
    fn test_rate_below_cap_unchanged() {
        assert_eq!(
            cap_annual_rate(dec!(0.24), LoanProduct::Personal, None, &caps()),
            dec!(0.24)
        );
    }

    #[test]
    fn test_rate_above_cap_clamped() {
        assert_eq!(
            cap_annual_rate(dec!(0.35), LoanProduct::Vehicle, None, &caps()),
            dec!(0.2775)
        );
    }

    #[test]
    fn test_negative_rate_clamped_to_zero() {
        assert_eq!(
            cap_annual_rate(dec!(-0.05), LoanProduct::Revolving, None, &caps()),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_mortgage_cap_defaults_reference_rate() {
        // 8.25% repo + 12% margin
        assert_eq!(
            cap_annual_rate(dec!(0.30), LoanProduct::Home, None, &caps()),
            dec!(0.2025)
        );
    }

    #[test]
    fn test_mortgage_cap_limited_by_hard_ceiling() {
        assert_eq!(
            cap_annual_rate(dec!(0.30), LoanProduct::Home, Some(dec!(0.14)), &caps()),
            dec!(0.24)
        );
    }

    #[test]
    fn test_capping_twice_equals_capping_once() {
        for requested in [dec!(-1), dec!(0), dec!(0.1), dec!(0.2775), dec!(0.5), dec!(3)] {
            for product in [
                LoanProduct::Personal,
                LoanProduct::Vehicle,
                LoanProduct::Home,
                LoanProduct::Revolving,
            ] {
                let once = cap_annual_rate(requested, product, None, &caps());
                let twice = cap_annual_rate(once, product, None, &caps());
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn test_service_fee_capped() {
        assert_eq!(service_fee_monthly(dec!(120), &fees()), dec!(69));
        assert_eq!(service_fee_monthly(dec!(50), &fees()), dec!(50));
        assert_eq!(service_fee_monthly(dec!(-10), &fees()), Decimal::ZERO);
    }

    #[test]
    fn test_initiation_fee_below_threshold_is_base() {
        assert_eq!(
            initiation_fee(LoanProduct::Personal, dec!(800), &fees()),
            dec!(165)
        );
    }

    #[test]
    fn test_initiation_fee_percentage_above_threshold() {
        // 165 + 10% of 4,000
        assert_eq!(
            initiation_fee(LoanProduct::Personal, dec!(5000), &fees()),
            dec!(565)
        );
    }

    #[test]
    fn test_initiation_fee_capped_at_maximum() {
        assert_eq!(
            initiation_fee(LoanProduct::Personal, dec!(100000), &fees()),
            dec!(1050)
        );
    }

    #[test]
    fn test_initiation_fee_zero_schedule() {
        assert_eq!(
            initiation_fee(LoanProduct::Vehicle, dec!(250000), &fees()),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_auto_rate_good_score_low_dti() {
        // 18% - 3% - 0.25%
        assert_eq!(
            auto_annual_rate(LoanProduct::Personal, 800, dec!(0.10), &policy()),
            dec!(0.1475)
        );
    }

    #[test]
    fn test_auto_rate_poor_score_high_dti() {
        // 20.5% + 4% + 1.75%
        assert_eq!(
            auto_annual_rate(LoanProduct::Revolving, 500, dec!(0.60), &policy()),
            dec!(0.2625)
        );
    }

    #[test]
    fn test_auto_rate_band_boundaries_inclusive() {
        assert_eq!(
            auto_annual_rate(LoanProduct::Vehicle, 660, dec!(0.30), &policy()),
            dec!(0.15)
        );
    }
}
