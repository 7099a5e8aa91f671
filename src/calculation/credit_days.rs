//! UIF credit-day accrual.
//!
//! One canonical accrual rate is used everywhere: 7.5 credit days per
//! contribution month of 30 days, which is one credit day for every four
//! days worked.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::config::{ClaimDurationCaps, CreditAccrual};
use crate::models::{ClaimType, ContributionHistory};

/// Accrues credit days: `floor(units × accrual_per_unit)` clamped to `[0, absolute_cap]`.
///
/// # Examples
///
/// ```
/// use estimator_engine::calculation::credit_days;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(credit_days(dec!(36), dec!(7.5), 365), 270);
/// assert_eq!(credit_days(dec!(1000), dec!(0.25), 365), 250);
/// assert_eq!(credit_days(dec!(60), dec!(7.5), 365), 365);
/// assert_eq!(credit_days(dec!(20000000000000000000000000000), dec!(7.5), 365), 365);
/// ```
pub fn credit_days(units: Decimal, accrual_per_unit: Decimal, absolute_cap: u32) -> u32 {
    let accrued = match units.checked_mul(accrual_per_unit) {
        Some(product) => product.floor(),
        None if units.is_sign_negative() == accrual_per_unit.is_sign_negative() => {
            Decimal::from(absolute_cap)
        }
        None => Decimal::ZERO,
    };
    accrued
        .max(Decimal::ZERO)
        .min(Decimal::from(absolute_cap))
        .to_u32()
        .unwrap_or(0)
}

/// Credit days earned by a contribution history.
///
/// Days worked accrue at `credit_days_per_month / days_per_contribution_month`
/// each; months contributed accrue at `credit_days_per_month` each.
pub fn credit_days_for_history(history: ContributionHistory, accrual: &CreditAccrual) -> u32 {
    let (units, per_unit) = match history {
        ContributionHistory::Days(days) => (days, accrual.credit_days_per_day_worked()),
        ContributionHistory::Months(months) => (months, accrual.credit_days_per_month),
    };
    credit_days(units, per_unit, accrual.absolute_cap)
}

/// Longest payable duration, in days, for a claim type.
pub fn claim_type_max_days(claim_type: ClaimType, caps: &ClaimDurationCaps) -> u32 {
    match claim_type {
        ClaimType::Unemployment => caps.unemployment,
        ClaimType::Illness => caps.illness,
        ClaimType::Maternity => caps.maternity,
        ClaimType::Adoption => caps.adoption,
        ClaimType::Dependants => caps.dependants,
    }
}
