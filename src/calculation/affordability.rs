//! Affordability policy: living expense floor, disposable income and DTI.

use rust_decimal::Decimal;

use crate::config::{AffordabilityPolicy, ExpenseFloorBand};
use crate::models::{DtiBand, LoanDecision};

/// Returns the minimum reasonable monthly living expense for a household.
///
/// The band is the first whose `max_gross` is at or above the gross income,
/// falling back to the last band. Each dependant adds the band's
/// `per_dependant` amount.
///
/// # Arguments
///
/// * `gross_monthly_income` - Gross monthly income used to select the band
/// * `dependants` - Number of dependants in the household
/// * `bands` - Floor bands in ascending income order
pub fn living_expense_floor(
    gross_monthly_income: Decimal,
    dependants: u32,
    bands: &[ExpenseFloorBand],
) -> Decimal {
    let band = bands
        .iter()
        .find(|band| band.max_gross.is_none_or(|max| gross_monthly_income <= max))
        .or_else(|| bands.last());

    match band {
        Some(band) => band.base + band.per_dependant * Decimal::from(dependants),
        None => Decimal::ZERO,
    }
}

/// Net income left after expenses and existing debt, floored at zero.
pub fn disposable_income(
    net_monthly_income: Decimal,
    expenses_used: Decimal,
    other_monthly_debt: Decimal,
) -> Decimal {
    (net_monthly_income - expenses_used - other_monthly_debt).max(Decimal::ZERO)
}

/// Post-loan debt-to-income ratio.
///
/// Incomes below one rand are treated as one rand so the ratio stays finite.
///
/// # Examples
///
/// ```
/// use estimator_engine::calculation::debt_to_income;
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(debt_to_income(dec!(3000), dec!(1500), dec!(15000)), dec!(0.3));
/// assert_eq!(debt_to_income(dec!(100), Decimal::ZERO, Decimal::ZERO), dec!(100));
/// ```
pub fn debt_to_income(
    total_monthly_instalment: Decimal,
    other_monthly_debt: Decimal,
    gross_monthly_income: Decimal,
) -> Decimal {
    let denominator = gross_monthly_income.max(Decimal::ONE);
    (total_monthly_instalment + other_monthly_debt) / denominator
}

/// Labels a DTI ratio.
pub fn dti_band(dti: Decimal, policy: &AffordabilityPolicy) -> DtiBand {
    if dti < policy.dti_low_band {
        DtiBand::Low
    } else if dti < policy.dti_moderate_band {
        DtiBand::Moderate
    } else {
        DtiBand::High
    }
}

/// Applies the approval policy.
///
/// Declined when the full instalment (including fees) exceeds disposable
/// income or the DTI is above the ceiling; borderline when the DTI is above
/// the borderline threshold; approved otherwise.
pub fn loan_decision(
    total_monthly_instalment: Decimal,
    disposable_income: Decimal,
    dti: Decimal,
    policy: &AffordabilityPolicy,
) -> LoanDecision {
    if total_monthly_instalment > disposable_income || dti > policy.dti_ceiling {
        LoanDecision::Declined
    } else if dti > policy.dti_borderline {
        LoanDecision::Borderline
    } else {
        LoanDecision::Approved
    }
}
