//! Retirement fund contribution deduction.

use rust_decimal::Decimal;

use crate::config::RetirementLimits;

/// Returns the deductible retirement contribution for the period.
///
/// All amounts are annualised and unscaled. The full-year allowance is
/// `min(contribution, percentage × max(remuneration, taxable_before), ceiling)`
/// and the result is scaled by the proration `factor`.
///
/// # Arguments
///
/// * `contribution` - Annualised contribution to retirement funds
/// * `remuneration` - Annualised remuneration
/// * `taxable_before` - Annualised taxable income before the deduction
/// * `factor` - Proration factor in `[0, 1]`
/// * `limits` - Percentage and rand ceiling for the tax year
///
/// # Examples
///
/// ```
/// use estimator_engine::calculation::retirement_deduction_allowed;
/// use estimator_engine::config::RetirementLimits;
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
///
/// let limits = RetirementLimits { percentage: dec!(0.275), annual_ceiling: dec!(350000) };
///
/// // 27.5% of 400,000 is 110,000
/// let allowed = retirement_deduction_allowed(dec!(150000), dec!(400000), dec!(400000), Decimal::ONE, &limits);
/// assert_eq!(allowed, dec!(110000));
/// ```
pub fn retirement_deduction_allowed(
    contribution: Decimal,
    remuneration: Decimal,
    taxable_before: Decimal,
    factor: Decimal,
    limits: &RetirementLimits,
) -> Decimal {
    let base = remuneration.max(taxable_before).max(Decimal::ZERO);
    let allowed = contribution
        .max(Decimal::ZERO)
        .min(limits.percentage * base)
        .min(limits.annual_ceiling);
    allowed * factor
}
