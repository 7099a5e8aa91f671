//! Progressive bracket tax.

use rust_decimal::Decimal;

use crate::config::TaxBracket;

/// Returns the bracket that taxes an amount.
///
/// That is the first bracket whose upper bound is at or above `taxable`, or
/// the last (unbounded) bracket.
pub fn find_bracket(taxable: Decimal, brackets: &[TaxBracket]) -> Option<&TaxBracket> {
    brackets
        .iter()
        .find(|bracket| bracket.upper.is_none_or(|upper| taxable <= upper))
        .or_else(|| brackets.last())
}

/// Calculates annual tax on a taxable amount: `base + (taxable − lower) × rate`.
///
/// Negative amounts are taxed as zero. The brackets are expected to have
/// passed [`crate::config::TaxYearConfig::validate`], which guarantees the
/// result is continuous across bracket boundaries.
///
/// # Examples
///
/// ```
/// use estimator_engine::calculation::bracket_tax;
/// use estimator_engine::config::TaxBracket;
/// use rust_decimal_macros::dec;
///
/// let brackets = vec![
///     TaxBracket { lower: dec!(0), upper: Some(dec!(237100)), base_tax: dec!(0), rate: dec!(0.18) },
///     TaxBracket { lower: dec!(237100), upper: None, base_tax: dec!(42678), rate: dec!(0.26) },
/// ];
///
/// assert_eq!(bracket_tax(dec!(360000), &brackets), dec!(74632));
/// ```
pub fn bracket_tax(taxable: Decimal, brackets: &[TaxBracket]) -> Decimal {
    let taxable = taxable.max(Decimal::ZERO);
    match find_bracket(taxable, brackets) {
        Some(bracket) => bracket.base_tax + (taxable - bracket.lower).max(Decimal::ZERO) * bracket.rate,
        None => Decimal::ZERO,
    }
}
