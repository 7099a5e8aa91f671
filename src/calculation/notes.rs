//! Formatting and clamping helpers shared by the orchestrators.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Largest amount, rate or unit count accepted from a caller.
///
/// Inputs above it are clamped with a note, which keeps every product and
/// sum in the calculators well inside `Decimal` range.
pub const MAX_INPUT_AMOUNT: Decimal = dec!(1000000000000000);

/// Formats a rand amount to cents, e.g. `R1050.00`.
pub(crate) fn rand(amount: Decimal) -> String {
    format!("R{:.2}", amount.round_dp(2))
}

/// Formats a count such as days or months, e.g. `7.5`.
pub(crate) fn count(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Formats a decimal rate as a percentage, e.g. `0.2775` as `27.75%`.
pub(crate) fn percent(rate: Decimal) -> String {
    match rate.checked_mul(dec!(100)) {
        Some(pct) => format!("{}%", pct.round_dp(2).normalize()),
        None => format!("{} (as a decimal)", rate.normalize()),
    }
}

fn clamp_input(
    value: Decimal,
    label: &str,
    notes: &mut Vec<String>,
    display: fn(Decimal) -> String,
) -> Decimal {
    if value < Decimal::ZERO {
        notes.push(format!(
            "{label} of {} was negative; using {}",
            display(value),
            display(Decimal::ZERO)
        ));
        Decimal::ZERO
    } else if value > MAX_INPUT_AMOUNT {
        notes.push(format!(
            "{label} of {} exceeds the supported maximum; using {}",
            display(value),
            display(MAX_INPUT_AMOUNT)
        ));
        MAX_INPUT_AMOUNT
    } else {
        value
    }
}

/// Clamps a rand amount to `[0, MAX_INPUT_AMOUNT]`, recording a note when it does.
pub(crate) fn bounded_amount(value: Decimal, label: &str, notes: &mut Vec<String>) -> Decimal {
    clamp_input(value, label, notes, rand)
}

/// Clamps a day or month count to `[0, MAX_INPUT_AMOUNT]`, recording a note when it does.
pub(crate) fn bounded_count(value: Decimal, label: &str, notes: &mut Vec<String>) -> Decimal {
    clamp_input(value, label, notes, count)
}
