//! UIF income replacement rates.

use rust_decimal::Decimal;

use crate::config::ReplacementRates;
use crate::models::ClaimType;

/// Sliding replacement rate for unemployment claims.
///
/// `max − (max − min) × min(1, daily / threshold)`: the full maximum at zero
/// income, falling linearly to the minimum at the threshold and staying
/// there above it. A non-positive threshold pays the minimum.
///
/// # Examples
///
/// ```
/// use estimator_engine::calculation::sliding_replacement_rate;
/// use estimator_engine::config::ReplacementRates;
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
///
/// let rates = ReplacementRates { max_rate: dec!(0.60), min_rate: dec!(0.38), flat_rate: dec!(0.66) };
///
/// assert_eq!(sliding_replacement_rate(Decimal::ZERO, dec!(500), &rates), dec!(0.60));
/// assert_eq!(sliding_replacement_rate(dec!(250), dec!(500), &rates), dec!(0.49));
/// assert_eq!(sliding_replacement_rate(dec!(900), dec!(500), &rates), dec!(0.38));
/// ```
pub fn sliding_replacement_rate(
    daily_remuneration: Decimal,
    threshold: Decimal,
    rates: &ReplacementRates,
) -> Decimal {
    if threshold <= Decimal::ZERO {
        return rates.min_rate;
    }
    let position = (daily_remuneration.max(Decimal::ZERO) / threshold).min(Decimal::ONE);
    rates.max_rate - (rates.max_rate - rates.min_rate) * position
}

/// Replacement rate for a claim: sliding for unemployment, flat otherwise.
pub fn replacement_rate(
    claim_type: ClaimType,
    daily_remuneration: Decimal,
    threshold: Decimal,
    rates: &ReplacementRates,
) -> Decimal {
    if claim_type.uses_sliding_rate() {
        sliding_replacement_rate(daily_remuneration, threshold, rates)
    } else {
        rates.flat_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rates() -> ReplacementRates {
        ReplacementRates {
            max_rate: dec!(0.60),
            min_rate: dec!(0.38),
            flat_rate: dec!(0.66),
        }
    }

    #[test]
    fn test_rate_at_threshold_is_minimum() {
        assert_eq!(sliding_replacement_rate(dec!(500), dec!(500), &rates()), dec!(0.38));
    }

    #[test]
    fn test_rate_decreases_with_income() {
        let low = sliding_replacement_rate(dec!(100), dec!(500), &rates());
        let high = sliding_replacement_rate(dec!(400), dec!(500), &rates());
        assert!(low > high);
        assert!(low <= dec!(0.60) && high >= dec!(0.38));
    }

    #[test]
    fn test_zero_threshold_pays_minimum() {
        assert_eq!(sliding_replacement_rate(dec!(100), Decimal::ZERO, &rates()), dec!(0.38));
    }

    #[test]
    fn test_flat_rate_for_other_claims() {
        for claim in [ClaimType::Illness, ClaimType::Maternity, ClaimType::Adoption, ClaimType::Dependants] {
            assert_eq!(replacement_rate(claim, dec!(100), dec!(500), &rates()), dec!(0.66));
        }
        assert_eq!(
            replacement_rate(ClaimType::Unemployment, Decimal::ZERO, dec!(500), &rates()),
            dec!(0.60)
        );
    }
}
