//! Partial-period proration for PAYE.
//!
//! Three modes scale annualised income, rebates and credits:
//!
//! - days: `worked / in_period` within a single month
//! - months: `represented / 12` for a partial year
//! - employment dates: converted to months represented in the tax year
//!
//! Every factor is clamped to `[0, 1]`.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::TaxYearConfig;
use crate::models::Proration;

const MONTHS_PER_YEAR: Decimal = dec!(12);

fn clamp_unit(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO).min(Decimal::ONE)
}

/// Counts the calendar months of the tax year touched by an employment period.
///
/// Missing dates default to the tax year boundaries. A partial month counts
/// as a full month. Returns zero when the period does not overlap the year.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use estimator_engine::calculation::months_employed;
/// use estimator_engine::config::ConfigLoader;
/// use rust_decimal_macros::dec;
///
/// let loader = ConfigLoader::load("./config/za").unwrap();
/// let year = loader.config().tax_year("2024/2025").unwrap();
///
/// // Started mid-September: September to February.
/// let from = NaiveDate::from_ymd_opt(2024, 9, 15);
/// assert_eq!(months_employed(from, None, year), dec!(6));
/// ```
pub fn months_employed(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    year: &TaxYearConfig,
) -> Decimal {
    let start = from.unwrap_or(year.start_date).max(year.start_date);
    let end = to.unwrap_or(year.end_date).min(year.end_date);
    if start > end {
        return Decimal::ZERO;
    }

    let months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32 + 1;
    Decimal::from(months).max(Decimal::ZERO).min(MONTHS_PER_YEAR)
}

/// Replaces employment dates with the months they represent.
pub fn resolve_proration(proration: &Proration, year: &TaxYearConfig) -> Proration {
    match proration {
        Proration::Employment { from, to } => Proration::Months {
            represented: months_employed(*from, *to, year),
        },
        other => other.clone(),
    }
}

/// Returns the proration factor in `[0, 1]`.
///
/// - none: 1
/// - days: `worked / in_period`, with the period taken as at least one day
/// - months: `represented / 12`
/// - employment dates: months employed in `year` over 12
pub fn proration_factor(proration: &Proration, year: &TaxYearConfig) -> Decimal {
    match resolve_proration(proration, year) {
        Proration::None => Decimal::ONE,
        Proration::Days { worked, in_period } => clamp_unit(worked / in_period.max(Decimal::ONE)),
        Proration::Months { represented } => clamp_unit(represented / MONTHS_PER_YEAR),
        Proration::Employment { .. } => Decimal::ONE,
    }
}

/// Number of periods the annual tax is spread over.
///
/// Twelve for the full year and for days proration (a single short month of
/// an otherwise normal year); the months represented, at least one, for
/// partial years.
pub fn effective_periods(proration: &Proration, year: &TaxYearConfig) -> Decimal {
    match resolve_proration(proration, year) {
        Proration::Months { represented } => represented
            .max(Decimal::ZERO)
            .min(MONTHS_PER_YEAR)
            .max(Decimal::ONE),
        _ => MONTHS_PER_YEAR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;

    fn year() -> TaxYearConfig {
        let loader = ConfigLoader::load("./config/za").unwrap();
        loader.config().tax_year("2024/2025").unwrap().clone()
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_full_period() {
        let year = year();
        assert_eq!(proration_factor(&Proration::None, &year), Decimal::ONE);
        assert_eq!(effective_periods(&Proration::None, &year), dec!(12));
    }

    #[test]
    fn test_days_factor() {
        let year = year();
        let days = Proration::Days { worked: dec!(15), in_period: dec!(30) };
        assert_eq!(proration_factor(&days, &year), dec!(0.5));
        assert_eq!(effective_periods(&days, &year), dec!(12));
    }

    #[test]
    fn test_days_factor_clamped() {
        let year = year();
        let over = Proration::Days { worked: dec!(40), in_period: dec!(30) };
        let zero_period = Proration::Days { worked: dec!(5), in_period: Decimal::ZERO };
        assert_eq!(proration_factor(&over, &year), Decimal::ONE);
        assert_eq!(proration_factor(&zero_period, &year), Decimal::ONE);
    }

    #[test]
    fn test_months_factor_and_periods() {
        let year = year();
        let months = Proration::Months { represented: dec!(6) };
        assert_eq!(proration_factor(&months, &year), dec!(0.5));
        assert_eq!(effective_periods(&months, &year), dec!(6));
    }

    #[test]
    fn test_months_out_of_range() {
        let year = year();
        let none = Proration::Months { represented: Decimal::ZERO };
        let too_many = Proration::Months { represented: dec!(18) };
        assert_eq!(proration_factor(&none, &year), Decimal::ZERO);
        assert_eq!(effective_periods(&none, &year), Decimal::ONE);
        assert_eq!(proration_factor(&too_many, &year), Decimal::ONE);
        assert_eq!(effective_periods(&too_many, &year), dec!(12));
    }

    #[test]
    fn test_employment_dates_within_year() {
        let year = year();
        // June to November inclusive
        assert_eq!(months_employed(date(2024, 6, 10), date(2024, 11, 30), &year), dec!(6));
    }

    #[test]
    fn test_employment_dates_clipped_to_year() {
        let year = year();
        assert_eq!(months_employed(date(2020, 1, 1), date(2030, 1, 1), &year), dec!(12));
        assert_eq!(months_employed(None, None, &year), dec!(12));
    }

    #[test]
    fn test_employment_outside_year_is_zero() {
        let year = year();
        assert_eq!(months_employed(date(2025, 4, 1), None, &year), Decimal::ZERO);
        let proration = Proration::Employment { from: date(2025, 4, 1), to: None };
        assert_eq!(proration_factor(&proration, &year), Decimal::ZERO);
        assert_eq!(effective_periods(&proration, &year), Decimal::ONE);
    }

    #[test]
    fn test_employment_resolves_to_months() {
        let year = year();
        let proration = Proration::Employment { from: date(2024, 12, 1), to: None };
        assert_eq!(
            resolve_proration(&proration, &year),
            Proration::Months { represented: dec!(3) }
        );
        assert_eq!(proration_factor(&proration, &year), dec!(0.25));
    }
}
