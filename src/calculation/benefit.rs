//! UIF benefit estimate orchestration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::credit_days::{claim_type_max_days, credit_days_for_history};
use super::notes::{bounded_amount, bounded_count, rand};
use super::replacement_rate::replacement_rate;
use crate::config::{ContributionRates, EngineConfig};
use crate::models::{BenefitRequest, BenefitResult, ClaimType, ContributionHistory, UifContributions};

/// Monthly UIF contributions on capped remuneration.
pub fn uif_contributions(capped_remuneration: Decimal, rates: &ContributionRates) -> UifContributions {
    let employee = capped_remuneration * rates.employee;
    let employer = capped_remuneration * rates.employer;
    UifContributions {
        employee: employee.round_dp(2),
        employer: employer.round_dp(2),
        total: (employee + employer).round_dp(2),
    }
}

fn claim_label(claim_type: ClaimType) -> &'static str {
    match claim_type {
        ClaimType::Unemployment => "unemployment",
        ClaimType::Illness => "illness",
        ClaimType::Maternity => "maternity",
        ClaimType::Adoption => "adoption",
        ClaimType::Dependants => "dependants",
    }
}

/// Computes a UIF benefit estimate.
///
/// Remuneration is capped at the monthly ceiling (or the request override),
/// converted to a daily figure as `capped × 12 / days_per_year`, and paid at
/// the claim type's replacement rate for the eligible days: accrued credit
/// days limited by the claim type maximum. The monthly and duration figures
/// are for display only.
///
/// # Examples
///
/// ```
/// use estimator_engine::calculation::compute_benefit;
/// use estimator_engine::config::ConfigLoader;
/// use estimator_engine::models::{BenefitRequest, ClaimType, ContributionHistory};
/// use rust_decimal_macros::dec;
///
/// let loader = ConfigLoader::load("./config/za").unwrap();
/// let request = BenefitRequest {
///     claim_type: ClaimType::Unemployment,
///     average_monthly_remuneration: dec!(10000),
///     history: ContributionHistory::Months(dec!(36)),
///     salary_cap: None,
/// };
///
/// let result = compute_benefit(&request, loader.config());
/// assert_eq!(result.credit_days, 270);
/// assert_eq!(result.daily_remuneration, dec!(328.77));
/// assert_eq!(result.total_payout, dec!(42234.55));
/// ```
pub fn compute_benefit(request: &BenefitRequest, config: &EngineConfig) -> BenefitResult {
    let uif = config.uif();
    let mut notes = Vec::new();

    let remuneration = bounded_amount(
        request.average_monthly_remuneration,
        "average monthly remuneration",
        &mut notes,
    );

    let ceiling = match request.salary_cap {
        Some(cap) if cap > Decimal::ZERO => bounded_amount(cap, "salary cap", &mut notes),
        Some(cap) => {
            notes.push(format!(
                "salary cap of {} ignored; using the {} ceiling",
                rand(cap),
                rand(uif.monthly_ceiling)
            ));
            uif.monthly_ceiling
        }
        None => uif.monthly_ceiling,
    };
    let capped = remuneration.min(ceiling);
    if remuneration > ceiling {
        notes.push(format!(
            "remuneration of {} capped at the UIF ceiling of {}",
            rand(remuneration),
            rand(ceiling)
        ));
    }

    let daily = if uif.days_per_year.is_zero() {
        Decimal::ZERO
    } else {
        capped * dec!(12) / uif.days_per_year
    };
    let threshold = uif.threshold_daily_rate(ceiling);
    let rate = replacement_rate(request.claim_type, daily, threshold, &uif.replacement);
    let daily_benefit = daily * rate;

    let history = match request.history {
        ContributionHistory::Days(days) => {
            ContributionHistory::Days(bounded_count(days, "days worked", &mut notes))
        }
        ContributionHistory::Months(months) => {
            ContributionHistory::Months(bounded_count(months, "months contributed", &mut notes))
        }
    };
    let credit = credit_days_for_history(history, &uif.accrual);
    if credit == uif.accrual.absolute_cap {
        notes.push(format!(
            "credit days capped at {} for the four-year lookback",
            uif.accrual.absolute_cap
        ));
    }
    if credit == 0 {
        notes.push("no credit days accrued; no benefit is payable".to_string());
    }

    let max_days = claim_type_max_days(request.claim_type, &uif.claim_caps);
    let eligible = credit.min(max_days);
    if credit > max_days {
        notes.push(format!(
            "{} claims are limited to {max_days} days",
            claim_label(request.claim_type)
        ));
    }

    if request.claim_type == ClaimType::Dependants {
        notes.push(
            "dependants benefit is paid as a lump sum; monthly and duration figures are indicative"
                .to_string(),
        );
    }

    let total = daily_benefit * Decimal::from(eligible);
    let (monthly_approx, months_approx) = if uif.days_per_year.is_zero() {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        (
            daily_benefit * uif.days_per_year / dec!(12),
            Decimal::from(eligible) * dec!(12) / uif.days_per_year,
        )
    };

    debug!(
        claim_type = claim_label(request.claim_type),
        credit_days = credit,
        eligible_days = eligible,
        rate = %rate,
        "UIF benefit computed"
    );

    BenefitResult {
        claim_type: request.claim_type,
        capped_remuneration: capped.round_dp(2),
        daily_remuneration: daily.round_dp(2),
        replacement_rate: rate.round_dp(6),
        daily_benefit: daily_benefit.round_dp(2),
        credit_days: credit,
        claim_type_max_days: max_days,
        eligible_days: eligible,
        total_payout: total.round_dp(2),
        monthly_benefit_approx: monthly_approx.round_dp(2),
        duration_months_approx: months_approx.round_dp(2),
        contributions: uif_contributions(capped, &uif.contributions),
        notes,
    }
}
