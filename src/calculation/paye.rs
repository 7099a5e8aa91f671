//! PAYE estimate orchestration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::bracket_tax::bracket_tax;
use super::notes::{bounded_amount, percent, rand};
use super::proration::{effective_periods, proration_factor, resolve_proration};
use super::retirement::retirement_deduction_allowed;
use super::tax_credits::{age_rebate, medical_credit};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::models::{IncomePeriod, Proration, TaxRequest, TaxResult};

fn annualise(amount: Decimal, period: IncomePeriod) -> Decimal {
    match period {
        IncomePeriod::Monthly => amount * dec!(12),
        IncomePeriod::Annual => amount,
    }
}

/// Computes PAYE for a tax year.
///
/// Amounts are annualised from the request period, the taxable share of any
/// travel allowance is added, and the proration factor scales income, the
/// retirement deduction, the age rebate and the medical credit alike. Tax
/// after credits never goes below zero. The per-period figure divides the
/// annual figure by the effective periods (12, or the months represented for
/// a partial year).
///
/// # Errors
///
/// [`crate::error::EngineError::TaxYearNotFound`] when `request.tax_year` is
/// not configured.
///
/// # Examples
///
/// ```
/// use estimator_engine::calculation::compute_tax;
/// use estimator_engine::config::ConfigLoader;
/// use estimator_engine::models::{IncomePeriod, Proration, TaxRequest};
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
///
/// let loader = ConfigLoader::load("./config/za").unwrap();
/// let request = TaxRequest {
///     tax_year: "2024/2025".to_string(),
///     gross: dec!(360000),
///     period: IncomePeriod::Annual,
///     age: 35,
///     medical_scheme_member: false,
///     medical_dependants: 0,
///     travel_allowance: Decimal::ZERO,
///     reduced_allowance_inclusion: false,
///     retirement_contribution: Decimal::ZERO,
///     proration: Proration::None,
/// };
///
/// let result = compute_tax(&request, loader.config()).unwrap();
/// assert_eq!(result.tax_before_credits, dec!(74632));
/// assert_eq!(result.tax_after_credits_annual, dec!(57397));
/// assert_eq!(result.tax_after_credits_monthly, dec!(4783.08));
/// ```
pub fn compute_tax(request: &TaxRequest, config: &EngineConfig) -> EngineResult<TaxResult> {
    let year = config.tax_year(&request.tax_year)?;
    let mut notes = Vec::new();

    if year.provisional {
        notes.push(format!(
            "{} figures are provisional and may change when promulgated",
            year.key
        ));
    }

    let gross = bounded_amount(request.gross, "gross remuneration", &mut notes);
    let allowance = bounded_amount(request.travel_allowance, "travel allowance", &mut notes);
    let contribution = bounded_amount(
        request.retirement_contribution,
        "retirement contribution",
        &mut notes,
    );

    // Proration
    if let Proration::Days { worked, in_period } = request.proration {
        if worked > in_period {
            notes.push(format!(
                "{} days worked exceeds the {} days in the period; treated as a full period",
                worked.normalize(),
                in_period.normalize()
            ));
        }
    }
    if let Proration::Employment { .. } = request.proration {
        if let Proration::Months { represented } = resolve_proration(&request.proration, year) {
            notes.push(format!(
                "employment dates cover {} months of the {} tax year",
                represented.normalize(),
                year.key
            ));
        }
    }
    let factor = proration_factor(&request.proration, year);
    let periods = effective_periods(&request.proration, year);
    if factor < Decimal::ONE {
        notes.push(format!("income, rebate and credits pro-rated to {}", percent(factor)));
    }

    // Taxable income
    let inclusion_rate = if request.reduced_allowance_inclusion {
        year.allowance_inclusion.reduced
    } else {
        year.allowance_inclusion.standard
    };
    let annual_remuneration = annualise(gross, request.period);
    let annual_allowance = annualise(allowance, request.period) * inclusion_rate;
    let full_year_taxable = annual_remuneration + annual_allowance;
    let taxable_before = full_year_taxable * factor;

    let annual_contribution = annualise(contribution, request.period);
    let deduction = retirement_deduction_allowed(
        annual_contribution,
        annual_remuneration,
        full_year_taxable,
        factor,
        &year.retirement,
    );
    if deduction < annual_contribution * factor {
        notes.push(format!(
            "retirement contribution of {} limited to the deductible {}",
            rand(annual_contribution * factor),
            rand(deduction)
        ));
    }
    let taxable_after = (taxable_before - deduction).max(Decimal::ZERO);

    // Tax and credits
    let tax_before_credits = bracket_tax(taxable_after, &year.brackets);
    let rebate = age_rebate(request.age, &year.rebates) * factor;

    let medical_monthly = if request.medical_scheme_member {
        medical_credit(request.medical_dependants, &year.medical_credits)
    } else {
        if request.medical_dependants > 0 {
            notes.push("medical dependants ignored without scheme membership".to_string());
        }
        Decimal::ZERO
    };
    let medical_applied = medical_monthly * dec!(12) * factor;

    let credits = rebate + medical_applied;
    let tax_after_annual = (tax_before_credits - credits).max(Decimal::ZERO);
    if credits > tax_before_credits && !tax_before_credits.is_zero() {
        notes.push("rebate and credits exceed the tax; no tax payable".to_string());
    }
    let tax_after_period = tax_after_annual / periods;

    debug!(
        tax_year = %year.key,
        factor = %factor,
        taxable = %taxable_after,
        tax = %tax_after_annual,
        "PAYE computed"
    );

    Ok(TaxResult {
        tax_year: year.label.clone(),
        proration_factor: factor,
        effective_periods: periods,
        allowance_inclusion_rate: inclusion_rate,
        taxable_before_retirement: taxable_before.round_dp(2),
        retirement_deduction: deduction.round_dp(2),
        taxable_after_retirement: taxable_after.round_dp(2),
        tax_before_credits: tax_before_credits.round_dp(2),
        rebate: rebate.round_dp(2),
        medical_credit_monthly: medical_monthly.round_dp(2),
        medical_credit_applied: medical_applied.round_dp(2),
        tax_after_credits_annual: tax_after_annual.round_dp(2),
        tax_after_credits_monthly: tax_after_period.round_dp(2),
        notes,
    })
}
