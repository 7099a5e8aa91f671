//! Loan estimate orchestration.
//!
//! Combines the rate ceilings, fee formulas, amortization, affordability
//! policy and effective-rate solver into a single [`LoanResult`]. Inputs
//! outside the regulated or supported range are clamped and a note is
//! recorded for each adjustment.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::affordability::{
    debt_to_income, disposable_income, dti_band, living_expense_floor, loan_decision,
};
use super::amortization::{monthly_payment, monthly_rate, total_interest};
use super::effective_rate::{build_cash_flows, effective_annual_rate};
use super::notes::{bounded_amount, percent, rand};
use super::rate_caps::{
    auto_annual_rate, cap_annual_rate, initiation_fee, rate_ceiling, service_fee_monthly,
};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::models::{LoanDecision, LoanProduct, LoanRequest, LoanResult};

/// Longest term accepted; longer terms are clamped.
pub const MAX_TERM_MONTHS: u32 = 600;

fn clamp_term(requested: i64, notes: &mut Vec<String>) -> u32 {
    if requested < 1 {
        notes.push(format!(
            "term of {requested} months is below the minimum; using 1 month"
        ));
        return 1;
    }
    match u32::try_from(requested) {
        Ok(term) if term <= MAX_TERM_MONTHS => term,
        _ => {
            notes.push(format!(
                "term of {requested} months exceeds the supported maximum; using {MAX_TERM_MONTHS} months"
            ));
            MAX_TERM_MONTHS
        }
    }
}

/// Resolves the annual rate to charge before capping.
fn requested_annual_rate(
    request: &LoanRequest,
    pre_loan_dti: Decimal,
    config: &EngineConfig,
    notes: &mut Vec<String>,
) -> Decimal {
    match (request.annual_rate, request.credit_score) {
        (Some(rate), _) if rate > Decimal::ZERO => rate,
        (Some(rate), _) if rate < Decimal::ZERO => {
            notes.push(format!("annual rate of {} was negative; using 0%", percent(rate)));
            Decimal::ZERO
        }
        (_, Some(score)) => {
            let derived =
                auto_annual_rate(request.product, score, pre_loan_dti, &config.credit().auto_rate);
            notes.push(format!(
                "annual rate of {} derived from credit score {score} and pre-loan DTI of {}",
                percent(derived),
                percent(pre_loan_dti.round_dp(4))
            ));
            derived
        }
        _ => {
            notes.push(
                "no annual rate or credit score supplied; using 0% until a rate is entered"
                    .to_string(),
            );
            Decimal::ZERO
        }
    }
}

/// Computes a complete loan estimate.
///
/// The schedule is built in this order:
///
/// 1. Clamp the term to `1..=MAX_TERM_MONTHS` and amounts to
///    `[0, MAX_INPUT_AMOUNT]`.
/// 2. Subtract the deposit (vehicle and home only).
/// 3. Clamp the balloon to the vehicle policy maximum (vehicle only).
/// 4. Resolve the annual rate (supplied, derived from the credit score, or
///    zero) and cap it at the product ceiling.
/// 5. Cap the service fee and add the initiation fee to the principal when
///    the fee schedule finances it.
/// 6. Amortise, then apply the living expense floor, disposable income and
///    DTI to reach a decision.
/// 7. Solve for the effective annual rate over the full cash-flow series.
///
/// Monetary outputs are rounded to cents.
///
/// # Errors
///
/// Only propagates [`crate::error::EngineError::InvalidTerm`] from the
/// amortization step, which the term clamp keeps from occurring. A failed
/// effective-rate solve is reported as a note with no effective rate.
///
/// # Examples
///
/// ```
/// use estimator_engine::calculation::compute_loan;
/// use estimator_engine::config::ConfigLoader;
/// use estimator_engine::models::{LoanDecision, LoanProduct, LoanRequest};
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
///
/// let loader = ConfigLoader::load("./config/za").unwrap();
/// let request = LoanRequest {
///     product: LoanProduct::Vehicle,
///     principal: dec!(100000),
///     deposit: Decimal::ZERO,
///     balloon_percentage: Decimal::ZERO,
///     annual_rate: Some(dec!(0.24)),
///     term_months: 60,
///     monthly_income: dec!(40000),
///     net_monthly_income: Some(dec!(30000)),
///     monthly_expenses: dec!(10000),
///     other_monthly_debt: Decimal::ZERO,
///     dependants: 0,
///     service_fee: None,
///     reference_rate: None,
///     credit_score: None,
///     borrower_age: None,
/// };
///
/// let result = compute_loan(&request, loader.config()).unwrap();
/// assert_eq!(result.applied_annual_rate, dec!(0.24));
/// assert_eq!(result.monthly_instalment, dec!(2876.80));
/// assert_eq!(result.decision, LoanDecision::Approved);
/// ```
pub fn compute_loan(request: &LoanRequest, config: &EngineConfig) -> EngineResult<LoanResult> {
    let credit = config.credit();
    let product = request.product;
    let mut notes = Vec::new();

    let term = clamp_term(request.term_months, &mut notes);
    let principal = bounded_amount(request.principal, "principal", &mut notes);
    let gross_income = bounded_amount(request.monthly_income, "monthly income", &mut notes);
    let net_income = match request.net_monthly_income {
        Some(net) => bounded_amount(net, "net monthly income", &mut notes),
        None => gross_income,
    };
    let declared_expenses = bounded_amount(request.monthly_expenses, "monthly expenses", &mut notes);
    let other_debt = bounded_amount(request.other_monthly_debt, "other monthly debt", &mut notes);

    // Deposit
    let deposit = if product.allows_deposit() {
        let deposit = bounded_amount(request.deposit, "deposit", &mut notes);
        if deposit > principal {
            notes.push(format!(
                "deposit of {} exceeds the price; nothing is financed",
                rand(deposit)
            ));
            principal
        } else {
            deposit
        }
    } else {
        if !request.deposit.is_zero() {
            notes.push(format!("deposit ignored for {product}"));
        }
        Decimal::ZERO
    };
    let base_principal = principal - deposit;

    // Balloon
    let balloon_percentage = if product.allows_balloon() {
        let max = credit.vehicle_policy.max_balloon_percentage;
        let requested = request.balloon_percentage;
        if requested < Decimal::ZERO {
            notes.push("negative balloon percentage ignored".to_string());
            Decimal::ZERO
        } else if requested > max {
            notes.push(format!(
                "balloon of {}% capped at the vehicle finance maximum of {}%",
                requested.normalize(),
                max.normalize()
            ));
            max
        } else {
            requested
        }
    } else {
        if !request.balloon_percentage.is_zero() {
            notes.push(format!("balloon ignored for {product}"));
        }
        Decimal::ZERO
    };
    let balloon = base_principal * balloon_percentage / dec!(100);

    if product == LoanProduct::Vehicle && term > credit.vehicle_policy.max_term_months {
        notes.push(format!(
            "term of {term} months exceeds the vehicle finance policy maximum of {} months",
            credit.vehicle_policy.max_term_months
        ));
    }

    if let Some(age) = request.borrower_age {
        let end_age_months = u64::from(age) * 12 + u64::from(term);
        if end_age_months > u64::from(credit.affordability.max_end_age) * 12 {
            notes.push(format!(
                "borrower would be {} at the end of the term, above the maximum age of {}",
                end_age_months / 12,
                credit.affordability.max_end_age
            ));
        }
    }

    // Rate
    let pre_loan_dti = debt_to_income(Decimal::ZERO, other_debt, gross_income);
    let requested_rate = requested_annual_rate(request, pre_loan_dti, config, &mut notes);
    let applied_rate = cap_annual_rate(requested_rate, product, request.reference_rate, &credit.rate_caps);
    let rate_capped = applied_rate < requested_rate;
    if rate_capped {
        debug!(
            product = %product,
            requested = %requested_rate,
            applied = %applied_rate,
            "Annual rate capped"
        );
        notes.push(format!(
            "annual rate of {} capped at the {} ceiling for {product}",
            percent(requested_rate),
            percent(rate_ceiling(product, request.reference_rate, &credit.rate_caps))
        ));
    }

    // Fees
    let service_fee = match request.service_fee {
        Some(requested) => {
            let fee = service_fee_monthly(requested, &credit.fees);
            if fee < requested {
                notes.push(format!(
                    "service fee of {} capped at {} per month",
                    rand(requested),
                    rand(fee)
                ));
            }
            fee
        }
        None => Decimal::ZERO,
    };
    let initiation = initiation_fee(product, base_principal, &credit.fees);
    let (financed_principal, net_advance) = if credit.fees.finance_initiation_fee {
        if !initiation.is_zero() {
            notes.push(format!(
                "initiation fee of {} financed into the principal",
                rand(initiation)
            ));
        }
        (base_principal + initiation, base_principal)
    } else {
        (base_principal, base_principal - initiation)
    };

    // Schedule
    let rate = monthly_rate(applied_rate);
    let instalment = monthly_payment(financed_principal, rate, term, balloon)?;
    let total_monthly_instalment = instalment + service_fee;
    let periods = Decimal::from(term);
    let interest = total_interest(instalment, term, balloon, financed_principal);
    let total_service_fees = service_fee * periods;
    let upfront_fee = if credit.fees.finance_initiation_fee {
        Decimal::ZERO
    } else {
        initiation
    };
    let total_repayable = instalment * periods + balloon + total_service_fees + upfront_fee;

    // Affordability
    let affordability = &credit.affordability;
    let floor = living_expense_floor(gross_income, request.dependants, &affordability.expense_floor_bands);
    let expenses_used = declared_expenses.max(floor);
    if floor > declared_expenses {
        notes.push(format!(
            "expenses floor applied: declared {} is below the minimum of {} for this income and household",
            rand(declared_expenses),
            rand(floor)
        ));
    }
    let disposable = disposable_income(net_income, expenses_used, other_debt);
    if gross_income < Decimal::ONE {
        notes.push("no gross income supplied; DTI measured against R1.00".to_string());
    }
    let dti = debt_to_income(total_monthly_instalment, other_debt, gross_income);
    let band = dti_band(dti, affordability);
    let decision = loan_decision(total_monthly_instalment, disposable, dti, affordability);

    if total_monthly_instalment > disposable {
        notes.push(format!(
            "instalment of {} exceeds disposable income of {}",
            rand(total_monthly_instalment),
            rand(disposable)
        ));
    }
    if dti > affordability.dti_ceiling {
        notes.push(format!(
            "DTI of {} is above the {} ceiling",
            percent(dti),
            percent(affordability.dti_ceiling)
        ));
    } else if decision == LoanDecision::Borderline {
        notes.push(format!(
            "DTI of {} is above the {} borderline threshold",
            percent(dti),
            percent(affordability.dti_borderline)
        ));
    }

    // Effective rate
    let series = build_cash_flows(net_advance, instalment, service_fee, term, balloon);
    let effective_annual = match effective_annual_rate(&series, &credit.solver) {
        Ok(effective) => Some(effective.round_dp(6)),
        Err(err) => {
            debug!(error = %err, "Effective rate not available");
            notes.push(format!("effective annual rate not available ({err})"));
            None
        }
    };

    debug!(
        product = %product,
        term,
        instalment = %instalment.round_dp(2),
        decision = ?decision,
        "Loan estimate computed"
    );

    Ok(LoanResult {
        product,
        financed_principal: financed_principal.round_dp(2),
        monthly_rate: rate,
        monthly_instalment: instalment.round_dp(2),
        service_fee: service_fee.round_dp(2),
        total_monthly_instalment: total_monthly_instalment.round_dp(2),
        initiation_fee: initiation.round_dp(2),
        balloon_amount: balloon.round_dp(2),
        total_interest: interest.round_dp(2),
        total_service_fees: total_service_fees.round_dp(2),
        total_repayable: total_repayable.round_dp(2),
        debt_to_income: dti.round_dp(4),
        dti_band: band,
        disposable_income: disposable.round_dp(2),
        expenses_used: expenses_used.round_dp(2),
        applied_annual_rate: applied_rate,
        rate_capped,
        effective_annual_rate: effective_annual,
        decision,
        approved: decision != LoanDecision::Declined,
        notes,
    })
}
