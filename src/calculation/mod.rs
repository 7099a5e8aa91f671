//! Calculation logic for the estimator engine.
//!
//! Every function here is pure: it reads its inputs and the immutable
//! configuration tables and returns a value. The modules fall into four
//! groups:
//!
//! - rate ceilings and fees: [`cap_annual_rate`], [`service_fee_monthly`],
//!   [`initiation_fee`], [`auto_annual_rate`]
//! - amortization and effective rate: [`monthly_payment`],
//!   [`effective_annual_rate`], with [`compute_loan`] orchestrating the loan
//!   estimate and affordability policy
//! - progressive tax: [`bracket_tax`], [`age_rebate`], [`medical_credit`],
//!   [`retirement_deduction_allowed`], [`proration_factor`], with
//!   [`compute_tax`] orchestrating PAYE
//! - unemployment benefit: [`sliding_replacement_rate`], [`credit_days`],
//!   with [`compute_benefit`] orchestrating the UIF estimate

mod affordability;
mod amortization;
mod benefit;
mod bracket_tax;
mod credit_days;
mod effective_rate;
mod loan;
mod notes;
mod paye;
mod proration;
mod rate_caps;
mod replacement_rate;
mod retirement;
mod tax_credits;

pub use affordability::{
    debt_to_income, disposable_income, dti_band, living_expense_floor, loan_decision,
};
pub use amortization::{monthly_payment, monthly_rate, total_interest};
pub use benefit::{compute_benefit, uif_contributions};
pub use bracket_tax::{bracket_tax, find_bracket};
pub use credit_days::{claim_type_max_days, credit_days, credit_days_for_history};
pub use effective_rate::{
    annualise_monthly_rate, build_cash_flows, effective_annual_rate, monthly_internal_rate,
    net_present_value,
};
pub use loan::{MAX_TERM_MONTHS, compute_loan};
pub use notes::MAX_INPUT_AMOUNT;
pub use paye::compute_tax;
pub use proration::{effective_periods, months_employed, proration_factor, resolve_proration};
pub use rate_caps::{
    auto_annual_rate, cap_annual_rate, initiation_fee, rate_ceiling, service_fee_monthly,
};
pub use replacement_rate::{replacement_rate, sliding_replacement_rate};
pub use retirement::retirement_deduction_allowed;
pub use tax_credits::{age_rebate, medical_credit};
