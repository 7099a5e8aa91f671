//! PAYE request and result models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether amounts on a tax request are per month or per year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomePeriod {
    /// Amounts are monthly.
    #[default]
    Monthly,
    /// Amounts are annual.
    Annual,
}

/// How a partial period is pro-rated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Proration {
    /// Full period.
    #[default]
    None,
    /// Within-month proration by days worked.
    Days {
        /// Days worked or paid in the period.
        worked: Decimal,
        /// Calendar days in the period.
        in_period: Decimal,
    },
    /// Partial year by months represented.
    Months {
        /// Months of the tax year the income covers.
        represented: Decimal,
    },
    /// Partial year from employment dates; converted to months represented.
    Employment {
        /// First day employed; the start of the tax year when absent.
        #[serde(default)]
        from: Option<NaiveDate>,
        /// Last day employed; the end of the tax year when absent.
        #[serde(default)]
        to: Option<NaiveDate>,
    },
}

/// Inputs to a PAYE estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRequest {
    /// Tax year key, e.g. "2024/2025".
    pub tax_year: String,
    /// Gross remuneration for `period`.
    pub gross: Decimal,
    /// Whether `gross`, the allowance and the contribution are monthly or annual.
    #[serde(default)]
    pub period: IncomePeriod,
    /// Age at the end of the tax year.
    pub age: u32,
    /// Member of a medical scheme.
    #[serde(default)]
    pub medical_scheme_member: bool,
    /// Dependants on the medical scheme, excluding the member.
    #[serde(default)]
    pub medical_dependants: u32,
    /// Travel or car allowance for `period`.
    #[serde(default)]
    pub travel_allowance: Decimal,
    /// Apply the reduced inclusion rate to the allowance.
    #[serde(default)]
    pub reduced_allowance_inclusion: bool,
    /// Retirement fund contribution for `period`.
    #[serde(default)]
    pub retirement_contribution: Decimal,
    /// Partial period proration.
    #[serde(default)]
    pub proration: Proration,
}

/// The result of a PAYE estimate. Monetary fields are rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxResult {
    /// Tax year label.
    pub tax_year: String,
    /// Factor applied to income, rebates and credits.
    pub proration_factor: Decimal,
    /// Periods the annual figure is spread over.
    pub effective_periods: Decimal,
    /// Inclusion rate applied to the allowance.
    pub allowance_inclusion_rate: Decimal,
    /// Annualised taxable income before the retirement deduction.
    pub taxable_before_retirement: Decimal,
    /// Retirement deduction allowed.
    pub retirement_deduction: Decimal,
    /// Annualised taxable income after the retirement deduction.
    pub taxable_after_retirement: Decimal,
    /// Bracket tax before rebates and credits.
    pub tax_before_credits: Decimal,
    /// Age rebate applied (pro-rated).
    pub rebate: Decimal,
    /// Monthly medical credit for the membership.
    pub medical_credit_monthly: Decimal,
    /// Medical credit applied against the annual tax (pro-rated).
    pub medical_credit_applied: Decimal,
    /// Tax after rebate and credits for the year.
    pub tax_after_credits_annual: Decimal,
    /// Tax after rebate and credits per period.
    pub tax_after_credits_monthly: Decimal,
    /// Explanations of every cap, clamp and fallback applied.
    pub notes: Vec<String>,
}
