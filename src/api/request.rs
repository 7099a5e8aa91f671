//! Request types for the estimator API.
//!
//! The web forms send rates as percentages (`24` for 24%) and contribution
//! history as two optional fields. These types accept that shape and convert
//! into the calculator models, which use decimal rates throughout.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::{
    BenefitRequest, ClaimType, ContributionHistory, IncomePeriod, LoanProduct, LoanRequest,
    Proration, TaxRequest,
};

fn percent_to_rate(percent: Option<Decimal>) -> Option<Decimal> {
    percent.map(|value| value / dec!(100))
}

/// Request body for the `/loan` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanEstimateRequest {
    /// The product category.
    pub product: LoanProduct,
    /// Purchase price or amount requested.
    #[serde(default)]
    pub principal: Decimal,
    /// Money down (vehicle and home).
    #[serde(default)]
    pub deposit: Decimal,
    /// Balloon percentage, vehicle only.
    #[serde(default)]
    pub balloon_percentage: Decimal,
    /// Annual nominal rate in percent.
    #[serde(default)]
    pub annual_rate_percent: Option<Decimal>,
    /// Term in months; missing or non-positive terms are clamped to one.
    #[serde(default)]
    pub term_months: i64,
    /// Gross monthly income.
    #[serde(default)]
    pub monthly_income: Decimal,
    /// Net monthly income.
    #[serde(default)]
    pub net_monthly_income: Option<Decimal>,
    /// Declared monthly living expenses.
    #[serde(default)]
    pub monthly_expenses: Decimal,
    /// Existing monthly debt repayments.
    #[serde(default)]
    pub other_monthly_debt: Decimal,
    /// Household dependants.
    #[serde(default)]
    pub dependants: u32,
    /// Requested monthly service fee.
    #[serde(default)]
    pub service_fee: Option<Decimal>,
    /// Repo rate in percent, home loans only.
    #[serde(default)]
    pub repo_rate_percent: Option<Decimal>,
    /// Credit bureau score.
    #[serde(default)]
    pub credit_score: Option<u32>,
    /// Borrower age.
    #[serde(default)]
    pub borrower_age: Option<u32>,
}

impl From<LoanEstimateRequest> for LoanRequest {
    fn from(req: LoanEstimateRequest) -> Self {
        LoanRequest {
            product: req.product,
            principal: req.principal,
            deposit: req.deposit,
            balloon_percentage: req.balloon_percentage,
            annual_rate: percent_to_rate(req.annual_rate_percent),
            term_months: req.term_months,
            monthly_income: req.monthly_income,
            net_monthly_income: req.net_monthly_income,
            monthly_expenses: req.monthly_expenses,
            other_monthly_debt: req.other_monthly_debt,
            dependants: req.dependants,
            service_fee: req.service_fee,
            reference_rate: percent_to_rate(req.repo_rate_percent),
            credit_score: req.credit_score,
            borrower_age: req.borrower_age,
        }
    }
}

/// Request body for the `/tax` endpoint.
///
/// When `tax_year` is omitted the handler uses the year containing today's
/// date, or the latest configured year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxEstimateRequest {
    /// Tax year key, e.g. "2024/2025".
    #[serde(default)]
    pub tax_year: Option<String>,
    /// Gross remuneration for `period`.
    #[serde(default)]
    pub gross: Decimal,
    /// Monthly or annual amounts.
    #[serde(default)]
    pub period: IncomePeriod,
    /// Age at the end of the tax year.
    #[serde(default)]
    pub age: u32,
    /// Member of a medical scheme.
    #[serde(default)]
    pub medical_scheme_member: bool,
    /// Medical scheme dependants, excluding the member.
    #[serde(default)]
    pub medical_dependants: u32,
    /// Travel allowance for `period`.
    #[serde(default)]
    pub travel_allowance: Decimal,
    /// Use the reduced allowance inclusion rate.
    #[serde(default)]
    pub reduced_allowance_inclusion: bool,
    /// Retirement contribution for `period`.
    #[serde(default)]
    pub retirement_contribution: Decimal,
    /// Days worked, for within-month proration.
    #[serde(default)]
    pub days_worked: Option<Decimal>,
    /// Days in the pay period, for within-month proration.
    #[serde(default)]
    pub days_in_period: Option<Decimal>,
    /// Months of the year represented, for partial-year proration.
    #[serde(default)]
    pub months_represented: Option<Decimal>,
    /// First day of employment in the tax year.
    #[serde(default)]
    pub employed_from: Option<NaiveDate>,
    /// Last day of employment in the tax year.
    #[serde(default)]
    pub employed_to: Option<NaiveDate>,
}

impl TaxEstimateRequest {
    /// The proration mode implied by the optional fields.
    ///
    /// Months represented take precedence over employment dates, which take
    /// precedence over days worked.
    pub fn proration(&self) -> Proration {
        if let Some(represented) = self.months_represented {
            return Proration::Months { represented };
        }
        if self.employed_from.is_some() || self.employed_to.is_some() {
            return Proration::Employment {
                from: self.employed_from,
                to: self.employed_to,
            };
        }
        match self.days_worked {
            Some(worked) => Proration::Days {
                worked,
                in_period: self.days_in_period.unwrap_or(dec!(30)),
            },
            None => Proration::None,
        }
    }

    /// Converts into the calculator model for a resolved tax year.
    pub fn into_tax_request(self, tax_year: String) -> TaxRequest {
        let proration = self.proration();
        TaxRequest {
            tax_year,
            gross: self.gross,
            period: self.period,
            age: self.age,
            medical_scheme_member: self.medical_scheme_member,
            medical_dependants: self.medical_dependants,
            travel_allowance: self.travel_allowance,
            reduced_allowance_inclusion: self.reduced_allowance_inclusion,
            retirement_contribution: self.retirement_contribution,
            proration,
        }
    }
}

/// Request body for the `/benefit` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenefitEstimateRequest {
    /// The claim type.
    pub claim_type: ClaimType,
    /// Average gross monthly remuneration.
    #[serde(default)]
    pub average_monthly_remuneration: Decimal,
    /// Days worked in the last four years. Without either history field no
    /// credit days have accrued.
    #[serde(default)]
    pub days_worked: Option<Decimal>,
    /// Months contributed in the last four years.
    #[serde(default)]
    pub months_contributed: Option<Decimal>,
    /// Overrides the monthly ceiling.
    #[serde(default)]
    pub salary_cap: Option<Decimal>,
}

impl From<BenefitEstimateRequest> for BenefitRequest {
    fn from(req: BenefitEstimateRequest) -> Self {
        let history = match (req.months_contributed, req.days_worked) {
            (Some(months), _) => ContributionHistory::Months(months),
            (None, Some(days)) => ContributionHistory::Days(days),
            (None, None) => ContributionHistory::Days(Decimal::ZERO),
        };
        BenefitRequest {
            claim_type: req.claim_type,
            average_monthly_remuneration: req.average_monthly_remuneration,
            history,
            salary_cap: req.salary_cap,
        }
    }
}
