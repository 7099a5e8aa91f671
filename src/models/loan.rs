//! Loan request and result models.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The credit product being estimated.
///
/// # Example
///
/// ```
/// use estimator_engine::models::LoanProduct;
///
/// let product: LoanProduct = serde_json::from_str("\"vehicle\"").unwrap();
/// assert_eq!(product, LoanProduct::Vehicle);
/// assert!(product.allows_balloon());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanProduct {
    /// Unsecured personal loan.
    Personal,
    /// Vehicle finance (may carry a balloon).
    Vehicle,
    /// Home loan.
    Home,
    /// Credit card or other revolving facility.
    Revolving,
}

impl LoanProduct {
    /// Whether a deposit reduces the financed amount.
    pub fn allows_deposit(self) -> bool {
        matches!(self, LoanProduct::Vehicle | LoanProduct::Home)
    }

    /// Whether a balloon payment may be agreed.
    pub fn allows_balloon(self) -> bool {
        matches!(self, LoanProduct::Vehicle)
    }
}

impl fmt::Display for LoanProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LoanProduct::Personal => "personal loans",
            LoanProduct::Vehicle => "vehicle finance",
            LoanProduct::Home => "home loans",
            LoanProduct::Revolving => "revolving credit",
        };
        f.write_str(label)
    }
}

/// Inputs to a loan affordability estimate.
///
/// Missing optional amounts default to zero. Negative amounts are clamped to
/// zero by the calculator, which records a note for each adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    /// The product category.
    pub product: LoanProduct,
    /// Purchase price or amount requested.
    pub principal: Decimal,
    /// Money down (vehicle and home only).
    #[serde(default)]
    pub deposit: Decimal,
    /// Balloon as a percentage (0–100) of the amount after deposit, vehicle only.
    #[serde(default)]
    pub balloon_percentage: Decimal,
    /// Annual nominal rate as a decimal. Derived from the credit score when absent.
    #[serde(default)]
    pub annual_rate: Option<Decimal>,
    /// Term in months.
    pub term_months: i64,
    /// Gross monthly income.
    pub monthly_income: Decimal,
    /// Net monthly income; gross is used when absent.
    #[serde(default)]
    pub net_monthly_income: Option<Decimal>,
    /// Declared monthly living expenses.
    #[serde(default)]
    pub monthly_expenses: Decimal,
    /// Existing monthly debt repayments.
    #[serde(default)]
    pub other_monthly_debt: Decimal,
    /// Number of dependants, for the living expense floor.
    #[serde(default)]
    pub dependants: u32,
    /// Monthly service fee requested by the credit provider.
    #[serde(default)]
    pub service_fee: Option<Decimal>,
    /// Reference (repo) rate for home loans, as a decimal.
    #[serde(default)]
    pub reference_rate: Option<Decimal>,
    /// Credit bureau score used to derive a rate.
    #[serde(default)]
    pub credit_score: Option<u32>,
    /// Borrower age in whole years.
    #[serde(default)]
    pub borrower_age: Option<u32>,
}

/// The outcome of the affordability policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanDecision {
    /// Affordable and below the borderline DTI.
    Approved,
    /// Affordable, but DTI sits between the borderline and the ceiling.
    Borderline,
    /// Fails affordability or exceeds the DTI ceiling.
    Declined,
}

/// A label for the post-loan debt-to-income ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DtiBand {
    /// Comfortably within limits.
    Low,
    /// Getting stretched.
    Moderate,
    /// Close to or over the ceiling.
    High,
}

/// The result of a loan estimate. Monetary fields are rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    /// The product estimated.
    pub product: LoanProduct,
    /// Price less deposit, plus the initiation fee when it is financed.
    pub financed_principal: Decimal,
    /// Monthly rate used for the schedule.
    pub monthly_rate: Decimal,
    /// Instalment excluding the service fee.
    pub monthly_instalment: Decimal,
    /// Monthly service fee after capping.
    pub service_fee: Decimal,
    /// Instalment including the service fee.
    pub total_monthly_instalment: Decimal,
    /// Initiation fee charged.
    pub initiation_fee: Decimal,
    /// Lump sum due with the last instalment.
    pub balloon_amount: Decimal,
    /// Interest over the life of the loan.
    pub total_interest: Decimal,
    /// Service fees over the life of the loan.
    pub total_service_fees: Decimal,
    /// Everything repaid, including the balloon.
    pub total_repayable: Decimal,
    /// Post-loan debt-to-income ratio (decimal).
    pub debt_to_income: Decimal,
    /// Label for the DTI.
    pub dti_band: DtiBand,
    /// Net income less expenses used and existing debt.
    pub disposable_income: Decimal,
    /// Expenses after applying the living expense floor.
    pub expenses_used: Decimal,
    /// Annual nominal rate after capping.
    pub applied_annual_rate: Decimal,
    /// Whether the requested rate was reduced by the ceiling.
    pub rate_capped: bool,
    /// Effective annual rate including fees, if the solver converged.
    pub effective_annual_rate: Option<Decimal>,
    /// Outcome of the affordability policy.
    pub decision: LoanDecision,
    /// `true` unless the decision is declined.
    pub approved: bool,
    /// Explanations of every cap, clamp and fallback applied.
    pub notes: Vec<String>,
}
