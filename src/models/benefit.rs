//! UIF benefit request and result models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The type of UIF claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    /// Loss of employment.
    Unemployment,
    /// Illness benefit.
    Illness,
    /// Maternity benefit.
    Maternity,
    /// Adoption benefit.
    Adoption,
    /// Dependants (death) benefit.
    Dependants,
}

impl ClaimType {
    /// Whether the sliding replacement rate applies.
    pub fn uses_sliding_rate(self) -> bool {
        matches!(self, ClaimType::Unemployment)
    }
}

/// Contribution history within the four-year lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum ContributionHistory {
    /// Days worked.
    Days(Decimal),
    /// Months contributed.
    Months(Decimal),
}

/// Inputs to a UIF benefit estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitRequest {
    /// The claim type.
    pub claim_type: ClaimType,
    /// Average gross monthly remuneration.
    pub average_monthly_remuneration: Decimal,
    /// Contributions made in the lookback window.
    pub history: ContributionHistory,
    /// Overrides the configured monthly ceiling.
    #[serde(default)]
    pub salary_cap: Option<Decimal>,
}

/// Monthly UIF contributions on the capped remuneration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UifContributions {
    /// Employee share.
    pub employee: Decimal,
    /// Employer share.
    pub employer: Decimal,
    /// Both shares together.
    pub total: Decimal,
}

/// The result of a UIF benefit estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitResult {
    /// The claim type.
    pub claim_type: ClaimType,
    /// Remuneration after the ceiling.
    pub capped_remuneration: Decimal,
    /// Capped remuneration per day.
    pub daily_remuneration: Decimal,
    /// Replacement rate applied.
    pub replacement_rate: Decimal,
    /// Benefit per day.
    pub daily_benefit: Decimal,
    /// Credit days earned, before the claim-type maximum.
    pub credit_days: u32,
    /// Longest duration for the claim type.
    pub claim_type_max_days: u32,
    /// Days payable: credit days limited by the claim-type maximum.
    pub eligible_days: u32,
    /// Daily benefit over the eligible days.
    pub total_payout: Decimal,
    /// Approximate benefit per month, for display.
    pub monthly_benefit_approx: Decimal,
    /// Approximate payable duration in months, for display.
    pub duration_months_approx: Decimal,
    /// Monthly contributions on the capped remuneration.
    pub contributions: UifContributions,
    /// Explanations of every cap, clamp and fallback applied.
    pub notes: Vec<String>,
}
