//! Configuration types for the regulatory tables.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Rates are decimals
//! (`0.2775` is 27.75%), amounts are in rand.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};
use crate::models::LoanProduct;

/// Metadata about the loaded rule set.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineMetadata {
    /// Jurisdiction code (e.g., "ZA").
    pub jurisdiction: String,
    /// The human-readable name of the rule set.
    pub name: String,
    /// The version or effective date of the tables.
    pub version: String,
    /// Where the published figures come from.
    pub source_url: String,
}

/// A value configured once per loan product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductTable<T> {
    /// Unsecured personal loans.
    pub personal: T,
    /// Vehicle finance.
    pub vehicle: T,
    /// Home loans (mortgages).
    pub home: T,
    /// Credit cards and other revolving credit.
    pub revolving: T,
}

impl<T> ProductTable<T> {
    /// Returns the entry for a product.
    pub fn get(&self, product: LoanProduct) -> &T {
        match product {
            LoanProduct::Personal => &self.personal,
            LoanProduct::Vehicle => &self.vehicle,
            LoanProduct::Home => &self.home,
            LoanProduct::Revolving => &self.revolving,
        }
    }
}

/// Mortgage rate ceiling, linked to the reference (repo) rate.
#[derive(Debug, Clone, Deserialize)]
pub struct MortgageCap {
    /// Reference rate used when the caller does not supply one.
    pub default_reference_rate: Decimal,
    /// Margin added to the reference rate.
    pub margin: Decimal,
    /// Absolute ceiling regardless of the reference rate.
    pub hard_ceiling: Decimal,
    /// Fixed cap that overrides the repo-linked formula when set.
    #[serde(default)]
    pub fixed_cap: Option<Decimal>,
}

impl MortgageCap {
    /// Returns the mortgage ceiling for a reference rate.
    pub fn ceiling(&self, reference_rate: Option<Decimal>) -> Decimal {
        if let Some(fixed) = self.fixed_cap {
            return fixed;
        }
        let reference = reference_rate.unwrap_or(self.default_reference_rate);
        reference
            .checked_add(self.margin)
            .map_or(self.hard_ceiling, |linked| linked.min(self.hard_ceiling))
    }
}

/// Maximum annual nominal rate per product.
#[derive(Debug, Clone, Deserialize)]
pub struct RateCapTable {
    /// Cap for unsecured personal loans.
    pub personal: Decimal,
    /// Cap for vehicle finance.
    pub vehicle: Decimal,
    /// Cap for revolving credit.
    pub revolving: Decimal,
    /// Repo-linked cap for home loans.
    pub mortgage: MortgageCap,
}

/// Initiation fee rule: `base + percent × max(amount − threshold, 0)`, capped.
#[derive(Debug, Clone, Deserialize)]
pub struct InitiationFeeRule {
    /// Flat part of the fee.
    pub base: Decimal,
    /// Share of the amount above the threshold.
    pub percent: Decimal,
    /// Amount below which only the flat part applies.
    #[serde(default)]
    pub threshold: Decimal,
    /// Absolute maximum fee.
    pub maximum: Decimal,
}

/// Fee schedule for credit agreements.
#[derive(Debug, Clone, Deserialize)]
pub struct FeeSchedule {
    /// Monthly service fee cap (VAT inclusive).
    pub service_fee_monthly_cap: Decimal,
    /// Whether the initiation fee is added to the financed principal.
    pub finance_initiation_fee: bool,
    /// Initiation fee rules per product.
    pub initiation: ProductTable<InitiationFeeRule>,
}

/// Vehicle finance policy limits.
#[derive(Debug, Clone, Deserialize)]
pub struct VehiclePolicy {
    /// Largest balloon allowed, as a percentage (0–100) of the financed price.
    pub max_balloon_percentage: Decimal,
    /// Longest term the policy supports.
    pub max_term_months: u32,
}

/// A credit score band with its rate adjustment.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreBand {
    /// Lowest score in the band (inclusive).
    pub min_score: u32,
    /// Amount added to the base rate.
    pub adjustment: Decimal,
}

/// A pre-loan debt-to-income band with its rate adjustment.
#[derive(Debug, Clone, Deserialize)]
pub struct DtiRateBand {
    /// Upper bound (exclusive); `None` for the last band.
    #[serde(default)]
    pub below: Option<Decimal>,
    /// Amount added to the base rate.
    pub adjustment: Decimal,
}

/// Policy for deriving an annual rate when the caller supplies none.
#[derive(Debug, Clone, Deserialize)]
pub struct AutoRatePolicy {
    /// Starting rate per product.
    pub base_rates: ProductTable<Decimal>,
    /// Score bands, highest `min_score` first.
    pub score_bands: Vec<ScoreBand>,
    /// Adjustment applied below the lowest band.
    pub below_bands_adjustment: Decimal,
    /// Pre-loan DTI bands in ascending order.
    pub dti_bands: Vec<DtiRateBand>,
}

/// Minimum living expense for an income band.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseFloorBand {
    /// Highest gross monthly income in the band; `None` for the last band.
    #[serde(default)]
    pub max_gross: Option<Decimal>,
    /// Floor for the household head.
    pub base: Decimal,
    /// Added per dependant.
    pub per_dependant: Decimal,
}

/// Affordability thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct AffordabilityPolicy {
    /// Living expense floor by gross income band.
    pub expense_floor_bands: Vec<ExpenseFloorBand>,
    /// Post-loan DTI above which the application is declined.
    pub dti_ceiling: Decimal,
    /// Post-loan DTI above which an approval is marked borderline.
    pub dti_borderline: Decimal,
    /// DTI below which the ratio is labelled low.
    pub dti_low_band: Decimal,
    /// DTI below which the ratio is labelled moderate.
    pub dti_moderate_band: Decimal,
    /// Highest borrower age at the end of the term.
    pub max_end_age: u32,
}

/// Bisection solver settings for the effective rate.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Stop once the bracket or the NPV is smaller than this.
    pub tolerance: Decimal,
    /// Hard cap on bisection steps.
    pub max_iterations: u32,
    /// Initial lower monthly rate.
    pub lower_bound: Decimal,
    /// Initial upper monthly rate.
    pub upper_bound: Decimal,
    /// How many times the upper bound may be doubled looking for a sign change.
    pub max_expansions: u32,
    /// The upper bound is never expanded past this monthly rate.
    pub upper_ceiling: Decimal,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: dec!(0.00000001),
            max_iterations: 2000,
            lower_bound: Decimal::ZERO,
            upper_bound: dec!(2),
            max_expansions: 50,
            upper_ceiling: dec!(16),
        }
    }
}

/// Contents of credit.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditConfig {
    /// Rate ceilings.
    pub rate_caps: RateCapTable,
    /// Fee schedule.
    pub fees: FeeSchedule,
    /// Vehicle finance policy.
    pub vehicle_policy: VehiclePolicy,
    /// Rate derivation when no rate is supplied.
    pub auto_rate: AutoRatePolicy,
    /// Affordability policy.
    pub affordability: AffordabilityPolicy,
    /// Effective-rate solver settings.
    #[serde(default)]
    pub solver: SolverConfig,
}

/// One tax bracket.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaxBracket {
    /// Taxable income where the bracket starts.
    pub lower: Decimal,
    /// Taxable income where the bracket ends; `None` for the top bracket.
    #[serde(default)]
    pub upper: Option<Decimal>,
    /// Tax payable at `lower`.
    pub base_tax: Decimal,
    /// Marginal rate inside the bracket.
    pub rate: Decimal,
}

/// Age rebates.
#[derive(Debug, Clone, Deserialize)]
pub struct RebateTable {
    /// Rebate every taxpayer receives.
    pub primary: Decimal,
    /// Added from `secondary_age`.
    pub secondary: Decimal,
    /// Added from `tertiary_age`.
    pub tertiary: Decimal,
    /// Age at which the secondary rebate applies.
    #[serde(default = "default_secondary_age")]
    pub secondary_age: u32,
    /// Age at which the tertiary rebate applies.
    #[serde(default = "default_tertiary_age")]
    pub tertiary_age: u32,
}

fn default_secondary_age() -> u32 {
    65
}

fn default_tertiary_age() -> u32 {
    75
}

/// Monthly medical scheme fees tax credits.
#[derive(Debug, Clone, Deserialize)]
pub struct MedicalCreditTable {
    /// Credit for the main member.
    pub main_member: Decimal,
    /// Credit for the first dependant.
    pub first_dependant: Decimal,
    /// Credit for each further dependant.
    pub additional_dependant: Decimal,
}

/// Retirement fund contribution deduction limits.
#[derive(Debug, Clone, Deserialize)]
pub struct RetirementLimits {
    /// Share of the greater of remuneration and taxable income.
    pub percentage: Decimal,
    /// Annual ceiling in rand.
    pub annual_ceiling: Decimal,
}

/// Taxable inclusion rates for a travel or car allowance.
#[derive(Debug, Clone, Deserialize)]
pub struct AllowanceInclusion {
    /// Default inclusion.
    pub standard: Decimal,
    /// Inclusion when mostly business travel is proven.
    pub reduced: Decimal,
}

/// One tax year from the tax/ directory.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxYearConfig {
    /// Lookup key, e.g. "2024/2025".
    pub key: String,
    /// Display label.
    pub label: String,
    /// First day of the year of assessment.
    pub start_date: NaiveDate,
    /// Last day of the year of assessment.
    pub end_date: NaiveDate,
    /// Figures are not yet promulgated.
    #[serde(default)]
    pub provisional: bool,
    /// Brackets in ascending order.
    pub brackets: Vec<TaxBracket>,
    /// Age rebates.
    pub rebates: RebateTable,
    /// Medical credits.
    pub medical_credits: MedicalCreditTable,
    /// Retirement deduction limits.
    pub retirement: RetirementLimits,
    /// Allowance inclusion rates.
    pub allowance_inclusion: AllowanceInclusion,
}

impl TaxYearConfig {
    /// Checks that the brackets are contiguous, increasing and continuous.
    ///
    /// A bracket's `base_tax` must equal the tax accumulated over the previous
    /// brackets, within one rand to allow for published rounding.
    pub fn validate(&self) -> EngineResult<()> {
        let section = format!("tax/{} brackets", self.key);
        let invalid = |message: String| EngineError::InvalidConfig {
            section: section.clone(),
            message,
        };

        if self.brackets.is_empty() {
            return Err(invalid("no brackets defined".to_string()));
        }
        if self.start_date >= self.end_date {
            return Err(invalid("start_date must be before end_date".to_string()));
        }

        let last = self.brackets.len() - 1;
        for (index, bracket) in self.brackets.iter().enumerate() {
            let number = index + 1;
            if bracket.rate < Decimal::ZERO || bracket.base_tax < Decimal::ZERO {
                return Err(invalid(format!("bracket {number} has a negative rate or base")));
            }
            match bracket.upper {
                Some(upper) if index == last => {
                    return Err(invalid(format!(
                        "top bracket {number} must be unbounded, found upper {upper}"
                    )));
                }
                Some(upper) if upper <= bracket.lower => {
                    return Err(invalid(format!(
                        "bracket {number} upper {upper} is not above lower {}",
                        bracket.lower
                    )));
                }
                None if index != last => {
                    return Err(invalid(format!("only the top bracket may be unbounded, bracket {number} is")));
                }
                _ => {}
            }

            if index == 0 {
                if bracket.lower != Decimal::ZERO {
                    return Err(invalid("first bracket must start at zero".to_string()));
                }
                continue;
            }

            let previous = &self.brackets[index - 1];
            let previous_upper = previous.upper.unwrap_or(Decimal::MAX);
            if bracket.lower != previous_upper {
                return Err(invalid(format!(
                    "bracket {number} does not start where bracket {index} ends"
                )));
            }
            let expected = previous.base_tax + (previous_upper - previous.lower) * previous.rate;
            if (expected - bracket.base_tax).abs() > Decimal::ONE {
                return Err(invalid(format!(
                    "bracket {number} base tax {} is discontinuous (expected {expected})",
                    bracket.base_tax
                )));
            }
        }

        Ok(())
    }
}

/// Income replacement rate parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplacementRates {
    /// Rate paid at zero income.
    pub max_rate: Decimal,
    /// Rate paid at or above the threshold.
    pub min_rate: Decimal,
    /// Flat rate for illness, maternity, adoption and dependants claims.
    pub flat_rate: Decimal,
}

/// Credit-day accrual.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditAccrual {
    /// Credit days earned per month of contributions.
    pub credit_days_per_month: Decimal,
    /// Calendar days counted as one contribution month.
    pub days_per_contribution_month: Decimal,
    /// Absolute ceiling on credit days in the lookback window.
    pub absolute_cap: u32,
}

impl CreditAccrual {
    /// Credit days earned per day worked.
    pub fn credit_days_per_day_worked(&self) -> Decimal {
        if self.days_per_contribution_month.is_zero() {
            return Decimal::ZERO;
        }
        self.credit_days_per_month / self.days_per_contribution_month
    }
}

/// Longest payable duration per claim type, in days.
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimDurationCaps {
    /// Unemployment claims.
    pub unemployment: u32,
    /// Illness claims.
    pub illness: u32,
    /// Maternity claims.
    pub maternity: u32,
    /// Adoption claims.
    pub adoption: u32,
    /// Dependants claims.
    pub dependants: u32,
}

/// UIF contribution rates.
#[derive(Debug, Clone, Deserialize)]
pub struct ContributionRates {
    /// Employee share of capped remuneration.
    pub employee: Decimal,
    /// Employer share of capped remuneration.
    pub employer: Decimal,
}

/// Contents of uif.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct UifConfig {
    /// Monthly remuneration ceiling.
    pub monthly_ceiling: Decimal,
    /// Days used to turn annual remuneration into a daily figure.
    pub days_per_year: Decimal,
    /// Replacement rates.
    pub replacement: ReplacementRates,
    /// Credit-day accrual.
    pub accrual: CreditAccrual,
    /// Claim-type duration caps.
    pub claim_caps: ClaimDurationCaps,
    /// Contribution rates.
    pub contributions: ContributionRates,
}

impl UifConfig {
    /// Daily remuneration at which the sliding rate reaches its minimum.
    pub fn threshold_daily_rate(&self, monthly_ceiling: Decimal) -> Decimal {
        if self.days_per_year.is_zero() {
            return Decimal::ZERO;
        }
        monthly_ceiling * dec!(12) / self.days_per_year
    }
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    metadata: EngineMetadata,
    credit: CreditConfig,
    uif: UifConfig,
    /// Tax years sorted by start date, oldest first.
    tax_years: Vec<TaxYearConfig>,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(
        metadata: EngineMetadata,
        credit: CreditConfig,
        uif: UifConfig,
        tax_years: Vec<TaxYearConfig>,
    ) -> Self {
        let mut sorted = tax_years;
        sorted.sort_by(|a, b| a.start_date.cmp(&b.start_date));
        Self {
            metadata,
            credit,
            uif,
            tax_years: sorted,
        }
    }

    /// Returns the rule set metadata.
    pub fn metadata(&self) -> &EngineMetadata {
        &self.metadata
    }

    /// Returns the credit tables.
    pub fn credit(&self) -> &CreditConfig {
        &self.credit
    }

    /// Returns the UIF tables.
    pub fn uif(&self) -> &UifConfig {
        &self.uif
    }

    /// Returns all tax years, oldest first.
    pub fn tax_years(&self) -> &[TaxYearConfig] {
        &self.tax_years
    }

    /// Looks up a tax year by key.
    pub fn tax_year(&self, key: &str) -> EngineResult<&TaxYearConfig> {
        self.tax_years
            .iter()
            .find(|year| year.key == key)
            .ok_or_else(|| EngineError::TaxYearNotFound {
                key: key.to_string(),
            })
    }

    /// The tax year containing a date, if any.
    pub fn tax_year_for_date(&self, date: NaiveDate) -> Option<&TaxYearConfig> {
        self.tax_years
            .iter()
            .find(|year| year.start_date <= date && date <= year.end_date)
    }
}
