//! Configuration loading and management for the estimator engine.
//!
//! Regulatory tables (rate caps, fee schedules, affordability bands, tax
//! years, UIF parameters) live in YAML so they can be updated without a code
//! change. They are loaded once and passed by reference into the calculators.
//!
//! # Example
//!
//! ```no_run
//! use estimator_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/za").unwrap();
//! println!("Loaded rule set: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AffordabilityPolicy, AllowanceInclusion, AutoRatePolicy, ClaimDurationCaps,
    ContributionRates, CreditAccrual, CreditConfig, DtiRateBand, EngineConfig, EngineMetadata,
    ExpenseFloorBand, FeeSchedule, InitiationFeeRule, MedicalCreditTable, MortgageCap,
    ProductTable, RateCapTable, RebateTable, ReplacementRates, RetirementLimits, ScoreBand,
    SolverConfig, TaxBracket, TaxYearConfig, UifConfig, VehiclePolicy,
};
