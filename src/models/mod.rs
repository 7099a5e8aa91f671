//! Core data models for the estimator engine.
//!
//! Every record is an immutable value created per calculation call.

mod benefit;
mod cash_flow;
mod loan;
mod tax;

pub use benefit::{BenefitRequest, BenefitResult, ClaimType, ContributionHistory, UifContributions};
pub use cash_flow::CashFlowSeries;
pub use loan::{DtiBand, LoanDecision, LoanProduct, LoanRequest, LoanResult};
pub use tax::{IncomePeriod, Proration, TaxRequest, TaxResult};
