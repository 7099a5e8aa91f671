//! Error types for the estimator engine.
//!
//! Calculations degrade gracefully: out-of-range inputs are clamped and the
//! adjustment is recorded as a note on the result. The variants here cover
//! the few conditions that cannot be turned into a best-effort estimate,
//! plus configuration loading failures.

use thiserror::Error;

/// The main error type for the estimator engine.
///
/// # Example
///
/// ```
/// use estimator_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/credit.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/credit.yaml");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but violates a table invariant.
    #[error("Invalid configuration '{section}': {message}")]
    InvalidConfig {
        /// The table or section that is invalid.
        section: String,
        /// What is wrong with it.
        message: String,
    },

    /// The requested tax year is not present in the configuration.
    #[error("Tax year not found: {key}")]
    TaxYearNotFound {
        /// The tax year key that was requested.
        key: String,
    },

    /// An amortization was requested over zero periods.
    #[error("ComputationError: invalid term")]
    InvalidTerm,

    /// The effective-rate solver could not bracket a sign change.
    #[error("ComputationError: no convergent rate")]
    NoConvergentRate,

    /// An intermediate amount does not fit in a `Decimal`.
    #[error("ComputationError: amount out of range")]
    AmountOutOfRange,
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
