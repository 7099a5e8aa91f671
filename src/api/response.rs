//! Response types for the estimator API.
//!
//! This module defines the error response structures and maps engine errors
//! to HTTP status codes.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a tax year not found error response.
    pub fn tax_year_not_found(key: &str) -> Self {
        Self::with_details(
            "TAX_YEAR_NOT_FOUND",
            format!("Tax year not found: {}", key),
            format!("The tax year '{}' is not configured in this engine", key),
        )
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response for a request the engine cannot interpret.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidConfig { section, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Invalid configuration",
                    format!("{}: {}", section, message),
                ),
            },
            EngineError::TaxYearNotFound { key } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::tax_year_not_found(&key),
            },
            err @ (EngineError::InvalidTerm
            | EngineError::NoConvergentRate
            | EngineError::AmountOutOfRange) => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "COMPUTATION_ERROR",
                    "Calculation failed",
                    err.to_string(),
                ),
            },
        }
    }
}
