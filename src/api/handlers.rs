//! HTTP request handlers for the estimator API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{compute_benefit, compute_loan, compute_tax};
use crate::config::EngineConfig;
use crate::models::{BenefitRequest, LoanRequest};

use super::request::{BenefitEstimateRequest, LoanEstimateRequest, TaxEstimateRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/loan", post(loan_handler))
        .route("/tax", post(tax_handler))
        .route("/benefit", post(benefit_handler))
        .with_state(state)
}

fn json_ok<T: Serialize>(body: T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_error(rejection: JsonRejection, correlation_id: Uuid) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") || body_text.contains("unknown variant") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

/// The tax year containing today's date, or the latest configured year.
fn default_tax_year(config: &EngineConfig) -> String {
    config
        .tax_year_for_date(Utc::now().date_naive())
        .or_else(|| config.tax_years().last())
        .map(|year| year.key.clone())
        .unwrap_or_default()
}

/// Handler for POST /loan.
async fn loan_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoanEstimateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing loan estimate request");

    let request: LoanRequest = match payload {
        Ok(Json(req)) => req.into(),
        Err(rejection) => return rejection_error(rejection, correlation_id).into_response(),
    };

    let start_time = Instant::now();
    match compute_loan(&request, state.config().config()) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                product = %result.product,
                instalment = %result.total_monthly_instalment,
                decision = ?result.decision,
                notes = result.notes.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Loan estimate completed"
            );
            json_ok(result)
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Loan estimate failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /tax.
async fn tax_handler(
    State(state): State<AppState>,
    payload: Result<Json<TaxEstimateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing tax estimate request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_error(rejection, correlation_id).into_response(),
    };

    let config = state.config().config();
    let tax_year = request
        .tax_year
        .clone()
        .unwrap_or_else(|| default_tax_year(config));
    let request = request.into_tax_request(tax_year);

    let start_time = Instant::now();
    match compute_tax(&request, config) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                tax_year = %result.tax_year,
                tax_per_period = %result.tax_after_credits_monthly,
                duration_us = start_time.elapsed().as_micros(),
                "Tax estimate completed"
            );
            json_ok(result)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                tax_year = %request.tax_year,
                error = %err,
                "Tax estimate failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /benefit.
async fn benefit_handler(
    State(state): State<AppState>,
    payload: Result<Json<BenefitEstimateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing benefit estimate request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_error(rejection, correlation_id).into_response(),
    };
    let request = BenefitRequest::from(request);

    let start_time = Instant::now();
    let result = compute_benefit(&request, state.config().config());
    info!(
        correlation_id = %correlation_id,
        eligible_days = result.eligible_days,
        total_payout = %result.total_payout,
        duration_us = start_time.elapsed().as_micros(),
        "Benefit estimate completed"
    );
    json_ok(result)
}
