//! Integration tests for the estimator engine HTTP API.
//!
//! This suite covers:
//! - Loan estimates (caps, fees, balloon, affordability decisions)
//! - PAYE estimates (brackets, rebates, credits, proration)
//! - UIF benefit estimates (sliding rate, credit days, claim caps)
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use estimator_engine::api::{AppState, create_router};
use estimator_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_router_for_test() -> Router {
    let config = ConfigLoader::load("./config/za").expect("Failed to load config");
    create_router(AppState::new(config))
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn field(json: &Value, name: &str) -> Decimal {
    let value = &json[name];
    match value {
        Value::String(s) => decimal(s),
        other => decimal(&other.to_string()),
    }
}

fn has_note(json: &Value, fragment: &str) -> bool {
    json["notes"]
        .as_array()
        .unwrap()
        .iter()
        .any(|note| note.as_str().unwrap().contains(fragment))
}

async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

// =============================================================================
// Loan estimates
// =============================================================================

#[tokio::test]
async fn test_loan_100k_at_24_percent_over_60_months() {
    let (status, json) = post_json(
        "/loan",
        json!({
            "product": "vehicle",
            "principal": 100000,
            "annual_rate_percent": 24,
            "term_months": 60,
            "monthly_income": 40000,
            "net_monthly_income": 30000,
            "monthly_expenses": 10000
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&json, "applied_annual_rate"), decimal("0.24"));
    assert_eq!(json["rate_capped"], false);
    assert_eq!(field(&json, "monthly_instalment"), decimal("2876.80"));
    assert_eq!(field(&json, "total_repayable"), decimal("172607.79"));
    assert_eq!(json["decision"], "approved");
    assert_eq!(json["approved"], true);
    assert_eq!(json["dti_band"], "low");
}

#[tokio::test]
async fn test_loan_rate_capped_at_ceiling() {
    let (status, json) = post_json(
        "/loan",
        json!({
            "product": "personal",
            "principal": 20000,
            "annual_rate_percent": 35,
            "term_months": 24,
            "monthly_income": 25000,
            "monthly_expenses": 9000,
            "service_fee": 120
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&json, "applied_annual_rate"), decimal("0.2775"));
    assert_eq!(json["rate_capped"], true);
    assert_eq!(field(&json, "service_fee"), decimal("69"));
    // 165 + 10% of 19,000, capped at 1,050
    assert_eq!(field(&json, "initiation_fee"), decimal("1050"));
    assert_eq!(field(&json, "financed_principal"), decimal("21050"));
    assert!(has_note(&json, "capped at the 27.75% ceiling for personal loans"));
    assert!(has_note(&json, "service fee of R120.00 capped at R69.00"));
    let effective = field(&json, "effective_annual_rate");
    assert!(effective > decimal("0.2775"));
}

#[tokio::test]
async fn test_home_loan_repo_linked_cap() {
    let (status, json) = post_json(
        "/loan",
        json!({
            "product": "home",
            "principal": 1500000,
            "deposit": 150000,
            "annual_rate_percent": 22,
            "repo_rate_percent": 8.25,
            "term_months": 240,
            "monthly_income": 80000,
            "monthly_expenses": 20000
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&json, "applied_annual_rate"), decimal("0.2025"));
    assert_eq!(field(&json, "financed_principal"), decimal("1350000"));
}

#[tokio::test]
async fn test_loan_declined_when_unaffordable() {
    let (status, json) = post_json(
        "/loan",
        json!({
            "product": "personal",
            "principal": 80000,
            "annual_rate_percent": 25,
            "term_months": 36,
            "monthly_income": 6000,
            "monthly_expenses": 1000,
            "other_monthly_debt": 1500
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["decision"], "declined");
    assert_eq!(json["approved"], false);
    assert_eq!(json["dti_band"], "high");
    assert!(has_note(&json, "expenses floor applied"));
    assert!(has_note(&json, "exceeds disposable income"));
    assert!(has_note(&json, "above the 55% ceiling"));
}

#[tokio::test]
async fn test_loan_auto_rate_from_credit_score() {
    let (status, json) = post_json(
        "/loan",
        json!({
            "product": "vehicle",
            "principal": 250000,
            "term_months": 72,
            "monthly_income": 45000,
            "monthly_expenses": 12000,
            "credit_score": 700
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // 15% base + 0% score band + (−0.25%) DTI band
    assert_eq!(field(&json, "applied_annual_rate"), decimal("0.1475"));
    assert!(has_note(&json, "derived from credit score 700"));
}

#[tokio::test]
async fn test_loan_zero_term_clamped() {
    let (status, json) = post_json(
        "/loan",
        json!({
            "product": "vehicle",
            "principal": 12000,
            "annual_rate_percent": 0,
            "term_months": 0,
            "monthly_income": 50000,
            "monthly_expenses": 5000
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&json, "monthly_instalment"), decimal("12000"));
    assert!(has_note(&json, "using 1 month"));
}

#[tokio::test]
async fn test_loan_out_of_range_principal_clamped() {
    let (status, json) = post_json(
        "/loan",
        json!({
            "product": "personal",
            "principal": "50000000000000000000000000000",
            "annual_rate_percent": 24,
            "term_months": 60,
            "monthly_income": 40000
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["decision"], "declined");
    assert!(has_note(&json, "principal of"));
    assert!(has_note(&json, "exceeds the supported maximum"));
}

#[tokio::test]
async fn test_loan_missing_amounts_estimated_with_notes() {
    let (status, json) = post_json("/loan", json!({ "product": "personal" })).await;

    assert_eq!(status, StatusCode::OK);
    assert!(has_note(&json, "using 1 month"));
    assert!(has_note(&json, "no gross income supplied"));
}

// =============================================================================
// Tax estimates
// =============================================================================

#[tokio::test]
async fn test_tax_360k_annual_primary_rebate() {
    let (status, json) = post_json(
        "/tax",
        json!({
            "tax_year": "2024/2025",
            "gross": 360000,
            "period": "annual",
            "age": 35
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&json, "taxable_after_retirement"), decimal("360000"));
    assert_eq!(field(&json, "tax_before_credits"), decimal("74632"));
    assert_eq!(field(&json, "rebate"), decimal("17235"));
    assert_eq!(field(&json, "tax_after_credits_annual"), decimal("57397"));
    assert_eq!(field(&json, "tax_after_credits_monthly"), decimal("4783.08"));
}

#[tokio::test]
async fn test_tax_full_period_equals_annual_over_twelve() {
    let (_, prorated) = post_json(
        "/tax",
        json!({
            "tax_year": "2024/2025",
            "gross": 42000,
            "age": 50,
            "days_worked": 30,
            "days_in_period": 30
        }),
    )
    .await;
    let (_, full) = post_json(
        "/tax",
        json!({ "tax_year": "2024/2025", "gross": 42000, "age": 50 }),
    )
    .await;

    assert_eq!(field(&prorated, "proration_factor"), Decimal::ONE);
    assert_eq!(
        field(&prorated, "tax_after_credits_monthly"),
        field(&full, "tax_after_credits_monthly")
    );
}

#[tokio::test]
async fn test_tax_with_medical_and_retirement() {
    let (status, json) = post_json(
        "/tax",
        json!({
            "tax_year": "2024/2025",
            "gross": 50000,
            "age": 45,
            "medical_scheme_member": true,
            "medical_dependants": 1,
            "retirement_contribution": 5000
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&json, "retirement_deduction"), decimal("60000"));
    assert_eq!(field(&json, "taxable_after_retirement"), decimal("540000"));
    assert_eq!(field(&json, "medical_credit_monthly"), decimal("728"));
    // 121,475 + 36% × 27,200 − 17,235 − 8,736
    assert_eq!(field(&json, "tax_after_credits_annual"), decimal("105296"));
}

#[tokio::test]
async fn test_tax_unknown_year_returns_400() {
    let (status, json) = post_json(
        "/tax",
        json!({ "tax_year": "1999/2000", "gross": 30000, "age": 35 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "TAX_YEAR_NOT_FOUND");
}

#[tokio::test]
async fn test_tax_out_of_range_gross_clamped() {
    let (status, json) = post_json(
        "/tax",
        json!({ "tax_year": "2024/2025", "gross": "10000000000000000000000000000", "age": 35 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(field(&json, "tax_after_credits_annual") > Decimal::ZERO);
    assert!(has_note(&json, "gross remuneration of"));
}

#[tokio::test]
async fn test_tax_provisional_year_noted() {
    let (status, json) = post_json(
        "/tax",
        json!({ "tax_year": "2025/2026", "gross": 30000, "age": 35 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(has_note(&json, "provisional"));
}

// =============================================================================
// Benefit estimates
// =============================================================================

#[tokio::test]
async fn test_uif_10k_salary_36_months_unemployment() {
    let (status, json) = post_json(
        "/benefit",
        json!({
            "claim_type": "unemployment",
            "average_monthly_remuneration": 10000,
            "months_contributed": 36
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&json, "capped_remuneration"), decimal("10000"));
    assert_eq!(field(&json, "daily_remuneration"), decimal("328.77"));
    assert_eq!(field(&json, "replacement_rate"), decimal("0.475790"));
    assert_eq!(json["credit_days"], 270);
    assert_eq!(json["eligible_days"], 270);
    assert_eq!(field(&json, "total_payout"), decimal("42234.55"));
}

#[tokio::test]
async fn test_uif_maternity_limited_by_claim_cap() {
    let (status, json) = post_json(
        "/benefit",
        json!({
            "claim_type": "maternity",
            "average_monthly_remuneration": 22000,
            "days_worked": 1400
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&json, "capped_remuneration"), decimal("17712"));
    assert_eq!(field(&json, "replacement_rate"), decimal("0.66"));
    assert_eq!(json["credit_days"], 350);
    assert_eq!(json["eligible_days"], 121);
    assert!(has_note(&json, "maternity claims are limited to 121 days"));
}

#[tokio::test]
async fn test_uif_missing_history_pays_nothing_with_note() {
    let (status, json) = post_json(
        "/benefit",
        json!({ "claim_type": "illness", "average_monthly_remuneration": 9000 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["credit_days"], 0);
    assert_eq!(json["eligible_days"], 0);
    assert_eq!(field(&json, "total_payout"), Decimal::ZERO);
    assert!(has_note(&json, "no credit days accrued"));
}

#[tokio::test]
async fn test_uif_out_of_range_history_clamped() {
    let (status, json) = post_json(
        "/benefit",
        json!({
            "claim_type": "unemployment",
            "average_monthly_remuneration": "70000000000000000000000000000",
            "months_contributed": "20000000000000000000000000000"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["credit_days"], 365);
    assert!(has_note(&json, "exceeds the supported maximum"));
}

// =============================================================================
// Error cases
// =============================================================================

#[tokio::test]
async fn test_unknown_product_returns_validation_error() {
    let (status, json) = post_json(
        "/loan",
        json!({
            "product": "payday",
            "principal": 1000,
            "term_months": 1,
            "monthly_income": 10000
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_missing_content_type_returns_400() {
    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tax")
                .body(Body::from(r#"{"gross": 1, "age": 1}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
