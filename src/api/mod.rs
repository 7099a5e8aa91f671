//! HTTP API module for the estimator engine.
//!
//! A thin JSON adapter over the calculators: `POST /loan`, `POST /tax` and
//! `POST /benefit`. It holds no state besides the loaded configuration.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BenefitEstimateRequest, LoanEstimateRequest, TaxEstimateRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
