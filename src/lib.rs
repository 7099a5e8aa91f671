//! Regulatory calculation engine for South African financial estimators.
//!
//! This crate turns raw inputs into capped, pro-rated estimates with a note
//! for every adjustment it makes:
//!
//! - loan affordability under the National Credit Act rate and fee caps
//! - PAYE income tax per year of assessment
//! - UIF unemployment, illness, maternity, adoption and dependants benefits
//!
//! The regulatory tables are loaded from YAML by [`config::ConfigLoader`] and
//! passed by reference into the pure functions in [`calculation`]. The
//! [`api`] module exposes them over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
