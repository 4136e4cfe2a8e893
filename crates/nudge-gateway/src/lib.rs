//! # Nudge Gateway
//!
//! HTTP surface over the reminder pipeline and the notification
//! orchestrator, built on Axum. Maps the error taxonomy onto status codes:
//! input-quality faults are 400s, extraction-service faults are 500s,
//! orchestration faults map case by case.

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, build_router, serve};
