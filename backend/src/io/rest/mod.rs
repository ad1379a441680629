//! # REST API Interface Layer
//!
//! HTTP endpoints for the dashboard and the chat front end.
//!
//! - `/api/transactions`: ledger reads and writes
//! - `/api/budget`: budget lifecycle, status and the daily breakdown
//! - `/api/periods`: ledger periods that hold data
//! - `/api/chat`: structured chat commands answered with reply text
//! - `/api/health`: liveness
//!
//! Validation failures map to `400` with code `VALIDATION_ERROR`. Storage failures map to
//! `500` with code `STORAGE_ERROR` and a generic message; the details are only logged.

pub mod budget_apis;
pub mod chat_apis;
pub mod health_apis;
pub mod mappers;
pub mod period_apis;
pub mod transaction_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;
use tracing::{error, warn};

use crate::domain::errors::BudgetError;

pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";

/// Translate a domain error into an HTTP response
pub fn error_response(operation: &str, error: BudgetError) -> Response {
    match error {
        BudgetError::Validation(e) => {
            warn!("Rejected request to {}: {}", operation, e);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                    code: VALIDATION_ERROR.to_string(),
                }),
            )
                .into_response()
        }
        storage @ BudgetError::Storage { .. } => {
            error!("Failed to {}: {}", operation, storage);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "The ledger is temporarily unavailable. Please try again.".to_string(),
                    code: STORAGE_ERROR.to_string(),
                }),
            )
                .into_response()
        }
    }
}
