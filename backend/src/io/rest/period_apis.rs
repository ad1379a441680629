//! # REST API for Ledger Periods

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::PeriodListResponse;
use tracing::info;

use crate::io::rest::error_response;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_periods))
}

/// Ledger periods that hold data, newest first
pub async fn list_periods(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/periods");

    match state.transaction_service.list_periods().await {
        Ok(periods) => {
            let response = PeriodListResponse {
                periods: periods.iter().map(ToString::to_string).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("list ledger periods", e),
    }
}
