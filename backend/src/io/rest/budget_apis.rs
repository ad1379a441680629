//! # REST API for the Budget
//!
//! Endpoints for setting, clearing and resyncing the active budget, and for its simulated
//! status and daily breakdown.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use shared::{
    ClearBudgetResponse, DailyBreakdownResponse, ResyncResponse, SetBudgetRequest,
    SetBudgetResponse,
};
use tracing::info;

use crate::domain::commands::budget::SetBudgetCommand;
use crate::io::rest::error_response;
use crate::io::rest::mappers::BudgetMapper;
use crate::AppState;

/// Create a router for budget related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(set_budget).delete(clear_budget))
        .route("/status", get(get_status))
        .route("/daily", get(get_daily_breakdown))
        .route("/resync", post(resync_budget))
}

/// Current simulated status, `{ "active": false }` without a budget
pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/budget/status");

    match state.budget_service.status().await {
        Ok(view) => (StatusCode::OK, Json(BudgetMapper::to_status_response(view))).into_response(),
        Err(e) => error_response("compute the budget status", e),
    }
}

/// Replayed days of the active budget for the spending chart
pub async fn get_daily_breakdown(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/budget/daily");

    match state.budget_service.daily_breakdown().await {
        Ok(trace) => {
            let response = DailyBreakdownResponse {
                active: trace.is_some(),
                days: trace
                    .unwrap_or_default()
                    .into_iter()
                    .map(BudgetMapper::to_breakdown_entry)
                    .collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("compute the daily breakdown", e),
    }
}

/// Create the active budget, replacing any previous one
pub async fn set_budget(
    State(state): State<AppState>,
    Json(request): Json<SetBudgetRequest>,
) -> impl IntoResponse {
    info!("POST /api/budget - request: {:?}", request);

    let command = SetBudgetCommand {
        name: request.name,
        start_date: request.start_date,
        end_date: request.end_date,
        amount: request.amount,
    };

    match state.budget_service.set_budget(command).await {
        Ok(result) => {
            let response = SetBudgetResponse {
                budget: BudgetMapper::to_dto(result.budget),
                success_message: result.success_message,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("set the budget", e),
    }
}

pub async fn clear_budget(State(state): State<AppState>) -> impl IntoResponse {
    info!("DELETE /api/budget");

    match state.budget_service.clear_budget().await {
        Ok(result) => {
            let response = ClearBudgetResponse {
                cleared: result.cleared,
                success_message: result.success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("clear the budget", e),
    }
}

/// Recompute the stored counters from the ledger
pub async fn resync_budget(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/budget/resync");

    match state.budget_service.resync().await {
        Ok(result) => {
            let response = ResyncResponse {
                budget: result.budget.map(BudgetMapper::to_dto),
                success_message: result.success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("resync the budget", e),
    }
}
