//! # REST API for Transactions
//!
//! Endpoints for logging transactions and reading the ledger.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use shared::CreateTransactionRequest;
use tracing::info;

use crate::domain::errors::{BudgetError, BudgetResult};
use crate::domain::models::period::LedgerPeriod;
use crate::io::rest::error_response;
use crate::io::rest::mappers::TransactionMapper;
use crate::AppState;

/// Create a router for transaction related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transactions).post(create_transaction))
        .route("/recent", get(recent_transactions))
        .route("/summary", get(category_summary))
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    /// YYYY-MM, current month when absent
    pub period: Option<String>,
}

impl PeriodQuery {
    fn ledger_period(&self) -> BudgetResult<Option<LedgerPeriod>> {
        self.period
            .as_deref()
            .map(str::parse::<LedgerPeriod>)
            .transpose()
            .map_err(BudgetError::from)
    }
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<u32>,
}

/// List one ledger period in chronological order
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> impl IntoResponse {
    info!("GET /api/transactions - query: {:?}", query);

    let result = match query.ledger_period() {
        Ok(period) => state.transaction_service.list_transactions(period).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(result) => (StatusCode::OK, Json(TransactionMapper::to_list_response(result))).into_response(),
        Err(e) => error_response("list transactions", e),
    }
}

/// Newest transactions across all periods
pub async fn recent_transactions(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> impl IntoResponse {
    info!("GET /api/transactions/recent - query: {:?}", query);

    match state.transaction_service.recent_transactions(query.limit).await {
        Ok(result) => (StatusCode::OK, Json(TransactionMapper::to_list_response(result))).into_response(),
        Err(e) => error_response("list recent transactions", e),
    }
}

/// Per-category totals for one ledger period
pub async fn category_summary(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> impl IntoResponse {
    info!("GET /api/transactions/summary - query: {:?}", query);

    let result = match query.ledger_period() {
        Ok(period) => state.transaction_service.category_summary(period).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(summary) => (StatusCode::OK, Json(TransactionMapper::to_summary_response(summary))).into_response(),
        Err(e) => error_response("summarise transactions", e),
    }
}

/// Log a new transaction
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    info!("POST /api/transactions - request: {:?}", request);

    let command = TransactionMapper::to_log_command(request);
    match state.transaction_service.record_transaction(command).await {
        Ok(result) => (
            StatusCode::CREATED,
            Json(TransactionMapper::to_dto(result.transaction)),
        )
            .into_response(),
        Err(e) => error_response("record a transaction", e),
    }
}
