//! # Budget Tracker Backend
//!
//! Keeps a daily spending ledger and a single active budget, and tells you how much you may
//! still spend today.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, chat commands)
//!     ↓
//! Domain Layer (budget simulator, services)
//!     ↓
//! Storage Layer (monthly CSV ledgers, budget.yaml)
//! ```
//!
//! All writes go through one shared lock, so a transaction and the budget counters it
//! touches are never updated by two requests at once.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{
    BudgetService, ChatCommandService, Clock, MoneyManagementService, SystemClock,
    TransactionService,
};
use crate::storage::csv::CsvConnection;
use crate::storage::new_write_lock;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub transaction_service: TransactionService<CsvConnection>,
    pub budget_service: BudgetService<CsvConnection>,
    pub chat_service: ChatCommandService<CsvConnection>,
}

/// Initialize the backend with the wall clock in the configured offset
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    let clock = SystemClock::new(config.reference_offset()?);
    initialize_backend_with_clock(config, Arc::new(clock))
}

pub fn initialize_backend_with_clock(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<AppState> {
    info!("Setting up storage in {}", config.data_directory.display());
    let connection = Arc::new(
        CsvConnection::new(&config.data_directory)
            .with_context(|| format!("Failed to open data directory {}", config.data_directory.display()))?,
    );

    info!("Setting up domain model");
    let write_lock = new_write_lock();
    let retry = config.retry_policy();
    let money = MoneyManagementService::with_config(config.money_config());

    let transaction_service = TransactionService::new(
        connection.clone(),
        clock.clone(),
        retry,
        write_lock.clone(),
        money.clone(),
    );
    let budget_service = BudgetService::new(connection, clock, retry, write_lock, money.clone());
    let chat_service =
        ChatCommandService::new(transaction_service.clone(), budget_service.clone(), money);

    Ok(AppState {
        transaction_service,
        budget_service,
        chat_service,
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    let origin = cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid cors_origin '{}'", cors_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/transactions", io::rest::transaction_apis::router())
        .nest("/budget", io::rest::budget_apis::router())
        .nest("/periods", io::rest::period_apis::router())
        .nest("/chat", io::rest::chat_apis::router())
        .nest("/health", io::rest::health_apis::router());

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}
