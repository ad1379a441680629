//! # Domain Module
//!
//! Business logic of the budget tracker, independent of HTTP and of the file format.
//!
//! ## Module Organization
//!
//! - **budget_simulator**: the day-by-day carry-forward daily limit calculation
//! - **budget_service**: set, clear, resync and status of the active budget
//! - **transaction_service**: validated ledger writes and ledger queries
//! - **chat_service**: chat commands rendered as human-readable replies
//! - **money_management**: amount parsing, precision rules and formatting
//! - **clock**: the reference-offset time source every day boundary comes from
//!
//! ## Business Rules
//!
//! - At most one budget is active; setting a new one replaces it
//! - Budgets start and end within the current calendar month
//! - Transaction amounts are positive with at most 2 decimal places
//! - Only variable spending drives the daily limit; fixed spending lowers the base
//! - A missing budget is reported as inactive, never as an error

pub mod budget_service;
pub mod budget_simulator;
pub mod chat_service;
pub mod clock;
pub mod commands;
pub mod errors;
pub mod models;
pub mod money_management;
pub mod transaction_service;

pub use budget_service::BudgetService;
pub use budget_simulator::{BudgetSimulator, BudgetSnapshot, SimulatedDay};
pub use chat_service::ChatCommandService;
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{BudgetError, BudgetResult, ValidationError};
pub use money_management::{MoneyManagementConfig, MoneyManagementService};
pub use transaction_service::TransactionService;
