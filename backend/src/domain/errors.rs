//! Error types surfaced by the domain layer.
//!
//! Validation failures carry a corrective message and are never retried. Storage failures
//! are only produced after the retry policy gave up. A missing budget is not an error: the
//! services report it as an inactive state.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid date '{0}'. Use YYYY-MM-DD, for example 2026-10-01")]
    InvalidDate(String),
    #[error("Start date {start} is after end date {end}")]
    StartAfterEnd { start: String, end: String },
    #[error("Date {date} is outside the current month. Budgets must start and end within {month}")]
    OutsideCurrentMonth { date: String, month: String },
    #[error("Amount '{0}' is not a number. Enter something like 150 or 12.50")]
    InvalidAmount(String),
    #[error("Amount must be greater than 0")]
    AmountNotPositive,
    #[error("Budget amount cannot be negative")]
    NegativePrincipal,
    #[error("Amount has too many decimal places. Use at most 2 decimal places")]
    AmountPrecisionTooHigh,
    #[error("Item cannot be empty. Describe what the money was spent on")]
    EmptyItem,
    #[error("Item is too long ({0} characters). Maximum is 256")]
    ItemTooLong(usize),
    #[error("Budget name cannot be empty")]
    EmptyName,
    #[error("Unknown transaction type '{0}'. Use fixed or variable")]
    InvalidTransactionType(String),
    #[error("Unknown ledger period '{0}'. Use YYYY-MM, for example 2026-10")]
    InvalidPeriod(String),
}

#[derive(Debug, Error)]
pub enum BudgetError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Storage failure while trying to {operation}: {cause:#}")]
    Storage {
        operation: &'static str,
        cause: anyhow::Error,
    },
}

impl BudgetError {
    pub fn storage(operation: &'static str, cause: anyhow::Error) -> Self {
        BudgetError::Storage { operation, cause }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, BudgetError::Validation(_))
    }
}

pub type BudgetResult<T> = Result<T, BudgetError>;
