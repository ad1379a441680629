//! Domain model for a ledger transaction.
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::ValidationError;
use crate::domain::models::period::LedgerPeriod;

/// Category used when the caller does not give one
pub const DEFAULT_CATEGORY: &str = "Other";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Fixed,
    #[default]
    Variable,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Fixed => write!(f, "Fixed"),
            TransactionType::Variable => write!(f, "Variable"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" | "f" => Ok(TransactionType::Fixed),
            "variable" | "var" | "v" => Ok(TransactionType::Variable),
            _ => Err(ValidationError::InvalidTransactionType(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub item: String,
    pub amount: f64,
    pub category: String,
    pub transaction_type: TransactionType,
    pub recorded_at: DateTime<FixedOffset>,
}

impl Transaction {
    /// Generate a transaction ID from its type and the write timestamp.
    /// Format: <fx|vr>-<timestamp_ms>-<random_suffix>
    /// Example: vr-1760583600123-9f2c41ab
    pub fn generate_id(transaction_type: TransactionType, timestamp_ms: i64) -> String {
        let prefix = match transaction_type {
            TransactionType::Fixed => "fx",
            TransactionType::Variable => "vr",
        };
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        format!("{}-{}-{}", prefix, timestamp_ms, &suffix[..8])
    }

    pub fn period(&self) -> LedgerPeriod {
        LedgerPeriod::containing(self.date)
    }

    pub fn is_variable(&self) -> bool {
        self.transaction_type == TransactionType::Variable
    }
}
