//! Domain model for the active budget period.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::models::transaction::{Transaction, TransactionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetStatus {
    Active,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetStatus::Active => "active",
        }
    }
}

/// The single active budget. Stored counters mirror the ledger and are repaired by resync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetPeriod {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate, // inclusive
    pub principal: f64,
    pub fixed_spent: f64,
    pub variable_spent: f64,
    pub status: BudgetStatus,
    pub created_at: String, // RFC 3339 timestamp
    pub updated_at: String, // RFC 3339 timestamp
}

impl BudgetPeriod {
    /// Inclusive day count, never below 1
    pub fn total_duration_days(&self) -> u32 {
        let days = (self.end_date - self.start_date).num_days() + 1;
        days.max(1) as u32
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    pub fn aggregates(&self) -> LedgerAggregates {
        LedgerAggregates {
            fixed_spent: self.fixed_spent,
            variable_spent: self.variable_spent,
        }
    }

    pub fn apply_aggregates(&mut self, aggregates: LedgerAggregates) {
        self.fixed_spent = aggregates.fixed_spent;
        self.variable_spent = aggregates.variable_spent;
    }

    /// Count a newly written transaction against the stored counters
    pub fn record(&mut self, transaction: &Transaction) {
        if !self.contains(transaction.date) {
            return;
        }
        match transaction.transaction_type {
            TransactionType::Fixed => self.fixed_spent += transaction.amount,
            TransactionType::Variable => self.variable_spent += transaction.amount,
        }
    }
}

/// Fixed/variable totals of the ledger rows inside a budget's date range
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LedgerAggregates {
    pub fixed_spent: f64,
    pub variable_spent: f64,
}

impl LedgerAggregates {
    pub fn from_ledger<'a, I>(start: NaiveDate, end: NaiveDate, ledger: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        ledger
            .into_iter()
            .filter(|t| t.date >= start && t.date <= end)
            .fold(Self::default(), |mut acc, t| {
                match t.transaction_type {
                    TransactionType::Fixed => acc.fixed_spent += t.amount,
                    TransactionType::Variable => acc.variable_spent += t.amount,
                }
                acc
            })
    }

    pub fn total(&self) -> f64 {
        self.fixed_spent + self.variable_spent
    }

    /// True when the two sets of counters differ by more than half a cent
    pub fn drifted_from(&self, other: &LedgerAggregates) -> bool {
        (self.fixed_spent - other.fixed_spent).abs() > 0.005
            || (self.variable_spent - other.variable_spent).abs() > 0.005
    }
}
