//! Transaction service domain logic for the budget tracker.
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info};

use crate::domain::clock::Clock;
use crate::domain::commands::transactions::{
    CategorySummary, CategoryTotals, LogTransactionCommand, LogTransactionResult,
    TransactionListResult,
};
use crate::domain::errors::{BudgetError, BudgetResult, ValidationError};
use crate::domain::models::budget::BudgetPeriod;
use crate::domain::models::period::{parse_calendar_date, LedgerPeriod};
use crate::domain::models::transaction::{Transaction, TransactionType, DEFAULT_CATEGORY};
use crate::domain::money_management::MoneyManagementService;
use crate::storage::{BudgetStorage, Connection, LedgerStorage, LedgerWriteLock, RetryPolicy};

const MAX_ITEM_LENGTH: usize = 256;
const DEFAULT_RECENT_LIMIT: u32 = 10;
const MAX_RECENT_LIMIT: u32 = 50;

#[derive(Clone)]
pub struct TransactionService<C: Connection> {
    ledger_repository: C::LedgerRepository,
    budget_repository: C::BudgetRepository,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
    write_lock: LedgerWriteLock,
    money: MoneyManagementService,
}

impl<C: Connection> TransactionService<C> {
    pub fn new(
        connection: Arc<C>,
        clock: Arc<dyn Clock>,
        retry: RetryPolicy,
        write_lock: LedgerWriteLock,
        money: MoneyManagementService,
    ) -> Self {
        Self {
            ledger_repository: connection.create_ledger_repository(),
            budget_repository: connection.create_budget_repository(),
            clock,
            retry,
            write_lock,
            money,
        }
    }

    /// Validate and write a transaction, counting it against the active budget.
    ///
    /// The ledger append and the budget counter update happen under the write lock. When the
    /// budget update fails the appended row is removed again, so the two never disagree.
    pub async fn record_transaction(
        &self,
        command: LogTransactionCommand,
    ) -> BudgetResult<LogTransactionResult> {
        let item = command.item.trim().to_string();
        if item.is_empty() {
            return Err(ValidationError::EmptyItem.into());
        }
        let item_length = item.chars().count();
        if item_length > MAX_ITEM_LENGTH {
            return Err(ValidationError::ItemTooLong(item_length).into());
        }

        let amount = self.money.parse_transaction_amount(&command.amount)?;
        let transaction_type = match command.transaction_type.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw.parse::<TransactionType>()?,
            _ => TransactionType::default(),
        };
        let category = command
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
            .to_string();

        let now = self.clock.now();
        let date = match command.date.as_deref() {
            Some(raw) => parse_calendar_date(raw)?,
            None => now.date_naive(),
        };

        let transaction = Transaction {
            id: Transaction::generate_id(transaction_type, now.timestamp_millis()),
            date,
            item,
            amount,
            category,
            transaction_type,
            recorded_at: now,
        };

        let _guard = self.write_lock.lock().await;

        let budget = self
            .retry
            .run("load budget", || self.budget_repository.load_budget())
            .await
            .map_err(|e| BudgetError::storage("record the transaction", e))?;

        self.retry
            .run("append transaction", || {
                self.ledger_repository.append_transaction(&transaction)
            })
            .await
            .map_err(|e| BudgetError::storage("record the transaction", e))?;

        let counted_in_budget = match budget {
            Some(budget) if budget.contains(transaction.date) => {
                self.count_against_budget(budget, &transaction).await?;
                true
            }
            _ => false,
        };

        info!(
            "Recorded {} transaction {} ({} {:.2} on {}, counted in budget: {})",
            transaction.transaction_type,
            transaction.id,
            transaction.item,
            transaction.amount,
            transaction.date,
            counted_in_budget
        );

        Ok(LogTransactionResult {
            transaction,
            counted_in_budget,
        })
    }

    async fn count_against_budget(
        &self,
        mut budget: BudgetPeriod,
        transaction: &Transaction,
    ) -> BudgetResult<()> {
        budget.record(transaction);
        budget.updated_at = self.clock.now().to_rfc3339();

        let saved = self
            .retry
            .run("save budget", || self.budget_repository.save_budget(&budget))
            .await;

        let Err(save_error) = saved else {
            return Ok(());
        };

        error!(
            "Failed to update budget counters for {}, rolling back the ledger row: {:#}",
            transaction.id, save_error
        );
        let period = transaction.period();
        if let Err(rollback_error) = self
            .retry
            .run("remove transaction", || {
                self.ledger_repository
                    .remove_transaction(period, &transaction.id)
            })
            .await
        {
            error!(
                "Rollback of {} failed, run resync to repair the budget counters: {:#}",
                transaction.id, rollback_error
            );
        }

        Err(BudgetError::storage("record the transaction", save_error))
    }

    /// Transactions of one ledger period in chronological order, current month by default
    pub async fn list_transactions(
        &self,
        period: Option<LedgerPeriod>,
    ) -> BudgetResult<TransactionListResult> {
        let period = period.unwrap_or_else(|| LedgerPeriod::containing(self.clock.today()));
        let transactions = self.load_period(period).await?;
        Ok(TransactionListResult::new(transactions))
    }

    /// The newest `limit` transactions across all periods, newest first
    pub async fn recent_transactions(&self, limit: Option<u32>) -> BudgetResult<TransactionListResult> {
        let limit = limit
            .unwrap_or(DEFAULT_RECENT_LIMIT)
            .clamp(1, MAX_RECENT_LIMIT) as usize;

        let mut recent = Vec::with_capacity(limit);
        for period in self.list_periods().await? {
            let rows = self.load_period(period).await?;
            recent.extend(rows.into_iter().rev().take(limit - recent.len()));
            if recent.len() >= limit {
                break;
            }
        }

        Ok(TransactionListResult::new(recent))
    }

    /// Ledger periods that hold data, newest first
    pub async fn list_periods(&self) -> BudgetResult<Vec<LedgerPeriod>> {
        self.retry
            .run("list ledger periods", || self.ledger_repository.list_periods())
            .await
            .map_err(|e| BudgetError::storage("list the ledger periods", e))
    }

    /// Fixed and variable totals per category for one period, largest first
    pub async fn category_summary(&self, period: Option<LedgerPeriod>) -> BudgetResult<CategorySummary> {
        let period = period.unwrap_or_else(|| LedgerPeriod::containing(self.clock.today()));
        let transactions = self.load_period(period).await?;

        let mut by_category: BTreeMap<String, CategoryTotals> = BTreeMap::new();
        for transaction in &transactions {
            let totals = by_category
                .entry(transaction.category.clone())
                .or_insert_with(|| CategoryTotals {
                    category: transaction.category.clone(),
                    fixed: 0.0,
                    variable: 0.0,
                });
            match transaction.transaction_type {
                TransactionType::Fixed => totals.fixed += transaction.amount,
                TransactionType::Variable => totals.variable += transaction.amount,
            }
        }

        let mut categories: Vec<CategoryTotals> = by_category.into_values().collect();
        categories.sort_by(|a, b| b.total().total_cmp(&a.total()));
        let total = categories.iter().map(CategoryTotals::total).sum();

        Ok(CategorySummary {
            period,
            categories,
            total,
        })
    }

    async fn load_period(&self, period: LedgerPeriod) -> BudgetResult<Vec<Transaction>> {
        self.retry
            .run("read ledger", || self.ledger_repository.list_period(period))
            .await
            .map_err(|e| BudgetError::storage("read the ledger", e))
    }
}
