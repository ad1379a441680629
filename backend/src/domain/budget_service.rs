//! Budget lifecycle and status.
//!
//! Owns the single active [`BudgetPeriod`]: setting (replacing) it, clearing it,
//! resynchronising its stored counters from the ledger and producing the simulated status.
//! All mutations run under the shared ledger write lock; status reads take no lock and derive
//! their aggregates straight from the ledger.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::budget_simulator::{BudgetSimulator, SimulatedDay};
use crate::domain::clock::Clock;
use crate::domain::commands::budget::{
    BudgetStatusView, ClearBudgetResult, ResyncResult, SetBudgetCommand, SetBudgetResult,
};
use crate::domain::errors::{BudgetError, BudgetResult, ValidationError};
use crate::domain::models::budget::{BudgetPeriod, BudgetStatus, LedgerAggregates};
use crate::domain::models::period::{parse_calendar_date, LedgerPeriod};
use crate::domain::models::transaction::Transaction;
use crate::domain::money_management::MoneyManagementService;
use crate::storage::{BudgetStorage, Connection, LedgerStorage, LedgerWriteLock, RetryPolicy};

#[derive(Clone)]
pub struct BudgetService<C: Connection> {
    ledger_repository: C::LedgerRepository,
    budget_repository: C::BudgetRepository,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
    write_lock: LedgerWriteLock,
    money: MoneyManagementService,
}

impl<C: Connection> BudgetService<C> {
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

    /// Create the active budget, replacing any previous one in full
    pub async fn set_budget(&self, command: SetBudgetCommand) -> BudgetResult<SetBudgetResult> {
        let name = command.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }

        let start_date = parse_calendar_date(&command.start_date)?;
        let end_date = parse_calendar_date(&command.end_date)?;
        if start_date > end_date {
            return Err(ValidationError::StartAfterEnd {
                start: start_date.to_string(),
                end: end_date.to_string(),
            }
            .into());
        }

        let current_month = LedgerPeriod::containing(self.clock.today());
        for date in [start_date, end_date] {
            if !current_month.contains(date) {
                return Err(ValidationError::OutsideCurrentMonth {
                    date: date.to_string(),
                    month: current_month.to_string(),
                }
                .into());
            }
        }

        let principal = self.money.parse_principal(&command.amount)?;

        let _guard = self.write_lock.lock().await;

        let ledger = self.load_ledger(start_date, end_date).await?;
        let aggregates = LedgerAggregates::from_ledger(start_date, end_date, &ledger);
        let previous = self.load_budget().await?;

        let now = self.clock.now().to_rfc3339();
        let mut budget = BudgetPeriod {
            name,
            start_date,
            end_date,
            principal,
            fixed_spent: 0.0,
            variable_spent: 0.0,
            status: BudgetStatus::Active,
            created_at: now.clone(),
            updated_at: now,
        };
        budget.apply_aggregates(aggregates);
        self.save_budget(&budget).await?;

        info!(
            "Budget '{}' set: {} to {}, principal {:.2}, seeded fixed {:.2} variable {:.2}",
            budget.name,
            budget.start_date,
            budget.end_date,
            budget.principal,
            budget.fixed_spent,
            budget.variable_spent
        );

        let base_daily_limit =
            (budget.principal - budget.fixed_spent) / f64::from(budget.total_duration_days());
        let success_message = format!(
            "Budget '{}' set: {} from {} to {} ({} days, {} per day)",
            budget.name,
            self.money.format_amount(budget.principal),
            budget.start_date,
            budget.end_date,
            budget.total_duration_days(),
            self.money.format_amount(base_daily_limit)
        );

        Ok(SetBudgetResult {
            budget,
            replaced_previous: previous.is_some(),
            success_message,
        })
    }

    /// Remove the active budget. Clearing when none exists is not an error.
    pub async fn clear_budget(&self) -> BudgetResult<ClearBudgetResult> {
        let _guard = self.write_lock.lock().await;

        let cleared = self
            .retry
            .run("delete budget", || self.budget_repository.delete_budget())
            .await
            .map_err(|e| BudgetError::storage("clear the budget", e))?;

        let success_message = if cleared {
            info!("Active budget cleared");
            "Budget cleared".to_string()
        } else {
            "No active budget to clear".to_string()
        };

        Ok(ClearBudgetResult {
            cleared,
            success_message,
        })
    }

    /// Recompute the stored counters from the ledger. Running it twice changes nothing.
    pub async fn resync(&self) -> BudgetResult<ResyncResult> {
        let _guard = self.write_lock.lock().await;

        let Some(mut budget) = self.load_budget().await? else {
            return Ok(ResyncResult {
                budget: None,
                success_message: "No active budget to resync".to_string(),
            });
        };

        let ledger = self.load_ledger(budget.start_date, budget.end_date).await?;
        let recomputed = LedgerAggregates::from_ledger(budget.start_date, budget.end_date, &ledger);
        let stored = budget.aggregates();

        if recomputed.drifted_from(&stored) {
            warn!(
                "Budget '{}' counters drifted: stored fixed {:.2} variable {:.2}, ledger fixed {:.2} variable {:.2}",
                budget.name,
                stored.fixed_spent,
                stored.variable_spent,
                recomputed.fixed_spent,
                recomputed.variable_spent
            );
        }

        budget.apply_aggregates(recomputed);
        budget.updated_at = self.clock.now().to_rfc3339();
        self.save_budget(&budget).await?;

        info!(
            "Budget '{}' resynced from {} ledger rows",
            budget.name,
            ledger.len()
        );

        let success_message = format!(
            "Budget '{}' resynced: fixed {}, variable {}",
            budget.name,
            self.money.format_amount(budget.fixed_spent),
            self.money.format_amount(budget.variable_spent)
        );

        Ok(ResyncResult {
            budget: Some(budget),
            success_message,
        })
    }

    /// Simulate the active budget as of now
    pub async fn status(&self) -> BudgetResult<BudgetStatusView> {
        let Some(budget) = self.load_budget().await? else {
            return Ok(BudgetStatusView::Inactive);
        };

        let now = self.clock.now();
        let today = now.date_naive();
        let ledger = self
            .load_ledger(budget.start_date.min(today), budget.end_date.max(today))
            .await?;

        let snapshot = BudgetSimulator::simulate(&budget, &ledger, now);

        let derived = LedgerAggregates {
            fixed_spent: snapshot.fixed_spent,
            variable_spent: snapshot.variable_spent,
        };
        if derived.drifted_from(&budget.aggregates()) {
            warn!(
                "Stored counters for budget '{}' differ from the ledger, run resync to repair them",
                budget.name
            );
        }

        Ok(BudgetStatusView::Active { budget, snapshot })
    }

    /// Replayed days of the active budget, `None` when none is set
    pub async fn daily_breakdown(&self) -> BudgetResult<Option<Vec<SimulatedDay>>> {
        match self.status().await? {
            BudgetStatusView::Inactive => Ok(None),
            BudgetStatusView::Active { snapshot, .. } => Ok(Some(snapshot.trace)),
        }
    }

    async fn load_budget(&self) -> BudgetResult<Option<BudgetPeriod>> {
        self.retry
            .run("load budget", || self.budget_repository.load_budget())
            .await
            .map_err(|e| BudgetError::storage("load the budget", e))
    }

    async fn save_budget(&self, budget: &BudgetPeriod) -> BudgetResult<()> {
        self.retry
            .run("save budget", || self.budget_repository.save_budget(budget))
            .await
            .map_err(|e| BudgetError::storage("save the budget", e))
    }

    async fn load_ledger(&self, start: NaiveDate, end: NaiveDate) -> BudgetResult<Vec<Transaction>> {
        self.retry
            .run("read ledger", || self.ledger_repository.list_range(start, end))
            .await
            .map_err(|e| BudgetError::storage("read the ledger", e))
    }
}
