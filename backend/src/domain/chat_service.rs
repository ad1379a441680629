//! Chat command handling.
//!
//! Turns structured chat commands into calls on the budget and transaction services and
//! renders every outcome, including failures, as a reply the chat user can read. Validation
//! problems are echoed with their corrective hint; storage problems get a generic message and
//! the details go to the log.

use shared::{ChatCommandRequest, ChatCommandResponse};
use tracing::{error, info};

use crate::domain::budget_service::BudgetService;
use crate::domain::commands::budget::{BudgetStatusView, SetBudgetCommand};
use crate::domain::commands::transactions::LogTransactionCommand;
use crate::domain::errors::{BudgetError, BudgetResult};
use crate::domain::money_management::MoneyManagementService;
use crate::domain::transaction_service::TransactionService;
use crate::storage::Connection;

const NO_BUDGET_HINT: &str = "No active budget. Set one with setBudget first.";

#[derive(Clone)]
pub struct ChatCommandService<C: Connection> {
    transaction_service: TransactionService<C>,
    budget_service: BudgetService<C>,
    money: MoneyManagementService,
}

impl<C: Connection> ChatCommandService<C> {
    pub fn new(
        transaction_service: TransactionService<C>,
        budget_service: BudgetService<C>,
        money: MoneyManagementService,
    ) -> Self {
        Self {
            transaction_service,
            budget_service,
            money,
        }
    }

    /// Execute a chat command. Never fails: errors become replies.
    pub async fn handle(&self, request: ChatCommandRequest) -> ChatCommandResponse {
        let command_name = command_name(&request);
        info!("Handling chat command {}", command_name);

        let outcome = match request {
            ChatCommandRequest::SetBudget {
                name,
                start,
                end,
                amount,
            } => {
                self.set_budget(SetBudgetCommand {
                    name,
                    start_date: start,
                    end_date: end,
                    amount,
                })
                .await
            }
            ChatCommandRequest::ClearBudget => self.clear_budget().await,
            ChatCommandRequest::Resync => self.resync().await,
            ChatCommandRequest::ShowStatus => self.show_status().await,
            ChatCommandRequest::RecentTransactions { limit } => self.recent_transactions(limit).await,
            ChatCommandRequest::LogTransaction {
                item,
                amount,
                category,
                transaction_type,
            } => {
                self.log_transaction(LogTransactionCommand {
                    item,
                    amount,
                    category,
                    transaction_type,
                    date: None,
                })
                .await
            }
        };

        match outcome {
            Ok(reply) => ChatCommandResponse {
                success: true,
                reply,
            },
            Err(BudgetError::Validation(e)) => ChatCommandResponse {
                success: false,
                reply: format!("⚠️ {}", e),
            },
            Err(e) => {
                error!("Chat command {} failed: {}", command_name, e);
                ChatCommandResponse {
                    success: false,
                    reply: "❌ Something went wrong while talking to the ledger. Please try again in a moment."
                        .to_string(),
                }
            }
        }
    }

    async fn set_budget(&self, command: SetBudgetCommand) -> BudgetResult<String> {
        let result = self.budget_service.set_budget(command).await?;
        let mut reply = format!("✅ {}", result.success_message);
        if result.replaced_previous {
            reply.push_str("\nThe previous budget was replaced.");
        }
        Ok(reply)
    }

    async fn clear_budget(&self) -> BudgetResult<String> {
        let result = self.budget_service.clear_budget().await?;
        if result.cleared {
            Ok(format!("✅ {}", result.success_message))
        } else {
            Ok(format!("⚠️ {}", result.success_message))
        }
    }

    async fn resync(&self) -> BudgetResult<String> {
        let result = self.budget_service.resync().await?;
        match result.budget {
            Some(_) => Ok(format!("✅ {}", result.success_message)),
            None => Ok(format!("⚠️ {}", NO_BUDGET_HINT)),
        }
    }

    async fn show_status(&self) -> BudgetResult<String> {
        let (budget, snapshot) = match self.budget_service.status().await? {
            BudgetStatusView::Inactive => return Ok(format!("⚠️ {}", NO_BUDGET_HINT)),
            BudgetStatusView::Active { budget, snapshot } => (budget, snapshot),
        };

        let mut reply = format!(
            "📊 {} ({} to {})\n\
             Daily limit: {}\n\
             Spent today: {}\n\
             Left today: {}\n\
             Safety buffer: {}\n\
             Days left: {} of {}",
            budget.name,
            budget.start_date,
            budget.end_date,
            self.money.format_amount(snapshot.daily_limit),
            self.money.format_amount(snapshot.spent_today),
            self.money.format_amount(snapshot.left_today),
            self.money.format_amount(snapshot.safety_buffer),
            snapshot.days_left,
            snapshot.total_duration_days
        );
        if snapshot.is_warning {
            reply.push_str("\n⚠️ Today's spending is over the daily limit.");
        }
        Ok(reply)
    }

    async fn recent_transactions(&self, limit: Option<u32>) -> BudgetResult<String> {
        let result = self.transaction_service.recent_transactions(limit).await?;
        if result.transactions.is_empty() {
            return Ok("No transactions recorded yet.".to_string());
        }

        let lines: Vec<String> = result
            .transactions
            .iter()
            .map(|t| {
                format!(
                    "{}  {}  {}  ({}, {})",
                    t.date,
                    t.item,
                    self.money.format_amount(t.amount),
                    t.category,
                    t.transaction_type
                )
            })
            .collect();

        Ok(format!(
            "🧾 Last {} transaction(s):\n{}",
            lines.len(),
            lines.join("\n")
        ))
    }

    async fn log_transaction(&self, command: LogTransactionCommand) -> BudgetResult<String> {
        let result = self.transaction_service.record_transaction(command).await?;
        let t = &result.transaction;
        let mut reply = format!(
            "✅ Logged {}: {} ({}, {}) on {}",
            t.item,
            self.money.format_amount(t.amount),
            t.category,
            t.transaction_type,
            t.date
        );

        if result.counted_in_budget && t.is_variable() {
            if let BudgetStatusView::Active { snapshot, .. } = self.budget_service.status().await? {
                reply.push_str(&format!(
                    "\nLeft today: {}",
                    self.money.format_amount(snapshot.left_today)
                ));
                if snapshot.is_warning {
                    reply.push_str("\n⚠️ Today's spending is over the daily limit.");
                }
            }
        }
        Ok(reply)
    }
}

fn command_name(request: &ChatCommandRequest) -> &'static str {
    match request {
        ChatCommandRequest::SetBudget { .. } => "setBudget",
        ChatCommandRequest::ClearBudget => "clearBudget",
        ChatCommandRequest::Resync => "resync",
        ChatCommandRequest::ShowStatus => "showStatus",
        ChatCommandRequest::RecentTransactions { .. } => "recentTransactions",
        ChatCommandRequest::LogTransaction { .. } => "logTransaction",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::{Clock, FixedClock};
    use crate::storage::csv::test_utils::TestEnvironment;
    use crate::storage::csv::CsvConnection;
    use crate::storage::{new_write_lock, RetryPolicy};
    use chrono::{FixedOffset, NaiveDate};
    use std::sync::Arc;
    use std::time::Duration;

    fn chat(env: &TestEnvironment, day: u32) -> ChatCommandService<CsvConnection> {
        let offset = FixedOffset::east_opt(7 * 3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, day).unwrap();
        let connection = Arc::new(env.connection.clone());
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::at(offset, date, 9, 0, 0).unwrap());
        let retry = RetryPolicy::new(Duration::from_secs(2), 1, Duration::from_millis(1));
        let lock = new_write_lock();
        let money = MoneyManagementService::new();

        ChatCommandService::new(
            TransactionService::new(connection.clone(), clock.clone(), retry, lock.clone(), money.clone()),
            BudgetService::new(connection, clock, retry, lock, money.clone()),
            money,
        )
    }

    fn set_budget(start: &str, end: &str, amount: &str) -> ChatCommandRequest {
        ChatCommandRequest::SetBudget {
            name: "October".to_string(),
            start: start.to_string(),
            end: end.to_string(),
            amount: amount.into(),
        }
    }

    fn log(item: &str, amount: &str) -> ChatCommandRequest {
        ChatCommandRequest::LogTransaction {
            item: item.to_string(),
            amount: amount.into(),
            category: Some("Food".to_string()),
            transaction_type: None,
        }
    }

    #[tokio::test]
    async fn test_status_without_budget() {
        let env = TestEnvironment::new().await.unwrap();
        let response = chat(&env, 3).handle(ChatCommandRequest::ShowStatus).await;
        assert!(response.success);
        assert!(response.reply.starts_with("⚠️ No active budget"));
    }

    #[tokio::test]
    async fn test_set_budget_and_status_replies() {
        let env = TestEnvironment::new().await.unwrap();
        let chat = chat(&env, 1);

        let response = chat.handle(set_budget("2026-10-01", "2026-10-10", "300")).await;
        assert!(response.success);
        assert!(response.reply.starts_with("✅ Budget 'October' set: 300.00"));
        assert!(response.reply.contains("30.00 per day"));

        let response = chat.handle(ChatCommandRequest::ShowStatus).await;
        assert!(response.reply.contains("Daily limit: 30.00"));
        assert!(response.reply.contains("Days left: 10 of 10"));
    }

    #[tokio::test]
    async fn test_validation_replies_carry_hint() {
        let env = TestEnvironment::new().await.unwrap();
        let chat = chat(&env, 1);

        let response = chat.handle(set_budget("2026-10-01", "2026-12-01", "300")).await;
        assert!(!response.success);
        assert!(response.reply.starts_with("⚠️ Date 2026-12-01 is outside the current month"));

        let response = chat.handle(log("Lunch", "12.345")).await;
        assert!(!response.success);
        assert!(response.reply.contains("at most 2 decimal places"));
    }

    #[tokio::test]
    async fn test_log_transaction_reports_left_today() {
        let env = TestEnvironment::new().await.unwrap();
        let chat = chat(&env, 1);
        chat.handle(set_budget("2026-10-01", "2026-10-10", "300")).await;

        let response = chat.handle(log("Lunch", "12.50")).await;
        assert!(response.success);
        assert!(response.reply.starts_with("✅ Logged Lunch: 12.50 (Food, Variable) on 2026-10-01"));
        assert!(response.reply.contains("Left today: 17.50"));

        let response = chat.handle(log("Dinner", "20")).await;
        assert!(response.reply.contains("Left today: -2.50"));
        assert!(response.reply.contains("over the daily limit"));
    }

    #[tokio::test]
    async fn test_recent_clear_and_resync() {
        let env = TestEnvironment::new().await.unwrap();
        let chat = chat(&env, 2);

        let response = chat.handle(ChatCommandRequest::RecentTransactions { limit: None }).await;
        assert_eq!(response.reply, "No transactions recorded yet.");

        chat.handle(log("Coffee", "3")).await;
        let response = chat
            .handle(ChatCommandRequest::RecentTransactions { limit: Some(5) })
            .await;
        assert!(response.reply.starts_with("🧾 Last 1 transaction(s):"));
        assert!(response.reply.contains("Coffee"));

        let response = chat.handle(ChatCommandRequest::Resync).await;
        assert!(response.reply.starts_with("⚠️ No active budget"));

        chat.handle(set_budget("2026-10-01", "2026-10-10", "300")).await;
        let response = chat.handle(ChatCommandRequest::Resync).await;
        assert!(response.reply.contains("variable 3.00"));

        let response = chat.handle(ChatCommandRequest::ClearBudget).await;
        assert_eq!(response.reply, "✅ Budget cleared");
        let response = chat.handle(ChatCommandRequest::ClearBudget).await;
        assert_eq!(response.reply, "⚠️ No active budget to clear");
    }

    #[tokio::test]
    async fn test_storage_failure_reply_is_generic() {
        let env = TestEnvironment::new().await.unwrap();
        let chat = chat(&env, 2);
        std::fs::create_dir(env.base_path.join("budget.yaml")).unwrap();

        let response = chat.handle(ChatCommandRequest::ShowStatus).await;
        assert!(!response.success);
        assert!(response.reply.starts_with("❌"));
        assert!(!response.reply.contains("budget.yaml"));
    }
}
