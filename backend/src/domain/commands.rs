//! Domain-level command and query types.
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST and chat layers map the public DTOs
//! defined in the `shared` crate to these internal types.

pub mod transactions {
    use shared::AmountInput;

    use crate::domain::models::period::LedgerPeriod;
    use crate::domain::models::transaction::Transaction;

    /// Input for logging a new transaction.
    #[derive(Debug, Clone)]
    pub struct LogTransactionCommand {
        pub item: String,
        pub amount: AmountInput,
        pub category: Option<String>,
        /// Raw type text, parsed case-insensitively. Variable when absent.
        pub transaction_type: Option<String>,
        /// YYYY-MM-DD override, today in the reference offset otherwise.
        pub date: Option<String>,
    }

    /// Result of logging a transaction.
    #[derive(Debug, Clone)]
    pub struct LogTransactionResult {
        pub transaction: Transaction,
        /// True when the write was counted against the active budget.
        pub counted_in_budget: bool,
    }

    /// Result of listing transactions.
    #[derive(Debug, Clone)]
    pub struct TransactionListResult {
        pub transactions: Vec<Transaction>,
        pub total: f64,
    }

    impl TransactionListResult {
        pub fn new(transactions: Vec<Transaction>) -> Self {
            let total = transactions.iter().map(|t| t.amount).sum();
            Self {
                transactions,
                total,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct CategoryTotals {
        pub category: String,
        pub fixed: f64,
        pub variable: f64,
    }

    impl CategoryTotals {
        pub fn total(&self) -> f64 {
            self.fixed + self.variable
        }
    }

    /// Per-category totals for one ledger period, largest total first.
    #[derive(Debug, Clone)]
    pub struct CategorySummary {
        pub period: LedgerPeriod,
        pub categories: Vec<CategoryTotals>,
        pub total: f64,
    }
}

pub mod budget {
    use shared::AmountInput;

    use crate::domain::budget_simulator::BudgetSnapshot;
    use crate::domain::models::budget::BudgetPeriod;

    /// Input for creating (replacing) the active budget.
    #[derive(Debug, Clone)]
    pub struct SetBudgetCommand {
        pub name: String,
        pub start_date: String,
        pub end_date: String,
        pub amount: AmountInput,
    }

    #[derive(Debug, Clone)]
    pub struct SetBudgetResult {
        pub budget: BudgetPeriod,
        pub replaced_previous: bool,
        pub success_message: String,
    }

    #[derive(Debug, Clone)]
    pub struct ClearBudgetResult {
        pub cleared: bool,
        pub success_message: String,
    }

    /// Result of a resync. `budget` is None when no budget is active.
    #[derive(Debug, Clone)]
    pub struct ResyncResult {
        pub budget: Option<BudgetPeriod>,
        pub success_message: String,
    }

    /// Current state of the budget as seen by readers.
    #[derive(Debug, Clone)]
    pub enum BudgetStatusView {
        Inactive,
        Active {
            budget: BudgetPeriod,
            snapshot: BudgetSnapshot,
        },
    }

    impl BudgetStatusView {
        pub fn is_active(&self) -> bool {
            matches!(self, BudgetStatusView::Active { .. })
        }
    }
}
