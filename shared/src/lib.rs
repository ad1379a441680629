use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a transaction is non-discretionary (rent, bills) or day-to-day spending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Non-discretionary spend, reduces the disposable total
    Fixed,
    /// Discretionary spend, counted against the daily limit
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

/// A ledger row as exposed over the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    /// Calendar day of the transaction (YYYY-MM-DD)
    pub date: String,
    /// Free text label, e.g. "Coffee"
    pub item: String,
    /// Always positive
    pub amount: f64,
    pub category: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Instant the row was written (RFC 3339)
    pub recorded_at: String,
}

/// Amount as supplied by a caller: chat commands send text, the dashboard sends numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl From<f64> for AmountInput {
    fn from(value: f64) -> Self {
        AmountInput::Number(value)
    }
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        AmountInput::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub item: String,
    pub amount: AmountInput,
    /// Defaults to "Other"
    pub category: Option<String>,
    /// "fixed" or "variable", defaults to variable
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// Optional date override (YYYY-MM-DD), today in the reference offset otherwise
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionListResponse {
    pub data: Vec<Transaction>,
    /// Sum of all amounts in `data`
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodListResponse {
    /// Ledger period identifiers (YYYY-MM), newest first
    pub periods: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub fixed: f64,
    pub variable: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummaryResponse {
    pub period: String,
    pub categories: Vec<CategoryTotal>,
    pub total: f64,
}

/// The active budget record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPeriod {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub principal: f64,
    pub fixed_spent: f64,
    pub variable_spent: f64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetBudgetRequest {
    pub name: String,
    /// YYYY-MM-DD, must fall in the current month
    pub start_date: String,
    /// YYYY-MM-DD, inclusive, must fall in the current month
    pub end_date: String,
    pub amount: AmountInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetBudgetResponse {
    pub budget: BudgetPeriod,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearBudgetResponse {
    /// False when there was no budget to clear
    pub cleared: bool,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResyncResponse {
    /// None when no budget is active
    pub budget: Option<BudgetPeriod>,
    pub success_message: String,
}

/// Today's limits from the budget simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLimits {
    /// Effective daily limit after carry-forward adjustments, never negative
    pub daily: f64,
    pub spent_today: f64,
    pub left_today: f64,
    /// Accumulated underspend ("piggy bank")
    pub safety_buffer: f64,
    /// True when today's spending already exceeds the limit
    pub is_warning: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatusDetails {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub principal: f64,
    pub fixed_spent: f64,
    #[serde(rename = "varSpent")]
    pub variable_spent: f64,
    pub days_left: u32,
    pub total_days: u32,
    pub disposable_total: f64,
    pub base_daily_limit: f64,
    pub limits: BudgetLimits,
}

/// `{ "active": false }` when no budget is set, the full snapshot otherwise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatusResponse {
    pub active: bool,
    #[serde(flatten)]
    pub details: Option<BudgetStatusDetails>,
}

impl BudgetStatusResponse {
    pub fn inactive() -> Self {
        Self {
            active: false,
            details: None,
        }
    }
}

/// One simulated day, for the spending chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBreakdownEntry {
    pub date: String,
    pub spent: f64,
    pub limit_before: f64,
    pub limit_after: f64,
    pub piggy_bank: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBreakdownResponse {
    pub active: bool,
    pub days: Vec<DailyBreakdownEntry>,
}

/// Commands accepted from the chat front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum ChatCommandRequest {
    SetBudget {
        name: String,
        start: String,
        end: String,
        amount: AmountInput,
    },
    ClearBudget,
    Resync,
    ShowStatus,
    RecentTransactions {
        limit: Option<u32>,
    },
    LogTransaction {
        item: String,
        amount: AmountInput,
        category: Option<String>,
        #[serde(rename = "type")]
        transaction_type: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCommandResponse {
    pub success: bool,
    pub reply: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_status_serializes_to_single_flag() {
        let json = serde_json::to_value(BudgetStatusResponse::inactive()).unwrap();
        assert_eq!(json, serde_json::json!({ "active": false }));
    }

    #[test]
    fn test_active_status_uses_dashboard_field_names() {
        let response = BudgetStatusResponse {
            active: true,
            details: Some(BudgetStatusDetails {
                name: "October".to_string(),
                start_date: "2026-10-01".to_string(),
                end_date: "2026-10-31".to_string(),
                principal: 310.0,
                fixed_spent: 0.0,
                variable_spent: 12.5,
                days_left: 16,
                total_days: 31,
                disposable_total: 310.0,
                base_daily_limit: 10.0,
                limits: BudgetLimits {
                    daily: 10.0,
                    spent_today: 2.5,
                    left_today: 7.5,
                    safety_buffer: 40.0,
                    is_warning: false,
                },
            }),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["active"], true);
        assert_eq!(json["varSpent"], 12.5);
        assert_eq!(json["daysLeft"], 16);
        assert_eq!(json["limits"]["safetyBuffer"], 40.0);
        assert_eq!(json["limits"]["isWarning"], false);

        let parsed: BudgetStatusResponse = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, response);
    }

    #[test]
    fn test_chat_command_tagging() {
        let json = r#"{"command":"logTransaction","item":"Coffee","amount":"4.50","type":"variable"}"#;
        let command: ChatCommandRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            command,
            ChatCommandRequest::LogTransaction {
                item: "Coffee".to_string(),
                amount: AmountInput::Text("4.50".to_string()),
                category: None,
                transaction_type: Some("variable".to_string()),
            }
        );

        let json = r#"{"command":"showStatus"}"#;
        let command: ChatCommandRequest = serde_json::from_str(json).unwrap();
        assert_eq!(command, ChatCommandRequest::ShowStatus);
    }

    #[test]
    fn test_amount_input_accepts_numbers_and_text() {
        let number: AmountInput = serde_json::from_str("12.5").unwrap();
        let text: AmountInput = serde_json::from_str("\"12.5\"").unwrap();
        assert_eq!(number, AmountInput::Number(12.5));
        assert_eq!(text, AmountInput::Text("12.5".to_string()));
    }
}
