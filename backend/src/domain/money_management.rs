//! Money handling rules shared by the transaction and budget services.
//!
//! Amounts arrive from the chat interface either as JSON numbers or as free text such as
//! `"1,250.50"`. This module owns cleaning, parsing and the precision rules, plus the single
//! place amounts are formatted for replies.

use shared::AmountInput;

use crate::domain::errors::ValidationError;

const MAX_DECIMAL_PLACES: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct MoneyManagementConfig {
    pub currency_symbol: String,
}

/// Parses and formats money amounts
#[derive(Debug, Clone, Default)]
pub struct MoneyManagementService {
    config: MoneyManagementConfig,
}

impl MoneyManagementService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MoneyManagementConfig) -> Self {
        Self { config }
    }

    /// Parse a transaction amount: strictly positive, at most 2 decimal places
    pub fn parse_transaction_amount(&self, input: &AmountInput) -> Result<f64, ValidationError> {
        let amount = self.parse_amount(input)?;
        if amount <= 0.0 {
            return Err(ValidationError::AmountNotPositive);
        }
        Ok(amount)
    }

    /// Parse a budget principal: zero allowed, negative rejected
    pub fn parse_principal(&self, input: &AmountInput) -> Result<f64, ValidationError> {
        let amount = self.parse_amount(input)?;
        if amount < 0.0 {
            return Err(ValidationError::NegativePrincipal);
        }
        Ok(amount)
    }

    fn parse_amount(&self, input: &AmountInput) -> Result<f64, ValidationError> {
        let amount = match input {
            AmountInput::Number(value) => *value,
            AmountInput::Text(text) => {
                let cleaned = self.clean_amount_text(text);
                if cleaned.is_empty() {
                    return Err(ValidationError::InvalidAmount(text.trim().to_string()));
                }
                if Self::decimal_places(&cleaned) > MAX_DECIMAL_PLACES {
                    return Err(ValidationError::AmountPrecisionTooHigh);
                }
                cleaned
                    .parse::<f64>()
                    .map_err(|_| ValidationError::InvalidAmount(text.trim().to_string()))?
            }
        };

        if !amount.is_finite() {
            return Err(ValidationError::InvalidAmount(amount.to_string()));
        }
        if self.has_too_many_decimal_places(amount) {
            return Err(ValidationError::AmountPrecisionTooHigh);
        }
        Ok(amount)
    }

    /// Strip the currency symbol, thousands separators and whitespace
    pub fn clean_amount_text(&self, text: &str) -> String {
        let mut cleaned = text.trim().to_string();
        if !self.config.currency_symbol.is_empty() {
            cleaned = cleaned.replace(&self.config.currency_symbol, "");
        }
        cleaned.replace(',', "").replace(char::is_whitespace, "")
    }

    fn decimal_places(cleaned: &str) -> usize {
        cleaned
            .split_once('.')
            .map(|(_, fraction)| fraction.trim_end_matches('0').len())
            .unwrap_or(0)
    }

    fn has_too_many_decimal_places(&self, amount: f64) -> bool {
        let cents = amount * 100.0;
        (cents - cents.round()).abs() > 1e-6
    }

    /// Format amount for display
    pub fn format_amount(&self, amount: f64) -> String {
        if amount < 0.0 {
            format!("-{}{:.2}", self.config.currency_symbol, amount.abs())
        } else {
            format!("{}{:.2}", self.config.currency_symbol, amount)
        }
    }
}
