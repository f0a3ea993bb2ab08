use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Identifier assigned to a transaction at creation time.
pub type TransactionId = u64;

/// Largest id a stored record may carry: ids travel as JSON numbers, which
/// lose integer precision above 2^53 - 1.
pub const MAX_TRANSACTION_ID: TransactionId = (1 << 53) - 1;

/// Direction of money flow, derived from the sign of the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Income,
    Expense,
}

/// One recorded income or expense event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub text: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
}

impl Transaction {
    /// Builds a transaction after validating the description and amount.
    ///
    /// The description is stored trimmed.
    pub fn new(
        id: TransactionId,
        text: &str,
        amount: f64,
        date: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let text = validate_text(text)?;
        validate_amount(amount)?;
        Ok(Self {
            id,
            text: text.to_string(),
            amount,
            date,
        })
    }

    /// Checks a description/amount pair without building a transaction.
    pub fn validate_input(text: &str, amount: f64) -> Result<(), ValidationError> {
        validate_text(text)?;
        validate_amount(amount)
    }

    /// Re-checks the invariants on a record that did not pass through `new`,
    /// such as one read back from storage.
    pub fn validate(&self) -> Result<(), ValidationError> {
        Self::validate_input(&self.text, self.amount)
    }

    pub fn kind(&self) -> TransactionKind {
        if self.amount > 0.0 {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind() == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind() == TransactionKind::Expense
    }

    /// Absolute value of the amount.
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }

    /// Aggregation key: the lower-cased description.
    pub fn category(&self) -> String {
        self.text.to_lowercase()
    }
}

fn validate_text(text: &str) -> Result<&str, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    Ok(trimmed)
}

fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if !amount.is_finite() {
        return Err(ValidationError::NonFiniteAmount);
    }
    if amount == 0.0 {
        return Err(ValidationError::ZeroAmount);
    }
    Ok(())
}
