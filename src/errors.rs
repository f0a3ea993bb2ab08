use thiserror::Error;

/// Reasons a new transaction is rejected before it touches the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Description must not be empty")]
    Empty,
    #[error("Amount must not be zero")]
    ZeroAmount,
    #[error("Amount must be a finite number")]
    NonFiniteAmount,
    #[error("No transaction ids remain")]
    IdsExhausted,
}

/// Error type that captures storage and configuration failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
