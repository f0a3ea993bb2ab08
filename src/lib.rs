#![doc(test(attr(deny(warnings))))]

//! Pocket Ledger records income and expense entries, persists them, and derives
//! the running balance plus category and monthly aggregates a presenter draws.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod presenter;
pub mod storage;
pub mod utils;

pub use crate::core::ledger_engine::LedgerEngine;
pub use crate::domain::transaction::{Transaction, TransactionId};
pub use crate::errors::{LedgerError, ValidationError};

/// Initializes global tracing. Safe to call more than once.
pub fn init() {
    utils::init_tracing();
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
