pub mod json_backend;
pub mod memory;

use std::collections::HashSet;

use crate::{
    domain::{Transaction, MAX_TRANSACTION_ID},
    errors::LedgerError,
};

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Key under which the transaction list is stored unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "transactions";

/// Durable string key-value store the ledger persists into.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Persists the full transaction list under a single key.
///
/// Loading never fails: missing or unreadable data degrades to an empty list.
pub struct TransactionStore {
    backend: Box<dyn KeyValueStore>,
    key: String,
}

impl TransactionStore {
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self::with_key(backend, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(backend: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn load(&self) -> Vec<Transaction> {
        match self.backend.get(&self.key) {
            Ok(Some(raw)) => decode_transactions(&raw),
            Ok(None) => {
                tracing::debug!(key = %self.key, "no stored transactions; starting empty");
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "failed to read stored transactions; starting empty");
                Vec::new()
            }
        }
    }

    /// Overwrites the stored list with `transactions`.
    pub fn save(&self, transactions: &[Transaction]) -> Result<()> {
        let json = serde_json::to_string(transactions)?;
        self.backend.set(&self.key, &json)?;
        tracing::debug!(key = %self.key, count = transactions.len(), "saved transactions");
        Ok(())
    }
}

/// Decodes a stored transaction list, discarding records that cannot be trusted.
///
/// A document that is not a JSON array yields an empty list. Individual records
/// are dropped when they fail to parse, break the transaction invariants, carry
/// an id above [`MAX_TRANSACTION_ID`], or reuse an id seen earlier in the list.
pub fn decode_transactions(raw: &str) -> Vec<Transaction> {
    let records: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(records) => records,
        Err(err) => {
            tracing::warn!(error = %err, "stored transactions are not a JSON array; starting empty");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut transactions = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let txn: Transaction = match serde_json::from_value(record) {
            Ok(txn) => txn,
            Err(err) => {
                tracing::warn!(index, error = %err, "discarding malformed transaction record");
                continue;
            }
        };
        if let Err(err) = txn.validate() {
            tracing::warn!(index, id = txn.id, error = %err, "discarding invalid transaction record");
            continue;
        }
        if txn.id > MAX_TRANSACTION_ID {
            tracing::warn!(index, id = txn.id, "discarding transaction with out-of-range id");
            continue;
        }
        if !seen.insert(txn.id) {
            tracing::warn!(index, id = txn.id, "discarding transaction with duplicate id");
            continue;
        }
        transactions.push(txn);
    }
    transactions
}

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;
