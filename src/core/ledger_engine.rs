//! In-memory transaction ledger with write-through persistence.

use std::sync::Arc;

use crate::core::clock::{Clock, IdGenerator};
use crate::core::services::{GroupedTotals, MonthBucketing, Summary, SummaryService};
use crate::domain::{Transaction, TransactionId};
use crate::errors::ValidationError;
use crate::presenter::LedgerSnapshot;
use crate::storage::TransactionStore;

/// Owns the session's transactions and keeps the store in sync after every change.
pub struct LedgerEngine {
    transactions: Vec<Transaction>,
    store: TransactionStore,
    clock: Arc<dyn Clock>,
    ids: IdGenerator,
    month_bucketing: MonthBucketing,
    persistence_warning: Option<String>,
}

impl LedgerEngine {
    /// Loads whatever the store holds. Missing or corrupt data starts an empty ledger.
    pub fn initialize(store: TransactionStore, clock: Arc<dyn Clock>) -> Self {
        let transactions = store.load();
        let last_id = transactions.iter().map(|txn| txn.id).max().unwrap_or(0);
        tracing::info!(count = transactions.len(), "ledger initialized");
        Self {
            transactions,
            store,
            clock,
            ids: IdGenerator::starting_after(last_id),
            month_bucketing: MonthBucketing::default(),
            persistence_warning: None,
        }
    }

    pub fn with_month_bucketing(mut self, bucketing: MonthBucketing) -> Self {
        self.month_bucketing = bucketing;
        self
    }

    pub fn set_month_bucketing(&mut self, bucketing: MonthBucketing) {
        self.month_bucketing = bucketing;
    }

    pub fn month_bucketing(&self) -> MonthBucketing {
        self.month_bucketing
    }

    /// Records a new transaction. Invalid input leaves the ledger and the store untouched.
    pub fn add(&mut self, text: &str, amount: f64) -> Result<Transaction, ValidationError> {
        let now = self.clock.now();
        // Rejected input must not consume an id.
        Transaction::validate_input(text, amount)?;
        let id = self.ids.next(now).ok_or_else(|| {
            tracing::warn!("transaction id space exhausted");
            ValidationError::IdsExhausted
        })?;
        let txn = Transaction::new(id, text, amount, now)?;
        self.transactions.push(txn.clone());
        tracing::info!(id = txn.id, amount = txn.amount, "transaction added");
        self.persist();
        Ok(txn)
    }

    /// Removes the transaction with `id`. Returns `false` when no such transaction exists.
    pub fn remove(&mut self, id: TransactionId) -> bool {
        let Some(index) = self.transactions.iter().position(|txn| txn.id == id) else {
            tracing::debug!(id, "remove ignored for unknown transaction");
            return false;
        };
        self.transactions.remove(index);
        tracing::info!(id, "transaction removed");
        self.persist();
        true
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn summary(&self) -> Summary {
        SummaryService::summarize(&self.transactions)
    }

    pub fn category_totals(&self) -> GroupedTotals {
        SummaryService::category_totals(&self.transactions)
    }

    pub fn monthly_totals(&self) -> GroupedTotals {
        SummaryService::monthly_totals(&self.transactions, self.month_bucketing)
    }

    pub fn snapshot(&self) -> LedgerSnapshot<'_> {
        LedgerSnapshot {
            transactions: &self.transactions,
            summary: self.summary(),
            categories: self.category_totals(),
            months: self.monthly_totals(),
        }
    }

    /// Returns and clears the message from the most recent failed save, if any.
    pub fn take_persistence_warning(&mut self) -> Option<String> {
        self.persistence_warning.take()
    }

    // The in-memory change stands even when the write fails.
    fn persist(&mut self) {
        match self.store.save(&self.transactions) {
            Ok(()) => self.persistence_warning = None,
            Err(err) => {
                tracing::warn!(error = %err, "failed to persist transactions");
                self.persistence_warning = Some(format!("Changes were not saved: {err}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::errors::LedgerError;
    use crate::storage::{KeyValueStore, MemoryStore};
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap()))
    }

    fn engine() -> LedgerEngine {
        LedgerEngine::initialize(TransactionStore::new(Box::new(MemoryStore::new())), clock())
    }

    struct CountingStore {
        writes: Arc<AtomicUsize>,
        fail: bool,
    }

    impl KeyValueStore for CountingStore {
        fn get(&self, _key: &str) -> crate::storage::Result<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> crate::storage::Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(LedgerError::Storage("disk full".into()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn add_assigns_increasing_ids_under_frozen_clock() {
        let mut ledger = engine();
        let first = ledger.add("Salary", 5000.0).unwrap();
        let second = ledger.add("Rent", -1500.0).unwrap();
        assert!(second.id > first.id);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn invalid_input_does_not_persist() {
        let writes = Arc::new(AtomicUsize::new(0));
        let store = CountingStore {
            writes: Arc::clone(&writes),
            fail: false,
        };
        let mut ledger = LedgerEngine::initialize(TransactionStore::new(Box::new(store)), clock());

        assert_eq!(ledger.add("  ", 5.0).unwrap_err(), ValidationError::Empty);
        assert_eq!(
            ledger.add("Coffee", 0.0).unwrap_err(),
            ValidationError::ZeroAmount
        );
        assert!(!ledger.remove(42));
        assert_eq!(writes.load(Ordering::SeqCst), 0);

        ledger.add("Coffee", -3.0).unwrap();
        assert_eq!(writes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_save_keeps_mutation_and_reports_warning() {
        let store = CountingStore {
            writes: Arc::new(AtomicUsize::new(0)),
            fail: true,
        };
        let mut ledger = LedgerEngine::initialize(TransactionStore::new(Box::new(store)), clock());
        let txn = ledger.add("Coffee", -3.0).unwrap();
        assert_eq!(ledger.get(txn.id), Some(&txn));
        let warning = ledger.take_persistence_warning().expect("warning recorded");
        assert!(warning.contains("disk full"), "unexpected warning: {warning}");
        assert!(ledger.take_persistence_warning().is_none());
    }

    #[test]
    fn ids_continue_after_persisted_ones() {
        let raw = r#"[{"id":9999999999999,"text":"Old","amount":1,"date":"2024-01-01T00:00:00Z"}]"#;
        let store = TransactionStore::new(Box::new(MemoryStore::with_value("transactions", raw)));
        let mut ledger = LedgerEngine::initialize(store, clock());
        let txn = ledger.add("New", 2.0).unwrap();
        assert_eq!(txn.id, 10_000_000_000_000);
    }

    #[test]
    fn ids_beyond_json_precision_are_not_reused() {
        let raw = r#"[{"id":18446744073709551615,"text":"Huge","amount":1,"date":"2024-01-01T00:00:00Z"},
                      {"id":5,"text":"Old","amount":1,"date":"2024-01-01T00:00:00Z"}]"#;
        let store = TransactionStore::new(Box::new(MemoryStore::with_value("transactions", raw)));
        let mut ledger = LedgerEngine::initialize(store, clock());
        assert_eq!(ledger.len(), 1);
        let txn = ledger.add("New", 2.0).unwrap();
        assert!(txn.id > 5);
        assert_ne!(txn.id, u64::MAX);
    }

    #[test]
    fn add_fails_once_ids_run_out() {
        let raw = format!(
            r#"[{{"id":{},"text":"Last","amount":1,"date":"2024-01-01T00:00:00Z"}}]"#,
            crate::domain::MAX_TRANSACTION_ID
        );
        let store = TransactionStore::new(Box::new(MemoryStore::with_value("transactions", &raw)));
        let mut ledger = LedgerEngine::initialize(store, clock());
        assert_eq!(
            ledger.add("New", 2.0).unwrap_err(),
            ValidationError::IdsExhausted
        );
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn snapshot_reflects_bucketing_switch() {
        let mut ledger = engine();
        ledger.add("Food", -10.0).unwrap();
        assert_eq!(ledger.snapshot().months.get("MAR"), Some(10.0));

        ledger.set_month_bucketing(MonthBucketing::YearMonth);
        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.months.get("MAR 2024"), Some(10.0));
        assert_eq!(snapshot.transactions.len(), 1);
        assert_eq!(snapshot.summary.expense, 10.0);
    }
}
