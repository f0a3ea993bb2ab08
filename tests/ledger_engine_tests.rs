mod common;

use common::{at, engine_in, fixed_clock, temp_data_dir};
use pocket_ledger::{
    core::services::MonthBucketing,
    presenter::{LedgerSnapshot, Presenter},
    storage::{self, KeyValueStore, MemoryStore, TransactionStore},
    LedgerEngine, LedgerError, ValidationError,
};

fn memory_engine() -> LedgerEngine {
    LedgerEngine::initialize(
        TransactionStore::new(Box::new(MemoryStore::new())),
        fixed_clock(at(2024, 3, 5)),
    )
}

#[test]
fn add_issues_strictly_increasing_ids_and_moves_balance() {
    let mut ledger = memory_engine();
    let mut last_id = 0;
    let mut expected_balance = 0.0;
    for (text, amount) in [("Salary", 5000.0), ("Rent", -1500.0), ("Food", -200.0), ("Gift", 25.5)] {
        let before = ledger.summary().balance;
        let txn = ledger.add(text, amount).expect("valid transaction");
        assert!(txn.id > last_id, "id {} not greater than {}", txn.id, last_id);
        last_id = txn.id;
        expected_balance += amount;
        assert_eq!(ledger.summary().balance - before, amount);
    }
    assert_eq!(ledger.summary().balance, expected_balance);
}

#[test]
fn blank_descriptions_are_rejected() {
    let mut ledger = memory_engine();
    assert_eq!(ledger.add("", 10.0).unwrap_err(), ValidationError::Empty);
    assert_eq!(ledger.add("   ", 5.0).unwrap_err(), ValidationError::Empty);
    assert!(ledger.is_empty());
}

#[test]
fn zero_amount_is_rejected() {
    let mut ledger = memory_engine();
    assert_eq!(
        ledger.add("Coffee", 0.0).unwrap_err(),
        ValidationError::ZeroAmount
    );
    assert_eq!(ledger.len(), 0);
}

#[test]
fn non_finite_amounts_are_rejected() {
    let mut ledger = memory_engine();
    for amount in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
        assert_eq!(
            ledger.add("Coffee", amount).unwrap_err(),
            ValidationError::NonFiniteAmount
        );
    }
    assert!(ledger.is_empty());
    assert_eq!(ledger.summary().balance, 0.0);
}

/// Backend whose reads always fail, as with an unreadable data directory.
struct UnreadableStore;

impl KeyValueStore for UnreadableStore {
    fn get(&self, _key: &str) -> storage::Result<Option<String>> {
        Err(LedgerError::Storage("permission denied".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> storage::Result<()> {
        Ok(())
    }
}

#[test]
fn unreadable_store_starts_an_empty_ledger() {
    let mut ledger = LedgerEngine::initialize(
        TransactionStore::new(Box::new(UnreadableStore)),
        fixed_clock(at(2024, 3, 5)),
    );
    assert!(ledger.is_empty());

    let txn = ledger.add("Salary", 5000.0).unwrap();
    assert_eq!(ledger.transactions(), &[txn]);
    assert!(ledger.take_persistence_warning().is_none());
}

#[test]
fn remove_is_idempotent() {
    let mut ledger = memory_engine();
    let keep = ledger.add("Salary", 5000.0).unwrap();
    let drop = ledger.add("Rent", -1500.0).unwrap();

    assert!(ledger.remove(drop.id));
    assert_eq!(ledger.len(), 1);
    assert!(!ledger.remove(drop.id));
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.transactions()[0], keep);
}

#[test]
fn salary_rent_food_scenario() {
    let mut ledger = memory_engine();
    ledger.add("Salary", 5000.0).unwrap();
    ledger.add("Rent", -1500.0).unwrap();
    ledger.add("Food", -200.0).unwrap();

    let summary = ledger.summary();
    assert_eq!(summary.balance, 3300.0);
    assert_eq!(summary.income, 5000.0);
    assert_eq!(summary.expense, 1700.0);

    let categories = ledger.category_totals();
    assert_eq!(categories.len(), 3);
    assert_eq!(categories.get("salary"), Some(5000.0));
    assert_eq!(categories.get("rent"), Some(1500.0));
    assert_eq!(categories.get("food"), Some(200.0));
}

#[test]
fn monthly_totals_bucket_by_calendar_month() {
    let dir = temp_data_dir();
    engine_in(&dir, at(2024, 3, 12)).add("Food", -100.0).unwrap();
    engine_in(&dir, at(2024, 4, 2)).add("Food", -50.0).unwrap();

    let ledger = engine_in(&dir, at(2024, 4, 3));
    let months = ledger.monthly_totals();
    assert_eq!(months.len(), 2);
    assert_eq!(months.get("MAR"), Some(100.0));
    assert_eq!(months.get("APR"), Some(50.0));
}

#[test]
fn same_month_of_different_years_merges_unless_scoped() {
    let dir = temp_data_dir();
    engine_in(&dir, at(2023, 3, 1)).add("Food", -10.0).unwrap();
    engine_in(&dir, at(2024, 3, 1)).add("Food", -20.0).unwrap();

    let ledger = engine_in(&dir, at(2024, 3, 2));
    assert_eq!(ledger.monthly_totals().get("MAR"), Some(30.0));

    let ledger = ledger.with_month_bucketing(MonthBucketing::YearMonth);
    let months = ledger.monthly_totals();
    assert_eq!(months.get("MAR 2023"), Some(10.0));
    assert_eq!(months.get("MAR 2024"), Some(20.0));
}

#[derive(Default)]
struct RecordingPresenter {
    frames: Vec<(usize, f64, usize, usize)>,
}

impl Presenter for RecordingPresenter {
    fn render(&mut self, snapshot: &LedgerSnapshot<'_>) {
        self.frames.push((
            snapshot.transactions.len(),
            snapshot.summary.balance,
            snapshot.categories.len(),
            snapshot.months.len(),
        ));
    }
}

#[test]
fn presenter_receives_fresh_snapshot_after_each_mutation() {
    let mut ledger = memory_engine();
    let mut presenter = RecordingPresenter::default();

    let salary = ledger.add("Salary", 5000.0).unwrap();
    presenter.render(&ledger.snapshot());
    ledger.add("salary", 100.0).unwrap();
    presenter.render(&ledger.snapshot());
    ledger.remove(salary.id);
    presenter.render(&ledger.snapshot());

    assert_eq!(
        presenter.frames,
        vec![(1, 5000.0, 1, 1), (2, 5100.0, 1, 1), (1, 100.0, 1, 1)]
    );
}
