#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use pocket_ledger::{
    core::{Clock, FixedClock},
    storage::{JsonFileStore, TransactionStore},
    LedgerEngine,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique data directory that outlives the calling test.
pub fn temp_data_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 30, 0).unwrap()
}

pub fn fixed_clock(now: DateTime<Utc>) -> Arc<dyn Clock> {
    Arc::new(FixedClock(now))
}

pub fn file_store(dir: &Path) -> TransactionStore {
    let backend = JsonFileStore::new(dir.to_path_buf()).expect("create json file store");
    TransactionStore::new(Box::new(backend))
}

/// Opens a file-backed engine over `dir` with a frozen clock.
pub fn engine_in(dir: &Path, now: DateTime<Utc>) -> LedgerEngine {
    LedgerEngine::initialize(file_store(dir), fixed_clock(now))
}
