use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use crate::domain::{TransactionId, MAX_TRANSACTION_ID};

/// Clock abstracts access to the current timestamp so services remain deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation backed by `Utc::now`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Allocates transaction ids from the clock's millisecond timestamp, bumping
/// past the last issued id so ids stay strictly increasing even when the clock
/// stalls or moves backwards. Ids never exceed [`MAX_TRANSACTION_ID`].
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicU64,
}

impl IdGenerator {
    /// Starts the sequence after `last`, typically the highest persisted id.
    pub fn starting_after(last: TransactionId) -> Self {
        Self {
            last: AtomicU64::new(last),
        }
    }

    /// Issues the next id, or `None` once the id space is used up.
    pub fn next(&self, now: DateTime<Utc>) -> Option<TransactionId> {
        let candidate = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        self.last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                following(last, candidate)
            })
            .ok()
            .and_then(|previous| following(previous, candidate))
    }

    pub fn last_issued(&self) -> TransactionId {
        self.last.load(Ordering::SeqCst)
    }
}

fn following(last: TransactionId, candidate: TransactionId) -> Option<TransactionId> {
    let id = candidate.max(last.checked_add(1)?);
    (id <= MAX_TRANSACTION_ID).then_some(id)
}
