//! Ledger state, id allocation, and aggregation services.

pub mod clock;
pub mod ledger_engine;
pub mod services;

pub use clock::{Clock, FixedClock, IdGenerator, SystemClock};
pub use ledger_engine::LedgerEngine;
