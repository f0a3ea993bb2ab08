pub mod transaction;

pub use transaction::{Transaction, TransactionId, TransactionKind, MAX_TRANSACTION_ID};
