//! Read-only view of the ledger handed to renderers after every change.

use crate::core::services::{GroupedTotals, Summary};
use crate::domain::Transaction;

/// Everything a presenter needs to redraw, derived in display order:
/// the transaction list, the summary, then the category and month aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSnapshot<'a> {
    pub transactions: &'a [Transaction],
    pub summary: Summary,
    pub categories: GroupedTotals,
    pub months: GroupedTotals,
}

impl LedgerSnapshot<'_> {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Consumer of ledger snapshots. Implementations replace whatever they showed
/// before with the new snapshot; they never reach back into the engine.
pub trait Presenter {
    fn render(&mut self, snapshot: &LedgerSnapshot<'_>);
}
