//! Aggregations derived from the transaction log.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::domain::Transaction;
use crate::utils::round_cents;

const MONTH_LABELS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Balance, income and expense totals for a set of transactions.
///
/// `expense` is reported as a non-negative magnitude while `balance` keeps its sign.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    pub balance: f64,
    pub income: f64,
    pub expense: f64,
}

impl Summary {
    /// Copy of the summary rounded to two decimals for display.
    pub fn rounded(&self) -> Self {
        Self {
            balance: round_cents(self.balance),
            income: round_cents(self.income),
            expense: round_cents(self.expense),
        }
    }
}

/// How transactions are grouped into month buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MonthBucketing {
    /// Calendar month only; the same month of different years shares a bucket.
    #[default]
    MonthOnly,
    /// Calendar month scoped to its year, labelled like `MAR 2024`.
    YearMonth,
}

impl MonthBucketing {
    pub fn label(&self) -> &'static str {
        match self {
            MonthBucketing::MonthOnly => "month",
            MonthBucketing::YearMonth => "year-month",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "month" | "month-only" => Some(MonthBucketing::MonthOnly),
            "year-month" | "yearmonth" | "year" => Some(MonthBucketing::YearMonth),
            _ => None,
        }
    }

    fn bucket_for(&self, txn: &Transaction) -> String {
        let month = MONTH_LABELS[txn.date.month0() as usize];
        match self {
            MonthBucketing::MonthOnly => month.to_string(),
            MonthBucketing::YearMonth => format!("{} {}", month, txn.date.year()),
        }
    }
}

/// One labelled bucket of a grouped aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub label: String,
    pub total: f64,
}

/// Label-to-total mapping that remembers the order labels first appeared in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupedTotals {
    entries: Vec<GroupTotal>,
}

impl GroupedTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to the bucket named `label`, creating it if needed.
    pub fn accumulate(&mut self, label: &str, amount: f64) {
        match self.entries.iter_mut().find(|entry| entry.label == label) {
            Some(entry) => entry.total += amount,
            None => self.entries.push(GroupTotal {
                label: label.to_string(),
                total: amount,
            }),
        }
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.total)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupTotal> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest bucket total, used to scale charts.
    pub fn max_total(&self) -> f64 {
        self.entries
            .iter()
            .map(|entry| entry.total)
            .fold(0.0, f64::max)
    }

    /// Entries ordered by descending total; ties keep first-appearance order.
    pub fn sorted_by_total(&self) -> Vec<&GroupTotal> {
        let mut sorted: Vec<_> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.total.total_cmp(&a.total));
        sorted
    }
}

pub struct SummaryService;

impl SummaryService {
    pub fn summarize(transactions: &[Transaction]) -> Summary {
        let mut summary = Summary::default();
        for txn in transactions {
            summary.balance += txn.amount;
            if txn.amount > 0.0 {
                summary.income += txn.amount;
            } else if txn.amount < 0.0 {
                summary.expense += txn.amount;
            }
        }
        summary.expense = summary.expense.abs();
        summary
    }

    /// Groups absolute amounts by lower-cased description.
    pub fn category_totals(transactions: &[Transaction]) -> GroupedTotals {
        let mut totals = GroupedTotals::new();
        for txn in transactions {
            totals.accumulate(&txn.category(), txn.magnitude());
        }
        totals
    }

    /// Groups absolute amounts by the month of each transaction's date.
    pub fn monthly_totals(transactions: &[Transaction], bucketing: MonthBucketing) -> GroupedTotals {
        let mut totals = GroupedTotals::new();
        for txn in transactions {
            totals.accumulate(&bucketing.bucket_for(txn), txn.magnitude());
        }
        totals
    }
}
