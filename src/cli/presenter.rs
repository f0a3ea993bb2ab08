//! Terminal rendering of ledger snapshots.

use colored::Colorize;

use crate::cli::output;
use crate::core::services::{GroupedTotals, Summary};
use crate::domain::{Transaction, TransactionKind};
use crate::presenter::{LedgerSnapshot, Presenter};

const DEFAULT_CHART_WIDTH: usize = 30;
const BAR_GLYPH: char = '█';
const EMPTY_CHART: &str = "No data yet";

/// Draws the ledger as plain text: transaction list, totals, and two bar charts.
pub struct TextPresenter {
    currency: String,
    chart_width: usize,
}

impl TextPresenter {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            chart_width: DEFAULT_CHART_WIDTH,
        }
    }

    pub fn set_currency(&mut self, currency: impl Into<String>) {
        self.currency = currency.into();
    }

    /// Formats a value with the currency symbol, keeping its sign in front.
    pub fn money(&self, value: f64) -> String {
        if value < 0.0 {
            format!("-{}{:.2}", self.currency, value.abs())
        } else {
            format!("{}{:.2}", self.currency, value)
        }
    }

    pub fn transaction_line(&self, txn: &Transaction) -> String {
        let sign = match txn.kind() {
            TransactionKind::Income => '+',
            TransactionKind::Expense => '-',
        };
        format!(
            "#{:<14} {:<24} {} {}{:.2}",
            txn.id,
            txn.text,
            sign,
            self.currency,
            txn.magnitude()
        )
    }

    pub fn transaction_lines(&self, transactions: &[Transaction]) -> Vec<String> {
        if transactions.is_empty() {
            return vec!["No transactions recorded.".to_string()];
        }
        transactions
            .iter()
            .map(|txn| self.transaction_line(txn))
            .collect()
    }

    pub fn summary_lines(&self, summary: &Summary) -> Vec<String> {
        let shown = summary.rounded();
        vec![
            format!("Balance: {}", self.money(shown.balance)),
            format!("Income:  {}", self.money(shown.income)),
            format!("Expense: {}", self.money(shown.expense)),
        ]
    }

    /// Horizontal bar chart scaled so the largest bucket spans the full width.
    pub fn chart_lines(&self, totals: &GroupedTotals) -> Vec<String> {
        if totals.is_empty() {
            return vec![EMPTY_CHART.to_string()];
        }
        let label_width = totals
            .iter()
            .map(|entry| entry.label.chars().count())
            .max()
            .unwrap_or(0);
        let max = totals.max_total();
        totals
            .iter()
            .map(|entry| {
                let bar_len = if max > 0.0 {
                    ((entry.total / max) * self.chart_width as f64).round() as usize
                } else {
                    0
                };
                let bar: String = std::iter::repeat(BAR_GLYPH).take(bar_len.max(1)).collect();
                format!(
                    "{:<label_width$} {} {}",
                    entry.label,
                    bar,
                    self.money(entry.total),
                    label_width = label_width
                )
            })
            .collect()
    }

    pub fn print_transactions(&self, transactions: &[Transaction]) {
        output::section("Transactions");
        let lines = self.transaction_lines(transactions);
        for (txn, line) in transactions.iter().zip(lines.iter()) {
            match txn.kind() {
                TransactionKind::Income => output::line(line.green()),
                TransactionKind::Expense => output::line(line.red()),
            }
        }
        if transactions.is_empty() {
            for line in &lines {
                output::line(line);
            }
        }
    }

    pub fn print_summary(&self, summary: &Summary) {
        output::section("Summary");
        for line in self.summary_lines(summary) {
            output::line(line);
        }
    }

    pub fn print_chart(&self, title: &str, totals: &GroupedTotals) {
        output::section(title);
        for line in self.chart_lines(totals) {
            output::line(line);
        }
    }
}

impl Presenter for TextPresenter {
    fn render(&mut self, snapshot: &LedgerSnapshot<'_>) {
        self.print_transactions(snapshot.transactions);
        self.print_summary(&snapshot.summary);
        self.print_chart("By category", &snapshot.categories);
        self.print_chart("By month", &snapshot.months);
    }
}
