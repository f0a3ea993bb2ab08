pub mod summary_service;

pub use summary_service::{GroupTotal, GroupedTotals, MonthBucketing, Summary, SummaryService};
