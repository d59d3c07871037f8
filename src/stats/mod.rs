//! Stats module - aggregations and summary statistics

mod aggregator;
mod summary;

pub use aggregator::{Aggregations, Aggregator, CategoryCount, SampleRow, YearCount};
pub use summary::{DatasetOverview, WordCountSummary};
