//! Summary Statistics Module
//! Dataset shape, missing values, and abstract word-count statistics.

use statrs::statistics::{Data, Median, Statistics};

use crate::data::CleanedView;

/// Shape and per-column missing-value counts of the loaded file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetOverview {
    pub rows: usize,
    pub columns: usize,
    /// Column name and null count, in file order.
    pub missing_values: Vec<(String, usize)>,
}

/// Descriptive statistics of the abstract word count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordCountSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl WordCountSummary {
    /// Returns `None` for an empty view.
    pub fn from_view(view: &CleanedView<'_>) -> Option<Self> {
        let counts: Vec<f64> = view.iter().map(|r| r.abstract_word_count as f64).collect();
        if counts.is_empty() {
            return None;
        }

        let std_dev = if counts.len() > 1 {
            counts.iter().std_dev()
        } else {
            0.0
        };

        Some(Self {
            count: counts.len(),
            mean: counts.iter().mean(),
            std_dev,
            min: Statistics::min(counts.iter()),
            max: Statistics::max(counts.iter()),
            median: Data::new(counts).median(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Cleaner, RawPaper};

    fn paper(abstract_text: Option<&str>) -> RawPaper {
        RawPaper {
            title: Some("t".into()),
            publish_time: Some("2020".into()),
            abstract_text: abstract_text.map(String::from),
            ..RawPaper::default()
        }
    }

    #[test]
    fn word_count_summary() {
        let table = Cleaner::prepare(vec![
            paper(Some("one two")),
            paper(Some("one two three four")),
            paper(None),
        ]);
        let view = Cleaner::clean(&table);

        let summary = WordCountSummary::from_view(&view).unwrap();
        assert_eq!(summary.count, 3);
        assert!((summary.mean - 2.0).abs() < 1e-9);
        assert!((summary.median - 2.0).abs() < 1e-9);
        assert!((summary.std_dev - 2.0).abs() < 1e-9);
        assert_eq!(summary.min, 0.0);
        assert_eq!(summary.max, 4.0);
    }

    #[test]
    fn empty_view_has_no_summary() {
        let table = Cleaner::prepare(Vec::new());
        let view = Cleaner::clean(&table);
        assert_eq!(WordCountSummary::from_view(&view), None);
    }
}
