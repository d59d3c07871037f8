//! Aggregation Module
//! Count-by-category summaries over a cleaned view.

use std::collections::{BTreeMap, HashMap};

use crate::data::{CleanedView, PaperRecord};

/// Number of papers published in one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// Number of papers for one journal or source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// The columns shown in the preview table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRow {
    pub title: String,
    pub authors: String,
    pub journal: String,
    pub year: Option<i32>,
}

impl From<&PaperRecord> for SampleRow {
    fn from(record: &PaperRecord) -> Self {
        Self {
            title: record.title.clone().unwrap_or_default(),
            authors: record.authors.clone().unwrap_or_default(),
            journal: record.journal.clone().unwrap_or_default(),
            year: record.year,
        }
    }
}

/// Everything the charts need, computed from one view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregations {
    pub total_rows: usize,
    pub by_year: Vec<YearCount>,
    pub top_journals: Vec<CategoryCount>,
    pub top_sources: Vec<CategoryCount>,
    pub title_text: String,
    pub sample: Vec<SampleRow>,
}

/// Computes aggregations. All operations are pure functions of the view.
pub struct Aggregator;

impl Aggregator {
    /// Rows per year, ascending by year.
    pub fn count_by_year(view: &CleanedView<'_>) -> Vec<YearCount> {
        let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
        for year in view.iter().filter_map(|r| r.year) {
            *counts.entry(year).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(year, count)| YearCount { year, count })
            .collect()
    }

    /// Most frequent non-null values, descending by count, at most `limit` entries.
    ///
    /// Equal counts are ordered by label.
    pub fn top_categories<'r>(
        values: impl Iterator<Item = Option<&'r str>>,
        limit: usize,
    ) -> Vec<CategoryCount> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for value in values.flatten() {
            *counts.entry(value).or_default() += 1;
        }

        let mut ranked: Vec<CategoryCount> = counts
            .into_iter()
            .map(|(label, count)| CategoryCount {
                label: label.to_string(),
                count,
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
        ranked.truncate(limit);
        ranked
    }

    pub fn top_journals(view: &CleanedView<'_>, limit: usize) -> Vec<CategoryCount> {
        Self::top_categories(view.iter().map(|r| r.journal.as_deref()), limit)
    }

    pub fn top_sources(view: &CleanedView<'_>, limit: usize) -> Vec<CategoryCount> {
        Self::top_categories(view.iter().map(|r| r.source.as_deref()), limit)
    }

    /// All non-null titles joined by single spaces.
    pub fn concatenate_titles(view: &CleanedView<'_>) -> String {
        view.iter()
            .filter_map(|r| r.title.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The first `rows` records of the view.
    pub fn sample(view: &CleanedView<'_>, rows: usize) -> Vec<SampleRow> {
        view.iter().take(rows).map(SampleRow::from).collect()
    }

    /// Compute every aggregation for `view`.
    pub fn summarize(view: &CleanedView<'_>, top_n: usize, sample_rows: usize) -> Aggregations {
        Aggregations {
            total_rows: view.len(),
            by_year: Self::count_by_year(view),
            top_journals: Self::top_journals(view, top_n),
            top_sources: Self::top_sources(view, top_n),
            title_text: Self::concatenate_titles(view),
            sample: Self::sample(view, sample_rows),
        }
    }
}
