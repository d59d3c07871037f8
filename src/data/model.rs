//! Data Model Module
//! Paper records, the loaded metadata table, and filtered views over it.

use chrono::NaiveDate;

/// One row of `metadata.csv` as read from disk, before any derivation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPaper {
    pub title: Option<String>,
    pub authors: Option<String>,
    pub journal: Option<String>,
    pub source: Option<String>,
    pub abstract_text: Option<String>,
    pub publish_time: Option<String>,
}

/// A paper with its derived columns.
#[derive(Debug, Clone, PartialEq)]
pub struct PaperRecord {
    pub title: Option<String>,
    pub authors: Option<String>,
    pub journal: Option<String>,
    pub source: Option<String>,
    pub abstract_text: Option<String>,
    pub publish_time: Option<String>,
    /// `None` when `publish_time` is missing or could not be parsed.
    pub published: Option<NaiveDate>,
    pub year: Option<i32>,
    pub abstract_word_count: usize,
}

/// Inclusive range of publication years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    /// Build a range, swapping the bounds if they are given in reverse.
    pub fn new(start: i32, end: i32) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    /// Restrict both bounds to lie within `bounds`.
    pub fn clamp_to(self, bounds: YearRange) -> Self {
        Self::new(
            self.start.clamp(bounds.start, bounds.end),
            self.end.clamp(bounds.start, bounds.end),
        )
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}–{}", self.start, self.end)
    }
}

/// The in-memory metadata table. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    records: Vec<PaperRecord>,
}

impl MetadataTable {
    pub fn new(records: Vec<PaperRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PaperRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&PaperRecord> {
        self.records.get(index)
    }

    /// View over the rows in `indices` whose derived year falls inside `range`.
    pub fn view_within_years(&self, indices: &[usize], range: YearRange) -> CleanedView<'_> {
        let indices = indices
            .iter()
            .copied()
            .filter(|&i| {
                self.get(i)
                    .and_then(|record| record.year)
                    .is_some_and(|year| range.contains(year))
            })
            .collect();
        CleanedView::from_indices(self, indices)
    }
}

/// A subset of a [`MetadataTable`], stored as row indices.
///
/// Views never copy or mutate the table; narrowing a view produces a new one.
#[derive(Debug, Clone)]
pub struct CleanedView<'a> {
    table: &'a MetadataTable,
    indices: Vec<usize>,
}

impl<'a> CleanedView<'a> {
    pub fn from_indices(table: &'a MetadataTable, indices: Vec<usize>) -> Self {
        Self { table, indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a PaperRecord> + '_ {
        let table = self.table;
        self.indices.iter().filter_map(move |&i| table.get(i))
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: Option<i32>) -> PaperRecord {
        PaperRecord {
            title: Some("t".into()),
            authors: None,
            journal: None,
            source: None,
            abstract_text: None,
            publish_time: None,
            published: year.and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1)),
            year,
            abstract_word_count: 0,
        }
    }

    #[test]
    fn year_range_swaps_reversed_bounds() {
        let range = YearRange::new(2021, 2019);
        assert_eq!(range, YearRange { start: 2019, end: 2021 });
        assert!(range.contains(2019));
        assert!(range.contains(2021));
        assert!(!range.contains(2022));
    }

    #[test]
    fn year_range_clamps() {
        let bounds = YearRange::new(2015, 2025);
        assert_eq!(YearRange::new(2000, 2020).clamp_to(bounds), YearRange::new(2015, 2020));
        assert_eq!(YearRange::new(2030, 2040).clamp_to(bounds), YearRange::new(2025, 2025));
    }

    #[test]
    fn year_filter_skips_rows_without_a_year() {
        let table = MetadataTable::new(vec![
            record(Some(2018)),
            record(Some(2019)),
            record(None),
            record(Some(2021)),
        ]);
        let all: Vec<usize> = (0..table.len()).collect();

        let narrowed = table.view_within_years(&all, YearRange::new(2019, 2021));
        let years: Vec<_> = narrowed.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![Some(2019), Some(2021)]);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn table_view_filters_only_the_given_rows() {
        let table = MetadataTable::new(vec![
            record(Some(2019)),
            record(Some(2020)),
            record(Some(2020)),
        ]);
        assert!(!table.is_empty());

        let view = table.view_within_years(&[0, 2], YearRange::new(2020, 2020));
        assert_eq!(view.into_indices(), vec![2]);
        assert!(table.view_within_years(&[0], YearRange::new(2021, 2022)).is_empty());
    }
}
