//! Data Cleaner Module
//! Timestamp parsing, derived columns, and the cleaned view.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use log::{debug, info};

use super::model::{CleanedView, MetadataTable, PaperRecord, RawPaper};

const YEAR_FIRST_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y %b %d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const MONTH_FIRST_FORMAT: &str = "%m/%d/%Y";

/// Derives cleaned columns and builds filtered views.
pub struct Cleaner;

impl Cleaner {
    /// Parse a publication timestamp. Anything unrecognised yields `None`.
    ///
    /// Partial dates (`2020`, `2020-03`, `2020 Mar`) resolve to the first day
    /// of the year or month. Years must be written with four digits.
    pub fn parse_publish_time(raw: &str) -> Option<NaiveDate> {
        let value = raw.trim();

        if starts_with_year(value) {
            Self::parse_year_first(value)
        } else if ends_with_year(value) {
            NaiveDate::parse_from_str(value, MONTH_FIRST_FORMAT).ok()
        } else {
            None
        }
    }

    fn parse_year_first(value: &str) -> Option<NaiveDate> {
        for format in YEAR_FIRST_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(value, format) {
                return Some(date);
            }
        }
        for format in DATETIME_FORMATS {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
                return Some(datetime.date());
            }
        }
        if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
            return Some(datetime.date_naive());
        }

        // Year only
        if value.len() == 4 {
            return value
                .parse::<i32>()
                .ok()
                .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
        }

        // Year and month
        NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(&format!("{value} 01"), "%Y %b %d"))
            .ok()
    }

    /// Number of whitespace-separated tokens; a missing abstract counts as empty.
    pub fn word_count(abstract_text: Option<&str>) -> usize {
        abstract_text.unwrap_or("").split_whitespace().count()
    }

    /// Compute the derived columns for one row.
    pub fn derive(raw: RawPaper) -> PaperRecord {
        let published = raw.publish_time.as_deref().and_then(Self::parse_publish_time);
        let abstract_word_count = Self::word_count(raw.abstract_text.as_deref());

        PaperRecord {
            title: raw.title,
            authors: raw.authors,
            journal: raw.journal,
            source: raw.source,
            abstract_text: raw.abstract_text,
            publish_time: raw.publish_time,
            year: published.map(|date| date.year()),
            published,
            abstract_word_count,
        }
    }

    /// Build the metadata table, deriving columns once for every row.
    pub fn prepare(rows: Vec<RawPaper>) -> MetadataTable {
        let records: Vec<PaperRecord> = rows.into_iter().map(Self::derive).collect();
        let unparsed = records
            .iter()
            .filter(|r| r.publish_time.is_some() && r.published.is_none())
            .count();
        if unparsed > 0 {
            info!("{unparsed} publish_time values could not be parsed and were set to null");
        }
        MetadataTable::new(records)
    }

    /// Rows with both a title and a parsed publication date.
    pub fn clean(table: &MetadataTable) -> CleanedView<'_> {
        let indices: Vec<usize> = table
            .records()
            .iter()
            .enumerate()
            .filter(|(_, r)| r.title.is_some() && r.published.is_some())
            .map(|(i, _)| i)
            .collect();

        debug!(
            "Cleaned view keeps {} of {} rows ({} dropped for missing title or date)",
            indices.len(),
            table.len(),
            table.len() - indices.len()
        );
        CleanedView::from_indices(table, indices)
    }
}

/// Four ASCII digits not followed by another digit.
fn starts_with_year(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 4
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && !bytes.get(4).is_some_and(u8::is_ascii_digit)
}

/// A final `/`-separated field of exactly four digits.
fn ends_with_year(value: &str) -> bool {
    value.rsplit_once('/').is_some_and(|(_, year)| {
        year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(
        title: Option<&str>,
        publish_time: Option<&str>,
        abstract_text: Option<&str>,
    ) -> RawPaper {
        RawPaper {
            title: title.map(String::from),
            publish_time: publish_time.map(String::from),
            abstract_text: abstract_text.map(String::from),
            ..RawPaper::default()
        }
    }

    #[test]
    fn parses_common_timestamp_forms() {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);
        assert_eq!(Cleaner::parse_publish_time("2020-03-15"), date(2020, 3, 15));
        assert_eq!(Cleaner::parse_publish_time(" 2020-03-15 "), date(2020, 3, 15));
        assert_eq!(Cleaner::parse_publish_time("2020/03/15"), date(2020, 3, 15));
        assert_eq!(Cleaner::parse_publish_time("03/15/2020"), date(2020, 3, 15));
        assert_eq!(Cleaner::parse_publish_time("2020-03-15 10:30:00"), date(2020, 3, 15));
        assert_eq!(Cleaner::parse_publish_time("2020-03-15T10:30:00.250"), date(2020, 3, 15));
        assert_eq!(Cleaner::parse_publish_time("2020-03-15T10:30:00Z"), date(2020, 3, 15));
        assert_eq!(Cleaner::parse_publish_time("2020 Mar 15"), date(2020, 3, 15));
        assert_eq!(Cleaner::parse_publish_time("2020 Mar"), date(2020, 3, 1));
        assert_eq!(Cleaner::parse_publish_time("2020-03"), date(2020, 3, 1));
        assert_eq!(Cleaner::parse_publish_time("2020"), date(2020, 1, 1));
    }

    #[test]
    fn unparseable_timestamps_become_none() {
        for value in [
            "",
            "   ",
            "not a date",
            "2020-13-45",
            "20",
            "Spring 2020",
            "01-02-03",
            "5-1-1",
            "20-01-01",
            "1/2/3",
            "03/15/20",
            "202003",
            "20200315",
        ] {
            assert_eq!(Cleaner::parse_publish_time(value), None, "{value:?}");
        }
    }

    #[test]
    fn year_is_null_exactly_when_parsing_failed() {
        let rows = vec![
            raw(Some("a"), Some("2019-05-01"), None),
            raw(Some("b"), Some("garbage"), None),
            raw(Some("c"), None, None),
        ];
        let table = Cleaner::prepare(rows);
        for record in table.records() {
            assert_eq!(record.year.is_none(), record.published.is_none());
        }
        assert_eq!(table.records()[0].year, Some(2019));
        assert_eq!(table.records()[1].year, None);
        assert_eq!(table.records()[2].year, None);
    }

    #[test]
    fn word_count_splits_on_any_whitespace() {
        assert_eq!(Cleaner::word_count(None), 0);
        assert_eq!(Cleaner::word_count(Some("")), 0);
        assert_eq!(Cleaner::word_count(Some("  one\ttwo\nthree  ")), 3);

        let record = Cleaner::derive(raw(None, None, Some("a b c d")));
        assert_eq!(record.abstract_word_count, 4);
    }

    #[test]
    fn clean_drops_rows_without_title_or_date() {
        let rows = vec![
            raw(Some("kept"), Some("2020-01-01"), None),
            raw(None, Some("2020-01-01"), None),
            raw(Some("bad date"), Some("n/a"), None),
            raw(Some("no date"), None, None),
            raw(Some("also kept"), Some("2021"), None),
        ];
        let table = Cleaner::prepare(rows);
        let view = Cleaner::clean(&table);

        assert!(view.len() <= table.len());
        assert!(view.iter().all(|r| r.title.is_some() && r.published.is_some()));
        let titles: Vec<_> = view.iter().filter_map(|r| r.title.as_deref()).collect();
        assert_eq!(titles, vec!["kept", "also kept"]);
        // Source table is unaffected
        assert_eq!(table.len(), 5);
    }
}
