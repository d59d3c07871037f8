//! CSV Data Loader Module
//! Reads `metadata.csv` with Polars and extracts the paper columns.

use log::info;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::RawPaper;
use crate::stats::DatasetOverview;

/// Columns every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "title",
    "authors",
    "journal",
    "source_x",
    "abstract",
    "publish_time",
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
}

/// Rows and overview produced by a single load.
#[derive(Debug, Clone)]
pub struct LoadedMetadata {
    pub rows: Vec<RawPaper>,
    pub overview: DatasetOverview,
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a metadata CSV. Every column is read as text; empty fields are null.
    pub fn load_csv(path: &Path) -> Result<LoadedMetadata, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }
        info!("Loading {}", path.display());

        // A zero-row inference window reads every column as String
        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        let overview = Self::overview(&df);
        info!("Shape: ({}, {})", overview.rows, overview.columns);

        let rows = Self::extract_rows(&df)?;
        Ok(LoadedMetadata { rows, overview })
    }

    /// Shape and per-column missing-value counts of the full table.
    pub fn overview(df: &DataFrame) -> DatasetOverview {
        let missing_values = df
            .get_columns()
            .iter()
            .map(|col| (col.name().to_string(), col.null_count()))
            .collect();

        DatasetOverview {
            rows: df.height(),
            columns: df.width(),
            missing_values,
        }
    }

    /// Convert the required columns into row structs.
    pub fn extract_rows(df: &DataFrame) -> Result<Vec<RawPaper>, LoaderError> {
        let names = df.get_column_names();
        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|required| !names.iter().any(|name| name.as_str() == **required))
        {
            return Err(LoaderError::MissingColumn(missing.to_string()));
        }

        let mut titles = Self::text_column(df, "title")?.into_iter();
        let mut authors = Self::text_column(df, "authors")?.into_iter();
        let mut journals = Self::text_column(df, "journal")?.into_iter();
        let mut sources = Self::text_column(df, "source_x")?.into_iter();
        let mut abstracts = Self::text_column(df, "abstract")?.into_iter();
        let mut publish_times = Self::text_column(df, "publish_time")?.into_iter();

        let rows = (0..df.height())
            .map(|_| RawPaper {
                title: titles.next().flatten(),
                authors: authors.next().flatten(),
                journal: journals.next().flatten(),
                source: sources.next().flatten(),
                abstract_text: abstracts.next().flatten(),
                publish_time: publish_times.next().flatten(),
            })
            .collect();

        Ok(rows)
    }

    /// Read one column as optional strings, mapping empty values to `None`.
    fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, LoaderError> {
        let column = df
            .column(name)
            .map_err(|_| LoaderError::MissingColumn(name.to_string()))?;
        let text = column.cast(&DataType::String)?;
        let values = text
            .str()?
            .into_iter()
            .map(|value| value.filter(|s| !s.is_empty()).map(str::to_string))
            .collect();
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn missing(overview: &DatasetOverview, column: &str) -> Option<usize> {
        overview
            .missing_values
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, count)| *count)
    }

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_required_columns_and_nulls() {
        let file = csv_file(
            "cord_uid,title,authors,journal,source_x,abstract,publish_time\n\
             u1,Paper one,\"Doe, J.\",Lancet,PMC,Some abstract text,2020-03-15\n\
             u2,,Roe,,Medline,,2019\n",
        );

        let loaded = DataLoader::load_csv(file.path()).unwrap();
        assert_eq!(loaded.rows.len(), 2);

        let first = &loaded.rows[0];
        assert_eq!(first.title.as_deref(), Some("Paper one"));
        assert_eq!(first.authors.as_deref(), Some("Doe, J."));
        assert_eq!(first.journal.as_deref(), Some("Lancet"));
        assert_eq!(first.source.as_deref(), Some("PMC"));
        assert_eq!(first.publish_time.as_deref(), Some("2020-03-15"));

        let second = &loaded.rows[1];
        assert_eq!(second.title, None);
        assert_eq!(second.journal, None);
        assert_eq!(second.abstract_text, None);
        assert_eq!(second.publish_time.as_deref(), Some("2019"));
    }

    #[test]
    fn overview_counts_shape_and_missing_values() {
        let file = csv_file(
            "title,authors,journal,source_x,abstract,publish_time\n\
             a,x,j,s,abc,2020\n\
             ,x,,s,,2020\n\
             c,,,s,,\n",
        );

        let overview = DataLoader::load_csv(file.path()).unwrap().overview;
        assert_eq!(overview.rows, 3);
        assert_eq!(overview.columns, 6);
        assert_eq!(missing(&overview, "title"), Some(1));
        assert_eq!(missing(&overview, "journal"), Some(2));
        assert_eq!(missing(&overview, "source_x"), Some(0));
        assert_eq!(missing(&overview, "publish_time"), Some(1));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = DataLoader::load_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let file = csv_file("title,authors,journal,abstract,publish_time\na,b,c,d,2020\n");

        let err = DataLoader::load_csv(file.path()).unwrap_err();
        match err {
            LoaderError::MissingColumn(name) => assert_eq!(name, "source_x"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ragged_row_is_a_csv_error() {
        let file = csv_file(
            "title,authors,journal,source_x,abstract,publish_time\n\
             a,b,c,d,e,2020\n\
             a,b,c,d,e,2020,extra,fields\n",
        );

        let err = DataLoader::load_csv(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::CsvError(_)), "unexpected error: {err}");
    }

    #[test]
    fn empty_file_is_a_csv_error() {
        let file = csv_file("");

        let err = DataLoader::load_csv(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::CsvError(_)), "unexpected error: {err}");
    }
}
