//! Settings Module
//! Defaults, optional JSON settings file, and validation.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::data::YearRange;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Analysis and display settings shared by the batch report and the dashboard.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub csv_path: PathBuf,
    pub output_dir: PathBuf,
    /// Number of journals and sources kept in the ranked charts.
    pub top_n: usize,
    pub sample_rows: usize,
    pub year_slider_min: i32,
    pub year_slider_max: i32,
    pub default_year_start: i32,
    pub default_year_end: i32,
    pub chart_width: u32,
    pub chart_height: u32,
    pub word_cloud_width: u32,
    pub word_cloud_height: u32,
    pub max_words: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("metadata.csv"),
            output_dir: PathBuf::from("charts"),
            top_n: 10,
            sample_rows: 10,
            year_slider_min: 2015,
            year_slider_max: 2025,
            default_year_start: 2019,
            default_year_end: 2021,
            chart_width: 800,
            chart_height: 500,
            word_cloud_width: 800,
            word_cloud_height: 400,
            max_words: 200,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. Keys missing from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from `path` when given, otherwise use the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::Invalid("top_n must be at least 1".into()));
        }
        if self.year_slider_min > self.year_slider_max {
            return Err(ConfigError::Invalid(format!(
                "year slider range {}..={} is inverted",
                self.year_slider_min, self.year_slider_max
            )));
        }
        if self.default_year_start > self.default_year_end {
            return Err(ConfigError::Invalid(format!(
                "default year range {}..={} is inverted",
                self.default_year_start, self.default_year_end
            )));
        }
        if self.chart_width == 0
            || self.chart_height == 0
            || self.word_cloud_width == 0
            || self.word_cloud_height == 0
        {
            return Err(ConfigError::Invalid("image sizes must be non-zero".into()));
        }
        Ok(())
    }

    /// Bounds the year slider can move between.
    pub fn slider_bounds(&self) -> YearRange {
        YearRange::new(self.year_slider_min, self.year_slider_max)
    }

    /// Initial dashboard selection, clamped to the slider bounds.
    pub fn default_range(&self) -> YearRange {
        YearRange::new(self.default_year_start, self.default_year_end).clamp_to(self.slider_bounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert_eq!(settings.default_range(), YearRange::new(2019, 2021));
        assert_eq!(settings.slider_bounds(), YearRange::new(2015, 2025));
        assert_eq!(settings.top_n, 10);
    }

    #[test]
    fn partial_file_overrides_named_keys_only() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "top_n": 5, "output_dir": "out" }}"#).unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.top_n, 5);
        assert_eq!(settings.output_dir, PathBuf::from("out"));
        assert_eq!(settings.csv_path, PathBuf::from("metadata.csv"));
        assert_eq!(settings.sample_rows, 10);
    }

    #[test]
    fn inverted_slider_range_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "year_slider_min": 2025, "year_slider_max": 2015 }}"#).unwrap();

        let err = Settings::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = Settings::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn default_range_is_clamped_to_slider() {
        let settings = Settings {
            default_year_start: 2010,
            default_year_end: 2030,
            ..Settings::default()
        };
        assert_eq!(settings.default_range(), YearRange::new(2015, 2025));
    }
}
