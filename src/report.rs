//! Batch Report Module
//! Load, clean, aggregate, print summaries, and write the chart images.

use anyhow::{Context, Result};
use log::{info, warn};
use std::path::{Path, PathBuf};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::charts::{word_frequencies, StaticChartRenderer, WordCloudBuilder};
use crate::config::Settings;
use crate::data::{Cleaner, DataLoader};
use crate::stats::{Aggregator, DatasetOverview, SampleRow, WordCountSummary};

/// Number of title words listed in the terminal summary.
const TOP_WORDS: usize = 15;

#[derive(Tabled)]
struct MissingRow<'a> {
    #[tabled(rename = "Column")]
    column: &'a str,
    #[tabled(rename = "Missing")]
    missing: usize,
}

#[derive(Tabled)]
struct PreviewRow<'a> {
    #[tabled(rename = "Title")]
    title: &'a str,
    #[tabled(rename = "Authors")]
    authors: &'a str,
    #[tabled(rename = "Journal")]
    journal: &'a str,
    #[tabled(rename = "Year")]
    year: String,
}

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "Value")]
    label: String,
    #[tabled(rename = "Papers")]
    count: usize,
}

/// Files written by one report run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutput {
    pub year_chart: PathBuf,
    pub journal_chart: PathBuf,
    pub source_chart: PathBuf,
    pub word_cloud: PathBuf,
}

impl ReportOutput {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            year_chart: dir.join("publications_by_year.png"),
            journal_chart: dir.join("top_journals.png"),
            source_chart: dir.join("top_sources.png"),
            word_cloud: dir.join("title_word_cloud.png"),
        }
    }

    pub fn files(&self) -> [&Path; 4] {
        [
            &self.year_chart,
            &self.journal_chart,
            &self.source_chart,
            &self.word_cloud,
        ]
    }
}

/// Run the full batch analysis and return the written chart paths.
pub fn run(settings: &Settings) -> Result<ReportOutput> {
    let loaded = DataLoader::load_csv(&settings.csv_path)
        .with_context(|| format!("loading {}", settings.csv_path.display()))?;
    println!("{}", format_overview(&loaded.overview));

    let table = Cleaner::prepare(loaded.rows);
    if table.is_empty() {
        warn!("{} has a header but no rows", settings.csv_path.display());
    }
    let cleaned = Cleaner::clean(&table);
    if cleaned.is_empty() {
        warn!("No rows have both a title and a publish date; charts will be empty");
    } else {
        info!(
            "Cleaned view: {} rows ({} dropped for missing title or publish date)",
            cleaned.len(),
            table.len() - cleaned.len()
        );
    }

    let aggregations = Aggregator::summarize(&cleaned, settings.top_n, settings.sample_rows);

    if let Some(words) = WordCountSummary::from_view(&cleaned) {
        println!(
            "Abstract word count: mean {:.1}, median {:.0}, std {:.1}, min {:.0}, max {:.0}\n",
            words.mean, words.median, words.std_dev, words.min, words.max
        );
    }
    println!("Sample data:\n{}\n", format_sample(&aggregations.sample));
    println!(
        "Top {} journals:\n{}\n",
        settings.top_n,
        format_counts(aggregations.top_journals.iter().map(|c| (c.label.clone(), c.count)))
    );
    println!(
        "Most frequent title words:\n{}\n",
        format_counts(
            word_frequencies(&aggregations.title_text)
                .into_iter()
                .take(TOP_WORDS)
                .map(|w| (w.text, w.count))
        )
    );

    std::fs::create_dir_all(&settings.output_dir)
        .with_context(|| format!("creating {}", settings.output_dir.display()))?;
    let output = ReportOutput::in_dir(&settings.output_dir);
    let renderer = StaticChartRenderer::new(settings.chart_width, settings.chart_height);

    renderer
        .render_year_chart(&aggregations.by_year, &output.year_chart)
        .context("rendering publications by year")?;
    renderer
        .render_ranking_chart(
            &format!("Top {} Journals", settings.top_n),
            &aggregations.top_journals,
            &output.journal_chart,
        )
        .context("rendering top journals")?;
    renderer
        .render_ranking_chart("Top Sources", &aggregations.top_sources, &output.source_chart)
        .context("rendering top sources")?;

    let cloud = WordCloudBuilder::new(settings.word_cloud_width, settings.word_cloud_height)
        .max_words(settings.max_words)
        .build(&aggregations.title_text);
    if cloud.is_empty() {
        info!("No title words to draw; writing placeholder word cloud");
    }
    renderer
        .render_word_cloud(
            &cloud,
            (settings.word_cloud_width, settings.word_cloud_height),
            &output.word_cloud,
        )
        .context("rendering word cloud")?;

    Ok(output)
}

/// Open each chart with the system image viewer.
pub fn show(output: &ReportOutput) {
    for path in output.files() {
        if let Err(e) = open::that(path) {
            warn!("Could not open {}: {e}", path.display());
        }
    }
}

pub fn format_overview(overview: &DatasetOverview) -> String {
    let rows = overview
        .missing_values
        .iter()
        .map(|(column, missing)| MissingRow {
            column,
            missing: *missing,
        });
    format!(
        "Shape: ({}, {})\nMissing values:\n{}\n",
        overview.rows,
        overview.columns,
        Table::new(rows).with(Style::modern())
    )
}

pub fn format_sample(rows: &[SampleRow]) -> String {
    let preview = rows.iter().map(|row| PreviewRow {
        title: &row.title,
        authors: &row.authors,
        journal: &row.journal,
        year: row.year.map(|y| y.to_string()).unwrap_or_default(),
    });
    Table::new(preview).with(Style::modern()).to_string()
}

fn format_counts(counts: impl Iterator<Item = (String, usize)>) -> String {
    let rows = counts.map(|(label, count)| CountRow { label, count });
    Table::new(rows).with(Style::modern()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_paths_live_in_the_output_dir() {
        let output = ReportOutput::in_dir(Path::new("charts"));
        assert_eq!(output.year_chart, PathBuf::from("charts/publications_by_year.png"));
        assert!(output.files().iter().all(|p| p.starts_with("charts")));
    }

    #[test]
    fn overview_lists_missing_values() {
        let overview = DatasetOverview {
            rows: 3,
            columns: 2,
            missing_values: vec![("title".into(), 1), ("journal".into(), 2)],
        };
        let text = format_overview(&overview);
        assert!(text.starts_with("Shape: (3, 2)"));
        assert!(text.contains("title"));
        assert!(text.contains("journal"));
    }

    #[test]
    fn sample_table_contains_rows() {
        let rows = vec![SampleRow {
            title: "Mask study".into(),
            authors: "Doe".into(),
            journal: "BMJ".into(),
            year: Some(2020),
        }];
        let text = format_sample(&rows);
        assert!(text.contains("Title"));
        assert!(text.contains("Mask study"));
        assert!(text.contains("2020"));
    }
}
