//! Chart Viewer Widget
//! Scrollable central panel with the charts, word cloud, and sample preview.

use crate::charts::{ChartPlotter, WordCloud};
use crate::data::YearRange;
use crate::stats::Aggregations;
use egui::{RichText, ScrollArea};

const CHART_HEIGHT: f32 = 260.0;
const SECTION_SPACING: f32 = 15.0;

/// Holds the most recent aggregation results for display.
#[derive(Default)]
pub struct ChartViewer {
    pub snapshot: Option<Snapshot>,
}

/// One recomputation: the selected range and everything derived from it.
pub struct Snapshot {
    pub range: YearRange,
    pub aggregations: Aggregations,
    pub word_cloud: WordCloud,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.snapshot = None;
    }

    /// Replace the displayed results.
    pub fn set_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = Some(snapshot);
    }

    /// Draw the chart viewer
    pub fn show(&self, ui: &mut egui::Ui) {
        let Some(snapshot) = &self.snapshot else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };
        let aggregations = &snapshot.aggregations;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(
                    RichText::new(format!(
                        "{} papers published {}",
                        aggregations.total_rows, snapshot.range
                    ))
                    .size(16.0)
                    .strong(),
                );
                ui.add_space(SECTION_SPACING);

                Self::section(ui, "Publications by Year");
                ChartPlotter::draw_year_chart(ui, &aggregations.by_year, CHART_HEIGHT);
                ui.add_space(SECTION_SPACING);

                ui.columns(2, |columns| {
                    Self::section(&mut columns[0], "Top Journals");
                    ChartPlotter::draw_ranking_chart(
                        &mut columns[0],
                        "top_journals",
                        &aggregations.top_journals,
                        CHART_HEIGHT,
                    );

                    Self::section(&mut columns[1], "Top Sources");
                    ChartPlotter::draw_ranking_chart(
                        &mut columns[1],
                        "top_sources",
                        &aggregations.top_sources,
                        CHART_HEIGHT,
                    );
                });
                ui.add_space(SECTION_SPACING);

                Self::section(ui, "Word Cloud of Titles");
                ChartPlotter::draw_word_cloud(ui, &snapshot.word_cloud);
                ui.add_space(SECTION_SPACING);

                Self::section(ui, "Sample Data");
                ChartPlotter::draw_sample_table(ui, &aggregations.sample);
            });
    }

    fn section(ui: &mut egui::Ui, title: &str) {
        ui.label(RichText::new(title).size(15.0).strong());
        ui.add_space(5.0);
    }
}
