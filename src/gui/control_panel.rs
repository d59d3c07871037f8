//! Control Panel Widget
//! Left side panel with the data source, year range, and status.

use crate::data::YearRange;
use crate::stats::{DatasetOverview, WordCountSummary};
use egui::{Color32, RichText};
use std::path::PathBuf;

/// Left side control panel with file selection and the year filter.
pub struct ControlPanel {
    pub csv_path: Option<PathBuf>,
    pub bounds: YearRange,
    pub year_from: i32,
    pub year_to: i32,
    pub overview: Option<DatasetOverview>,
    pub cleaned_rows: usize,
    pub word_counts: Option<WordCountSummary>,
    pub status: String,
    pub is_loading: bool,
}

impl ControlPanel {
    pub fn new(bounds: YearRange, selection: YearRange) -> Self {
        Self {
            csv_path: None,
            bounds,
            year_from: selection.start,
            year_to: selection.end,
            overview: None,
            cleaned_rows: 0,
            word_counts: None,
            status: "Ready".to_string(),
            is_loading: false,
        }
    }

    /// Current inclusive selection.
    pub fn selected_range(&self) -> YearRange {
        YearRange::new(self.year_from, self.year_to)
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🦠 CORD-19 Data Explorer")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Simple exploration of COVID-19 research papers")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.csv_path.is_some() {
                            ui.visuals().text_color()
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_enabled_ui(!self.is_loading, |ui| {
                            if ui.button("📂 Browse").clicked() {
                                action = ControlPanelAction::BrowseCsv;
                            }
                        });
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Year Range Section =====
        ui.label(RichText::new("📅 Select year range").size(14.0).strong());
        ui.add_space(5.0);

        let bounds = self.bounds.start..=self.bounds.end;
        let from_changed = ui
            .add(egui::Slider::new(&mut self.year_from, bounds.clone()).text("From"))
            .changed();
        let to_changed = ui
            .add(egui::Slider::new(&mut self.year_to, bounds).text("To"))
            .changed();

        // Keep the two handles from crossing
        if from_changed && self.year_from > self.year_to {
            self.year_to = self.year_from;
        }
        if to_changed && self.year_to < self.year_from {
            self.year_from = self.year_to;
        }
        if from_changed || to_changed {
            action = ControlPanelAction::RangeChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Dataset Section =====
        ui.label(RichText::new("📊 Dataset").size(14.0).strong());
        ui.add_space(5.0);

        if let Some(overview) = &self.overview {
            egui::Grid::new("dataset_overview")
                .num_columns(2)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    ui.label("Shape:");
                    ui.label(format!("({}, {})", overview.rows, overview.columns));
                    ui.end_row();
                    ui.label("Cleaned rows:");
                    ui.label(self.cleaned_rows.to_string());
                    ui.end_row();
                    if let Some(words) = &self.word_counts {
                        ui.label("Abstract words:");
                        ui.label(format!("mean {:.1}, median {:.0}", words.mean, words.median));
                        ui.end_row();
                    }
                });

            egui::CollapsingHeader::new("Missing values")
                .default_open(false)
                .show(ui, |ui| {
                    egui::Grid::new("missing_values")
                        .striped(true)
                        .num_columns(2)
                        .show(ui, |ui| {
                            for (column, missing) in &overview.missing_values {
                                ui.label(column);
                                ui.label(missing.to_string());
                                ui.end_row();
                            }
                        });
                });
        } else {
            ui.label(RichText::new("No data loaded").color(Color32::GRAY));
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status =====
        if self.is_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new(&self.status).size(11.0));
            });
        } else {
            let status_color = if self.status.starts_with("Error") {
                Color32::from_rgb(220, 53, 69)
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(&self.status).size(11.0).color(status_color));
        }

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    RangeChanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_configured_selection() {
        let panel = ControlPanel::new(YearRange::new(2015, 2025), YearRange::new(2019, 2021));
        assert_eq!(panel.selected_range(), YearRange::new(2019, 2021));
        assert_eq!(panel.status, "Ready");
    }
}
