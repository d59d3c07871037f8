//! Chart Plotter Module
//! Interactive dashboard charts drawn with egui and egui_plot.

use crate::charts::wordcloud::{WordCloud, NO_DATA_MESSAGE};
use crate::stats::{CategoryCount, SampleRow, YearCount};
use egui::{Align2, Color32, FontId, RichText};
use egui_plot::{Bar, BarChart, Plot};

/// Bar fill, matching the static charts.
pub const BAR_COLOR: Color32 = Color32::from_rgb(31, 119, 180);

/// Preview column widths in characters.
const TITLE_CHARS: usize = 60;
const AUTHORS_CHARS: usize = 30;
const JOURNAL_CHARS: usize = 30;

/// Draws the dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Vertical bar chart of papers per year.
    pub fn draw_year_chart(ui: &mut egui::Ui, counts: &[YearCount], height: f32) {
        let bars: Vec<Bar> = counts
            .iter()
            .map(|c| {
                Bar::new(c.year as f64, c.count as f64)
                    .width(0.6)
                    .name(c.year.to_string())
            })
            .collect();

        Plot::new("publications_by_year")
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label("Number of Papers")
            .include_y(0.0)
            .x_axis_formatter(|mark, _range| {
                // Years only, no fractional ticks
                if mark.value.fract() == 0.0 {
                    format!("{:.0}", mark.value)
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR).name("Papers"));
            });
    }

    /// Horizontal bar chart of ranked categories, first entry at the top.
    pub fn draw_ranking_chart(
        ui: &mut egui::Ui,
        id: &str,
        counts: &[CategoryCount],
        height: f32,
    ) {
        let total = counts.len();
        let labels: Vec<String> = counts.iter().map(|c| c.label.clone()).collect();

        let bars: Vec<Bar> = counts
            .iter()
            .enumerate()
            .map(|(rank, c)| {
                Bar::new((total - 1 - rank) as f64, c.count as f64)
                    .width(0.7)
                    .name(&c.label)
            })
            .collect();

        Plot::new(id)
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label("Number of Papers")
            .include_x(0.0)
            .y_axis_formatter(move |mark, _range| {
                let position = mark.value;
                if position.fract() != 0.0 || position < 0.0 {
                    return String::new();
                }
                let rank = total.checked_sub(1 + position as usize);
                rank.and_then(|r| labels.get(r))
                    .map(|label| Self::shorten(label, 24))
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .horizontal()
                        .color(BAR_COLOR)
                        .name("Papers"),
                );
            });
    }

    /// Paint a word cloud scaled to the available width.
    pub fn draw_word_cloud(ui: &mut egui::Ui, cloud: &WordCloud) {
        let WordCloud::Layout {
            width,
            height,
            words,
        } = cloud
        else {
            ui.label(RichText::new(NO_DATA_MESSAGE).italics());
            return;
        };

        let available = ui.available_width().min(*width as f32);
        let scale = available / *width as f32;
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(available, *height as f32 * scale),
            egui::Sense::hover(),
        );

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 4.0, Color32::WHITE);
        for word in words {
            let (r, g, b) = word.color;
            painter.text(
                rect.min + egui::vec2(word.x * scale, word.y * scale),
                Align2::LEFT_TOP,
                &word.text,
                FontId::proportional(word.font_size * scale),
                Color32::from_rgb(r, g, b),
            );
        }
    }

    /// Striped preview of the first rows.
    pub fn draw_sample_table(ui: &mut egui::Ui, rows: &[SampleRow]) {
        if rows.is_empty() {
            ui.label(RichText::new("No rows in the selected range.").italics());
            return;
        }

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("sample_table")
                    .striped(true)
                    .min_col_width(40.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["Title", "Authors", "Journal", "Year"] {
                            ui.label(RichText::new(header).strong().size(12.0));
                        }
                        ui.end_row();

                        for row in rows {
                            ui.label(Self::shorten(&row.title, TITLE_CHARS))
                                .on_hover_text(&row.title);
                            ui.label(Self::shorten(&row.authors, AUTHORS_CHARS))
                                .on_hover_text(&row.authors);
                            ui.label(Self::shorten(&row.journal, JOURNAL_CHARS));
                            ui.label(row.year.map(|y| y.to_string()).unwrap_or_default());
                            ui.end_row();
                        }
                    });
            });
    }

    fn shorten(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            text.to_string()
        } else {
            let head: String = text.chars().take(max_chars.saturating_sub(1)).collect();
            format!("{head}…")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorten_keeps_short_text() {
        assert_eq!(ChartPlotter::shorten("Lancet", 10), "Lancet");
        assert_eq!(ChartPlotter::shorten("abcdefghij", 5), "abcd…");
    }
}
