//! Static Chart Renderer
//! Writes the report charts as PNG files using plotters.
//!
//! Charts:
//! 1. Publications by Year: vertical bars, years ascending
//! 2. Top Journals / Top Sources: horizontal bars, largest at the top
//! 3. Word Cloud of Paper Titles: spiral layout, or a "no data" notice

use crate::charts::wordcloud::{WordCloud, NO_DATA_MESSAGE};
use crate::stats::{CategoryCount, YearCount};
use log::info;
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use thiserror::Error;

const BAR_COLOR: RGBColor = RGBColor(31, 119, 180);
const CAPTION_FONT: (&str, u32) = ("sans-serif", 24);
const LABEL_FONT: (&str, u32) = ("sans-serif", 14);
/// Longest category label drawn before truncation.
const MAX_LABEL_CHARS: usize = 40;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to draw chart: {0}")]
    Drawing(String),
}

type Result<T> = core::result::Result<T, RenderError>;

fn drawing_error<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Drawing(err.to_string())
}

/// Renders the static report charts.
pub struct StaticChartRenderer {
    width: u32,
    height: u32,
}

impl StaticChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Vertical bar chart of papers per year. An empty slice draws empty axes.
    pub fn render_year_chart(&self, counts: &[YearCount], path: &Path) -> Result<()> {
        let labels: Vec<String> = counts.iter().map(|c| c.year.to_string()).collect();
        let slots = counts.len().max(1);
        let y_max = Self::axis_max(counts.iter().map(|c| c.count));

        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Publications by Year", CAPTION_FONT)
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d((0..slots).into_segmented(), 0u32..y_max)
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Year")
            .y_desc("Number of Papers")
            .x_labels(slots)
            .x_label_formatter(&|value| Self::segment_label(value, &labels))
            .label_style(LABEL_FONT)
            .draw()
            .map_err(drawing_error)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(BAR_COLOR.filled())
                    .margin(6)
                    .data(counts.iter().enumerate().map(|(i, c)| (i, c.count as u32))),
            )
            .map_err(drawing_error)?;

        root.present().map_err(drawing_error)?;
        info!("Wrote {}", path.display());
        Ok(())
    }

    /// Horizontal bar chart of ranked categories, first entry at the top.
    pub fn render_ranking_chart(
        &self,
        title: &str,
        counts: &[CategoryCount],
        path: &Path,
    ) -> Result<()> {
        // Rows are drawn bottom-up, so reverse to put the largest at the top
        let labels: Vec<String> = counts
            .iter()
            .rev()
            .map(|c| Self::truncate_label(&c.label))
            .collect();
        let slots = counts.len().max(1);
        let x_max = Self::axis_max(counts.iter().map(|c| c.count));

        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, CAPTION_FONT)
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(260)
            .build_cartesian_2d(0u32..x_max, (0..slots).into_segmented())
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc("Number of Papers")
            .y_labels(slots)
            .y_label_formatter(&|value| Self::segment_label(value, &labels))
            .label_style(LABEL_FONT)
            .draw()
            .map_err(drawing_error)?;

        let total = counts.len();
        chart
            .draw_series(
                Histogram::horizontal(&chart)
                    .style(BAR_COLOR.filled())
                    .margin(4)
                    .data(
                        counts
                            .iter()
                            .enumerate()
                            .map(|(rank, c)| (total - 1 - rank, c.count as u32)),
                    ),
            )
            .map_err(drawing_error)?;

        root.present().map_err(drawing_error)?;
        info!("Wrote {}", path.display());
        Ok(())
    }

    /// Draw a laid-out word cloud, or the "no data" notice on a `canvas` sized image.
    pub fn render_word_cloud(
        &self,
        cloud: &WordCloud,
        canvas: (u32, u32),
        path: &Path,
    ) -> Result<()> {
        let (width, height) = match cloud {
            WordCloud::Layout { width, height, .. } => (*width, *height),
            WordCloud::NoData => canvas,
        };

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;

        match cloud {
            WordCloud::Layout { words, .. } => {
                for word in words {
                    let (r, g, b) = word.color;
                    let style = ("sans-serif", f64::from(word.font_size))
                        .into_font()
                        .color(&RGBColor(r, g, b));
                    root.draw(&Text::new(
                        word.text.as_str(),
                        (word.x.round() as i32, word.y.round() as i32),
                        style,
                    ))
                    .map_err(drawing_error)?;
                }
            }
            WordCloud::NoData => {
                let style = ("sans-serif", 22.0)
                    .into_font()
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Center, VPos::Center));
                root.draw(&Text::new(
                    NO_DATA_MESSAGE,
                    (width as i32 / 2, height as i32 / 2),
                    style,
                ))
                .map_err(drawing_error)?;
            }
        }

        root.present().map_err(drawing_error)?;
        info!("Wrote {}", path.display());
        Ok(())
    }

    /// Upper bound for a count axis with some headroom above the tallest bar.
    pub fn axis_max(counts: impl Iterator<Item = usize>) -> u32 {
        let max = counts.max().unwrap_or(0) as u32;
        (max + max / 10).max(max + 1)
    }

    pub fn truncate_label(label: &str) -> String {
        if label.chars().count() <= MAX_LABEL_CHARS {
            label.to_string()
        } else {
            let head: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
            format!("{head}…")
        }
    }

    fn segment_label(value: &SegmentValue<usize>, labels: &[String]) -> String {
        match value {
            SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        }
    }
}
