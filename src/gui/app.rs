//! CORD-19 Explorer Main Application
//! Main window with control panel and chart viewer.

use crate::charts::WordCloudBuilder;
use crate::config::Settings;
use crate::data::{Cleaner, DataLoader, LoaderError, MetadataTable, YearRange};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, Snapshot};
use crate::stats::{Aggregations, Aggregator, DatasetOverview, WordCountSummary};
use egui::SidePanel;
use log::{debug, warn};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// CSV loading result from background thread
enum LoadResult {
    Complete {
        table: MetadataTable,
        overview: DatasetOverview,
    },
    Error(LoaderError),
}

/// A loaded table with the parts that do not depend on the year range.
struct LoadedDataset {
    table: MetadataTable,
    cleaned: Vec<usize>,
    word_counts: Option<WordCountSummary>,
}

impl LoadedDataset {
    fn new(table: MetadataTable) -> Self {
        let cleaned = Cleaner::clean(&table);
        let word_counts = WordCountSummary::from_view(&cleaned);
        let cleaned = cleaned.into_indices();
        Self {
            table,
            cleaned,
            word_counts,
        }
    }

    fn cleaned_rows(&self) -> usize {
        self.cleaned.len()
    }

    /// Aggregate the cleaned rows inside `range`.
    fn aggregate(&self, range: YearRange, top_n: usize, sample_rows: usize) -> Aggregations {
        let filtered = self.table.view_within_years(&self.cleaned, range);
        Aggregator::summarize(&filtered, top_n, sample_rows)
    }
}

/// Main application window.
pub struct ExplorerApp {
    settings: Settings,
    dataset: Option<LoadedDataset>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    word_clouds: WordCloudBuilder,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
}

impl ExplorerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let control_panel = ControlPanel::new(settings.slider_bounds(), settings.default_range());
        let word_clouds =
            WordCloudBuilder::new(settings.word_cloud_width, settings.word_cloud_height)
                .max_words(settings.max_words);

        let mut app = Self {
            dataset: None,
            control_panel,
            chart_viewer: ChartViewer::new(),
            word_clouds,
            load_rx: None,
            settings,
        };

        let initial = app.settings.csv_path.clone();
        if initial.is_file() {
            app.start_loading(initial);
        } else {
            warn!("{} not found, waiting for a file to be selected", initial.display());
            app.control_panel.set_status("Select a metadata CSV file to begin");
        }
        app
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if self.control_panel.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_loading(path);
        }
    }

    /// Read the file and derive its columns on a helper thread; results arrive via
    /// `check_load_results`.
    fn start_loading(&mut self, path: PathBuf) {
        self.chart_viewer.clear();
        self.control_panel.csv_path = Some(path.clone());
        self.control_panel.is_loading = true;
        self.control_panel.set_status("Loading CSV file...");

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let result = match DataLoader::load_csv(&path) {
                Ok(loaded) => LoadResult::Complete {
                    table: Cleaner::prepare(loaded.rows),
                    overview: loaded.overview,
                },
                Err(e) => LoadResult::Error(e),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete { table, overview }) => {
                self.control_panel.set_status(&format!(
                    "Loaded {} rows, {} columns",
                    overview.rows, overview.columns
                ));
                let dataset = LoadedDataset::new(table);
                self.control_panel.overview = Some(overview);
                self.control_panel.cleaned_rows = dataset.cleaned_rows();
                self.control_panel.word_counts = dataset.word_counts;
                self.control_panel.is_loading = false;
                self.dataset = Some(dataset);
                self.recompute();
            }
            Ok(LoadResult::Error(error)) => {
                warn!("Load failed: {error}");
                self.control_panel.set_status(&format!("Error: {error}"));
                self.control_panel.is_loading = false;
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                // Still loading
                self.load_rx = Some(rx);
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.control_panel.set_status("Error: loader stopped unexpectedly");
                self.control_panel.is_loading = false;
            }
        }
    }

    /// Re-run the aggregations for the selected year range.
    fn recompute(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };

        let range = self.control_panel.selected_range();
        let aggregations =
            dataset.aggregate(range, self.settings.top_n, self.settings.sample_rows);
        let word_cloud = self.word_clouds.build(&aggregations.title_text);
        debug!(
            "Recomputed for {range}: {} rows, {} years",
            aggregations.total_rows,
            aggregations.by_year.len()
        );

        self.chart_viewer.set_snapshot(Snapshot {
            range,
            aggregations,
            word_cloud,
        });
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        // Request repaint while loading
        if self.control_panel.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::RangeChanged => self.recompute(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
