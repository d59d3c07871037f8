//! CORD-19 Explorer - metadata analysis and interactive dashboard
//!
//! Loads the CORD-19 `metadata.csv`, cleans it, and either writes a batch
//! report of static charts or opens an interactive year-filtered dashboard.

mod charts;
mod config;
mod data;
mod gui;
mod report;
mod stats;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use eframe::egui;
use gui::ExplorerApp;
use log::info;
use std::path::PathBuf;

use config::Settings;

#[derive(Parser)]
#[command(name = "cord19-explorer", version, about = "Explore CORD-19 paper metadata")]
struct Cli {
    /// JSON settings file; unset keys keep their defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print summaries and write the chart images
    Analyze {
        /// Path to metadata.csv
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory the PNG charts are written to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Open the written charts in the system image viewer
        #[arg(long)]
        show: bool,
    },
    /// Launch the interactive dashboard
    Dashboard {
        /// Path to metadata.csv loaded at startup
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref()).context("loading settings")?;

    match cli.command {
        Command::Analyze {
            input,
            output_dir,
            show,
        } => {
            if let Some(input) = input {
                settings.csv_path = input;
            }
            if let Some(output_dir) = output_dir {
                settings.output_dir = output_dir;
            }

            let output = report::run(&settings)?;
            info!("Charts written to {}", settings.output_dir.display());
            if show {
                report::show(&output);
            }
            Ok(())
        }
        Command::Dashboard { input } => {
            if let Some(input) = input {
                settings.csv_path = input;
            }
            run_dashboard(settings)
        }
    }
}

fn run_dashboard(settings: Settings) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("CORD-19 Data Explorer"),
        ..Default::default()
    };

    eframe::run_native(
        "CORD-19 Data Explorer",
        options,
        Box::new(|cc| Ok(Box::new(ExplorerApp::new(cc, settings)))),
    )
    .map_err(|e| anyhow!("dashboard failed: {e}"))
}
