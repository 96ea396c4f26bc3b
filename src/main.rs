mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use app::EvDashboardApp;
use clap::Parser;
use data::filter::FilterState;
use eframe::egui;
use state::{AppState, LoadStatus};

/// Interactive dashboard over an electric vehicle registration export.
#[derive(Parser, Debug)]
#[command(name = "ev-dashboard", version, about)]
struct Args {
    /// CSV export to load at startup
    #[arg(env = "EV_DASHBOARD_DATA")]
    data: Option<PathBuf>,

    /// Initial rows per table page
    #[arg(long, default_value_t = 10)]
    page_size: usize,

    /// Print the filtered summary and charts as JSON instead of opening a window
    #[arg(long, requires = "data")]
    headless: bool,

    /// Free-text search across every field (headless mode)
    #[arg(long, default_value = "")]
    search: String,

    /// Manufacturer substring (headless mode)
    #[arg(long, default_value = "")]
    make: String,

    /// Vehicle type substring (headless mode)
    #[arg(long = "type", default_value = "")]
    vehicle_type: String,

    /// Exact model year (headless mode)
    #[arg(long, default_value = "")]
    year: String,

    /// City substring (headless mode)
    #[arg(long, default_value = "")]
    city: String,
}

impl Args {
    fn filters(&self) -> FilterState {
        FilterState {
            make: self.make.clone(),
            vehicle_type: self.vehicle_type.clone(),
            year: self.year.clone(),
            city: self.city.clone(),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.headless {
        return run_headless(&args);
    }

    let mut state = AppState::with_page_size(args.page_size);
    if let Some(path) = args.data.clone() {
        state.start_load(path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Electric Vehicle Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(EvDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("event loop failed: {e}"))
}

fn run_headless(args: &Args) -> Result<()> {
    let Some(path) = &args.data else {
        bail!("--headless needs a data file");
    };

    let mut state = AppState::default();
    state.load_blocking(path.clone());
    if let LoadStatus::Failed(msg) = &state.status {
        // Still print the (empty) snapshot so downstream tooling gets valid JSON.
        log::error!("{}: {msg}", path.display());
    }

    state.search = args.search.clone();
    state.filters = args.filters();
    state.recompute();

    let json = serde_json::to_string_pretty(&state.snapshot).context("serialising snapshot")?;
    println!("{json}");
    Ok(())
}
