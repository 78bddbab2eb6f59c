mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::{anyhow, Context};
use app::SalaryLensApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::default();

    // The dataset is fetched once, before the window opens; a failed load is fatal.
    let dataset = data::loader::load_source(&config.source)
        .inspect_err(|e| log::error!("Failed to load dataset: {e}"))
        .with_context(|| format!("loading salary dataset from {}", config.source))?;

    if dataset.is_empty() {
        log::warn!("Dataset from {} has no records", config.source);
    }

    let title = config.window_title.clone();
    let state = AppState::new(dataset, config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(SalaryLensApp::new(state)))),
    )
    .map_err(|e| anyhow!("running dashboard window: {e}"))
}
