mod app;
mod charts;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use app::HappinessDashboardApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::from_env();
    log::info!(
        "Starting with data folder {} (top {}, preview {} rows)",
        config.data_dir.display(),
        config.top_n,
        config.preview_rows
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "World Happiness Dashboard",
        options,
        Box::new(move |cc| {
            ui::theme::apply(&cc.egui_ctx, &config.theme);
            Ok(Box::new(HappinessDashboardApp::new(config)))
        }),
    )
}
