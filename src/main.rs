mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::TurnstileApp;
use config::DashboardConfig;
use data::prepare::prepare_or_degraded;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load().unwrap_or_else(|e| {
        log::error!("{e:#}; falling back to default settings");
        DashboardConfig::default()
    });

    // Prepared once; every chart queries this snapshot.
    let data = prepare_or_degraded(&config);
    for warning in &data.warnings {
        log::debug!("{warning}");
    }
    let state = AppState::new(data, config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Turnstile – Attendance Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(TurnstileApp::new(state)))),
    )
}
