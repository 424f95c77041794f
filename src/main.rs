//! Wi-Fi Analyser - Main Entry Point

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod aggregator;
mod app;
pub mod constants;
mod scanner;
mod ui;

use eframe::egui;

fn main() -> eframe::Result<()> {
    #[cfg(debug_assertions)]
    {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .init();
    }

    log::info!(
        "Starting {} v{}...",
        constants::APP_NAME,
        env!("CARGO_PKG_VERSION")
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([constants::WINDOW_WIDTH, constants::WINDOW_HEIGHT]),
        ..Default::default()
    };

    eframe::run_native(
        constants::APP_NAME,
        options,
        Box::new(|cc| Ok(Box::new(app::AnalyserApp::new(cc)))),
    )
}
