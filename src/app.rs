//! Frame loop driver.
//!
//! Each frame: poll the background scan; if it completed, ingest the snapshot
//! and kick off the next cycle; then draw. Ingestion always happens before
//! the presentation pass, and both run on the render thread, so no frame ever
//! sees partially-merged state.

use std::sync::Arc;

use chrono::{DateTime, Local};
use eframe::egui;
use serde::{Deserialize, Serialize};

use crate::aggregator::NetworkAggregator;
use crate::constants::{
    DEFAULT_BACKGROUND, PREFS_STORAGE_KEY, REPAINT_INTERVAL, SCAN_MAX_WAIT,
};
use crate::scanner::worker::ScanWorker;
use crate::scanner::{self, ScanError};
use crate::ui;

/// Cosmetic state persisted across runs via eframe storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UiPrefs {
    background: [f32; 3],
}

impl Default for UiPrefs {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND,
        }
    }
}

pub struct AnalyserApp {
    aggregator: NetworkAggregator,
    worker: ScanWorker,
    prefs: UiPrefs,
    last_ingest: Option<DateTime<Local>>,
    last_scan_error: Option<String>,
}

impl AnalyserApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let prefs = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, PREFS_STORAGE_KEY))
            .unwrap_or_default();

        let mut worker = ScanWorker::new(Arc::from(scanner::create_scanner()));
        // Cached driver results first, so the window is not empty for a full
        // scan cycle after startup.
        worker.request_cached();

        Self {
            aggregator: NetworkAggregator::new(),
            worker,
            prefs,
            last_ingest: None,
            last_scan_error: None,
        }
    }

    fn poll_scan(&mut self) {
        let Some(result) = self.worker.try_complete() else {
            return;
        };

        match result {
            Ok(outcome) => {
                log::debug!(
                    "scan cycle complete: {} networks, {} access points",
                    outcome.networks.len(),
                    outcome.access_points.len()
                );
                self.aggregator.ingest(outcome.networks, outcome.access_points);
                self.last_ingest = Some(Local::now());
                self.last_scan_error = None;
            }
            Err(ScanError::Interrupted) => {
                // Shutdown in progress; nothing to ingest.
                return;
            }
            Err(e) => {
                log::warn!("scan cycle failed: {}", e);
                self.last_scan_error = Some(e.to_string());
            }
        }

        // Previous cycle observed complete; start the next one.
        self.worker.request(SCAN_MAX_WAIT);
    }

    fn draw_status_panel(&mut self, ctx: &egui::Context) {
        let fill = egui::Color32::from_rgb(
            (self.prefs.background[0] * 255.0) as u8,
            (self.prefs.background[1] * 255.0) as u8,
            (self.prefs.background[2] * 255.0) as u8,
        );

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(fill))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Background:");
                    ui.color_edit_button_rgb(&mut self.prefs.background);
                    ui.separator();
                    ui.label(format!(
                        "{} networks, {} access points",
                        self.aggregator.ssid_count(),
                        self.aggregator.access_point_count()
                    ));
                    ui.separator();
                    match &self.last_ingest {
                        Some(at) => {
                            ui.label(format!("last scan {}", at.format("%H:%M:%S")));
                        }
                        None => {
                            ui.label("waiting for first scan...");
                        }
                    }
                    if self.worker.in_flight() {
                        ui.separator();
                        ui.spinner();
                    }
                });

                if let Some(error) = &self.last_scan_error {
                    ui.colored_label(
                        egui::Color32::from_rgb(220, 80, 80),
                        format!("scan failed: {}", error),
                    );
                }
            });
    }
}

impl eframe::App for AnalyserApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_scan();

        self.draw_status_panel(ctx);
        ui::draw_network_tree(ctx, &self.aggregator);

        // Keep the age counters ticking even without input events.
        ctx.request_repaint_after(REPAINT_INTERVAL);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, PREFS_STORAGE_KEY, &self.prefs);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.worker.shutdown();
    }
}
