//! Presentation adapter: walks the aggregator once per frame and emits
//! widgets. No business logic lives here.

use eframe::egui;

use crate::aggregator::{NetworkAggregator, SsidEntry};

const UNKNOWN: &str = "unknown";

/// One collapsible window per SSID, with a nested node per BSSID.
pub fn draw_network_tree(ctx: &egui::Context, aggregator: &NetworkAggregator) {
    for entry in aggregator.ssids() {
        let title = if entry.ssid.is_empty() {
            "<hidden>".to_owned()
        } else {
            entry.ssid.to_owned()
        };

        egui::Window::new(title)
            .id(egui::Id::new(("ssid", entry.ssid)))
            .default_width(420.0)
            .show(ctx, |ui| {
                draw_network_summary(ui, &entry);
                for bssid in entry.bssids {
                    draw_access_point_node(ui, aggregator, bssid);
                }
            });
    }
}

fn draw_network_summary(ui: &mut egui::Ui, entry: &SsidEntry<'_>) {
    match entry.network {
        Some(network) => {
            ui.label(format!("Signal: {}%", network.signal_quality));
            ui.label(format!("Secure: {}", network.security_enabled));
            ui.label(format!("Authentication: {}", network.auth));
            ui.label(format!("Cipher: {}", network.cipher));
        }
        None => {
            // SSID known only through BSS-level sightings.
            ui.label(format!("Signal: {}", UNKNOWN));
            ui.label(format!("Secure: {}", UNKNOWN));
            ui.label(format!("Authentication: {}", UNKNOWN));
            ui.label(format!("Cipher: {}", UNKNOWN));
        }
    }
}

fn draw_access_point_node(ui: &mut egui::Ui, aggregator: &NetworkAggregator, bssid: &str) {
    let view = aggregator.access_point(bssid);

    let header = match &view {
        Some(view) => format!(
            "{} {}% ch{} 802.11{} (seen {}s ago)",
            bssid,
            view.descriptor.link_quality,
            view.descriptor.channel,
            view.descriptor.phy.label(),
            view.age_secs,
        ),
        None => format!("{} (never sighted)", bssid),
    };

    egui::CollapsingHeader::new(header)
        .id_salt(("bssid", bssid))
        .show(ui, |ui| match &view {
            Some(view) => {
                let ap = view.descriptor;
                ui.label(format!("BSSID: {}", ap.bssid));
                ui.label(format!("Quality: {}%", ap.link_quality));
                ui.label(format!("Type: 802.11{}", ap.phy.label()));
                ui.label(format!("Last seen: {}s ago", view.age_secs));
                ui.label(format!("Frequency: {}KHz", ap.frequency_khz));
                ui.label(format!("Channel: {}", ap.channel));
                ui.label(format!("Signal: {}dB", ap.signal_dbm));
            }
            None => {
                ui.label(format!("No sighting recorded: {}", UNKNOWN));
            }
        });
}
