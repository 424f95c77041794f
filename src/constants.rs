//! Central Configuration Constants
//!
//! Single source of truth for window geometry, scan cadence and UI defaults.

use std::time::Duration;

/// App name (window title)
pub const APP_NAME: &str = "Wi-Fi Analyser";

/// Upper bound on how long one scan cycle waits for the radio
pub const SCAN_MAX_WAIT: Duration = Duration::from_secs(1);

/// How often the cancellation flag is checked while waiting on a scan
pub const SCAN_POLL_STEP: Duration = Duration::from_millis(50);

/// Repaint cadence while idle (keeps the age counters ticking)
pub const REPAINT_INTERVAL: Duration = Duration::from_millis(250);

/// Initial window size
pub const WINDOW_WIDTH: f32 = 1280.0;
pub const WINDOW_HEIGHT: f32 = 720.0;

/// Default background colour (RGB, 0.0..=1.0)
pub const DEFAULT_BACKGROUND: [f32; 3] = [0.45, 0.55, 0.60];

/// Storage key for persisted UI preferences
pub const PREFS_STORAGE_KEY: &str = "wifi-analyser.prefs";
