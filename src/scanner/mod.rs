//! Wi-Fi Scanner Module
//!
//! Platform-abstracted access to the native wireless API.
//! - Windows: raw FFI to the Native WiFi API (wlanapi.dll)
//! - elsewhere: stub scanner that reports the platform as unsupported
//!
//! The scanner hands out two independent views of what the driver currently
//! sees: SSID-level networks and BSSID-level access points. Triggering a scan
//! only refreshes the driver cache; it does not guarantee new results.

use std::fmt;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use thiserror::Error;

#[cfg(not(windows))]
mod fallback;
#[cfg(windows)]
mod windows;

pub mod worker;

// ============================================================================
// DOT11 ENUMS
// ============================================================================

/// 802.11 physical-layer type of an access point.
///
/// Raw values follow DOT11_PHY_TYPE from wlantypes.h.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhyType {
    Ofdm,
    HrDsss,
    Erp,
    Ht,
    Vht,
    Other(u32),
}

impl PhyType {
    pub fn from_dot11(raw: u32) -> Self {
        match raw {
            5 => PhyType::Ofdm,
            6 => PhyType::HrDsss,
            7 => PhyType::Erp,
            8 => PhyType::Ht,
            9 => PhyType::Vht,
            other => PhyType::Other(other),
        }
    }

    /// The 802.11 amendment letter shown in the UI ("802.11n" etc.).
    pub fn label(self) -> &'static str {
        match self {
            PhyType::Ofdm => "a",
            PhyType::HrDsss => "b",
            PhyType::Erp => "g",
            PhyType::Ht => "n",
            PhyType::Vht => "ac",
            PhyType::Other(_) => "?",
        }
    }
}

/// Authentication algorithm advertised by a network.
///
/// Raw values follow DOT11_AUTH_ALGORITHM from wlantypes.h.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAlgorithm {
    Open,
    SharedKey,
    Wpa,
    WpaPsk,
    Rsna,
    RsnaPsk,
    Wpa3Sae,
    Owe,
    Wpa3Enterprise,
    Other(u32),
}

impl AuthAlgorithm {
    pub fn from_dot11(raw: u32) -> Self {
        match raw {
            1 => AuthAlgorithm::Open,
            2 => AuthAlgorithm::SharedKey,
            3 => AuthAlgorithm::Wpa,
            4 => AuthAlgorithm::WpaPsk,
            6 => AuthAlgorithm::Rsna,
            7 => AuthAlgorithm::RsnaPsk,
            9 => AuthAlgorithm::Wpa3Sae,
            10 => AuthAlgorithm::Owe,
            8 | 11 => AuthAlgorithm::Wpa3Enterprise,
            other => AuthAlgorithm::Other(other),
        }
    }
}

impl fmt::Display for AuthAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::SharedKey => write!(f, "Shared Key"),
            Self::Wpa => write!(f, "WPA"),
            Self::WpaPsk => write!(f, "WPA-PSK"),
            Self::Rsna => write!(f, "WPA2-Enterprise"),
            Self::RsnaPsk => write!(f, "WPA2-Personal"),
            Self::Wpa3Sae => write!(f, "WPA3-Personal"),
            Self::Owe => write!(f, "OWE"),
            Self::Wpa3Enterprise => write!(f, "WPA3-Enterprise"),
            Self::Other(raw) => write!(f, "auth:{}", raw),
        }
    }
}

/// Cipher algorithm advertised by a network.
///
/// Raw values follow DOT11_CIPHER_ALGORITHM from wlantypes.h.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherAlgorithm {
    None,
    Wep40,
    Tkip,
    Ccmp,
    Wep104,
    Wep,
    Other(u32),
}

impl CipherAlgorithm {
    pub fn from_dot11(raw: u32) -> Self {
        match raw {
            0 => CipherAlgorithm::None,
            1 => CipherAlgorithm::Wep40,
            2 => CipherAlgorithm::Tkip,
            4 => CipherAlgorithm::Ccmp,
            5 => CipherAlgorithm::Wep104,
            0x101 => CipherAlgorithm::Wep,
            other => CipherAlgorithm::Other(other),
        }
    }
}

impl fmt::Display for CipherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Wep40 => write!(f, "WEP-40"),
            Self::Tkip => write!(f, "TKIP"),
            Self::Ccmp => write!(f, "CCMP"),
            Self::Wep104 => write!(f, "WEP-104"),
            Self::Wep => write!(f, "WEP"),
            Self::Other(raw) => write!(f, "cipher:{}", raw),
        }
    }
}

// ============================================================================
// SCAN DESCRIPTORS
// ============================================================================

/// SSID-level view of a visible network.
#[derive(Debug, Clone)]
pub struct NetworkDescriptor {
    pub ssid: String,
    /// Signal quality 0-100
    pub signal_quality: u32,
    pub security_enabled: bool,
    pub auth: AuthAlgorithm,
    pub cipher: CipherAlgorithm,
}

/// BSSID-level view of one physical access point.
#[derive(Debug, Clone)]
pub struct AccessPointDescriptor {
    /// MAC address of the radio, "AA:BB:CC:DD:EE:FF"
    pub bssid: String,
    /// SSID the radio was advertising at scan time
    pub ssid: String,
    /// Link quality 0-100
    pub link_quality: u32,
    /// Signal strength in dBm
    pub signal_dbm: i32,
    /// Channel center frequency in kHz
    pub frequency_khz: u32,
    pub channel: u32,
    pub phy: PhyType,
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("no wireless interface: {0}")]
    NoInterface(String),
    #[error("wireless API error {code} in {call}")]
    Api { call: &'static str, code: u32 },
    #[error("scan interrupted by shutdown")]
    Interrupted,
    #[error("wireless scanning is not supported on this platform")]
    Unsupported,
}

pub type ScanResult<T> = Result<T, ScanError>;

// ============================================================================
// SCANNER INTERFACE
// ============================================================================

/// The native wireless API, as far as this program is concerned.
pub trait WirelessScanner: Send + Sync {
    /// Enumerate currently visible SSID-level networks.
    fn enumerate_networks(&self) -> ScanResult<Vec<NetworkDescriptor>>;

    /// Enumerate currently visible BSSID-level access points.
    fn enumerate_access_points(&self) -> ScanResult<Vec<AccessPointDescriptor>>;

    /// Request a fresh scan and wait for it, bounded by `max_wait`.
    ///
    /// Returns early with `ScanError::Interrupted` once `cancel` is raised.
    /// Completion does not guarantee updated results, only that the request
    /// was issued and waited on.
    fn trigger_scan(&self, max_wait: Duration, cancel: &AtomicBool) -> ScanResult<()>;
}

/// Create the scanner for the current platform.
pub fn create_scanner() -> Box<dyn WirelessScanner> {
    #[cfg(windows)]
    {
        Box::new(windows::WindowsScanner::new())
    }
    #[cfg(not(windows))]
    {
        Box::new(fallback::UnsupportedScanner)
    }
}

/// Convert a channel center frequency in kHz to a Wi-Fi channel number.
pub(crate) fn channel_from_frequency_khz(freq_khz: u32) -> u32 {
    let freq_mhz = freq_khz / 1000;
    match freq_mhz {
        2484 => 14,
        f if (2412..2484).contains(&f) => (f - 2407) / 5,
        f if (5000..5900).contains(&f) => (f - 5000) / 5,
        f if (5955..7115).contains(&f) => (f - 5950) / 5,
        _ => 0,
    }
}
