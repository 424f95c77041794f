//! Stub scanner for platforms without the native wireless API.
//!
//! Keeps the crate building everywhere; every operation reports
//! `ScanError::Unsupported`, which the UI surfaces as a status line.

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use super::{AccessPointDescriptor, NetworkDescriptor, ScanError, ScanResult, WirelessScanner};

pub struct UnsupportedScanner;

impl WirelessScanner for UnsupportedScanner {
    fn enumerate_networks(&self) -> ScanResult<Vec<NetworkDescriptor>> {
        Err(ScanError::Unsupported)
    }

    fn enumerate_access_points(&self) -> ScanResult<Vec<AccessPointDescriptor>> {
        Err(ScanError::Unsupported)
    }

    fn trigger_scan(&self, _max_wait: Duration, _cancel: &AtomicBool) -> ScanResult<()> {
        Err(ScanError::Unsupported)
    }
}
