//! Scan-result aggregation.
//!
//! Three maps, all owned here and only ever touched from the render thread
//! between frames:
//! - SSID -> set of BSSIDs ever seen advertising it. Create-only: a BSSID is
//!   never removed from the set, even when it stops being observed. Staleness
//!   is shown through the age field instead of eviction.
//! - SSID -> latest network-level snapshot, replaced wholesale on ingestion.
//! - BSSID -> latest access-point snapshot plus last-seen timestamp. If a
//!   BSSID is missing from a scan its old record stays put; re-observation
//!   overwrites record and timestamp together.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Instant;

use crate::scanner::{AccessPointDescriptor, NetworkDescriptor};

#[cfg(test)]
mod tests;

/// One SSID with its metadata (if any was ever seen) and every BSSID that has
/// ever advertised it.
pub struct SsidEntry<'a> {
    pub ssid: &'a str,
    /// Absent when the SSID is only known through BSS-level sightings.
    pub network: Option<&'a NetworkDescriptor>,
    pub bssids: &'a BTreeSet<String>,
}

/// Latest sighting of one access point.
pub struct AccessPointView<'a> {
    pub descriptor: &'a AccessPointDescriptor,
    /// Whole seconds since the sighting, floor-truncated.
    pub age_secs: u64,
}

#[derive(Default)]
pub struct NetworkAggregator {
    /// SSID -> BSSIDs ever seen advertising it (create-only).
    tree: BTreeMap<String, BTreeSet<String>>,
    /// SSID -> latest network-level snapshot.
    networks: HashMap<String, NetworkDescriptor>,
    /// BSSID -> (last seen, latest access-point snapshot).
    access_points: HashMap<String, (Instant, AccessPointDescriptor)>,
}

impl NetworkAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one scan snapshot into the cumulative state.
    ///
    /// Empty inputs are a no-op. Must not race the read side; the frame loop
    /// guarantees that by running ingestion and presentation back to back.
    pub fn ingest(
        &mut self,
        networks: Vec<NetworkDescriptor>,
        access_points: Vec<AccessPointDescriptor>,
    ) {
        self.ingest_at(Instant::now(), networks, access_points);
    }

    fn ingest_at(
        &mut self,
        now: Instant,
        networks: Vec<NetworkDescriptor>,
        access_points: Vec<AccessPointDescriptor>,
    ) {
        for network in networks {
            self.tree.entry(network.ssid.clone()).or_default();
            self.networks.insert(network.ssid.clone(), network);
        }

        for ap in access_points {
            self.tree
                .entry(ap.ssid.clone())
                .or_default()
                .insert(ap.bssid.clone());
            self.access_points.insert(ap.bssid.clone(), (now, ap));
        }
    }

    /// Every SSID ever observed, in display order.
    pub fn ssids(&self) -> impl Iterator<Item = SsidEntry<'_>> {
        self.tree.iter().map(|(ssid, bssids)| SsidEntry {
            ssid,
            network: self.networks.get(ssid),
            bssids,
        })
    }

    /// Latest sighting of `bssid`, if it was ever observed.
    pub fn access_point(&self, bssid: &str) -> Option<AccessPointView<'_>> {
        self.access_point_at(bssid, Instant::now())
    }

    fn access_point_at(&self, bssid: &str, now: Instant) -> Option<AccessPointView<'_>> {
        self.access_points
            .get(bssid)
            .map(|(seen_at, descriptor)| AccessPointView {
                descriptor,
                age_secs: now.saturating_duration_since(*seen_at).as_secs(),
            })
    }

    pub fn ssid_count(&self) -> usize {
        self.tree.len()
    }

    pub fn access_point_count(&self) -> usize {
        self.access_points.len()
    }
}
