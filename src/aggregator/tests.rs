//! Tests for scan-result aggregation.

use std::time::{Duration, Instant};

use super::NetworkAggregator;
use crate::scanner::{
    AccessPointDescriptor, AuthAlgorithm, CipherAlgorithm, NetworkDescriptor, PhyType,
};

fn network(ssid: &str, signal_quality: u32, secure: bool) -> NetworkDescriptor {
    NetworkDescriptor {
        ssid: ssid.into(),
        signal_quality,
        security_enabled: secure,
        auth: AuthAlgorithm::RsnaPsk,
        cipher: CipherAlgorithm::Ccmp,
    }
}

fn access_point(bssid: &str, ssid: &str, phy: PhyType) -> AccessPointDescriptor {
    AccessPointDescriptor {
        bssid: bssid.into(),
        ssid: ssid.into(),
        link_quality: 60,
        signal_dbm: -60,
        frequency_khz: 2_412_000,
        channel: 1,
        phy,
    }
}

#[test]
fn ssid_only_ingestion_creates_entry_with_empty_bssid_set() {
    let mut agg = NetworkAggregator::new();
    agg.ingest(vec![network("Home", 80, true)], vec![]);

    let entries: Vec<_> = agg.ssids().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].ssid, "Home");
    assert!(entries[0].bssids.is_empty());

    let meta = entries[0].network.expect("metadata was ingested");
    assert_eq!(meta.signal_quality, 80);
    assert!(meta.security_enabled);
}

#[test]
fn bss_only_ingestion_creates_ssid_without_metadata() {
    let mut agg = NetworkAggregator::new();
    agg.ingest(vec![], vec![access_point("AA:BB", "Home", PhyType::Ht)]);

    let entries: Vec<_> = agg.ssids().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].ssid, "Home");
    assert!(entries[0].network.is_none());
    assert!(entries[0].bssids.contains("AA:BB"));

    let view = agg.access_point("AA:BB").expect("sighting was ingested");
    assert_eq!(view.descriptor.phy.label(), "n");
}

#[test]
fn network_metadata_is_replaced_wholesale() {
    let mut agg = NetworkAggregator::new();
    agg.ingest(vec![network("Home", 80, true)], vec![]);
    agg.ingest(vec![network("Home", 35, false)], vec![]);

    let entries: Vec<_> = agg.ssids().collect();
    let meta = entries[0].network.expect("metadata present");
    assert_eq!(meta.signal_quality, 35);
    assert!(!meta.security_enabled);
}

#[test]
fn later_ssid_scan_does_not_clear_the_bssid_set() {
    let mut agg = NetworkAggregator::new();
    agg.ingest(vec![], vec![access_point("AA:BB", "Home", PhyType::Ht)]);
    agg.ingest(vec![network("Home", 50, true)], vec![]);

    let entries: Vec<_> = agg.ssids().collect();
    assert!(entries[0].bssids.contains("AA:BB"));
}

#[test]
fn bssid_sets_grow_monotonically_and_never_evict() {
    let mut agg = NetworkAggregator::new();
    agg.ingest(vec![], vec![access_point("AA:BB", "Home", PhyType::Ht)]);
    agg.ingest(vec![], vec![access_point("CC:DD", "Home", PhyType::Vht)]);

    // "AA:BB" was not observed in the second scan but is still listed.
    let entries: Vec<_> = agg.ssids().collect();
    assert_eq!(entries[0].bssids.len(), 2);
    assert!(agg.access_point("AA:BB").is_some());

    // A scan that sees nothing changes nothing.
    agg.ingest(vec![], vec![]);
    let entries: Vec<_> = agg.ssids().collect();
    assert_eq!(entries[0].bssids.len(), 2);
}

#[test]
fn reobservation_overwrites_snapshot_and_timestamp() {
    let mut agg = NetworkAggregator::new();
    let t0 = Instant::now();

    let mut first = access_point("AA:BB", "Home", PhyType::Ht);
    first.link_quality = 40;
    agg.ingest_at(t0, vec![], vec![first]);

    let mut second = access_point("AA:BB", "Home", PhyType::Vht);
    second.link_quality = 90;
    agg.ingest_at(t0 + Duration::from_secs(5), vec![], vec![second]);

    // Only the most recent snapshot survives, and its age restarts at zero.
    let view = agg
        .access_point_at("AA:BB", t0 + Duration::from_secs(5))
        .expect("sighting present");
    assert_eq!(view.descriptor.link_quality, 90);
    assert_eq!(view.descriptor.phy, PhyType::Vht);
    assert_eq!(view.age_secs, 0);

    let view = agg
        .access_point_at("AA:BB", t0 + Duration::from_secs(8))
        .expect("sighting present");
    assert_eq!(view.age_secs, 3);
}

#[test]
fn identical_ingestion_is_idempotent_for_set_sizes() {
    let mut agg = NetworkAggregator::new();
    let snapshot = || {
        (
            vec![network("Home", 80, true)],
            vec![
                access_point("AA:BB", "Home", PhyType::Ht),
                access_point("CC:DD", "Home", PhyType::Erp),
            ],
        )
    };

    let (nets, aps) = snapshot();
    agg.ingest(nets, aps);
    let (nets, aps) = snapshot();
    agg.ingest(nets, aps);

    let entries: Vec<_> = agg.ssids().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].bssids.len(), 2);
    assert_eq!(agg.access_point_count(), 2);
}

#[test]
fn age_is_floor_truncated_and_non_negative() {
    let mut agg = NetworkAggregator::new();
    let t0 = Instant::now();
    agg.ingest_at(t0, vec![], vec![access_point("AA:BB", "Home", PhyType::Ht)]);

    let view = agg
        .access_point_at("AA:BB", t0 + Duration::from_millis(2_900))
        .expect("sighting present");
    assert_eq!(view.age_secs, 2);

    // A clock query from before the sighting cannot go negative.
    let view = agg.access_point_at("AA:BB", t0).expect("sighting present");
    assert_eq!(view.age_secs, 0);
}

#[test]
fn distinct_ssids_keep_distinct_sets() {
    let mut agg = NetworkAggregator::new();
    agg.ingest(
        vec![network("Home", 80, true), network("Cafe", 40, false)],
        vec![
            access_point("AA:BB", "Home", PhyType::Ht),
            access_point("CC:DD", "Cafe", PhyType::Erp),
        ],
    );

    let entries: Vec<_> = agg.ssids().collect();
    assert_eq!(agg.ssid_count(), 2);
    // BTreeMap iteration: "Cafe" sorts before "Home".
    assert_eq!(entries[0].ssid, "Cafe");
    assert!(entries[0].bssids.contains("CC:DD"));
    assert!(!entries[0].bssids.contains("AA:BB"));
    assert_eq!(entries[1].ssid, "Home");
    assert!(entries[1].bssids.contains("AA:BB"));
}
