//! Background scan worker.
//!
//! At most one scan cycle is in flight at any time. Each cycle runs on its
//! own thread: trigger a scan, wait out the bound, enumerate both views, send
//! the snapshot over a channel. The render thread polls for completion once
//! per frame and ingests the result synchronously, so the aggregator is never
//! touched from two places at once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::{AccessPointDescriptor, NetworkDescriptor, ScanError, ScanResult, WirelessScanner};

/// Everything one scan cycle saw.
#[derive(Debug)]
pub struct ScanOutcome {
    pub networks: Vec<NetworkDescriptor>,
    pub access_points: Vec<AccessPointDescriptor>,
}

struct PendingScan {
    rx: mpsc::Receiver<ScanResult<ScanOutcome>>,
    handle: thread::JoinHandle<()>,
}

pub struct ScanWorker {
    scanner: Arc<dyn WirelessScanner>,
    cancel: Arc<AtomicBool>,
    pending: Option<PendingScan>,
}

impl ScanWorker {
    pub fn new(scanner: Arc<dyn WirelessScanner>) -> Self {
        Self {
            scanner,
            cancel: Arc::new(AtomicBool::new(false)),
            pending: None,
        }
    }

    /// Start a full scan cycle (trigger, bounded wait, enumerate).
    pub fn request(&mut self, max_wait: Duration) {
        self.spawn_cycle(Some(max_wait));
    }

    /// Read whatever the driver already has, without triggering a scan.
    /// Used once at startup so cached results show up immediately.
    pub fn request_cached(&mut self) {
        self.spawn_cycle(None);
    }

    fn spawn_cycle(&mut self, max_wait: Option<Duration>) {
        if self.pending.is_some() {
            return;
        }

        let scanner = Arc::clone(&self.scanner);
        let cancel = Arc::clone(&self.cancel);
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let result = run_cycle(scanner.as_ref(), max_wait, &cancel);
            // The app may have shut down already; a closed channel is fine.
            let _ = tx.send(result);
        });

        self.pending = Some(PendingScan { rx, handle });
    }

    /// Poll the in-flight cycle. Returns `Some` exactly once per cycle.
    pub fn try_complete(&mut self) -> Option<ScanResult<ScanOutcome>> {
        let result = match self.pending.as_ref()?.rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            // Sender dropped without sending: the cycle thread died.
            Err(TryRecvError::Disconnected) => Err(ScanError::Interrupted),
        };

        // The send is the thread's last act, so this join is prompt.
        if let Some(pending) = self.pending.take() {
            let _ = pending.handle.join();
        }
        Some(result)
    }

    pub fn in_flight(&self) -> bool {
        self.pending.is_some()
    }

    /// Raise the cancellation flag and wait for the in-flight cycle to end.
    pub fn shutdown(&mut self) {
        self.cancel.store(true, Ordering::SeqCst);
        if let Some(pending) = self.pending.take() {
            log::info!("waiting for in-flight scan to finish...");
            let _ = pending.handle.join();
        }
    }
}

fn run_cycle(
    scanner: &dyn WirelessScanner,
    max_wait: Option<Duration>,
    cancel: &AtomicBool,
) -> ScanResult<ScanOutcome> {
    if let Some(wait) = max_wait {
        scanner.trigger_scan(wait, cancel)?;
    }
    if cancel.load(Ordering::SeqCst) {
        return Err(ScanError::Interrupted);
    }

    let networks = scanner.enumerate_networks()?;
    let access_points = scanner.enumerate_access_points()?;
    Ok(ScanOutcome {
        networks,
        access_points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{AuthAlgorithm, CipherAlgorithm, PhyType};
    use std::time::Instant;

    /// Canned scanner that records how often a scan was triggered.
    struct CannedScanner {
        triggers: std::sync::atomic::AtomicU32,
    }

    impl CannedScanner {
        fn new() -> Self {
            Self {
                triggers: std::sync::atomic::AtomicU32::new(0),
            }
        }
    }

    impl WirelessScanner for CannedScanner {
        fn enumerate_networks(&self) -> ScanResult<Vec<NetworkDescriptor>> {
            Ok(vec![NetworkDescriptor {
                ssid: "Office".into(),
                signal_quality: 72,
                security_enabled: true,
                auth: AuthAlgorithm::RsnaPsk,
                cipher: CipherAlgorithm::Ccmp,
            }])
        }

        fn enumerate_access_points(&self) -> ScanResult<Vec<AccessPointDescriptor>> {
            Ok(vec![AccessPointDescriptor {
                bssid: "AA:BB:CC:DD:EE:FF".into(),
                ssid: "Office".into(),
                link_quality: 70,
                signal_dbm: -55,
                frequency_khz: 2_437_000,
                channel: 6,
                phy: PhyType::Ht,
            }])
        }

        fn trigger_scan(&self, _max_wait: Duration, cancel: &AtomicBool) -> ScanResult<()> {
            self.triggers.fetch_add(1, Ordering::SeqCst);
            if cancel.load(Ordering::SeqCst) {
                return Err(ScanError::Interrupted);
            }
            Ok(())
        }
    }

    fn wait_for_completion(worker: &mut ScanWorker) -> ScanResult<ScanOutcome> {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            if let Some(result) = worker.try_complete() {
                return result;
            }
            assert!(Instant::now() < deadline, "scan cycle never completed");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn cached_cycle_skips_the_trigger() {
        let scanner = Arc::new(CannedScanner::new());
        let mut worker = ScanWorker::new(scanner.clone());

        worker.request_cached();
        let outcome = wait_for_completion(&mut worker).expect("cached read should succeed");

        assert_eq!(outcome.networks.len(), 1);
        assert_eq!(outcome.access_points.len(), 1);
        assert_eq!(scanner.triggers.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn full_cycle_triggers_then_enumerates() {
        let scanner = Arc::new(CannedScanner::new());
        let mut worker = ScanWorker::new(scanner.clone());

        worker.request(Duration::from_millis(1));
        let outcome = wait_for_completion(&mut worker).expect("scan cycle should succeed");

        assert_eq!(outcome.networks[0].ssid, "Office");
        assert_eq!(scanner.triggers.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn at_most_one_cycle_in_flight() {
        let scanner = Arc::new(CannedScanner::new());
        let mut worker = ScanWorker::new(scanner.clone());

        worker.request(Duration::from_millis(1));
        assert!(worker.in_flight());

        // Further requests while one is pending are ignored.
        worker.request(Duration::from_millis(1));
        worker.request(Duration::from_millis(1));

        let _ = wait_for_completion(&mut worker);
        assert!(!worker.in_flight());
        assert_eq!(scanner.triggers.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn shutdown_joins_the_pending_cycle() {
        let scanner = Arc::new(CannedScanner::new());
        let mut worker = ScanWorker::new(scanner);

        worker.request(Duration::from_millis(1));
        worker.shutdown();
        assert!(!worker.in_flight());
    }
}
