//! # Scan Service
//!
//! The boundary every front end talks to. It adds what the coordinator leaves
//! out on purpose:
//!
//! - at most one scan in flight ([`ScanError::AlreadyRunning`] otherwise),
//! - an overall deadline ([`ScanError::Timeout`], distinct from an empty result),
//! - a cache of the last successful result, replaced whole by each non-empty scan.

use std::sync::Arc;
use std::time::Duration;

use lanmap_common::config::Config;
use lanmap_common::error::ScanError;
use lanmap_common::network::host::ScanResult;
use tokio::sync::{Mutex, RwLock};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::auxiliary::{self, AuxiliaryScanner, NoopScanner};
use crate::discovery::ArpDiscoverer;
use crate::prober::{HostProber, ProbeSettings};
use crate::ranges;
use crate::scanner::{HostFoundCallback, ScanCoordinator};
use crate::system::{self, OsSystem};

pub struct ScanService {
    coordinator: Arc<ScanCoordinator>,
    deadline: Duration,
    slot: Mutex<()>,
    last: RwLock<Option<ScanResult>>,
}

impl ScanService {
    pub fn new(coordinator: ScanCoordinator, deadline: Duration) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
            deadline,
            slot: Mutex::new(()),
            last: RwLock::new(None),
        }
    }

    /// Wires the engine against the running host.
    ///
    /// Flushes the neighbour cache first when `cfg.flush_arp_cache` is set; that
    /// happens once here, never per scan.
    pub fn from_config(cfg: &Config, on_host_found: Option<HostFoundCallback>) -> Self {
        if cfg.flush_arp_cache {
            system::flush_arp_cache();
        }

        let ranges = ranges::resolve_ranges(cfg.range, &OsSystem);
        let aux: Arc<dyn AuxiliaryScanner> = if cfg.no_aux {
            Arc::new(NoopScanner)
        } else {
            auxiliary::detect()
        };

        let discoverer = Arc::new(ArpDiscoverer::from_config(cfg));
        let prober = Arc::new(HostProber::new(ProbeSettings::from(cfg), aux));
        let mut coordinator = ScanCoordinator::new(ranges, discoverer, prober, cfg.workers);
        if let Some(callback) = on_host_found {
            coordinator = coordinator.with_host_callback(callback);
        }

        Self::new(coordinator, cfg.scan_deadline)
    }

    pub fn coordinator(&self) -> &ScanCoordinator {
        &self.coordinator
    }

    pub async fn run_scan(&self) -> Result<ScanResult, ScanError> {
        let Ok(_slot) = self.slot.try_lock() else {
            warn!("Scan requested while another scan is running");
            return Err(ScanError::AlreadyRunning);
        };

        let coordinator = self.coordinator.clone();
        let mut task = tokio::spawn(async move { coordinator.scan().await });

        let result = match timeout(self.deadline, &mut task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => return Err(ScanError::Failed(e.to_string())),
            Err(_) => {
                task.abort();
                warn!("Scan timed out after {}s", self.deadline.as_secs());
                return Err(ScanError::Timeout(self.deadline));
            }
        };

        if result.is_empty() {
            info!("Scan finished without devices, keeping the previous result");
        } else {
            *self.last.write().await = Some(result.clone());
        }
        Ok(result)
    }

    /// Result of the last scan that found devices.
    pub async fn last_result(&self) -> Option<ScanResult> {
        self.last.read().await.clone()
    }

    /// The cached result, or a fresh scan when nothing is cached yet.
    pub async fn devices_or_scan(&self) -> Result<ScanResult, ScanError> {
        if let Some(result) = self.last_result().await {
            return Ok(result);
        }
        self.run_scan().await
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{Candidates, Discoverer};
    use crate::prober::Prober;
    use async_trait::async_trait;
    use lanmap_common::network::host::HostRecord;
    use lanmap_common::network::range::NetworkRange;
    use pnet::util::MacAddr;
    use std::net::Ipv4Addr;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Answers with one host while `online` is set, after `delay`.
    struct SwitchDiscoverer {
        online: AtomicBool,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl SwitchDiscoverer {
        fn new(delay: Duration) -> Self {
            Self {
                online: AtomicBool::new(true),
                delay,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Discoverer for SwitchDiscoverer {
        async fn discover(&self, _range: NetworkRange) -> Candidates {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.online.load(Ordering::SeqCst) {
                Candidates::from([(Ipv4Addr::new(192, 168, 9, 20), Some(MacAddr::new(2, 0, 0, 0, 0, 9)))])
            } else {
                Candidates::new()
            }
        }
    }

    /// Never answers; records when the scan lets go of it.
    struct HangingDiscoverer {
        released: Arc<AtomicBool>,
    }

    struct Release(Arc<AtomicBool>);

    impl Drop for Release {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl Discoverer for HangingDiscoverer {
        async fn discover(&self, _range: NetworkRange) -> Candidates {
            let _release = Release(self.released.clone());
            std::future::pending::<()>().await;
            Candidates::new()
        }
    }

    struct EchoProber;

    #[async_trait]
    impl Prober for EchoProber {
        async fn probe(&self, ip: Ipv4Addr, known_mac: Option<MacAddr>) -> Option<HostRecord> {
            let mut record = HostRecord::new(ip);
            record.mac = known_mac;
            record.into_reportable()
        }
    }

    fn service(discoverer: Arc<SwitchDiscoverer>, deadline: Duration) -> ScanService {
        let range: NetworkRange = "192.168.9.0/24".parse().unwrap();
        let coordinator = ScanCoordinator::new(vec![range], discoverer, Arc::new(EchoProber), 10);
        ScanService::new(coordinator, deadline)
    }

    #[tokio::test]
    async fn run_scan_caches_result() {
        let svc = service(Arc::new(SwitchDiscoverer::new(Duration::ZERO)), Duration::from_secs(5));
        assert!(svc.last_result().await.is_none());

        let result = svc.run_scan().await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(svc.last_result().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_scan_keeps_previous_cache() {
        let discoverer = Arc::new(SwitchDiscoverer::new(Duration::ZERO));
        let svc = service(discoverer.clone(), Duration::from_secs(5));
        svc.run_scan().await.unwrap();

        discoverer.online.store(false, Ordering::SeqCst);
        let result = svc.run_scan().await.unwrap();
        assert!(result.is_empty());
        assert_eq!(svc.last_result().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn slow_scan_times_out() {
        let svc = service(
            Arc::new(SwitchDiscoverer::new(Duration::from_secs(5))),
            Duration::from_millis(50),
        );
        match svc.run_scan().await {
            Err(ScanError::Timeout(deadline)) => assert_eq!(deadline, Duration::from_millis(50)),
            other => panic!("expected timeout, got {other:?}"),
        }
        assert!(svc.last_result().await.is_none());
    }

    #[tokio::test]
    async fn timed_out_scan_drops_discovery() {
        let released = Arc::new(AtomicBool::new(false));
        let discoverer = Arc::new(HangingDiscoverer {
            released: released.clone(),
        });
        let range: NetworkRange = "192.168.9.0/24".parse().unwrap();
        let coordinator = ScanCoordinator::new(vec![range], discoverer, Arc::new(EchoProber), 2);
        let svc = ScanService::new(coordinator, Duration::from_millis(50));

        assert!(matches!(svc.run_scan().await, Err(ScanError::Timeout(_))));
        for _ in 0..50 {
            if released.load(Ordering::SeqCst) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(released.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn concurrent_scan_is_rejected() {
        let svc = Arc::new(service(
            Arc::new(SwitchDiscoverer::new(Duration::from_millis(300))),
            Duration::from_secs(5),
        ));

        let first = tokio::spawn({
            let svc = svc.clone();
            async move { svc.run_scan().await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(matches!(svc.run_scan().await, Err(ScanError::AlreadyRunning)));
        assert!(first.await.unwrap().is_ok());
        // The slot is free again.
        assert!(svc.run_scan().await.is_ok());
    }

    #[tokio::test]
    async fn devices_or_scan_prefers_cache() {
        let discoverer = Arc::new(SwitchDiscoverer::new(Duration::ZERO));
        let svc = service(discoverer.clone(), Duration::from_secs(5));

        svc.devices_or_scan().await.unwrap();
        svc.devices_or_scan().await.unwrap();
        assert_eq!(discoverer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    #[ignore = "needs root and a live network"]
    async fn scan_local_network() {
        let cfg = Config {
            no_aux: true,
            flush_arp_cache: false,
            ..Config::default()
        };
        let svc = ScanService::from_config(&cfg, None);
        let result = svc.run_scan().await.unwrap();
        for device in &result {
            println!("{} {}", device.ip(), device.device_type);
        }
    }
}
