use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lanmap_common::error::ScanError;
use lanmap_common::network::range::NetworkRange;
use lanmap_core::discovery::{Candidates, Discoverer};
use lanmap_core::scanner::ScanCoordinator;
use lanmap_core::service::ScanService;

use crate::fakes::{AlwaysUpProber, ScriptedDiscoverer, range};

/// Never finishes a sweep within any reasonable deadline.
struct StuckDiscoverer;

#[async_trait]
impl Discoverer for StuckDiscoverer {
    async fn discover(&self, _range: NetworkRange) -> Candidates {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Candidates::new()
    }
}

#[tokio::test]
async fn timeout_is_distinct_from_empty() {
    let net = range("10.50.0.0/24");

    let stuck = ScanService::new(
        ScanCoordinator::new(vec![net], Arc::new(StuckDiscoverer), Arc::new(AlwaysUpProber::default()), 10),
        Duration::from_millis(100),
    );
    assert!(matches!(stuck.run_scan().await, Err(ScanError::Timeout(_))));

    let quiet = ScanService::new(
        ScanCoordinator::new(
            vec![net],
            Arc::new(ScriptedDiscoverer::default()),
            Arc::new(AlwaysUpProber::default()),
            10,
        ),
        Duration::from_secs(5),
    );
    let result = quiet.run_scan().await.unwrap();
    assert!(result.is_empty());
    assert!(quiet.last_result().await.is_none());
}

#[tokio::test]
async fn new_scan_replaces_cached_result() {
    let net = range("10.60.0.0/24");
    let svc = ScanService::new(
        ScanCoordinator::new(
            vec![net],
            Arc::new(ScriptedDiscoverer::default().answer(net, [Ipv4Addr::new(10, 60, 0, 5)])),
            Arc::new(AlwaysUpProber::default()),
            10,
        ),
        Duration::from_secs(5),
    );

    let first = svc.run_scan().await.unwrap();
    let second = svc.run_scan().await.unwrap();
    let cached = svc.last_result().await.unwrap();

    assert_eq!(first.devices(), second.devices());
    assert_eq!(cached.devices(), second.devices());
    assert_eq!(cached.devices()[0].ip(), Ipv4Addr::new(10, 60, 0, 5));
}
