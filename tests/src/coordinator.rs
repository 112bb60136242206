use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use lanmap_core::discovery::ArpDiscoverer;
use lanmap_core::scanner::ScanCoordinator;

use crate::fakes::{AlwaysUpProber, ScriptedDiscoverer, range};

#[tokio::test]
async fn two_hundred_targets_yield_two_hundred_records() {
    let net = range("10.20.0.0/23");
    let targets: Vec<Ipv4Addr> = net.hosts().take(200).collect();

    for _ in 0..5 {
        let discoverer = Arc::new(ScriptedDiscoverer::default().answer(net, targets.clone()));
        let prober = Arc::new(AlwaysUpProber::default());
        let coordinator = ScanCoordinator::new(vec![net], discoverer, prober.clone(), 10);

        let result = coordinator.scan().await;

        assert_eq!(result.len(), 200);
        assert_eq!(prober.calls.load(Ordering::SeqCst), 200);
        assert!(prober.peak.load(Ordering::SeqCst) <= 10);

        let unique: BTreeSet<Ipv4Addr> = result.iter().map(|d| d.ip()).collect();
        assert_eq!(unique.len(), 200);
        assert_eq!(unique, targets.iter().copied().collect());
    }
}

#[tokio::test]
async fn overlapping_ranges_are_deduplicated() {
    let wide = range("172.16.0.0/23");
    let narrow = range("172.16.1.0/24");
    let wide_hosts: Vec<Ipv4Addr> = wide.hosts().take(300).collect();
    let narrow_hosts: Vec<Ipv4Addr> = narrow.hosts().collect();

    let discoverer = Arc::new(
        ScriptedDiscoverer::default()
            .answer(wide, wide_hosts.clone())
            .answer(narrow, narrow_hosts.clone()),
    );
    let prober = Arc::new(AlwaysUpProber::default());
    let coordinator = ScanCoordinator::new(vec![wide, narrow], discoverer.clone(), prober.clone(), 10);

    let result = coordinator.scan().await;

    let expected: BTreeSet<Ipv4Addr> = wide_hosts.into_iter().chain(narrow_hosts).collect();
    assert_eq!(result.len(), expected.len());
    assert_eq!(discoverer.sweeps.load(Ordering::SeqCst), 2);
    // Addresses seen in the first range are not probed again.
    assert_eq!(prober.calls.load(Ordering::SeqCst), expected.len());
}

#[tokio::test]
async fn range_without_responders_is_empty() {
    let net = range("192.168.200.0/24");
    let coordinator = ScanCoordinator::new(
        vec![net],
        Arc::new(ScriptedDiscoverer::default()),
        Arc::new(AlwaysUpProber::default()),
        10,
    );
    assert!(coordinator.scan().await.is_empty());
}

#[tokio::test]
async fn arp_sweep_of_foreign_range_is_empty() {
    // TEST-NET-2 is never attached to a local interface.
    let net = range("198.51.100.0/24");
    let coordinator = ScanCoordinator::new(
        vec![net],
        Arc::new(ArpDiscoverer::new(Duration::from_millis(10), 0)),
        Arc::new(AlwaysUpProber::default()),
        10,
    );
    assert!(coordinator.scan().await.is_empty());
}

#[tokio::test]
async fn results_are_ordered_by_address() {
    let net = range("10.30.0.0/24");
    let targets = [
        Ipv4Addr::new(10, 30, 0, 200),
        Ipv4Addr::new(10, 30, 0, 3),
        Ipv4Addr::new(10, 30, 0, 77),
    ];
    let coordinator = ScanCoordinator::new(
        vec![net],
        Arc::new(ScriptedDiscoverer::default().answer(net, targets)),
        Arc::new(AlwaysUpProber::default()),
        2,
    );

    let result = coordinator.scan().await;
    let ips: Vec<Ipv4Addr> = result.iter().map(|d| d.ip()).collect();
    assert_eq!(
        ips,
        vec![
            Ipv4Addr::new(10, 30, 0, 3),
            Ipv4Addr::new(10, 30, 0, 77),
            Ipv4Addr::new(10, 30, 0, 200),
        ]
    );
}
