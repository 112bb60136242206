use std::net::{Ipv4Addr, TcpListener};
use std::sync::Arc;
use std::time::Duration;

use lanmap_common::network::host::HostStatus;
use lanmap_core::auxiliary::NoopScanner;
use lanmap_core::prober::{HostProber, ProbeSettings, Prober};

fn settings(common_ports: Vec<u16>) -> ProbeSettings {
    ProbeSettings {
        common_ports,
        connect_timeout: Duration::from_millis(300),
        aux_ports: 20..=1024,
        aux_timeout: Duration::from_secs(1),
        reverse_dns: false,
        dns_timeout: Duration::from_millis(200),
    }
}

#[tokio::test]
async fn silent_host_is_never_reported() {
    let closed = {
        let tmp = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        tmp.local_addr().unwrap().port()
    };
    let prober = HostProber::new(settings(vec![closed]), Arc::new(NoopScanner));
    assert!(prober.probe(Ipv4Addr::LOCALHOST, None).await.is_none());
}

#[tokio::test]
async fn listening_host_is_active() {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    let port = listener.local_addr().unwrap().port();
    let prober = HostProber::new(settings(vec![port]), Arc::new(NoopScanner));

    let record = prober.probe(Ipv4Addr::LOCALHOST, None).await.unwrap();
    assert_eq!(record.status, HostStatus::Active);
    assert!(record.ports.contains(&port));
    assert!(record.mac.is_none());
}
