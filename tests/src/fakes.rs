//! Stand-ins for the OS, the ARP sweep and the prober.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use lanmap_common::network::host::HostRecord;
use lanmap_common::network::interface::LocalInterface;
use lanmap_common::network::range::NetworkRange;
use lanmap_core::discovery::{Candidates, Discoverer};
use lanmap_core::prober::Prober;
use lanmap_core::system::SystemProbe;
use pnet::util::MacAddr;

#[derive(Default)]
pub struct FakeSystem {
    pub interfaces: Vec<LocalInterface>,
    pub gateway: Option<Ipv4Addr>,
}

impl SystemProbe for FakeSystem {
    fn active_interfaces(&self) -> Vec<LocalInterface> {
        self.interfaces.clone()
    }

    fn default_gateway(&self) -> Option<Ipv4Addr> {
        self.gateway
    }
}

pub fn interface(name: &str, address: [u8; 4], netmask: [u8; 4]) -> LocalInterface {
    LocalInterface {
        name: name.to_string(),
        address: Ipv4Addr::from(address),
        netmask: Ipv4Addr::from(netmask),
    }
}

/// Answers each range with a fixed candidate set and counts sweeps.
#[derive(Default)]
pub struct ScriptedDiscoverer {
    answers: HashMap<NetworkRange, Candidates>,
    pub sweeps: AtomicUsize,
}

impl ScriptedDiscoverer {
    pub fn answer(mut self, range: NetworkRange, addresses: impl IntoIterator<Item = Ipv4Addr>) -> Self {
        let candidates = addresses
            .into_iter()
            .map(|ip| (ip, Some(synthetic_mac(ip))))
            .collect();
        self.answers.insert(range, candidates);
        self
    }
}

#[async_trait]
impl Discoverer for ScriptedDiscoverer {
    async fn discover(&self, range: NetworkRange) -> Candidates {
        self.sweeps.fetch_add(1, Ordering::SeqCst);
        self.answers.get(&range).cloned().unwrap_or_default()
    }
}

/// Always produces a record, after a short pause, and remembers how many
/// probes overlapped.
#[derive(Default)]
pub struct AlwaysUpProber {
    pub calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub peak: AtomicUsize,
}

#[async_trait]
impl Prober for AlwaysUpProber {
    async fn probe(&self, ip: Ipv4Addr, known_mac: Option<MacAddr>) -> Option<HostRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(2)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let mut record = HostRecord::new(ip).with_ports([22]);
        record.mac = known_mac;
        record.into_reportable()
    }
}

pub fn synthetic_mac(ip: Ipv4Addr) -> MacAddr {
    let [_, b, c, d] = ip.octets();
    MacAddr::new(0x02, 0x42, 0x00, b, c, d)
}

pub fn range(s: &str) -> NetworkRange {
    s.parse().unwrap()
}
