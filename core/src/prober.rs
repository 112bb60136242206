//! # Host Probing
//!
//! Turns one candidate address into a [`HostRecord`]. Each step degrades on its
//! own. Closed ports, a missing or slow PTR answer and a failing auxiliary
//! scanner leave gaps in the record but never abort the probe.
//!
//! A record is only returned when it ended up with a hardware address or at
//! least one open port.

use std::collections::BTreeSet;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lanmap_common::config::Config;
use lanmap_common::network::host::HostRecord;
use lanmap_common::network::mac;
use pnet::util::MacAddr;
use tracing::{debug, warn};

use crate::auxiliary::AuxiliaryScanner;
use crate::network::dns::{self, HostnameResolver, SystemResolver};
use crate::network::tcp;

#[async_trait]
pub trait Prober: Send + Sync {
    /// `known_mac` is the hardware address discovery already saw, if any.
    async fn probe(&self, ip: Ipv4Addr, known_mac: Option<MacAddr>) -> Option<HostRecord>;
}

#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub common_ports: Vec<u16>,
    pub connect_timeout: Duration,
    pub aux_ports: RangeInclusive<u16>,
    pub aux_timeout: Duration,
    pub reverse_dns: bool,
    pub dns_timeout: Duration,
}

impl From<&Config> for ProbeSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            common_ports: cfg.common_ports.clone(),
            connect_timeout: cfg.connect_timeout,
            aux_ports: cfg.aux_ports.clone(),
            aux_timeout: cfg.aux_timeout,
            reverse_dns: !cfg.no_dns,
            dns_timeout: cfg.dns_timeout,
        }
    }
}

pub struct HostProber {
    settings: ProbeSettings,
    aux: Arc<dyn AuxiliaryScanner>,
    resolver: Arc<dyn HostnameResolver>,
}

impl HostProber {
    pub fn new(settings: ProbeSettings, aux: Arc<dyn AuxiliaryScanner>) -> Self {
        Self {
            settings,
            aux,
            resolver: Arc::new(SystemResolver),
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn HostnameResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    async fn enrich_from_aux(&self, record: &mut HostRecord) {
        let ip = record.ip;
        match self.aux.resolve_hardware(ip).await {
            Ok(info) => {
                if let Some(found) = info.mac {
                    record.mac = Some(found);
                }
                if let Some(vendor) = info.vendor {
                    record.vendor = vendor;
                }
            }
            Err(e) => warn!("Auxiliary host scan error for {ip}: {e:#}"),
        }

        // The deeper pass is only worth it for hosts that already showed a service.
        if record.ports.is_empty() {
            return;
        }
        let ports = self.settings.aux_ports.clone();
        match self.aux.scan_ports(ip, ports, self.settings.aux_timeout).await {
            Ok(found) => {
                debug!("Auxiliary port scan of {ip} found {} open ports", found.len());
                merge_ports(&mut record.ports, found);
            }
            Err(e) => warn!("Auxiliary port scan error for {ip}: {e:#}"),
        }
    }
}

#[async_trait]
impl Prober for HostProber {
    async fn probe(&self, ip: Ipv4Addr, known_mac: Option<MacAddr>) -> Option<HostRecord> {
        let mut record = HostRecord::new(ip);
        record.mac = known_mac;

        let settings = &self.settings;
        record.ports = tcp::open_ports(IpAddr::V4(ip), &settings.common_ports, settings.connect_timeout).await;

        if settings.reverse_dns {
            record.hostname = dns::reverse_lookup(self.resolver.as_ref(), ip, settings.dns_timeout).await;
        }

        self.enrich_from_aux(&mut record).await;

        if !record.has_known_vendor() {
            if let Some(vendor) = record.mac.and_then(mac::get_vendor) {
                record.vendor = vendor;
            }
        }

        let record = record.into_reportable();
        match &record {
            Some(found) => debug!("Probed {ip}: mac={:?} ports={:?}", found.mac, found.ports),
            None => debug!("Dropping {ip}: no hardware address and no open ports"),
        }
        record
    }
}

/// Open ports found so far, merged without duplicates.
pub fn merge_ports(ports: &mut BTreeSet<u16>, more: impl IntoIterator<Item = u16>) {
    ports.extend(more);
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
