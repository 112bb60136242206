//! # Auxiliary Scanning
//!
//! Best-effort enrichment from an external scanner. The prober depends only on
//! [`AuxiliaryScanner`]; when no scanner is installed [`NoopScanner`] keeps the
//! control flow identical and simply contributes nothing.

use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pnet::util::MacAddr;
use tracing::info;

mod nmap;

pub use nmap::NmapScanner;

/// Hardware details learned about a host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HardwareInfo {
    pub mac: Option<MacAddr>,
    pub vendor: Option<String>,
}

#[async_trait]
pub trait AuxiliaryScanner: Send + Sync {
    /// Resolves the hardware address and vendor of `ip`.
    async fn resolve_hardware(&self, ip: Ipv4Addr) -> anyhow::Result<HardwareInfo>;

    /// Returns the open TCP ports of `ip` within `ports`, giving up on the host
    /// after `host_timeout`.
    async fn scan_ports(
        &self,
        ip: Ipv4Addr,
        ports: RangeInclusive<u16>,
        host_timeout: Duration,
    ) -> anyhow::Result<BTreeSet<u16>>;
}

/// Stand-in used when no external scanner is available.
pub struct NoopScanner;

#[async_trait]
impl AuxiliaryScanner for NoopScanner {
    async fn resolve_hardware(&self, _ip: Ipv4Addr) -> anyhow::Result<HardwareInfo> {
        Ok(HardwareInfo::default())
    }

    async fn scan_ports(
        &self,
        _ip: Ipv4Addr,
        _ports: RangeInclusive<u16>,
        _host_timeout: Duration,
    ) -> anyhow::Result<BTreeSet<u16>> {
        Ok(BTreeSet::new())
    }
}

/// Picks nmap when it is installed, otherwise the no-op scanner.
pub fn detect() -> Arc<dyn AuxiliaryScanner> {
    if NmapScanner::is_available() {
        info!("nmap found, auxiliary scans enabled");
        Arc::new(NmapScanner)
    } else {
        info!("nmap not found, continuing with TCP connect results only");
        Arc::new(NoopScanner)
    }
}
