//! # Host Model
//!
//! [`HostRecord`] is what a probe learns about one address. [`Device`] pairs a
//! record with its classification, and [`ScanResult`] is the immutable set of
//! devices produced by one scan cycle.

use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::sync::Arc;

use pnet::util::MacAddr;

use crate::device::DeviceType;

/// Vendor string used until something better is known.
pub const UNKNOWN_VENDOR: &str = "Unknown";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum HostStatus {
    #[default]
    Pending,
    Active,
}

impl HostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostStatus::Pending => "pending",
            HostStatus::Active => "active",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRecord {
    pub ip: Ipv4Addr,
    pub mac: Option<MacAddr>,
    pub vendor: String,
    pub hostname: Option<String>,
    pub ports: BTreeSet<u16>,
    pub status: HostStatus,
}

impl HostRecord {
    pub fn new(ip: Ipv4Addr) -> Self {
        Self {
            ip,
            mac: None,
            vendor: UNKNOWN_VENDOR.to_string(),
            hostname: None,
            ports: BTreeSet::new(),
            status: HostStatus::Pending,
        }
    }

    pub fn with_mac(mut self, mac: MacAddr) -> Self {
        self.mac = Some(mac);
        self
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn with_ports(mut self, ports: impl IntoIterator<Item = u16>) -> Self {
        self.ports.extend(ports);
        self
    }

    pub fn has_known_vendor(&self) -> bool {
        !self.vendor.is_empty() && self.vendor != UNKNOWN_VENDOR
    }

    /// A record carries signal when it has a hardware address or an open port.
    pub fn has_signal(&self) -> bool {
        self.mac.is_some() || !self.ports.is_empty()
    }

    /// Marks the record active, or drops it when it carries no signal.
    pub fn into_reportable(mut self) -> Option<Self> {
        if !self.has_signal() {
            return None;
        }
        self.status = HostStatus::Active;
        Some(self)
    }
}

/// A host record with its classification attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub record: HostRecord,
    pub device_type: DeviceType,
}

impl Device {
    pub fn ip(&self) -> Ipv4Addr {
        self.record.ip
    }
}

/// The devices produced by one complete scan cycle, ordered by address.
///
/// Cloning is cheap and never copies the device list.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    devices: Arc<[Device]>,
}

impl ScanResult {
    pub fn new(mut devices: Vec<Device>) -> Self {
        devices.sort_by_key(Device::ip);
        devices.dedup_by_key(|device| device.ip());
        Self {
            devices: devices.into(),
        }
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Device> {
        self.devices.iter()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn find(&self, ip: Ipv4Addr) -> Option<&Device> {
        self.devices
            .binary_search_by_key(&ip, Device::ip)
            .ok()
            .map(|idx| &self.devices[idx])
    }
}

impl<'a> IntoIterator for &'a ScanResult {
    type Item = &'a Device;
    type IntoIter = std::slice::Iter<'a, Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
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
