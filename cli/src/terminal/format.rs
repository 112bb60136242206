use std::collections::BTreeSet;

use colored::*;
use lanmap_common::device::DeviceType;
use lanmap_common::network::host::HostStatus;
use lanmap_common::network::range::NetworkRange;
use pnet::util::MacAddr;

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn type_to_detail(device_type: DeviceType) -> Detail {
    ("Type".to_string(), device_type.as_str().color(colors::DEVICE_TYPE).bold())
}

pub fn status_to_detail(status: HostStatus) -> Detail {
    ("Status".to_string(), status.as_str().color(colors::STATUS))
}

pub fn ipv4_to_detail(ip: std::net::Ipv4Addr) -> Detail {
    ("IPv4".to_string(), ip.to_string().color(colors::IPV4_ADDR))
}

pub fn mac_to_detail(mac: Option<MacAddr>) -> Option<Detail> {
    mac.map(|mac| ("MAC".to_string(), mac.to_string().color(colors::MAC_ADDR)))
}

pub fn vendor_to_detail(vendor: &str) -> Option<Detail> {
    if vendor.is_empty() {
        return None;
    }
    Some(("Vendor".to_string(), vendor.color(colors::VENDOR)))
}

pub fn ports_to_detail(ports: &BTreeSet<u16>) -> Option<Detail> {
    if ports.is_empty() {
        return None;
    }
    Some(("Ports".to_string(), join_ports(ports).color(colors::PORTS)))
}

pub fn join_ports(ports: &BTreeSet<u16>) -> String {
    ports
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn range_to_value(range: &NetworkRange) -> ColoredString {
    let address: ColoredString = range.network().to_string().color(colors::IPV4_ADDR);
    let prefix: ColoredString = range.prefix().to_string().color(colors::IPV4_PREFIX);
    format!("{address}/{prefix}").color(colors::SEPARATOR)
}
