//! # Device Classification
//!
//! Labels a [`HostRecord`] with a [`DeviceType`] by walking an ordered list of
//! heuristics; the first one that matches decides. The order of the stages and of
//! the entries inside each table is part of the behaviour: ambiguous hosts (say a
//! "camera" hostname on an Apple vendor string) are resolved by whichever rule
//! comes first.
//!
//! 1. router special case
//! 2. hostname patterns
//! 3. vendor patterns
//! 4. port signatures
//! 5. hardware address prefixes
//! 6. residual port heuristics
//! 7. [`DeviceType::Unknown`]
//!
//! Classification is pure: no I/O and no state between calls.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use lanmap_common::device::DeviceType;
use lanmap_common::network::host::{Device, HostRecord};
use lanmap_common::network::mac;
use pnet::util::MacAddr;
use regex::{Regex, RegexBuilder};

type PatternTable = Vec<(Regex, DeviceType)>;

const ROUTER_PORTS: [u16; 3] = [53, 80, 443];
const ROUTER_HOST_OCTETS: [u8; 2] = [1, 254];

const HOSTNAME_PATTERNS: &[(&str, DeviceType)] = &[
    (r"printer|print", DeviceType::Printer),
    (r"camera|cam|ipcam", DeviceType::SecurityCamera),
    (r"xbox", DeviceType::GamingConsole),
    (r"playstation|ps\d", DeviceType::GamingConsole),
    (r"android|phone", DeviceType::MobileDevice),
    (r"ipad|iphone|macbook|imac", DeviceType::AppleDevice),
    (r"desktop|laptop", DeviceType::Computer),
    (r"nas|storage", DeviceType::StorageDevice),
    (r"router|gateway|ap|access-point", DeviceType::NetworkEquipment),
    (r"switch|managed", DeviceType::NetworkEquipment),
    (r"raspberry|pi", DeviceType::RaspberryPi),
    (r"chromebook", DeviceType::Computer),
    (r"virtual|vm", DeviceType::VirtualMachine),
];

const VENDOR_PATTERNS: &[(&str, DeviceType)] = &[
    (r"Apple|iPhone|iPad|Mac|AirPort|iMac|MacBook", DeviceType::AppleDevice),
    (
        r"Android|Samsung|Huawei|Xiaomi|OPPO|OnePlus|Realme|Vivo|Galaxy",
        DeviceType::AndroidDevice,
    ),
    (
        r"Intel|Dell|HP|Lenovo|ASUS|Acer|MSI|Gigabyte|ASRock",
        DeviceType::Computer,
    ),
    (
        r"Cisco|Juniper|NETGEAR|D-Link|TP-Link|ASUS|Ubiquiti|Linksys|Belkin|Mikrotik|UniFi|EdgeRouter",
        DeviceType::NetworkEquipment,
    ),
    (r"Raspberry|RPi|Pi Foundation", DeviceType::RaspberryPi),
    (r"ESP|Arduino|Particle|NodeMCU|Teensy", DeviceType::IotDevice),
    (r"Microsoft|Xbox|Surface|Windows", DeviceType::WindowsDevice),
    (r"Sony|PlayStation|PS\d", DeviceType::GamingConsole),
    (r"Amazon|Kindle|Echo|Ring|Alexa", DeviceType::SmartHomeDevice),
    (r"Google|Nest|Chromecast|Home", DeviceType::SmartHomeDevice),
    (r"Canon|Epson|Brother|HP|Xerox", DeviceType::Printer),
    (r"Roku|FireTV|Apple TV|Shield|Mi Box", DeviceType::MediaDevice),
    (
        r"Ring|Arlo|Nest Cam|Wyze|Hikvision|Dahua",
        DeviceType::SecurityCamera,
    ),
    (r"VMware|VirtualBox|Hyper-V", DeviceType::VirtualMachine),
    (r"Sonos|Bose|Denon|Yamaha|Pioneer", DeviceType::AudioDevice),
    (
        r"NAS|Synology|QNAP|Western Digital|Seagate",
        DeviceType::StorageDevice,
    ),
];

/// A signature matches when every one of its ports is open.
const PORT_SIGNATURES: &[(&[u16], DeviceType)] = &[
    (&[80, 443], DeviceType::WebServer),
    (&[22], DeviceType::SshServer),
    (&[21], DeviceType::FtpServer),
    (&[53], DeviceType::DnsServer),
    (&[3389], DeviceType::WindowsDevice),
    (&[445, 139], DeviceType::WindowsDevice),
    (&[8080], DeviceType::WebServer),
    (&[25, 587], DeviceType::MailServer),
    (&[123], DeviceType::TimeServer),
    (&[161], DeviceType::SnmpDevice),
    (&[548, 5009], DeviceType::AppleDevice),
    (&[1714, 1764], DeviceType::AudioDevice),
    (&[8009], DeviceType::Chromecast),
    (&[32400], DeviceType::PlexServer),
    (&[5353], DeviceType::MdnsDevice),
    (&[1900], DeviceType::UpnpDevice),
    (&[2869], DeviceType::UpnpDevice),
    (&[5357], DeviceType::WindowsNetworkDevice),
    (&[62078], DeviceType::AppleDevice),
    (&[8200], DeviceType::GoToMeeting),
    (&[3478], DeviceType::StunServer),
    (&[1701], DeviceType::L2tpVpn),
    (&[1194], DeviceType::OpenVpn),
    (&[500], DeviceType::IpsecVpn),
    (&[1723], DeviceType::PptpVpn),
    (&[1883], DeviceType::MqttBroker),
    (&[8883], DeviceType::MqttSslBroker),
    (&[5938], DeviceType::TeamViewer),
    (&[3283], DeviceType::AppleRemoteDesktop),
    (&[548], DeviceType::AfpServer),
];

const VIRTUAL_INTERFACE_PREFIXES: [[u8; 3]; 2] = [[0x00, 0x00, 0x00], [0xff, 0xff, 0xff]];
const MULTICAST_PREFIX: [u8; 3] = [0x01, 0x00, 0x5e];
const VM_PREFIXES: [[u8; 3]; 5] = [
    [0x00, 0x05, 0x69],
    [0x00, 0x0c, 0x29],
    [0x00, 0x1c, 0x14],
    [0x00, 0x50, 0x56],
    [0x00, 0x1c, 0x42],
];

/// More open ports than this and an otherwise unknown host counts as a server.
const SERVER_PORT_THRESHOLD: usize = 5;

static HOSTNAME_TABLE: LazyLock<PatternTable> = LazyLock::new(|| compile(HOSTNAME_PATTERNS));
static VENDOR_TABLE: LazyLock<PatternTable> = LazyLock::new(|| compile(VENDOR_PATTERNS));

fn compile(patterns: &[(&str, DeviceType)]) -> PatternTable {
    patterns
        .iter()
        .map(|(pattern, device_type)| {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .expect("classifier patterns are valid regular expressions");
            (regex, *device_type)
        })
        .collect()
}

/// Labels `record`. Deterministic for a given record.
pub fn classify(record: &HostRecord) -> DeviceType {
    router_special_case(record)
        .or_else(|| record.hostname.as_deref().and_then(match_hostname))
        .or_else(|| match_vendor(&record.vendor))
        .or_else(|| match_port_signature(&record.ports))
        .or_else(|| record.mac.and_then(match_mac_prefix))
        .or_else(|| residual_heuristics(&record.ports))
        .unwrap_or(DeviceType::Unknown)
}

/// Attaches a classification to `record`.
pub fn label(record: HostRecord) -> Device {
    let device_type = classify(&record);
    Device {
        record,
        device_type,
    }
}

fn router_special_case(record: &HostRecord) -> Option<DeviceType> {
    let host_octet = record.ip.octets()[3];
    let router_address = ROUTER_HOST_OCTETS.contains(&host_octet);
    let router_service = ROUTER_PORTS.iter().any(|port| record.ports.contains(port));
    (router_address && router_service).then_some(DeviceType::Router)
}

fn first_match(table: &PatternTable, text: &str) -> Option<DeviceType> {
    if text.is_empty() {
        return None;
    }
    table
        .iter()
        .find(|(regex, _)| regex.is_match(text))
        .map(|(_, device_type)| *device_type)
}

pub fn match_hostname(hostname: &str) -> Option<DeviceType> {
    first_match(&HOSTNAME_TABLE, hostname)
}

pub fn match_vendor(vendor: &str) -> Option<DeviceType> {
    first_match(&VENDOR_TABLE, vendor)
}

pub fn match_port_signature(ports: &BTreeSet<u16>) -> Option<DeviceType> {
    if ports.is_empty() {
        return None;
    }
    PORT_SIGNATURES
        .iter()
        .find(|(signature, _)| signature.iter().all(|port| ports.contains(port)))
        .map(|(_, device_type)| *device_type)
}

pub fn match_mac_prefix(mac: MacAddr) -> Option<DeviceType> {
    let prefix = mac::prefix(mac);
    if VIRTUAL_INTERFACE_PREFIXES.contains(&prefix) {
        return Some(DeviceType::VirtualInterface);
    }
    if prefix == MULTICAST_PREFIX {
        return Some(DeviceType::MulticastDevice);
    }
    if VM_PREFIXES.contains(&prefix) {
        return Some(DeviceType::VirtualMachine);
    }
    None
}

fn residual_heuristics(ports: &BTreeSet<u16>) -> Option<DeviceType> {
    if ports.contains(&80) || ports.contains(&443) {
        return Some(DeviceType::WebServer);
    }
    if ports.contains(&22) {
        return Some(DeviceType::NetworkDevice);
    }
    if ports.contains(&139) || ports.contains(&445) {
        return Some(DeviceType::WindowsDevice);
    }
    if ports.len() > SERVER_PORT_THRESHOLD {
        return Some(DeviceType::Server);
    }
    None
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
