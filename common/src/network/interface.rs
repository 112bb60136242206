use std::net::Ipv4Addr;

use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::{IpNetwork, Ipv4Network};

use crate::network::range::NetworkRange;

/// An active local IPv4 interface, as seen once per enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalInterface {
    pub name: String,
    pub address: Ipv4Addr,
    pub netmask: Ipv4Addr,
}

impl LocalInterface {
    /// The normalized block this interface sits in.
    pub fn range(&self) -> anyhow::Result<NetworkRange> {
        NetworkRange::with_netmask(self.address, self.netmask)
    }
}

/// True for addresses that never identify a scannable LAN segment.
pub fn is_unscannable(addr: Ipv4Addr) -> bool {
    addr.is_loopback() || addr.is_link_local() || addr.octets()[0] == 0
}

pub trait NetworkInterfaceExtension {
    fn get_ipv4_nets(&self) -> Vec<Ipv4Network>;
    /// First IPv4 network that is neither loopback nor link-local.
    fn get_scannable_ipv4_net(&self) -> Option<Ipv4Network>;
    fn to_local_interface(&self) -> Option<LocalInterface>;
}

impl NetworkInterfaceExtension for NetworkInterface {
    fn get_ipv4_nets(&self) -> Vec<Ipv4Network> {
        self.ips
            .iter()
            .filter_map(|ip| {
                if let IpNetwork::V4(ipv4) = ip {
                    Some(*ipv4)
                } else {
                    None
                }
            })
            .collect()
    }

    fn get_scannable_ipv4_net(&self) -> Option<Ipv4Network> {
        self.get_ipv4_nets()
            .into_iter()
            .find(|net| !is_unscannable(net.ip()))
    }

    fn to_local_interface(&self) -> Option<LocalInterface> {
        if !self.is_up() || self.is_loopback() {
            return None;
        }
        let net = self.get_scannable_ipv4_net()?;
        Some(LocalInterface {
            name: self.name.clone(),
            address: net.ip(),
            netmask: net.mask(),
        })
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
