//! # Network Ranges
//!
//! A [`NetworkRange`] is a normalized IPv4 CIDR block: the stored address always
//! has its host bits zeroed, so two ranges describing the same block compare equal
//! no matter which member address they were built from.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use anyhow::Context;
use pnet::ipnetwork::Ipv4Network;

/// Private blocks scanned when nothing better can be derived from the host.
pub const FALLBACK_RANGES: [(Ipv4Addr, u8); 4] = [
    (Ipv4Addr::new(192, 168, 1, 0), 24),
    (Ipv4Addr::new(192, 168, 0, 0), 24),
    (Ipv4Addr::new(10, 0, 0, 0), 24),
    (Ipv4Addr::new(172, 16, 0, 0), 24),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkRange {
    network: Ipv4Addr,
    prefix: u8,
}

impl NetworkRange {
    /// Builds the block containing `addr`, zeroing its host bits.
    pub fn new(addr: Ipv4Addr, prefix: u8) -> anyhow::Result<Self> {
        let net = Ipv4Network::new(addr, prefix)
            .with_context(|| format!("invalid prefix /{prefix} for {addr}"))?;
        Ok(Self::from(net))
    }

    /// Builds the block from an address and a dotted netmask.
    pub fn with_netmask(addr: Ipv4Addr, netmask: Ipv4Addr) -> anyhow::Result<Self> {
        let net = Ipv4Network::with_netmask(addr, netmask)
            .with_context(|| format!("invalid netmask {netmask} for {addr}"))?;
        Ok(Self::from(net))
    }

    /// The /24 around `addr`.
    pub fn class_c(addr: Ipv4Addr) -> Self {
        let [a, b, c, _] = addr.octets();
        Self {
            network: Ipv4Addr::new(a, b, c, 0),
            prefix: 24,
        }
    }

    pub fn network(&self) -> Ipv4Addr {
        self.network
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn broadcast(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.network) | !self.mask())
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        u32::from(addr) & self.mask() == u32::from(self.network)
    }

    /// Number of addresses in the block, network and broadcast included.
    pub fn size(&self) -> u64 {
        1u64 << (32 - u32::from(self.prefix))
    }

    /// Addresses worth probing: everything except network and broadcast,
    /// unless the block is too small to have them (/31, /32).
    pub fn hosts(&self) -> impl Iterator<Item = Ipv4Addr> + use<> {
        let start: u32 = self.network.into();
        let end: u32 = self.broadcast().into();
        let (start, end) = if self.prefix >= 31 {
            (start, end)
        } else {
            (start + 1, end - 1)
        };
        (start..=end).map(Ipv4Addr::from)
    }

    fn mask(&self) -> u32 {
        match self.prefix {
            0 => 0,
            p => u32::MAX << (32 - u32::from(p)),
        }
    }
}

impl From<Ipv4Network> for NetworkRange {
    fn from(net: Ipv4Network) -> Self {
        Self {
            network: net.network(),
            prefix: net.prefix(),
        }
    }
}

/// The fixed list of private blocks, in documented order.
pub fn fallback_ranges() -> Vec<NetworkRange> {
    FALLBACK_RANGES
        .iter()
        .map(|&(network, prefix)| NetworkRange { network, prefix })
        .collect()
}

impl FromStr for NetworkRange {
    type Err = String;

    /// Accepts `a.b.c.d/p`; a bare address is read as a /32.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let net = s
            .trim()
            .parse::<Ipv4Network>()
            .map_err(|e| format!("invalid CIDR '{s}': {e}"))?;
        Ok(Self::from(net))
    }
}

impl fmt::Display for NetworkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
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
