//! # Range Resolution
//!
//! Decides which CIDR blocks a scan covers. The answer degrades in three steps:
//!
//! 1. one block per active interface (precise),
//! 2. the /24 around the default gateway (inferred),
//! 3. a fixed list of common private blocks (heuristic).
//!
//! No packets are sent here.

use std::collections::BTreeSet;

use lanmap_common::network::range::{self, NetworkRange};
use tracing::{info, warn};

use crate::system::SystemProbe;

/// Resolves the ranges to scan, honoring an explicit range when one is given.
pub fn resolve_ranges(explicit: Option<NetworkRange>, system: &dyn SystemProbe) -> Vec<NetworkRange> {
    if let Some(range) = explicit {
        return vec![range];
    }

    let from_interfaces = ranges_from_interfaces(system);
    if !from_interfaces.is_empty() {
        return from_interfaces.into_iter().collect();
    }

    if let Some(gateway) = system.default_gateway() {
        let range = NetworkRange::class_c(gateway);
        info!("Using range {range} around default gateway {gateway}");
        return vec![range];
    }

    warn!("No interface or gateway usable, falling back to common private ranges");
    range::fallback_ranges()
}

fn ranges_from_interfaces(system: &dyn SystemProbe) -> BTreeSet<NetworkRange> {
    let mut ranges = BTreeSet::new();
    for interface in system.active_interfaces() {
        match interface.range() {
            Ok(range) => {
                info!("Found network range on {}: {range}", interface.name);
                ranges.insert(range);
            }
            Err(e) => warn!("Error processing interface {}: {e:#}", interface.name),
        }
    }
    ranges
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
