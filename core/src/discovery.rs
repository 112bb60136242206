//! # Address-Resolution Discovery
//!
//! Finds which addresses of a range are alive on the local segment by
//! broadcasting ARP requests and listening for replies.
//!
//! The sweep only works inside one broadcast domain and requires **root
//! privileges** to open a raw layer 2 channel. Any failure for a range is logged
//! and turns into an empty answer so the remaining ranges still get scanned.
//!
//! The sweep runs on a blocking thread. Dropping [`ArpDiscoverer::discover`]
//! raises a cancel flag that the thread checks between rounds and reads, so an
//! abandoned sweep stops within one channel poll interval.

use std::collections::{BTreeMap, BTreeSet};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, ensure};
use async_trait::async_trait;
use lanmap_common::config::Config;
use lanmap_common::network::interface::NetworkInterfaceExtension;
use lanmap_common::network::range::NetworkRange;
use lanmap_protocols::arp;
use pnet::datalink::{self, DataLinkReceiver, DataLinkSender, NetworkInterface};
use pnet::util::MacAddr;
use tracing::{debug, error, info};

use crate::network::channel;

/// Largest block a single sweep will touch (a /16).
const MAX_SWEEP_SIZE: u64 = 1 << 16;

/// Addresses that answered discovery, with the hardware address they answered from.
pub type Candidates = BTreeMap<Ipv4Addr, Option<MacAddr>>;

#[async_trait]
pub trait Discoverer: Send + Sync {
    /// Never fails: a range that cannot be swept yields no candidates.
    async fn discover(&self, range: NetworkRange) -> Candidates;
}

pub struct ArpDiscoverer {
    round_timeout: Duration,
    retries: u8,
}

impl ArpDiscoverer {
    pub fn new(round_timeout: Duration, retries: u8) -> Self {
        Self {
            round_timeout,
            retries,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.arp_timeout, cfg.arp_retries)
    }
}

#[async_trait]
impl Discoverer for ArpDiscoverer {
    async fn discover(&self, range: NetworkRange) -> Candidates {
        let (round_timeout, retries) = (self.round_timeout, self.retries);
        // Dropping this future (a scan deadline) stops the blocking sweep too.
        let guard = CancelOnDrop::default();
        let cancel = guard.0.clone();
        let sweep =
            tokio::task::spawn_blocking(move || arp_sweep(range, round_timeout, retries, &cancel)).await;

        match sweep {
            Ok(Ok(found)) => {
                info!("ARP scan found {} devices in {range}", found.len());
                found
            }
            Ok(Err(e)) => {
                error!("ARP scan error for {range}: {e:#}");
                Candidates::new()
            }
            Err(e) => {
                error!("ARP scan for {range} did not complete: {e}");
                Candidates::new()
            }
        }
    }
}

/// Raises its flag when dropped.
#[derive(Default)]
struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// Where requests are sent from, and how long each round listens.
struct SweepPlan {
    src_mac: MacAddr,
    src_ip: Ipv4Addr,
    round_timeout: Duration,
    retries: u8,
}

fn arp_sweep(
    range: NetworkRange,
    round_timeout: Duration,
    retries: u8,
    cancel: &AtomicBool,
) -> anyhow::Result<Candidates> {
    ensure!(
        range.size() <= MAX_SWEEP_SIZE,
        "{range} is too large for an ARP sweep"
    );

    let (intf, src_ip) = find_interface(&datalink::interfaces(), range)
        .with_context(|| format!("no local interface attached to {range}"))?;
    let src_mac = intf
        .mac
        .with_context(|| format!("{} has no hardware address", intf.name))?;
    let (mut tx, mut rx) = channel::open_ethernet(&intf)?;

    debug!("ARP sweep of {range} on {}", intf.name);
    let plan = SweepPlan {
        src_mac,
        src_ip,
        round_timeout,
        retries,
    };
    let pending = range.hosts().filter(|ip| *ip != src_ip).collect();
    run_rounds(tx.as_mut(), rx.as_mut(), &plan, pending, cancel)
}

/// Broadcasts to every pending address, listens, and repeats for the ones that
/// stayed silent.
fn run_rounds(
    tx: &mut dyn DataLinkSender,
    rx: &mut dyn DataLinkReceiver,
    plan: &SweepPlan,
    mut pending: BTreeSet<Ipv4Addr>,
    cancel: &AtomicBool,
) -> anyhow::Result<Candidates> {
    let mut found = Candidates::new();

    for round in 0..=plan.retries {
        if pending.is_empty() {
            break;
        }
        if cancel.load(Ordering::Relaxed) {
            debug!("ARP sweep cancelled before round {}", round + 1);
            break;
        }
        debug!("ARP round {}: {} addresses pending", round + 1, pending.len());

        for &dst_ip in &pending {
            let frame = arp::create_request(plan.src_mac, plan.src_ip, dst_ip)?;
            if let Some(Err(e)) = tx.send_to(&frame, None) {
                return Err(e).context("sending ARP request");
            }
        }

        collect_replies(rx, plan.round_timeout, &mut pending, &mut found, cancel);
    }

    Ok(found)
}

fn collect_replies(
    rx: &mut dyn DataLinkReceiver,
    wait: Duration,
    pending: &mut BTreeSet<Ipv4Addr>,
    found: &mut Candidates,
    cancel: &AtomicBool,
) {
    let deadline = Instant::now() + wait;
    while Instant::now() < deadline && !pending.is_empty() && !cancel.load(Ordering::Relaxed) {
        // Read errors are the channel's poll timeout.
        let Ok(frame) = rx.next() else { continue };
        let Ok(reply) = arp::parse_reply(frame) else { continue };
        if pending.remove(&reply.sender_ip) {
            debug!("Found device via ARP: {} - {}", reply.sender_ip, reply.sender_mac);
            found.insert(reply.sender_ip, Some(reply.sender_mac));
        }
    }
}

/// Picks the interface whose IPv4 network overlaps `range`, with the address to
/// send from.
fn find_interface(
    interfaces: &[NetworkInterface],
    range: NetworkRange,
) -> Option<(NetworkInterface, Ipv4Addr)> {
    interfaces
        .iter()
        .filter(|intf| intf.is_up() && !intf.is_loopback() && intf.mac.is_some())
        .find_map(|intf| {
            intf.get_ipv4_nets()
                .into_iter()
                .find(|net| range.contains(net.ip()) || net.contains(range.network()))
                .map(|net| (intf.clone(), net.ip()))
        })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
