//! # Host System Access
//!
//! Everything the engine reads from, or does to, the operating system outside of
//! packet I/O: the list of active interfaces, the default gateway, and the
//! neighbour (ARP) cache. All of it is best effort; a failure degrades to an
//! empty answer and is logged, never propagated.

use std::net::Ipv4Addr;
use std::process::Command;

use lanmap_common::network::interface::{LocalInterface, NetworkInterfaceExtension};
use pnet::datalink::{self, NetworkInterface};
use tracing::{debug, warn};

/// Read-only view of the host network configuration.
pub trait SystemProbe: Send + Sync {
    fn active_interfaces(&self) -> Vec<LocalInterface>;
    fn default_gateway(&self) -> Option<Ipv4Addr>;
}

/// [`SystemProbe`] backed by the running operating system.
pub struct OsSystem;

impl SystemProbe for OsSystem {
    fn active_interfaces(&self) -> Vec<LocalInterface> {
        list_active_interfaces()
    }

    fn default_gateway(&self) -> Option<Ipv4Addr> {
        default_gateway()
    }
}

/// Lists interfaces that are up, keeping the first usable IPv4 address of each.
///
/// Loopback and link-local addresses are never returned.
pub fn list_active_interfaces() -> Vec<LocalInterface> {
    select_active(&datalink::interfaces())
}

fn select_active(interfaces: &[NetworkInterface]) -> Vec<LocalInterface> {
    interfaces
        .iter()
        .filter_map(|interface| {
            let local = interface.to_local_interface();
            if local.is_none() {
                debug!("Skipping interface {}", interface.name);
            }
            local
        })
        .collect()
}

/// Asks the platform routing tools for the default IPv4 gateway.
pub fn default_gateway() -> Option<Ipv4Addr> {
    #[cfg(target_os = "windows")]
    let gateway = run("ipconfig", &[]).and_then(|out| parse_ipconfig_gateway(&out));

    #[cfg(target_os = "macos")]
    let gateway = run("route", &["-n", "get", "default"]).and_then(|out| parse_bsd_route(&out));

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let gateway = run("ip", &["route", "show", "default"]).and_then(|out| parse_ip_route(&out));

    if gateway.is_none() {
        warn!("Could not determine the default gateway");
    }
    gateway
}

/// Clears the OS neighbour cache so stale entries cannot answer for hosts that
/// went away. Failures are logged and otherwise ignored.
pub fn flush_arp_cache() {
    #[cfg(target_os = "windows")]
    let (program, args): (&str, &[&str]) = ("arp", &["-d", "*"]);

    #[cfg(target_os = "macos")]
    let (program, args): (&str, &[&str]) = ("arp", &["-a", "-d"]);

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let (program, args): (&str, &[&str]) = ("ip", &["neigh", "flush", "all"]);

    match Command::new(program).args(args).output() {
        Ok(output) if output.status.success() => debug!("Flushed ARP cache"),
        Ok(output) => warn!(
            "Failed to clear ARP cache: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        ),
        Err(e) => warn!("Failed to clear ARP cache: {e}"),
    }
}

fn run(program: &str, args: &[&str]) -> Option<String> {
    match Command::new(program).args(args).output() {
        Ok(output) if output.status.success() => {
            Some(String::from_utf8_lossy(&output.stdout).into_owned())
        }
        Ok(output) => {
            debug!("{program} exited with {}", output.status);
            None
        }
        Err(e) => {
            debug!("Failed to run {program}: {e}");
            None
        }
    }
}

/// `default via 192.168.1.1 dev eth0 proto dhcp metric 100`
fn parse_ip_route(output: &str) -> Option<Ipv4Addr> {
    output.lines().find_map(|line| {
        let mut words = line.split_whitespace();
        if words.next()? != "default" {
            return None;
        }
        words
            .skip_while(|word| *word != "via")
            .nth(1)
            .and_then(|addr| addr.parse().ok())
    })
}

/// `    gateway: 192.168.1.1`
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn parse_bsd_route(output: &str) -> Option<Ipv4Addr> {
    output.lines().find_map(|line| {
        line.trim()
            .strip_prefix("gateway:")
            .and_then(|addr| addr.trim().parse().ok())
    })
}

/// `   Default Gateway . . . . . . . . . : 192.168.1.1`
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
fn parse_ipconfig_gateway(output: &str) -> Option<Ipv4Addr> {
    output
        .lines()
        .filter(|line| line.contains("Default Gateway"))
        .find_map(|line| {
            line.rsplit(": ")
                .next()
                .and_then(|addr| addr.trim().parse().ok())
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
