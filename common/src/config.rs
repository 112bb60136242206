use std::ops::RangeInclusive;
use std::time::Duration;

use crate::network::range::NetworkRange;

/// Knobs for a scan cycle. Built by the CLI from its arguments.
#[derive(Debug, Clone)]
pub struct Config {
    /// Scan exactly this range instead of resolving ranges from the host.
    pub range: Option<NetworkRange>,
    /// Width of the probe worker pool.
    pub workers: usize,
    /// Ports tried with a plain TCP connect on every candidate.
    pub common_ports: Vec<u16>,
    pub connect_timeout: Duration,
    /// Wait after each ARP round.
    pub arp_timeout: Duration,
    /// Extra ARP rounds for addresses that stayed silent.
    pub arp_retries: u8,
    /// Host timeout handed to the auxiliary scanner's port pass.
    pub aux_timeout: Duration,
    pub aux_ports: RangeInclusive<u16>,
    /// Overall deadline for one scan cycle.
    pub scan_deadline: Duration,
    /// Longest wait for one reverse DNS answer.
    pub dns_timeout: Duration,
    /// Skips reverse DNS lookups.
    pub no_dns: bool,
    /// Skips the auxiliary scanner even if one is installed.
    pub no_aux: bool,
    /// Flushes the OS neighbour cache once when the scan service starts.
    pub flush_arp_cache: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            range: None,
            workers: 10,
            common_ports: vec![80, 443, 22, 445],
            connect_timeout: Duration::from_secs(1),
            arp_timeout: Duration::from_secs(3),
            arp_retries: 2,
            aux_timeout: Duration::from_secs(10),
            aux_ports: 20..=1024,
            scan_deadline: Duration::from_secs(45),
            dns_timeout: Duration::from_secs(1),
            no_dns: false,
            no_aux: false,
            flush_arp_cache: true,
        }
    }
}
