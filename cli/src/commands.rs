pub mod classify;
pub mod interfaces;
pub mod ranges;
pub mod scan;

use std::net::Ipv4Addr;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use lanmap_common::config::Config;
use lanmap_common::error::ScanError;
use lanmap_common::network::range::NetworkRange;
use pnet::util::MacAddr;

#[derive(Parser)]
#[command(name = "lanmap")]
#[command(about = "Find and classify the devices on your local network.")]
pub struct CommandLine {
    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover and classify the hosts on the local networks
    #[command(alias = "s")]
    Scan(ScanArgs),
    /// Show the ranges a scan would cover
    #[command(alias = "r")]
    Ranges {
        /// Range to resolve instead of the local ones
        #[arg(short, long)]
        range: Option<String>,
    },
    /// Show the active IPv4 interfaces
    #[command(alias = "i")]
    Interfaces,
    /// Classify a host described on the command line
    #[command(alias = "c")]
    Classify(ClassifyArgs),
}

#[derive(Args)]
pub struct ScanArgs {
    /// Scan only this range, e.g. 192.168.1.0/24
    #[arg(short, long)]
    pub range: Option<String>,

    /// Number of hosts probed at once
    #[arg(short, long, default_value_t = 10)]
    pub workers: usize,

    /// Give up on the whole scan after this many seconds
    #[arg(short, long, default_value_t = 45)]
    pub timeout: u64,

    /// Skip reverse DNS lookups
    #[arg(long)]
    pub no_dns: bool,

    /// Longest wait for one reverse DNS answer, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub dns_timeout: u64,

    /// Do not use nmap even if it is installed
    #[arg(long)]
    pub no_aux: bool,

    /// Keep the OS ARP cache as it is
    #[arg(long)]
    pub no_flush: bool,
}

impl ScanArgs {
    pub fn to_config(&self) -> Result<Config, ScanError> {
        Ok(Config {
            range: parse_range(self.range.as_deref())?,
            workers: self.workers,
            scan_deadline: Duration::from_secs(self.timeout),
            no_dns: self.no_dns,
            dns_timeout: Duration::from_millis(self.dns_timeout),
            no_aux: self.no_aux,
            flush_arp_cache: !self.no_flush,
            ..Config::default()
        })
    }
}

#[derive(Args)]
pub struct ClassifyArgs {
    #[arg(long)]
    pub ip: Ipv4Addr,

    #[arg(long)]
    pub mac: Option<MacAddr>,

    /// Looked up from the MAC when omitted
    #[arg(long)]
    pub vendor: Option<String>,

    #[arg(long)]
    pub hostname: Option<String>,

    /// Open TCP ports, comma separated
    #[arg(long, value_delimiter = ',')]
    pub ports: Vec<u16>,
}

pub fn parse_range(range: Option<&str>) -> Result<Option<NetworkRange>, ScanError> {
    range
        .map(|s| s.parse::<NetworkRange>().map_err(ScanError::InvalidRange))
        .transpose()
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
