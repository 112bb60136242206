use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::ops::RangeInclusive;
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, bail};
use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;
use tracing::debug;

use super::{AuxiliaryScanner, HardwareInfo};

/// Slack on top of nmap's own `--host-timeout` before the process is killed.
const PROCESS_GRACE: Duration = Duration::from_secs(5);
/// Bound on the host discovery pass, which has no host timeout of its own.
const PING_SCAN_TIMEOUT: Duration = Duration::from_secs(15);

/// Drives the `nmap` binary and reads its XML report.
pub struct NmapScanner;

impl NmapScanner {
    pub fn is_available() -> bool {
        Command::new("nmap")
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl AuxiliaryScanner for NmapScanner {
    async fn resolve_hardware(&self, ip: Ipv4Addr) -> anyhow::Result<HardwareInfo> {
        let args = ["-sn".to_string(), "-T4".into(), "-oX".into(), "-".into(), ip.to_string()];
        let xml = timeout(PING_SCAN_TIMEOUT, run_xml_scan(&args))
            .await
            .with_context(|| format!("nmap host discovery for {ip} timed out"))??;
        parse_hardware(&xml, ip)
    }

    async fn scan_ports(
        &self,
        ip: Ipv4Addr,
        ports: RangeInclusive<u16>,
        host_timeout: Duration,
    ) -> anyhow::Result<BTreeSet<u16>> {
        // SYN scans need raw sockets; connect scans work unprivileged.
        let technique = if is_root::is_root() { "-sS" } else { "-sT" };
        let args = [
            technique.to_string(),
            "-p".into(),
            format!("{}-{}", ports.start(), ports.end()),
            "-T4".into(),
            "--host-timeout".into(),
            format!("{}s", host_timeout.as_secs().max(1)),
            "-oX".into(),
            "-".into(),
            ip.to_string(),
        ];
        let xml = timeout(host_timeout + PROCESS_GRACE, run_xml_scan(&args))
            .await
            .with_context(|| format!("nmap port scan for {ip} timed out"))??;
        parse_open_ports(&xml, ip)
    }
}

async fn run_xml_scan(args: &[String]) -> anyhow::Result<String> {
    debug!("Running nmap {}", args.join(" "));
    let mut cmd = TokioCommand::new("nmap");
    cmd.args(args).kill_on_drop(true);

    let output = cmd.output().await.context("failed to launch nmap")?;
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        bail!("nmap exited with {}: {}", output.status, stderr.trim());
    }

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if stdout.trim().is_empty() {
        bail!("nmap returned empty output: {}", stderr.trim());
    }
    Ok(stdout)
}

fn find_host(run: &NmapRun, ip: Ipv4Addr) -> Option<&NmapHost> {
    let ip = ip.to_string();
    run.hosts.iter().find(|host| {
        host.addresses
            .iter()
            .any(|a| a.addr_type == "ipv4" && a.addr == ip)
    })
}

fn parse_hardware(xml: &str, ip: Ipv4Addr) -> anyhow::Result<HardwareInfo> {
    let run: NmapRun = from_str(xml).context("parsing nmap XML")?;
    let Some(host) = find_host(&run, ip) else {
        return Ok(HardwareInfo::default());
    };

    let Some(mac_addr) = host.addresses.iter().find(|a| a.addr_type == "mac") else {
        return Ok(HardwareInfo::default());
    };

    Ok(HardwareInfo {
        mac: mac_addr.addr.parse().ok(),
        vendor: mac_addr.vendor.clone().filter(|v| !v.trim().is_empty()),
    })
}

fn parse_open_ports(xml: &str, ip: Ipv4Addr) -> anyhow::Result<BTreeSet<u16>> {
    let run: NmapRun = from_str(xml).context("parsing nmap XML")?;
    let Some(ports) = find_host(&run, ip).and_then(|host| host.ports.as_ref()) else {
        return Ok(BTreeSet::new());
    };

    Ok(ports
        .ports
        .iter()
        .filter(|port| port.protocol == "tcp" && port.state.state == "open")
        .map(|port| port.portid)
        .collect())
}

/// The slice of nmap's XML report that the scanner reads.
#[derive(Debug, Deserialize)]
struct NmapRun {
    #[serde(rename = "host", default)]
    hosts: Vec<NmapHost>,
}

#[derive(Debug, Deserialize)]
struct NmapHost {
    #[serde(rename = "address", default)]
    addresses: Vec<Address>,
    #[serde(default)]
    ports: Option<Ports>,
}

#[derive(Debug, Deserialize)]
struct Address {
    #[serde(rename = "@addr")]
    addr: String,
    #[serde(rename = "@addrtype")]
    addr_type: String,
    #[serde(rename = "@vendor", default)]
    vendor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Ports {
    #[serde(rename = "port", default)]
    ports: Vec<Port>,
}

#[derive(Debug, Deserialize)]
struct Port {
    #[serde(rename = "@portid")]
    portid: u16,
    #[serde(rename = "@protocol")]
    protocol: String,
    state: PortState,
}

#[derive(Debug, Deserialize)]
struct PortState {
    #[serde(rename = "@state")]
    state: String,
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use pnet::util::MacAddr;

    const PING_XML: &str = r#"<?xml version="1.0"?>
<nmaprun scanner="nmap" args="nmap -sn -T4 -oX - 192.168.1.23">
  <host>
    <status state="up" reason="arp-response" reason_ttl="0"/>
    <address addr="192.168.1.23" addrtype="ipv4"/>
    <address addr="3C:22:FB:12:34:56" addrtype="mac" vendor="Apple"/>
    <hostnames>
    </hostnames>
  </host>
  <runstats><finished time="1700000000"/><hosts up="1" down="0" total="1"/></runstats>
</nmaprun>"#;

    const PORTS_XML: &str = r#"<?xml version="1.0"?>
<nmaprun>
  <host>
    <status state="up" reason="syn-ack" reason_ttl="64"/>
    <address addr="192.168.1.23" addrtype="ipv4"/>
    <ports>
      <extraports state="closed" count="1000"/>
      <port protocol="tcp" portid="22"><state state="open" reason="syn-ack"/><service name="ssh"/></port>
      <port protocol="tcp" portid="80"><state state="open" reason="syn-ack"/></port>
      <port protocol="tcp" portid="139"><state state="filtered" reason="no-response"/></port>
    </ports>
  </host>
</nmaprun>"#;

    #[test]
    fn parse_hardware_reads_mac_and_vendor() {
        let info = parse_hardware(PING_XML, Ipv4Addr::new(192, 168, 1, 23)).unwrap();
        assert_eq!(info.mac, Some(MacAddr::new(0x3c, 0x22, 0xfb, 0x12, 0x34, 0x56)));
        assert_eq!(info.vendor.as_deref(), Some("Apple"));
    }

    #[test]
    fn parse_hardware_for_other_host_is_empty() {
        let info = parse_hardware(PING_XML, Ipv4Addr::new(192, 168, 1, 99)).unwrap();
        assert_eq!(info, HardwareInfo::default());
    }

    #[test]
    fn parse_hardware_without_hosts_is_empty() {
        let xml = r#"<?xml version="1.0"?><nmaprun><runstats/></nmaprun>"#;
        let info = parse_hardware(xml, Ipv4Addr::new(10, 0, 0, 1)).unwrap();
        assert_eq!(info, HardwareInfo::default());
    }

    #[test]
    fn parse_open_ports_keeps_open_tcp_only() {
        let ports = parse_open_ports(PORTS_XML, Ipv4Addr::new(192, 168, 1, 23)).unwrap();
        assert_eq!(ports.into_iter().collect::<Vec<_>>(), vec![22, 80]);
    }

    #[test]
    fn parse_rejects_malformed_xml() {
        assert!(parse_open_ports("<nmaprun><host>", Ipv4Addr::new(10, 0, 0, 1)).is_err());
    }
}
