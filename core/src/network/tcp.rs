use std::collections::BTreeSet;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::task::JoinSet;
use tokio::time::timeout;

/// True when a full TCP handshake to `addr` completes within `probe_timeout`.
pub async fn handshake_probe(addr: SocketAddr, probe_timeout: Duration) -> bool {
    matches!(timeout(probe_timeout, TcpStream::connect(addr)).await, Ok(Ok(_)))
}

/// Tries every port concurrently and returns the ones that accepted a connection.
pub async fn open_ports(ip: IpAddr, ports: &[u16], probe_timeout: Duration) -> BTreeSet<u16> {
    let mut probes = JoinSet::new();
    for &port in ports {
        probes.spawn(async move {
            let open = handshake_probe(SocketAddr::new(ip, port), probe_timeout).await;
            (port, open)
        });
    }

    let mut open = BTreeSet::new();
    while let Some(joined) = probes.join_next().await {
        if let Ok((port, true)) = joined {
            open.insert(port);
        }
    }
    open
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
