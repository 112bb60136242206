use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tokio::time::timeout;
use tracing::debug;

/// Source of PTR names for addresses.
#[async_trait]
pub trait HostnameResolver: Send + Sync {
    /// `Ok(None)` when the address has no usable name.
    async fn lookup(&self, ip: Ipv4Addr) -> anyhow::Result<Option<String>>;
}

/// Resolves through the operating system's resolver.
pub struct SystemResolver;

#[async_trait]
impl HostnameResolver for SystemResolver {
    async fn lookup(&self, ip: Ipv4Addr) -> anyhow::Result<Option<String>> {
        let addr = IpAddr::V4(ip);
        let name = tokio::task::spawn_blocking(move || dns_lookup::lookup_addr(&addr))
            .await
            .context("reverse lookup task")?
            .with_context(|| format!("reverse lookup of {ip}"))?;

        // getnameinfo echoes the numeric form back when there is no PTR record.
        if name.is_empty() || name == addr.to_string() {
            return Ok(None);
        }
        Ok(Some(name))
    }
}

/// Asks `resolver` for a name, giving up after `limit`.
///
/// Errors and timeouts both come back as `None`. A lookup that overran keeps its
/// blocking thread until the OS resolver gives up, but nothing waits on it.
pub async fn reverse_lookup(resolver: &dyn HostnameResolver, ip: Ipv4Addr, limit: Duration) -> Option<String> {
    match timeout(limit, resolver.lookup(ip)).await {
        Ok(Ok(name)) => name,
        Ok(Err(e)) => {
            debug!("No reverse DNS for {ip}: {e:#}");
            None
        }
        Err(_) => {
            debug!("Reverse DNS for {ip} timed out after {}ms", limit.as_millis());
            None
        }
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
