use std::sync::OnceLock;

use mac_oui::Oui;
use pnet::util::MacAddr;
use tracing::warn;

static OUI_DB: OnceLock<Option<Oui>> = OnceLock::new();

/// Retrieves or initializes the **Organizationally unique identifier** database.
///
/// Used for linking a vendor to a MAC address (LAN). A database that fails to load
/// is remembered as missing so later lookups stay cheap.
fn get_oui_db() -> Option<&'static Oui> {
    OUI_DB
        .get_or_init(|| match Oui::default() {
            Ok(db) => Some(db),
            Err(e) => {
                warn!("OUI database unavailable: {e}");
                None
            }
        })
        .as_ref()
}

/// Identify the vendor of a MAC address.
pub fn get_vendor(mac: MacAddr) -> Option<String> {
    let db = get_oui_db()?;
    let mac_str = mac.to_string();
    match db.lookup_by_mac(&mac_str) {
        Ok(Some(entry)) => Some(entry.company_name.clone()),
        _ => None,
    }
}

/// The three leading octets of a hardware address.
pub fn prefix(mac: MacAddr) -> [u8; 3] {
    [mac.0, mac.1, mac.2]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_returns_leading_octets() {
        let mac: MacAddr = "00:0c:29:aa:bb:cc".parse().unwrap();
        assert_eq!(prefix(mac), [0x00, 0x0c, 0x29]);
    }

    #[test]
    fn get_vendor_resolves_vmware_prefix() {
        let mac: MacAddr = "00:50:56:01:02:03".parse().unwrap();
        let vendor = get_vendor(mac).unwrap_or_default();
        assert!(vendor.to_lowercase().contains("vmware"), "got {vendor}");
    }
}
