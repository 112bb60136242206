use anyhow::Context;
use pnet::packet::ethernet::{EtherType, EthernetPacket, MutableEthernetPacket};
use pnet::util::MacAddr;

use crate::ETH_HDR_LEN;

pub fn make_header(
    buffer: &mut [u8],
    src_mac: MacAddr,
    dst_mac: MacAddr,
    ether_type: EtherType,
) -> anyhow::Result<()> {
    let mut eth_packet = MutableEthernetPacket::new(&mut buffer[..ETH_HDR_LEN])
        .context("failed to create mutable Ethernet packet")?;
    eth_packet.set_destination(dst_mac);
    eth_packet.set_source(src_mac);
    eth_packet.set_ethertype(ether_type);
    Ok(())
}

pub fn get_packet_from_u8(bytes: &[u8]) -> anyhow::Result<EthernetPacket<'_>> {
    EthernetPacket::new(bytes).context(format!(
        "truncated or invalid Ethernet frame (len {})",
        bytes.len()
    ))
}
