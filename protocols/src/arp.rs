use std::net::Ipv4Addr;

use anyhow::Context;
use pnet::packet::Packet;
use pnet::packet::arp::{ArpHardwareTypes, ArpOperations, ArpPacket, MutableArpPacket};
use pnet::packet::ethernet::EtherTypes;
use pnet::util::MacAddr;
use thiserror::Error;

use crate::{ARP_LEN, ETH_HDR_LEN, MIN_ETH_FRAME_NO_FCS, ethernet};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArpError {
    #[error("truncated or invalid Ethernet frame (len {0})")]
    TruncatedFrame(usize),
    #[error("frame is not ARP")]
    NotArp,
    #[error("truncated or invalid ARP packet (payload len {0})")]
    TruncatedArp(usize),
    #[error("ARP packet is not a reply")]
    NotReply,
}

/// The sender half of an ARP reply: who answered, and from which hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpReply {
    pub sender_ip: Ipv4Addr,
    pub sender_mac: MacAddr,
}

/// Builds a broadcast "who-has `dst_addr`" frame.
pub fn create_request(
    src_mac: MacAddr,
    src_addr: Ipv4Addr,
    dst_addr: Ipv4Addr,
) -> anyhow::Result<Vec<u8>> {
    let mut buffer = [0u8; MIN_ETH_FRAME_NO_FCS];
    ethernet::make_header(&mut buffer, src_mac, MacAddr::broadcast(), EtherTypes::Arp)?;
    let mut arp_packet = MutableArpPacket::new(&mut buffer[ETH_HDR_LEN..ETH_HDR_LEN + ARP_LEN])
        .context("failed to create mutable ARP packet")?;
    arp_packet.set_hardware_type(ArpHardwareTypes::Ethernet);
    arp_packet.set_protocol_type(EtherTypes::Ipv4);
    arp_packet.set_hw_addr_len(6);
    arp_packet.set_proto_addr_len(4);
    arp_packet.set_operation(ArpOperations::Request);
    arp_packet.set_sender_hw_addr(src_mac);
    arp_packet.set_target_hw_addr(MacAddr::zero());
    arp_packet.set_sender_proto_addr(src_addr);
    arp_packet.set_target_proto_addr(dst_addr);
    Ok(Vec::from(buffer))
}

/// Reads the sender of an ARP reply out of a raw Ethernet frame.
pub fn parse_reply(frame: &[u8]) -> Result<ArpReply, ArpError> {
    let eth_packet =
        ethernet::get_packet_from_u8(frame).map_err(|_| ArpError::TruncatedFrame(frame.len()))?;
    if eth_packet.get_ethertype() != EtherTypes::Arp {
        return Err(ArpError::NotArp);
    }
    let payload = eth_packet.payload();
    let arp_packet = ArpPacket::new(payload).ok_or(ArpError::TruncatedArp(payload.len()))?;
    if arp_packet.get_operation() != ArpOperations::Reply {
        return Err(ArpError::NotReply);
    }
    Ok(ArpReply {
        sender_ip: arp_packet.get_sender_proto_addr(),
        sender_mac: arp_packet.get_sender_hw_addr(),
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
