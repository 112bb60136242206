//! Wire formats used by the discovery engine.
//!
//! Only what ARP sweeping needs: building Ethernet-framed ARP requests and
//! reading the sender out of ARP replies.

pub mod arp;
pub mod ethernet;

pub const ETH_HDR_LEN: usize = 14;
pub const ARP_LEN: usize = 28;
pub const MIN_ETH_FRAME_NO_FCS: usize = 60;
