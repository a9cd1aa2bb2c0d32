//!
//! ethernet.rs
//!
//! Ethernet II header layout.
//!

use crate::config::MAC_ADDR_SIZE;

/// Length of the Ethernet header.
pub const ETH_HEADER_LEN: usize = 14;

/// Destination MAC offset.
pub const ETH_DST_MAC: usize = 0;
/// Source MAC offset.
pub const ETH_SRC_MAC: usize = 6;
/// EtherType offset (2 bytes, big endian).
pub const ETH_TYPE: usize = 12;

/// Ethernet Type ARP value
pub const ETHERTYPE_ARP: u16 = 0x0806;
/// Ethernet Type IPv4 value
pub const ETHERTYPE_IPV4: u16 = 0x0800;

/// EtherType of `frame`, `None` if the header is cut short.
pub fn ethertype(frame: &[u8]) -> Option<u16> {
	frame
		.get(ETH_TYPE..ETH_TYPE + 2)
		.map(|b| u16::from_be_bytes([b[0], b[1]]))
}

/// Addresses the frame back to its sender, with `mac` as the new source.
pub fn make_reply_header(frame: &mut [u8], mac: &[u8; MAC_ADDR_SIZE]) {
	frame.copy_within(ETH_SRC_MAC..ETH_SRC_MAC + MAC_ADDR_SIZE, ETH_DST_MAC);
	frame[ETH_SRC_MAC..ETH_SRC_MAC + MAC_ADDR_SIZE].copy_from_slice(mac);
}
