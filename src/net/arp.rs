//!
//! arp.rs
//!
//! Answering ARP requests for our own address.
//!

use super::ethernet::{self, ETH_HEADER_LEN, ETHERTYPE_ARP};
use crate::config::{IP_ADDR_SIZE, MAC_ADDR_SIZE};

pub const ARP_OP_REQUEST: u16 = 1;
pub const ARP_OP_REPLY: u16 = 2;

/// Ethernet header plus an IPv4-over-Ethernet ARP packet.
pub const ETH_ARP_FRAME_LEN: usize = 42;

// byte positions in the ethernet frame
const ARP_OPCODE: usize = ETH_HEADER_LEN + 6;
const ARP_SENDER_MAC: usize = ETH_HEADER_LEN + 8;
const ARP_SENDER_IP: usize = ETH_HEADER_LEN + 14;
const ARP_TARGET_MAC: usize = ETH_HEADER_LEN + 18;
const ARP_TARGET_IP: usize = ETH_HEADER_LEN + 24;

/// Whether `frame` is ARP and asks for `ip`.
///
/// A host may resolve us with a broadcast or check a cached entry with a
/// unicast request, so the destination MAC is not looked at.
pub fn is_arp_request_for(frame: &[u8], ip: &[u8; IP_ADDR_SIZE]) -> bool {
	if ethernet::ethertype(frame) != Some(ETHERTYPE_ARP) {
		return false;
	}

	frame.get(ARP_TARGET_IP..ARP_TARGET_IP + IP_ADDR_SIZE) == Some(ip.as_slice())
}

/// Rewrites an ARP request in place into the reply for `mac` / `ip`.
/// Returns the reply length.
///
/// # Panics
///
/// If `frame` is shorter than [`ETH_ARP_FRAME_LEN`].
pub fn build_arp_reply(
	frame: &mut [u8],
	mac: &[u8; MAC_ADDR_SIZE],
	ip: &[u8; IP_ADDR_SIZE]
) -> usize {
	ethernet::make_reply_header(frame, mac);

	frame[ARP_OPCODE..ARP_OPCODE + 2].copy_from_slice(&ARP_OP_REPLY.to_be_bytes());

	// the requester becomes the target
	frame.copy_within(ARP_SENDER_MAC..ARP_SENDER_MAC + MAC_ADDR_SIZE, ARP_TARGET_MAC);
	frame[ARP_SENDER_MAC..ARP_SENDER_MAC + MAC_ADDR_SIZE].copy_from_slice(mac);

	frame.copy_within(ARP_SENDER_IP..ARP_SENDER_IP + IP_ADDR_SIZE, ARP_TARGET_IP);
	frame[ARP_SENDER_IP..ARP_SENDER_IP + IP_ADDR_SIZE].copy_from_slice(ip);

	ETH_ARP_FRAME_LEN
}
