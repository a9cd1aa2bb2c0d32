//!
//! ipv4.rs
//!
//! IPv4 header checks and rewriting.
//!

use super::{
	checksum::{ChecksumKind, checksum},
	ethernet::{self, ETH_HEADER_LEN, ETHERTYPE_IPV4}
};
use crate::config::IP_ADDR_SIZE;

/// ICMP IP Protocol Value
pub const IP_PROTO_ICMP: u8 = 1;
/// TCP IP Protocol Value
pub const IP_PROTO_TCP: u8 = 6;
/// UDP IP Protocol Value
pub const IP_PROTO_UDP: u8 = 17;

/// IPv4 header without options.
pub const IP_HEADER_LEN: usize = 20;
/// Version 4, five 32-bit words of header.
pub const IP_V4_NO_OPTIONS: u8 = 0x45;
/// Don't fragment, in the high byte of the flags / offset field.
pub const IP_FLAG_DF: u8 = 0x40;
/// TTL we put on everything we send.
pub const IP_DEFAULT_TTL: u8 = 64;

// byte positions in the ethernet frame
pub const IP_P: usize = ETH_HEADER_LEN;
pub const IP_FLAGS_P: usize = IP_P + 6;
pub const IP_TTL_P: usize = IP_P + 8;
pub const IP_PROTO_P: usize = IP_P + 9;
pub const IP_CHECKSUM_P: usize = IP_P + 10;
pub const IP_SRC_P: usize = IP_P + 12;
pub const IP_DST_P: usize = IP_P + 16;

/// Whether `frame` is an option-less IPv4 packet addressed to `ip`.
pub fn is_ip_for_me(frame: &[u8], ip: &[u8; IP_ADDR_SIZE]) -> bool {
	if frame.len() < ETH_HEADER_LEN + IP_HEADER_LEN {
		return false;
	}

	if ethernet::ethertype(frame) != Some(ETHERTYPE_IPV4) {
		return false;
	}

	// must be IP V4 and 20 byte header
	if frame[IP_P] != IP_V4_NO_OPTIONS {
		return false;
	}

	frame[IP_DST_P..IP_DST_P + IP_ADDR_SIZE] == *ip
}

/// Sends the packet back where it came from, from `ip`, and refreshes the
/// header checksum.
pub fn make_reply_header(frame: &mut [u8], ip: &[u8; IP_ADDR_SIZE]) {
	frame.copy_within(IP_SRC_P..IP_SRC_P + IP_ADDR_SIZE, IP_DST_P);
	frame[IP_SRC_P..IP_SRC_P + IP_ADDR_SIZE].copy_from_slice(ip);
	fill_header_checksum(frame);
}

/// Resets flags and TTL and recomputes the header checksum from scratch.
pub fn fill_header_checksum(frame: &mut [u8]) {
	frame[IP_CHECKSUM_P] = 0;
	frame[IP_CHECKSUM_P + 1] = 0;
	frame[IP_FLAGS_P] = IP_FLAG_DF;
	// fragment offset
	frame[IP_FLAGS_P + 1] = 0;
	frame[IP_TTL_P] = IP_DEFAULT_TTL;

	let sum = checksum(&frame[IP_P..IP_P + IP_HEADER_LEN], ChecksumKind::Ip);
	frame[IP_CHECKSUM_P..IP_CHECKSUM_P + 2].copy_from_slice(&sum.to_be_bytes());
}
