//!
//! icmp.rs
//!
//! Answering ICMP echo requests (ping).
//!

use super::{
	ethernet::{self, ETH_HEADER_LEN},
	ipv4::{self, IP_HEADER_LEN, IP_PROTO_ICMP, IP_PROTO_P}
};
use crate::config::{IP_ADDR_SIZE, MAC_ADDR_SIZE};

pub const ICMP_ECHO_REPLY: u8 = 0;
pub const ICMP_ECHO_REQUEST: u8 = 8;

/// Type, code, checksum, identifier and sequence number.
pub const ICMP_HEADER_LEN: usize = 8;

// byte positions in the ethernet frame
const ICMP_P: usize = ETH_HEADER_LEN + IP_HEADER_LEN;
const ICMP_TYPE_P: usize = ICMP_P;
const ICMP_CHECKSUM_P: usize = ICMP_P + 2;

/// Whether `frame` carries an ICMP echo request.
/// Only meaningful once [`ipv4::is_ip_for_me`] has accepted the frame.
pub fn is_echo_request(frame: &[u8]) -> bool {
	if frame.len() < ICMP_P + ICMP_HEADER_LEN {
		return false;
	}

	frame[IP_PROTO_P] == IP_PROTO_ICMP && frame[ICMP_TYPE_P] == ICMP_ECHO_REQUEST
}

/// Rewrites an echo request in place into the echo reply from `mac` / `ip`.
/// Identifier, sequence number and payload are echoed untouched, so the
/// length does not change.
///
/// # Panics
///
/// If `frame` is shorter than the Ethernet, IP and ICMP headers together.
pub fn build_echo_reply(
	frame: &mut [u8],
	mac: &[u8; MAC_ADDR_SIZE],
	ip: &[u8; IP_ADDR_SIZE]
) -> usize {
	ethernet::make_reply_header(frame, mac);
	ipv4::make_reply_header(frame, ip);

	frame[ICMP_TYPE_P] = ICMP_ECHO_REPLY;
	// only the type byte went from 8 to 0, the high byte of the first word,
	// so the checksum can be corrected in place: add 0x0800 with end-around carry
	if frame[ICMP_CHECKSUM_P] > 0xFF - 0x08 {
		frame[ICMP_CHECKSUM_P + 1] = frame[ICMP_CHECKSUM_P + 1].wrapping_add(1);
	}
	frame[ICMP_CHECKSUM_P] = frame[ICMP_CHECKSUM_P].wrapping_add(0x08);

	frame.len()
}
