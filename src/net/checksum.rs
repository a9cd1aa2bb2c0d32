//!
//! checksum.rs
//!
//! Internet checksum (RFC 1071).
//!

use super::ipv4::{IP_PROTO_TCP, IP_PROTO_UDP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What a checksum is being computed over.
pub enum ChecksumKind {
	/// An IP header.
	Ip,
	/// A UDP segment, starting at the IP source address.
	Udp,
	/// A TCP segment, starting at the IP source address.
	Tcp
}

/// One's complement sum of big-endian 16-bit words, carries folded in.
/// An odd trailing byte is the high byte of a zero padded word.
pub fn ones_complement_sum(data: &[u8], seed: u32) -> u16 {
	let mut sum = seed;

	for chunk in data.chunks(2) {
		let word = if chunk.len() == 2 {
			u16::from_be_bytes([chunk[0], chunk[1]]) as u32
		} else {
			(chunk[0] as u32) << 8
		};
		sum += word;
	}

	while (sum >> 16) != 0 {
		sum = (sum & 0xFFFF) + (sum >> 16);
	}

	sum as u16
}

/// Calculates the checksum of `data`.
///
/// For [`ChecksumKind::Udp`] and [`ChecksumKind::Tcp`] `data` must start at
/// the IP source address: the two addresses plus the protocol number and
/// segment length make up the pseudo header.
pub fn checksum(data: &[u8], kind: ChecksumKind) -> u16 {
	let seed = match kind {
		ChecksumKind::Ip => 0,
		// the length here is the length of the segment (header + data)
		// = length of `data` minus the two IP addresses
		ChecksumKind::Udp => IP_PROTO_UDP as u32 + data.len().saturating_sub(8) as u32,
		ChecksumKind::Tcp => IP_PROTO_TCP as u32 + data.len().saturating_sub(8) as u32
	};

	!ones_complement_sum(data, seed)
}
