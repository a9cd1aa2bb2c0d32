//!
//! net/mod.rs
//!
//! Frame classification and in-place reply construction. Everything here
//! works on a single frame in a borrowed buffer, with fixed offsets into the
//! Ethernet, ARP, IPv4 and ICMP headers.
//!

pub mod arp;
pub mod checksum;
pub mod ethernet;
pub mod icmp;
pub mod ipv4;

use log::debug;

use crate::config::{IP_ADDR_SIZE, MAC_ADDR_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A reply built in place over the received frame.
pub struct Reply {
	/// Bytes of the buffer to transmit.
	pub len: usize
}

/// Answers `frame` in place if it is something we reply to.
///
/// ARP requests for `ip` are checked first, then anything that is not IPv4
/// for `ip` is dropped, then ICMP echo requests get an echo reply.
pub fn respond(
	frame: &mut [u8],
	mac: &[u8; MAC_ADDR_SIZE],
	ip: &[u8; IP_ADDR_SIZE]
) -> Option<Reply> {
	// arp is broadcast if unknown but a host may also verify the mac address
	// by sending it to a unicast address
	if arp::is_arp_request_for(frame, ip) {
		debug!("[ARP] request for our IP, sending reply");
		let len = arp::build_arp_reply(frame, mac, ip);
		return Some(Reply {
			len
		});
	}

	if !ipv4::is_ip_for_me(frame, ip) {
		return None;
	}

	if icmp::is_echo_request(frame) {
		debug!("[ICMP] echo request, sending reply");
		let len = icmp::build_echo_reply(frame, mac, ip);
		return Some(Reply {
			len
		});
	}

	debug!("[IPv4] protocol {} not handled", frame[ipv4::IP_PROTO_P]);
	None
}
