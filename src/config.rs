//!
//! config.rs
//!
//! Device identity and buffer configuration.
//!

use crate::error::ConfigError;

/// Size of an IPv4 address in bytes.
pub const IP_ADDR_SIZE: usize = 4;
/// Size of an Ethernet hardware address in bytes.
pub const MAC_ADDR_SIZE: usize = 6;

/// Max frame length which the controller will accept.
/// (note: maximum ethernet frame length would be 1518)
pub const MAX_FRAMELEN: usize = 1500;
/// Smallest frame buffer the driver will run with.
pub const MIN_BUFFER_SIZE: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Structure representing the driver configuration.
pub struct Config {
	/// Our IPv4 address.
	pub ip_addr: [u8; IP_ADDR_SIZE],
	/// Our hardware address, as it appears on the wire.
	pub mac_addr: [u8; MAC_ADDR_SIZE],
	/// Reserved for a future TCP listener. Not used by the responder.
	pub tcp_port: u16,
	/// Requested frame buffer capacity, clamped to [`MAX_FRAMELEN`].
	pub buffer_size: usize
}

impl Default for Config {
	fn default() -> Self {
		Self {
			ip_addr: [0; IP_ADDR_SIZE],
			mac_addr: [0; MAC_ADDR_SIZE],
			tcp_port: 0,
			buffer_size: MAX_FRAMELEN
		}
	}
}

impl Config {
	/// Creates a new `Config` with the given identity and the default buffer size.
	pub fn new(mac_addr: [u8; MAC_ADDR_SIZE], ip_addr: [u8; IP_ADDR_SIZE]) -> Self {
		Self {
			ip_addr,
			mac_addr,
			..Self::default()
		}
	}

	/// Sets the requested frame buffer capacity.
	pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
		self.buffer_size = buffer_size;
		self
	}

	/// Sets the reserved TCP port.
	pub fn with_tcp_port(mut self, tcp_port: u16) -> Self {
		self.tcp_port = tcp_port;
		self
	}

	/// Buffer capacity the driver will actually allocate.
	pub fn effective_buffer_size(&self) -> usize {
		self.buffer_size.min(MAX_FRAMELEN)
	}

	/// Checks the configuration can be used to build a driver.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.buffer_size < MIN_BUFFER_SIZE {
			return Err(ConfigError::BufferTooSmall {
				size: self.buffer_size,
				min: MIN_BUFFER_SIZE
			});
		}
		Ok(())
	}
}
