//!
//! rx.rs
//!
//! Buffer memory layout and the receive status vector that prefixes every
//! frame in the receive ring.
//!

use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned, little_endian::U16};

// RXSTART must stay at zero (Rev. B4 silicon errata).
/// Receive ring start.
pub const RXSTART_INIT: u16 = 0x0000;
/// Receive ring end (inclusive).
pub const RXSTOP_INIT: u16 = 0x1FFF - 0x0600 - 1;
/// Transmit region start, room for one full ethernet frame (~1500 bytes).
pub const TXSTART_INIT: u16 = 0x1FFF - 0x0600;
/// Transmit region end, the last byte of buffer memory.
pub const TXSTOP_INIT: u16 = 0x1FFF;

/// Length of the receive status vector in bytes.
pub const RSV_LENGTH: usize = 6;
/// Trailing CRC the chip stores after every received frame.
pub const CRC_LENGTH: usize = 4;

/// RSV status bit 7: CRC valid and no symbol errors.
const RSV_RECEIVED_OK: u16 = 0x0080;

#[derive(Debug, Clone, Copy, FromBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
/// Receive status vector, as stored in buffer memory ahead of the frame.
/// See: Table 7-3, ENC28J60 Data Sheet
pub struct RxHeader {
	/// Address of the next frame in the ring.
	next_packet: U16,
	/// Received byte count, CRC included.
	byte_count: U16,
	/// Receive status bits 16-31.
	status: U16
}

impl RxHeader {
	/// Decodes the header from the six bytes read out of buffer memory.
	pub fn parse(raw: &[u8; RSV_LENGTH]) -> Self {
		zerocopy::transmute!(*raw)
	}

	/// Address of the next frame in the ring.
	pub fn next_packet(&self) -> u16 {
		self.next_packet.get()
	}

	/// Frame length with the trailing CRC removed.
	pub fn frame_length(&self) -> usize {
		(self.byte_count.get() as usize).saturating_sub(CRC_LENGTH)
	}

	/// Raw status word.
	pub fn status(&self) -> u16 {
		self.status.get()
	}

	/// Whether the chip saw a valid CRC.
	pub fn received_ok(&self) -> bool {
		self.status() & RSV_RECEIVED_OK != 0
	}
}
