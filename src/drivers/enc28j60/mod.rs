//!
//! drivers/enc28j60/mod.rs
//!
//! ENC28J60 stand-alone Ethernet controller driver. Brings the chip up and
//! answers ARP and ICMP echo requests straight out of its receive ring.
//!

pub mod bus;
pub mod chip;
pub mod regs;
pub mod rx;

use alloc::{vec, vec::Vec};

use log::{debug, trace};

use self::{
	bus::Bus,
	chip::{Chip, ChipResult},
	regs::{Eie, Econ1, Erxfcon, Macon1, Macon3, Phcon2, Phstat2, phy}
};
use crate::{
	config::{Config, MAX_FRAMELEN},
	error::EncError,
	irq::EventLatch,
	net::{self, Reply}
};

/// Wait after the soft reset command. ESTAT.CLKRDY cannot be trusted right
/// after a reset (Rev. B4 silicon errata #2).
const RESET_DELAY_US: u32 = 1_000;

/// Receive filter pattern: ARP type and broadcast destination.
///
/// ```text
/// Type     ETH.DST
/// ARP      BROADCAST
/// 06 08 -- ff ff ff ff ff ff -> ip checksum for these bytes = f7f9
/// in binary these positions are: 11 0000 0011 1111
/// ```
const PATTERN_MASK: [u8; 2] = [0x3F, 0x30];
const PATTERN_CHECKSUM: u16 = 0xF7F9;

/// Inter-frame gap, non back-to-back.
const MAIPG: u16 = 0x0C12;
/// Inter-frame gap, back-to-back.
const MABBIPG: u8 = 0x12;

/// LED blink sequence run at start up, PHLCON value and hold time in µs.
/// 0x880 = both on, 0x990 = both off, 0x476 = LEDA link status, LEDB rx/tx.
const LED_SEQUENCE: [(u16, u32); 5] = [
	(0x0880, 500),
	(0x0990, 500),
	(0x0880, 500),
	(0x0990, 500),
	(0x0476, 100)
];

/// A ENC28J60 answering ARP and ICMP echo requests for one configured identity.
pub struct Enc28j60<B: Bus> {
	chip: Chip<B>,
	config: Config,
	/// The single frame buffer every receive and transmit goes through.
	buffer: Vec<u8>,
	error: bool
}

impl<B: Bus> Enc28j60<B> {
	/// Resets and programs the chip, then allocates the frame buffer.
	pub fn new(bus: B, config: Config) -> Result<Self, EncError<B::Error>> {
		config.validate()?;

		let mut chip = Chip::new(bus);
		init_chip(&mut chip, &config)?;

		let buffer = vec![0u8; config.effective_buffer_size()];
		debug!(
			"[ENC] up, mac={:02X?} ip={:?} buffer={} bytes",
			config.mac_addr,
			config.ip_addr,
			buffer.len()
		);

		Ok(Self {
			chip,
			config,
			buffer,
			error: false
		})
	}

	/// Whether the driver has seen the bus fail during [`update`](Self::update).
	pub fn is_error(&self) -> bool {
		self.error
	}

	/// Configuration the driver was built with.
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Drains the receive ring, answering every ARP request and ICMP echo
	/// request addressed to us. Returns once the chip reports no more frames.
	pub fn update(&mut self) -> Result<(), EncError<B::Error>> {
		let result = self.poll();
		if result.is_err() {
			self.error = true;
		}
		result
	}

	/// Runs [`update`](Self::update) if the interrupt handler has signalled `latch`.
	pub fn service(&mut self, latch: &EventLatch) -> Result<(), EncError<B::Error>> {
		if latch.take() {
			self.update()
		} else {
			Ok(())
		}
	}

	fn poll(&mut self) -> Result<(), EncError<B::Error>> {
		let ip = self.config.ip_addr;
		let mac = self.config.mac_addr;

		loop {
			let len = self.chip.receive_frame(&mut self.buffer)?;
			if len == 0 {
				return Ok(());
			}

			let frame = &mut self.buffer[..len];
			match net::respond(frame, &mac, &ip) {
				Some(Reply { len }) => self.chip.send_frame(&self.buffer[..len])?,
				None => trace!("[NET] no reply for {} byte frame", len)
			}
		}
	}

	/// Whether the PHY reports the link as up.
	pub fn is_link_up(&mut self) -> Result<bool, EncError<B::Error>> {
		let stat = Phstat2::from_bits_truncate(self.chip.read_phy_register(phy::PHSTAT2)?);
		Ok(stat.contains(Phstat2::LSTAT))
	}

	/// Silicon revision from EREVID.
	pub fn revision(&mut self) -> Result<u8, EncError<B::Error>> {
		self.chip.read_register(regs::EREVID)
	}

	/// Shuts nothing down, just hands the bus back.
	pub fn release(self) -> B {
		self.chip.release()
	}
}

fn init_chip<B: Bus>(chip: &mut Chip<B>, config: &Config) -> ChipResult<(), B> {
	chip.soft_reset()?;
	chip.delay_us(RESET_DELAY_US);

	// do bank 0 stuff
	chip.write_register_pair(regs::ERXSTL, regs::ERXSTH, rx::RXSTART_INIT)?;
	chip.write_register_pair(regs::ERXRDPTL, regs::ERXRDPTH, rx::RXSTART_INIT)?;
	chip.write_register_pair(regs::ERXNDL, regs::ERXNDH, rx::RXSTOP_INIT)?;
	chip.write_register_pair(regs::ETXSTL, regs::ETXSTH, rx::TXSTART_INIT)?;
	chip.write_register_pair(regs::ETXNDL, regs::ETXNDH, rx::TXSTOP_INIT)?;

	// do bank 1 stuff, packet filter:
	// broadcasts are let through only when they are ARP, everything else
	// has to be unicast to our MAADR
	let filter = Erxfcon::UCEN | Erxfcon::CRCEN | Erxfcon::PMEN;
	chip.write_register(regs::ERXFCON, filter.bits())?;
	chip.write_register(regs::EPMM0, PATTERN_MASK[0])?;
	chip.write_register(regs::EPMM1, PATTERN_MASK[1])?;
	chip.write_register_pair(regs::EPMCSL, regs::EPMCSH, PATTERN_CHECKSUM)?;

	// do bank 2 stuff
	let macon1 = Macon1::MARXEN | Macon1::TXPAUS | Macon1::RXPAUS;
	chip.write_register(regs::MACON1, macon1.bits())?;
	chip.write_register(regs::MACON2, 0x00)?;
	// automatic padding to 60 bytes and CRC operations
	let macon3 = Macon3::PADCFG0 | Macon3::TXCRCEN | Macon3::FRMLNEN;
	chip.set_bits(regs::MACON3, macon3.bits())?;
	chip.write_register_pair(regs::MAIPGL, regs::MAIPGH, MAIPG)?;
	chip.write_register(regs::MABBIPG, MABBIPG)?;
	chip.write_register_pair(regs::MAMXFLL, regs::MAMXFLH, MAX_FRAMELEN as u16)?;

	// do bank 3 stuff
	for (reg, byte) in regs::MAADR_WIRE_ORDER.into_iter().zip(config.mac_addr) {
		chip.write_register(reg, byte)?;
	}

	// no loopback of transmitted frames
	chip.write_phy_register(phy::PHCON2, Phcon2::HDLDIS.bits())?;

	chip.select_bank(regs::Bank::Bank0)?;
	chip.set_bits(regs::EIE, (Eie::INTIE | Eie::PKTIE).bits())?;
	chip.set_bits(regs::ECON1, Econ1::RXEN.bits())?;

	for (phlcon, hold_us) in LED_SEQUENCE {
		chip.write_phy_register(phy::PHLCON, phlcon)?;
		chip.delay_us(hold_us);
	}

	Ok(())
}
