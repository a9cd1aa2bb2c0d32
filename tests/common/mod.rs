//!
//! tests/common/mod.rs
//!
//! Register and buffer memory model of an ENC28J60, driven over the `Bus`
//! trait by decoding the SPI opcodes the way the chip does.
//!

#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use nullnet::{
	Bus,
	Config,
	Enc28j60,
	net::checksum::{ChecksumKind, checksum}
};

pub const RXSTART: u16 = 0x0000;
pub const RXSTOP: u16 = 0x19FE;
pub const TXSTART: u16 = 0x19FF;
pub const TXSTOP: u16 = 0x1FFF;

pub const MY_MAC: [u8; 6] = [0x00, 0x2F, 0x68, 0x12, 0xAC, 0x30];
pub const MY_IP: [u8; 4] = [192, 168, 0, 200];
pub const PEER_MAC: [u8; 6] = [0x52, 0x54, 0x00, 0x12, 0x34, 0x56];
pub const PEER_IP: [u8; 4] = [192, 168, 0, 10];

// register addresses used by the model
pub const ERDPTL: u8 = 0x00;
pub const EWRPTL: u8 = 0x02;
pub const ETXSTL: u8 = 0x04;
pub const ETXNDL: u8 = 0x06;
pub const ERXSTL: u8 = 0x08;
pub const ERXNDL: u8 = 0x0A;
pub const ERXRDPTL: u8 = 0x0C;
pub const EPMM0: u8 = 0x08;
pub const EPMM1: u8 = 0x09;
pub const EPMCSL: u8 = 0x10;
pub const ERXFCON: u8 = 0x18;
pub const EPKTCNT: u8 = 0x19;
pub const MACON1: u8 = 0x00;
pub const MACON3: u8 = 0x02;
pub const MABBIPG: u8 = 0x04;
pub const MAIPGL: u8 = 0x06;
pub const MAMXFLL: u8 = 0x0A;
pub const MICMD: u8 = 0x12;
pub const MIREGADR: u8 = 0x14;
pub const MIWRL: u8 = 0x16;
pub const MIWRH: u8 = 0x17;
pub const MIRDL: u8 = 0x18;
pub const MIRDH: u8 = 0x19;
pub const MISTAT: u8 = 0x0A;
pub const EREVID: u8 = 0x12;
pub const EIE: u8 = 0x1B;
pub const EIR: u8 = 0x1C;
pub const ECON2: u8 = 0x1E;
pub const ECON1: u8 = 0x1F;

const ECON1_TXRTS: u8 = 0x08;
const ECON2_PKTDEC: u8 = 0x40;
const EIR_TXIF: u8 = 0x08;
const EIR_TXERIF: u8 = 0x02;
const MICMD_MIIRD: u8 = 0x01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

/// State of the simulated chip.
pub struct ChipModel {
	banks: [[u8; 0x1B]; 4],
	common: [u8; 5],
	pub mem: Vec<u8>,
	pub phy: [u16; 0x20],

	/// Every PHY register write, in order.
	pub phy_writes: Vec<(u8, u16)>,
	/// Every frame the chip put on the wire.
	pub sent: Vec<Vec<u8>>,
	/// Every delay requested, in µs.
	pub delays: Vec<u32>,
	/// First byte of every chip select frame.
	pub ops: Vec<u8>,
	/// Bytes exchanged in every chip select frame.
	pub frame_lens: Vec<usize>,
	/// BFC ECON1 0x03, i.e. bank switches.
	pub bank_selects: usize,
	/// Bus transfers so far.
	pub transfers: usize,

	/// MISTAT reads reporting BUSY after each MII operation.
	pub mistat_busy_polls: usize,
	/// Raise EIR.TXERIF and leave TXRTS stuck on the next transmit.
	pub tx_error: bool,
	/// Fail every transfer after this many.
	pub fail_after: Option<usize>,
	/// Where the next injected frame is written.
	pub rx_write: u16,

	selected: bool,
	cmd: u8,
	index: usize,
	busy_left: usize
}

impl ChipModel {
	pub fn new() -> Self {
		Self {
			banks: [[0; 0x1B]; 4],
			common: [0; 5],
			mem: vec![0; 0x2000],
			phy: [0; 0x20],
			phy_writes: Vec::new(),
			sent: Vec::new(),
			delays: Vec::new(),
			ops: Vec::new(),
			frame_lens: Vec::new(),
			bank_selects: 0,
			transfers: 0,
			mistat_busy_polls: 0,
			tx_error: false,
			fail_after: None,
			rx_write: RXSTART,
			selected: false,
			cmd: 0,
			index: 0,
			busy_left: 0
		}
	}

	pub fn bank(&self) -> usize {
		(self.common[(ECON1 - 0x1B) as usize] & 0x03) as usize
	}

	pub fn reg(&self, bank: usize, addr: u8) -> u8 {
		if addr >= 0x1B {
			self.common[(addr - 0x1B) as usize]
		} else {
			self.banks[bank][addr as usize]
		}
	}

	pub fn set_reg(&mut self, bank: usize, addr: u8, value: u8) {
		if addr >= 0x1B {
			self.common[(addr - 0x1B) as usize] = value;
		} else {
			self.banks[bank][addr as usize] = value;
		}
	}

	pub fn reg16(&self, bank: usize, low: u8) -> u16 {
		u16::from_le_bytes([self.reg(bank, low), self.reg(bank, low + 1)])
	}

	fn set_reg16(&mut self, bank: usize, low: u8, value: u16) {
		let [lo, hi] = value.to_le_bytes();
		self.set_reg(bank, low, lo);
		self.set_reg(bank, low + 1, hi);
	}

	pub fn pending(&self) -> u8 {
		self.reg(1, EPKTCNT)
	}

	pub fn rx_read_ptr(&self) -> u16 {
		self.reg16(0, ERXRDPTL)
	}

	pub fn buffer_read_ptr(&self) -> u16 {
		self.reg16(0, ERDPTL)
	}

	/// Writes a frame into the receive ring the way the MAC would.
	/// Returns the next packet pointer stored in its header.
	pub fn queue_frame(&mut self, frame: &[u8], crc_ok: bool) -> u16 {
		let byte_count = frame.len() + 4;
		let ring = (RXSTOP - RXSTART) as usize + 1;
		let mut next = (self.rx_write - RXSTART) as usize + 6 + byte_count;
		// frames start on even addresses
		next += next & 1;
		let next = RXSTART + (next % ring) as u16;

		let status: u16 = if crc_ok { 0x0080 } else { 0x0010 };
		let mut bytes = Vec::new();
		bytes.extend_from_slice(&next.to_le_bytes());
		bytes.extend_from_slice(&(byte_count as u16).to_le_bytes());
		bytes.extend_from_slice(&status.to_le_bytes());
		bytes.extend_from_slice(frame);
		bytes.extend_from_slice(&[0xCC; 4]);

		let mut addr = self.rx_write;
		for byte in bytes {
			self.mem[addr as usize] = byte;
			addr = if addr == RXSTOP { RXSTART } else { addr + 1 };
		}

		self.rx_write = next;
		let count = self.pending() + 1;
		self.set_reg(1, EPKTCNT, count);
		next
	}

	fn is_mac_mii(bank: usize, addr: u8) -> bool {
		match bank {
			2 => addr < 0x1A,
			3 => addr <= 0x05 || addr == MISTAT,
			_ => false
		}
	}

	fn reset(&mut self) {
		self.banks = [[0; 0x1B]; 4];
		self.common = [0; 5];
	}

	fn read_register(&mut self, addr: u8) -> u8 {
		let bank = self.bank();
		if bank == 3 && addr == MISTAT {
			if self.busy_left > 0 {
				self.busy_left -= 1;
				return 0x01;
			}
			return 0x00;
		}
		self.reg(bank, addr)
	}

	fn write_register(&mut self, addr: u8, value: u8) {
		let bank = self.bank();
		self.set_reg(bank, addr, value);

		if bank == 2 && addr == MIWRH {
			let reg = self.reg(2, MIREGADR);
			let value = self.reg16(2, MIWRL);
			self.phy[reg as usize & 0x1F] = value;
			self.phy_writes.push((reg, value));
			self.busy_left = self.mistat_busy_polls;
		}

		if bank == 2 && addr == MICMD && value & MICMD_MIIRD != 0 {
			let reg = self.reg(2, MIREGADR);
			let value = self.phy[reg as usize & 0x1F];
			self.set_reg16(2, MIRDL, value);
			self.busy_left = self.mistat_busy_polls;
		}
	}

	fn bit_field_set(&mut self, addr: u8, mask: u8) {
		let bank = self.bank();
		let value = self.reg(bank, addr) | mask;
		self.set_reg(bank, addr, value);

		if addr == ECON2 && mask & ECON2_PKTDEC != 0 {
			let count = self.pending().saturating_sub(1);
			self.set_reg(1, EPKTCNT, count);
			self.common[(ECON2 - 0x1B) as usize] &= !ECON2_PKTDEC;
		}

		if addr == ECON1 && mask & ECON1_TXRTS != 0 {
			self.transmit();
		}
	}

	fn bit_field_clear(&mut self, addr: u8, mask: u8) {
		if addr == ECON1 && mask == 0x03 {
			self.bank_selects += 1;
		}
		let bank = self.bank();
		let value = self.reg(bank, addr) & !mask;
		self.set_reg(bank, addr, value);
	}

	fn transmit(&mut self) {
		if self.tx_error {
			let eir = self.reg(0, EIR) | EIR_TXERIF;
			self.set_reg(0, EIR, eir);
			return;
		}

		let start = self.reg16(0, ETXSTL) as usize;
		let end = self.reg16(0, ETXNDL) as usize;
		// skip the per packet control byte
		self.sent.push(self.mem[start + 1..=end].to_vec());

		let econ1 = self.reg(0, ECON1) & !ECON1_TXRTS;
		self.set_reg(0, ECON1, econ1);
		let eir = self.reg(0, EIR) | EIR_TXIF;
		self.set_reg(0, EIR, eir);
	}

	fn read_buffer_byte(&mut self) -> u8 {
		let ptr = self.reg16(0, ERDPTL);
		let value = self.mem[ptr as usize];
		let next = if ptr == self.reg16(0, ERXNDL) {
			self.reg16(0, ERXSTL)
		} else {
			(ptr + 1) & 0x1FFF
		};
		self.set_reg16(0, ERDPTL, next);
		value
	}

	fn write_buffer_byte(&mut self, value: u8) {
		let ptr = self.reg16(0, EWRPTL);
		self.mem[ptr as usize] = value;
		self.set_reg16(0, EWRPTL, (ptr + 1) & 0x1FFF);
	}

	fn exchange(&mut self, byte: u8) -> u8 {
		assert!(self.selected, "transfer outside of a chip select frame");
		let index = self.index;
		self.index += 1;

		if index == 0 {
			self.cmd = byte;
			self.ops.push(byte);
			if byte == 0xFF {
				self.reset();
			}
			return 0;
		}

		let addr = self.cmd & 0x1F;
		match self.cmd >> 5 {
			// RCR
			0 => {
				if Self::is_mac_mii(self.bank(), addr) && index == 1 {
					0x00
				} else {
					self.read_register(addr)
				}
			}
			// RBM
			1 => self.read_buffer_byte(),
			// WCR
			2 => {
				self.write_register(addr, byte);
				0
			}
			// WBM
			3 => {
				self.write_buffer_byte(byte);
				0
			}
			// BFS
			4 => {
				self.bit_field_set(addr, byte);
				0
			}
			// BFC
			5 => {
				self.bit_field_clear(addr, byte);
				0
			}
			_ => panic!("unexpected opcode {:#04x}", self.cmd)
		}
	}
}

#[derive(Clone)]
/// `Bus` end of a shared [`ChipModel`].
pub struct MockBus(pub Rc<RefCell<ChipModel>>);

impl MockBus {
	pub fn new() -> Self {
		Self(Rc::new(RefCell::new(ChipModel::new())))
	}

	pub fn model(&self) -> std::cell::RefMut<'_, ChipModel> {
		self.0.borrow_mut()
	}
}

impl Bus for MockBus {
	type Error = BusFault;

	fn select(&mut self) -> Result<(), BusFault> {
		let mut model = self.0.borrow_mut();
		assert!(!model.selected, "chip select asserted twice");
		model.selected = true;
		model.index = 0;
		Ok(())
	}

	fn deselect(&mut self) -> Result<(), BusFault> {
		let mut model = self.0.borrow_mut();
		model.selected = false;
		let len = model.index;
		model.frame_lens.push(len);
		Ok(())
	}

	fn transfer(&mut self, byte: u8) -> Result<u8, BusFault> {
		let mut model = self.0.borrow_mut();
		model.transfers += 1;
		if let Some(limit) = model.fail_after {
			if model.transfers > limit {
				return Err(BusFault);
			}
		}
		Ok(model.exchange(byte))
	}

	fn delay_us(&mut self, us: u32) {
		self.0.borrow_mut().delays.push(us);
	}
}

/// A driver brought up against a fresh model, with the model handle.
pub fn driver() -> (Enc28j60<MockBus>, MockBus) {
	let bus = MockBus::new();
	let handle = bus.clone();
	let enc = Enc28j60::new(bus, Config::new(MY_MAC, MY_IP).with_tcp_port(80))
		.expect("mock bus never fails");
	(enc, handle)
}

/// Broadcast who-has `target` from the peer.
pub fn arp_request(target: [u8; 4]) -> Vec<u8> {
	let mut packet = vec![0u8; 42];
	packet[0..6].copy_from_slice(&[0xFF; 6]);
	packet[6..12].copy_from_slice(&PEER_MAC);
	packet[12..14].copy_from_slice(&0x0806u16.to_be_bytes());
	packet[14..16].copy_from_slice(&1u16.to_be_bytes());
	packet[16..18].copy_from_slice(&0x0800u16.to_be_bytes());
	packet[18] = 6;
	packet[19] = 4;
	packet[20..22].copy_from_slice(&1u16.to_be_bytes());
	packet[22..28].copy_from_slice(&PEER_MAC);
	packet[28..32].copy_from_slice(&PEER_IP);
	packet[38..42].copy_from_slice(&target);
	packet
}

/// Ping from the peer to `dst` with valid checksums.
pub fn echo_request(dst: [u8; 4], payload: &[u8]) -> Vec<u8> {
	let mut packet = vec![0u8; 42 + payload.len()];
	packet[0..6].copy_from_slice(&MY_MAC);
	packet[6..12].copy_from_slice(&PEER_MAC);
	packet[12..14].copy_from_slice(&0x0800u16.to_be_bytes());

	packet[14] = 0x45;
	let total = (28 + payload.len()) as u16;
	packet[16..18].copy_from_slice(&total.to_be_bytes());
	packet[18..20].copy_from_slice(&0x0BADu16.to_be_bytes());
	packet[22] = 64;
	packet[23] = 1;
	packet[26..30].copy_from_slice(&PEER_IP);
	packet[30..34].copy_from_slice(&dst);
	let sum = checksum(&packet[14..34], ChecksumKind::Ip);
	packet[24..26].copy_from_slice(&sum.to_be_bytes());

	packet[34] = 8;
	packet[38..40].copy_from_slice(&0x0042u16.to_be_bytes());
	packet[40..42].copy_from_slice(&0x0001u16.to_be_bytes());
	packet[42..].copy_from_slice(payload);
	let sum = checksum(&packet[34..], ChecksumKind::Ip);
	packet[36..38].copy_from_slice(&sum.to_be_bytes());
	packet
}
