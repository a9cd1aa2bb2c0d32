//!
//! chip.rs
//!
//! Register and buffer memory access for the ENC28J60: bank switching, the
//! SPI opcodes, PHY access and moving frames in and out of the chip.
//!

use log::{trace, warn};

use super::{
	bus::Bus,
	regs::{self, Bank, Econ1, Econ2, Eir, Micmd, Mistat, Register, RegisterAccess, opcode},
	rx::{RSV_LENGTH, RXSTART_INIT, RxHeader, TXSTART_INIT}
};
use crate::{config::MAX_FRAMELEN, error::EncError};

/// Result type for chip operations over bus `B`.
pub type ChipResult<T, B> = Result<T, EncError<<B as Bus>::Error>>;

/// Low level access to an ENC28J60 over a [`Bus`].
pub struct Chip<B: Bus> {
	bus: B,
	/// Bank currently selected in ECON1, as far as we know.
	bank: Bank,
	/// Buffer memory address of the next frame to receive.
	next_packet_ptr: u16
}

impl<B: Bus> Chip<B> {
	/// Wraps a bus. Does not touch the hardware.
	pub fn new(bus: B) -> Self {
		Self {
			bus,
			bank: Bank::Bank0,
			next_packet_ptr: RXSTART_INIT
		}
	}

	/// Gives back the bus.
	pub fn release(self) -> B {
		self.bus
	}

	/// Bank the driver believes is selected.
	pub fn selected_bank(&self) -> Bank {
		self.bank
	}

	/// Buffer memory address the next received frame will be read from.
	pub fn next_packet_ptr(&self) -> u16 {
		self.next_packet_ptr
	}

	pub fn delay_us(&mut self, us: u32) {
		self.bus.delay_us(us);
	}

	/// Issues the soft reset command. All registers, and so the bank select,
	/// return to their defaults.
	pub fn soft_reset(&mut self) -> ChipResult<(), B> {
		self.frame(|bus| bus.transfer(opcode::SOFT_RESET).map(drop))?;
		self.bank = Bank::Bank0;
		self.next_packet_ptr = RXSTART_INIT;
		Ok(())
	}

	/// Reads a control register, selecting its bank first if needed.
	pub fn read_register(&mut self, reg: Register) -> ChipResult<u8, B> {
		self.select_bank_for(reg)?;
		self.read_op(opcode::READ_CTRL_REG, reg)
	}

	/// Writes a control register, selecting its bank first if needed.
	pub fn write_register(&mut self, reg: Register, value: u8) -> ChipResult<(), B> {
		self.select_bank_for(reg)?;
		self.write_op(opcode::WRITE_CTRL_REG, reg.address(), value)
	}

	/// Writes a 16-bit value into a low / high register pair.
	pub fn write_register_pair(&mut self, low: Register, high: Register, value: u16) -> ChipResult<(), B> {
		let [lo, hi] = value.to_le_bytes();
		self.write_register(low, lo)?;
		self.write_register(high, hi)
	}

	/// Sets `mask` bits in a register. MAC / MII registers have no bit field
	/// opcodes, so they get a read-modify-write.
	pub fn set_bits(&mut self, reg: Register, mask: u8) -> ChipResult<(), B> {
		self.select_bank_for(reg)?;
		if reg.bit_field_ops() {
			self.write_op(opcode::BIT_FIELD_SET, reg.address(), mask)
		} else {
			let value = self.read_op(opcode::READ_CTRL_REG, reg)?;
			self.write_op(opcode::WRITE_CTRL_REG, reg.address(), value | mask)
		}
	}

	/// Clears `mask` bits in a register.
	pub fn clear_bits(&mut self, reg: Register, mask: u8) -> ChipResult<(), B> {
		self.select_bank_for(reg)?;
		if reg.bit_field_ops() {
			self.write_op(opcode::BIT_FIELD_CLR, reg.address(), mask)
		} else {
			let value = self.read_op(opcode::READ_CTRL_REG, reg)?;
			self.write_op(opcode::WRITE_CTRL_REG, reg.address(), value & !mask)
		}
	}

	/// Switches ECON1.BSEL to `bank` unless it is already selected.
	pub fn select_bank(&mut self, bank: Bank) -> ChipResult<(), B> {
		if bank == self.bank {
			return Ok(());
		}

		let bsel = (Econ1::BSEL1 | Econ1::BSEL0).bits();
		self.write_op(opcode::BIT_FIELD_CLR, regs::ECON1.address(), bsel)?;
		self.write_op(opcode::BIT_FIELD_SET, regs::ECON1.address(), bank.bsel())?;
		self.bank = bank;
		Ok(())
	}

	fn select_bank_for(&mut self, reg: Register) -> ChipResult<(), B> {
		match reg.bank() {
			Some(bank) => self.select_bank(bank),
			None => Ok(())
		}
	}

	/// Streams `data` into buffer memory at EWRPT.
	pub fn write_buffer(&mut self, data: &[u8]) -> ChipResult<(), B> {
		self.frame(|bus| {
			bus.transfer(opcode::WRITE_BUF_MEM)?;
			for &byte in data {
				bus.transfer(byte)?;
			}
			Ok(())
		})
	}

	/// Fills `data` from buffer memory at ERDPT.
	pub fn read_buffer(&mut self, data: &mut [u8]) -> ChipResult<(), B> {
		self.frame(|bus| {
			bus.transfer(opcode::READ_BUF_MEM)?;
			for byte in data.iter_mut() {
				*byte = bus.transfer(0x00)?;
			}
			Ok(())
		})
	}

	/// Writes a PHY register and waits for the MII write to finish.
	///
	/// There is no timeout: if MISTAT.BUSY never clears the chip is dead and
	/// this call never returns.
	pub fn write_phy_register(&mut self, addr: u8, value: u16) -> ChipResult<(), B> {
		self.write_register(regs::MIREGADR, addr)?;
		self.write_register_pair(regs::MIWRL, regs::MIWRH, value)?;
		self.wait_mii_idle()
	}

	/// Reads a PHY register through the MII interface.
	pub fn read_phy_register(&mut self, addr: u8) -> ChipResult<u16, B> {
		self.write_register(regs::MIREGADR, addr)?;
		self.write_register(regs::MICMD, Micmd::MIIRD.bits())?;
		self.wait_mii_idle()?;
		self.write_register(regs::MICMD, 0x00)?;

		let lo = self.read_register(regs::MIRDL)?;
		let hi = self.read_register(regs::MIRDH)?;
		Ok(u16::from_le_bytes([lo, hi]))
	}

	fn wait_mii_idle(&mut self) -> ChipResult<(), B> {
		while Mistat::from_bits_truncate(self.read_register(regs::MISTAT)?).contains(Mistat::BUSY) {
			self.bus.delay_us(1);
		}
		Ok(())
	}

	/// Pulls the next queued frame out of the receive ring into `out`.
	///
	/// Returns 0 when nothing is queued, or when the frame failed its CRC
	/// check. A bad frame is still consumed so it cannot stall the ring.
	pub fn receive_frame(&mut self, out: &mut [u8]) -> ChipResult<usize, B> {
		// EIR.PKTIF is unreliable (Rev. B4 silicon errata #6), EPKTCNT is not.
		if self.read_register(regs::EPKTCNT)? == 0 {
			return Ok(0);
		}

		// point the read pointer at the start of the received packet
		self.write_register_pair(regs::ERDPTL, regs::ERDPTH, self.next_packet_ptr)?;

		let mut raw = [0u8; RSV_LENGTH];
		self.read_buffer(&mut raw)?;
		let header = RxHeader::parse(&raw);
		self.next_packet_ptr = header.next_packet();

		let len = header.frame_length().min(out.len().saturating_sub(1));
		let len = if header.received_ok() {
			self.read_buffer(&mut out[..len])?;
			len
		} else {
			warn!("[ENC] dropping frame with bad CRC, status={:#06x}", header.status());
			0
		};

		// freeing the ring space has to happen before the count is decremented
		self.write_register_pair(regs::ERXRDPTL, regs::ERXRDPTH, self.next_packet_ptr)?;
		self.set_bits(regs::ECON2, Econ2::PKTDEC.bits())?;

		trace!("[ENC] received {} bytes, next frame at {:#06x}", len, self.next_packet_ptr);
		Ok(len)
	}

	/// Copies `frame` into the transmit region and starts transmission.
	pub fn send_frame(&mut self, frame: &[u8]) -> ChipResult<(), B> {
		if frame.len() > MAX_FRAMELEN {
			return Err(EncError::FrameTooLarge {
				len: frame.len(),
				max: MAX_FRAMELEN
			});
		}

		self.write_register_pair(regs::EWRPTL, regs::EWRPTH, TXSTART_INIT)?;
		// the control byte sits at TXSTART, so the frame ends at TXSTART + len
		self.write_register_pair(regs::ETXNDL, regs::ETXNDH, TXSTART_INIT + frame.len() as u16)?;

		// per packet control byte: 0x00 means use the MACON3 settings
		self.write_buffer(&[0x00])?;
		self.write_buffer(frame)?;

		self.set_bits(regs::ECON1, Econ1::TXRTS.bits())?;

		// transmit logic can hang after an error (Rev. B4 silicon errata #12)
		if Eir::from_bits_truncate(self.read_register(regs::EIR)?).contains(Eir::TXERIF) {
			warn!("[ENC] transmit error, resetting TXRTS");
			self.clear_bits(regs::ECON1, Econ1::TXRTS.bits())?;
		}

		trace!("[ENC] sent {} bytes", frame.len());
		Ok(())
	}

	fn read_op(&mut self, op: u8, reg: Register) -> ChipResult<u8, B> {
		let dummy = reg.dummy_read();
		self.frame(|bus| {
			bus.transfer(op | reg.address())?;
			if dummy {
				bus.transfer(0x00)?;
			}
			bus.transfer(0x00)
		})
	}

	fn write_op(&mut self, op: u8, addr: u8, data: u8) -> ChipResult<(), B> {
		self.frame(|bus| {
			bus.transfer(op | (addr & regs::ADDR_MASK))?;
			bus.transfer(data).map(drop)
		})
	}

	/// Runs `f` between chip select assert and release. Chip select is
	/// released even when a transfer fails.
	fn frame<T>(&mut self, f: impl FnOnce(&mut B) -> Result<T, B::Error>) -> ChipResult<T, B> {
		self.bus.select().map_err(EncError::Bus)?;
		let result = f(&mut self.bus);
		let released = self.bus.deselect();
		let value = result.map_err(EncError::Bus)?;
		released.map_err(EncError::Bus)?;
		Ok(value)
	}
}
