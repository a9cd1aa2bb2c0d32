//!
//! regs.rs
//!
//! ENC28J60 register map, SPI opcodes and register bit definitions.
//! Addresses and bit positions follow the ENC28J60 data sheet (DS39662).
//!

use bitflags::bitflags;

/// Low five bits of an opcode carry the register address.
pub const ADDR_MASK: u8 = 0x1F;

/// SPI operation codes.
pub mod opcode {
	/// Read Control Register
	pub const READ_CTRL_REG: u8 = 0x00;
	/// Read Buffer Memory
	pub const READ_BUF_MEM: u8 = 0x3A;
	/// Write Control Register
	pub const WRITE_CTRL_REG: u8 = 0x40;
	/// Write Buffer Memory
	pub const WRITE_BUF_MEM: u8 = 0x7A;
	/// Bit Field Set
	pub const BIT_FIELD_SET: u8 = 0x80;
	/// Bit Field Clear
	pub const BIT_FIELD_CLR: u8 = 0xA0;
	/// System Reset Command (Soft Reset)
	pub const SOFT_RESET: u8 = 0xFF;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
/// One of the four pages of the control register space.
pub enum Bank {
	Bank0 = 0,
	Bank1 = 1,
	Bank2 = 2,
	Bank3 = 3
}

impl Bank {
	/// Value of the ECON1.BSEL1:BSEL0 field selecting this bank.
	pub const fn bsel(self) -> u8 {
		self as u8
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A control register of the ENC28J60.
pub enum Register {
	/// Mapped into every bank (0x1B..=0x1F).
	Common(u8),
	/// ETH register, lives in a single bank.
	Eth(Bank, u8),
	/// MAC or MII register. The chip shifts out a dummy byte before the data on reads.
	MacMii(Bank, u8)
}

/// How a register is reached over the bus.
pub trait RegisterAccess {
	/// 5-bit address inside the bank.
	fn address(&self) -> u8;
	/// Bank that must be selected first, `None` when reachable from any bank.
	fn bank(&self) -> Option<Bank>;
	/// Whether a read returns a dummy byte before the register value.
	fn dummy_read(&self) -> bool;
	/// Whether the BFS / BFC opcodes operate on this register.
	fn bit_field_ops(&self) -> bool;

	/// Bytes exchanged under one chip-select for a read, opcode included.
	fn read_width(&self) -> usize {
		if self.dummy_read() { 3 } else { 2 }
	}
}

impl RegisterAccess for Register {
	fn address(&self) -> u8 {
		match *self {
			Register::Common(addr) | Register::Eth(_, addr) | Register::MacMii(_, addr) => {
				addr & ADDR_MASK
			}
		}
	}

	fn bank(&self) -> Option<Bank> {
		match *self {
			Register::Common(_) => None,
			Register::Eth(bank, _) | Register::MacMii(bank, _) => Some(bank)
		}
	}

	fn dummy_read(&self) -> bool {
		matches!(self, Register::MacMii(..))
	}

	fn bit_field_ops(&self) -> bool {
		!self.dummy_read()
	}
}

// All-bank registers
pub const EIE: Register = Register::Common(0x1B);
pub const EIR: Register = Register::Common(0x1C);
pub const ESTAT: Register = Register::Common(0x1D);
pub const ECON2: Register = Register::Common(0x1E);
pub const ECON1: Register = Register::Common(0x1F);

// Bank 0 registers
pub const ERDPTL: Register = Register::Eth(Bank::Bank0, 0x00);
pub const ERDPTH: Register = Register::Eth(Bank::Bank0, 0x01);
pub const EWRPTL: Register = Register::Eth(Bank::Bank0, 0x02);
pub const EWRPTH: Register = Register::Eth(Bank::Bank0, 0x03);
pub const ETXSTL: Register = Register::Eth(Bank::Bank0, 0x04);
pub const ETXSTH: Register = Register::Eth(Bank::Bank0, 0x05);
pub const ETXNDL: Register = Register::Eth(Bank::Bank0, 0x06);
pub const ETXNDH: Register = Register::Eth(Bank::Bank0, 0x07);
pub const ERXSTL: Register = Register::Eth(Bank::Bank0, 0x08);
pub const ERXSTH: Register = Register::Eth(Bank::Bank0, 0x09);
pub const ERXNDL: Register = Register::Eth(Bank::Bank0, 0x0A);
pub const ERXNDH: Register = Register::Eth(Bank::Bank0, 0x0B);
pub const ERXRDPTL: Register = Register::Eth(Bank::Bank0, 0x0C);
pub const ERXRDPTH: Register = Register::Eth(Bank::Bank0, 0x0D);
pub const ERXWRPTL: Register = Register::Eth(Bank::Bank0, 0x0E);
pub const ERXWRPTH: Register = Register::Eth(Bank::Bank0, 0x0F);

// Bank 1 registers
pub const EPMM0: Register = Register::Eth(Bank::Bank1, 0x08);
pub const EPMM1: Register = Register::Eth(Bank::Bank1, 0x09);
pub const EPMCSL: Register = Register::Eth(Bank::Bank1, 0x10);
pub const EPMCSH: Register = Register::Eth(Bank::Bank1, 0x11);
pub const EPMOL: Register = Register::Eth(Bank::Bank1, 0x14);
pub const EPMOH: Register = Register::Eth(Bank::Bank1, 0x15);
pub const ERXFCON: Register = Register::Eth(Bank::Bank1, 0x18);
pub const EPKTCNT: Register = Register::Eth(Bank::Bank1, 0x19);

// Bank 2 registers
pub const MACON1: Register = Register::MacMii(Bank::Bank2, 0x00);
pub const MACON3: Register = Register::MacMii(Bank::Bank2, 0x02);
pub const MACON4: Register = Register::MacMii(Bank::Bank2, 0x03);
pub const MABBIPG: Register = Register::MacMii(Bank::Bank2, 0x04);
pub const MAIPGL: Register = Register::MacMii(Bank::Bank2, 0x06);
pub const MAIPGH: Register = Register::MacMii(Bank::Bank2, 0x07);
pub const MAMXFLL: Register = Register::MacMii(Bank::Bank2, 0x0A);
pub const MAMXFLH: Register = Register::MacMii(Bank::Bank2, 0x0B);
pub const MICMD: Register = Register::MacMii(Bank::Bank2, 0x12);
pub const MIREGADR: Register = Register::MacMii(Bank::Bank2, 0x14);
pub const MIWRL: Register = Register::MacMii(Bank::Bank2, 0x16);
pub const MIWRH: Register = Register::MacMii(Bank::Bank2, 0x17);
pub const MIRDL: Register = Register::MacMii(Bank::Bank2, 0x18);
pub const MIRDH: Register = Register::MacMii(Bank::Bank2, 0x19);
// MACON2 is gone from rev B silicon onwards but clearing it is harmless.
pub const MACON2: Register = Register::MacMii(Bank::Bank2, 0x01);

// Bank 3 registers
// NOTE: MAADR0..5 are numbered backwards relative to the byte order on the wire.
pub const MAADR1: Register = Register::MacMii(Bank::Bank3, 0x00);
pub const MAADR0: Register = Register::MacMii(Bank::Bank3, 0x01);
pub const MAADR3: Register = Register::MacMii(Bank::Bank3, 0x02);
pub const MAADR2: Register = Register::MacMii(Bank::Bank3, 0x03);
pub const MAADR5: Register = Register::MacMii(Bank::Bank3, 0x04);
pub const MAADR4: Register = Register::MacMii(Bank::Bank3, 0x05);
pub const MISTAT: Register = Register::MacMii(Bank::Bank3, 0x0A);
pub const EREVID: Register = Register::Eth(Bank::Bank3, 0x12);

/// MAADR registers in the order the hardware address bytes are written.
pub const MAADR_WIRE_ORDER: [Register; 6] = [MAADR5, MAADR4, MAADR3, MAADR2, MAADR1, MAADR0];

/// PHY registers, reached through MIREGADR.
pub mod phy {
	pub const PHCON1: u8 = 0x00;
	pub const PHSTAT1: u8 = 0x01;
	pub const PHHID1: u8 = 0x02;
	pub const PHHID2: u8 = 0x03;
	pub const PHCON2: u8 = 0x10;
	pub const PHSTAT2: u8 = 0x11;
	pub const PHIE: u8 = 0x12;
	pub const PHIR: u8 = 0x13;
	pub const PHLCON: u8 = 0x14;
}

bitflags! {
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	/// ERXFCON: receive filter control
	pub struct Erxfcon: u8 {
		const UCEN = 0x80;
		const ANDOR = 0x40;
		const CRCEN = 0x20;
		const PMEN = 0x10;
		const MPEN = 0x08;
		const HTEN = 0x04;
		const MCEN = 0x02;
		const BCEN = 0x01;
	}

	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	/// EIE: interrupt enable
	pub struct Eie: u8 {
		const INTIE = 0x80;
		const PKTIE = 0x40;
		const DMAIE = 0x20;
		const LINKIE = 0x10;
		const TXIE = 0x08;
		const WOLIE = 0x04;
		const TXERIE = 0x02;
		const RXERIE = 0x01;
	}

	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	/// EIR: interrupt flags
	pub struct Eir: u8 {
		const PKTIF = 0x40;
		const DMAIF = 0x20;
		const LINKIF = 0x10;
		const TXIF = 0x08;
		const WOLIF = 0x04;
		const TXERIF = 0x02;
		const RXERIF = 0x01;
	}

	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	/// ESTAT: ethernet status
	pub struct Estat: u8 {
		const INT = 0x80;
		const LATECOL = 0x10;
		const RXBUSY = 0x04;
		const TXABRT = 0x02;
		const CLKRDY = 0x01;
	}

	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	/// ECON2: ethernet control 2
	pub struct Econ2: u8 {
		const AUTOINC = 0x80;
		const PKTDEC = 0x40;
		const PWRSV = 0x20;
		const VRPS = 0x08;
	}

	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	/// ECON1: ethernet control 1
	pub struct Econ1: u8 {
		const TXRST = 0x80;
		const RXRST = 0x40;
		const DMAST = 0x20;
		const CSUMEN = 0x10;
		const TXRTS = 0x08;
		const RXEN = 0x04;
		const BSEL1 = 0x02;
		const BSEL0 = 0x01;
	}

	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	/// MACON1: MAC control 1
	pub struct Macon1: u8 {
		const LOOPBK = 0x10;
		const TXPAUS = 0x08;
		const RXPAUS = 0x04;
		const PASSALL = 0x02;
		const MARXEN = 0x01;
	}

	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	/// MACON3: MAC control 3
	pub struct Macon3: u8 {
		const PADCFG2 = 0x80;
		const PADCFG1 = 0x40;
		const PADCFG0 = 0x20;
		const TXCRCEN = 0x10;
		const PHDRLEN = 0x08;
		const HFRMLEN = 0x04;
		const FRMLNEN = 0x02;
		const FULDPX = 0x01;
	}

	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	/// MICMD: MII command
	pub struct Micmd: u8 {
		const MIISCAN = 0x02;
		const MIIRD = 0x01;
	}

	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	/// MISTAT: MII status
	pub struct Mistat: u8 {
		const NVALID = 0x04;
		const SCAN = 0x02;
		const BUSY = 0x01;
	}

	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	/// PHCON1: PHY control 1
	pub struct Phcon1: u16 {
		const PRST = 0x8000;
		const PLOOPBK = 0x4000;
		const PPWRSV = 0x0800;
		const PDPXMD = 0x0100;
	}

	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	/// PHCON2: PHY control 2
	pub struct Phcon2: u16 {
		const FRCLINK = 0x4000;
		const TXDIS = 0x2000;
		const JABBER = 0x0400;
		const HDLDIS = 0x0100;
	}

	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	/// PHSTAT2: PHY status 2
	pub struct Phstat2: u16 {
		const TXSTAT = 0x2000;
		const RXSTAT = 0x1000;
		const COLSTAT = 0x0800;
		const LSTAT = 0x0400;
		const DPXSTAT = 0x0200;
		const PLRITY = 0x0010;
	}
}
