//!
//! bus.rs
//!
//! The serial command bus the ENC28J60 hangs off, and an adapter over embedded-hal.
//!

use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};
use thiserror::Error;

/// Byte-serial access to the chip: chip select framing, single byte
/// exchanges and a microsecond delay.
pub trait Bus {
	/// Error raised by a failed transfer.
	type Error: core::fmt::Debug;

	/// Asserts chip select, opening a command frame.
	fn select(&mut self) -> Result<(), Self::Error>;
	/// Releases chip select, closing the command frame.
	fn deselect(&mut self) -> Result<(), Self::Error>;
	/// Clocks `byte` out and returns the byte clocked in.
	fn transfer(&mut self, byte: u8) -> Result<u8, Self::Error>;
	/// Busy-waits for `us` microseconds.
	fn delay_us(&mut self, us: u32);
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors raised by [`HalBus`].
pub enum HalBusError<S, P> {
	#[error("spi error: {0:?}")]
	Spi(S),
	#[error("chip select pin error: {0:?}")]
	ChipSelect(P)
}

/// [`Bus`] over an exclusively owned embedded-hal SPI bus, an active-low
/// chip select pin and a delay provider.
pub struct HalBus<SPI, CS, D> {
	spi: SPI,
	cs: CS,
	delay: D
}

impl<SPI, CS, D> HalBus<SPI, CS, D>
where
	SPI: SpiBus<u8>,
	CS: OutputPin,
	D: DelayNs
{
	/// Creates a new `HalBus`. Chip select is driven high (idle) straight away.
	pub fn new(spi: SPI, mut cs: CS, delay: D) -> Result<Self, HalBusError<SPI::Error, CS::Error>> {
		cs.set_high().map_err(HalBusError::ChipSelect)?;
		Ok(Self {
			spi,
			cs,
			delay
		})
	}

	/// Gives back the peripherals.
	pub fn release(self) -> (SPI, CS, D) {
		(self.spi, self.cs, self.delay)
	}
}

impl<SPI, CS, D> Bus for HalBus<SPI, CS, D>
where
	SPI: SpiBus<u8>,
	CS: OutputPin,
	D: DelayNs
{
	type Error = HalBusError<SPI::Error, CS::Error>;

	fn select(&mut self) -> Result<(), Self::Error> {
		self.cs.set_low().map_err(HalBusError::ChipSelect)
	}

	fn deselect(&mut self) -> Result<(), Self::Error> {
		// the last byte must be off the wire before CS goes high
		self.spi.flush().map_err(HalBusError::Spi)?;
		self.cs.set_high().map_err(HalBusError::ChipSelect)
	}

	fn transfer(&mut self, byte: u8) -> Result<u8, Self::Error> {
		let mut word = [byte];
		self.spi
			.transfer_in_place(&mut word)
			.map_err(HalBusError::Spi)?;
		Ok(word[0])
	}

	fn delay_us(&mut self, us: u32) {
		self.delay.delay_us(us);
	}
}
