//!
//! error.rs
//!
//! Error types for the ENC28J60 driver.
//!

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors rejected while validating a [`Config`](crate::config::Config).
pub enum ConfigError {
	/// The frame buffer cannot hold the smallest frame we answer.
	#[error("frame buffer of {size} bytes is below the minimum of {min}")]
	BufferTooSmall { size: usize, min: usize }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// A enum representing all driver errors, generic over the bus error `E`.
pub enum EncError<E> {
	/// --- Serial Bus Errors --- ///
	#[error("serial bus transfer failed: {0:?}")]
	Bus(E),

	/// --- Frame Errors --- ///
	#[error("frame of {len} bytes exceeds the {max} byte transmit region")]
	FrameTooLarge { len: usize, max: usize },

	/// --- Configuration Errors --- ///
	#[error("invalid configuration: {0}")]
	Config(ConfigError)
}

impl<E> From<ConfigError> for EncError<E> {
	fn from(err: ConfigError) -> Self {
		EncError::Config(err)
	}
}
