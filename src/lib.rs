// lib.rs

/*
ENC28J60 Ethernet driver with a minimal ARP / ICMP echo responder.

The driver owns the chip and a single frame buffer. Each interrupt from the
chip drains its receive ring through `Enc28j60::update`, answering ARP
requests and pings for the configured address in place and dropping
everything else.
*/

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod drivers;
pub mod error;
pub mod irq;
pub mod net;

pub use crate::{
	config::Config,
	drivers::enc28j60::{
		Enc28j60,
		bus::{Bus, HalBus, HalBusError}
	},
	error::{ConfigError, EncError},
	irq::EventLatch
};
