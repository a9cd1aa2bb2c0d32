//!
//! drivers/mod.rs
//!
//! Hardware drivers.
//!

pub mod enc28j60;
