//! Register protocol core for Adafruit seesaw co-processors
//!
//! Seesaw is firmware running on a small SAMD09 or ATtiny8x7 that exposes
//! GPIO, ADC, capacitive touch, NeoPixel and keypad functions as registers
//! over I2C. This crate implements the addressed register protocol on top of
//! [`tempi_hal::I2cBus`]:
//!
//! - [`registers`] - Address pairs and protocol constants
//! - [`SeesawDevice`] - Device handle: register reads/writes, reset handshake
//! - [`Seesaw`] - The read/write capability every driver depends on
//!
//! # Wire format
//!
//! ```text
//! write:  [MODULE][FUNCTION][PAYLOAD ...]          one transaction
//! read:   [MODULE][FUNCTION]  ~settle~  [DATA ...]  two transactions
//! ```
//!
//! # Quick start
//!
//! ```ignore
//! use tempi_seesaw::{registers::status, SeesawDevice};
//!
//! // `bus` implements `tempi_hal::I2cBus`, `delay` implements `DelayNs`
//! let mut dev = SeesawDevice::new(bus, delay);
//! let hw = dev.reset()?;
//! let id = dev.read_register(status::HW_ID)?;
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod device;
pub mod error;
pub mod registers;

pub use config::SeesawConfig;
pub use device::{ResetState, SeesawDevice, Version};
pub use error::{HandshakeFault, SeesawError};
pub use registers::{HardwareId, Register, DEFAULT_ADDRESS, MAX_PAYLOAD_SIZE};

/// Register read/write capability of a seesaw peripheral
///
/// Drivers are written against this trait instead of a concrete device, so
/// anything that can perform the two operations works, including test
/// doubles.
pub trait Seesaw {
    /// Error type for register operations
    type Error;

    /// Read `buf.len()` bytes from `register`, waiting `delay_us` between
    /// sending the address pair and reading the data.
    ///
    /// The delay is specific to the module and function being read.
    fn read(&mut self, register: Register, buf: &mut [u8], delay_us: u32) -> Result<(), Self::Error>;

    /// Write `data` to `register` in a single transaction
    fn write(&mut self, register: Register, data: &[u8]) -> Result<(), Self::Error>;
}

impl<T: Seesaw + ?Sized> Seesaw for &mut T {
    type Error = T::Error;

    fn read(&mut self, register: Register, buf: &mut [u8], delay_us: u32) -> Result<(), Self::Error> {
        T::read(self, register, buf, delay_us)
    }

    fn write(&mut self, register: Register, data: &[u8]) -> Result<(), Self::Error> {
        T::write(self, register, data)
    }
}
