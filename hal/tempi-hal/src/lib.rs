//! Tempi Hardware Abstraction Layer
//!
//! This crate defines the transport and timing traits the seesaw protocol
//! core is written against. Platform crates (or the adapters in this crate)
//! implement them, so the same driver code runs on a microcontroller or on a
//! Linux host with an I2C character device.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  tempi-drivers (soil, neopixel, keypad) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tempi-seesaw (register protocol core)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tempi-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - Blocking two-wire bus transactions
//! - [`time::Monotonic`] - Microsecond wall clock for rate limiting
//!
//! Sleeping goes through [`embedded_hal::delay::DelayNs`].
//!
//! # Features
//!
//! - **`std`** - [`time::StdDelay`] and [`time::StdClock`] for host programs
//! - **`defmt`** - `defmt::Format` on error types

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod i2c;
pub mod time;

// Re-export key traits at crate root for convenience
pub use embedded_hal::delay::DelayNs;
pub use i2c::{EmbeddedHalBus, I2cBus, I2cBusError};
pub use time::Monotonic;

#[cfg(feature = "std")]
pub use time::{StdClock, StdDelay};
