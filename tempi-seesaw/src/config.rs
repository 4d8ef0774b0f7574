//! Device configuration
//!
//! Timing values are empirical. The vendor libraries use a 250µs standard
//! delay, which turned out to be too short for reliable register reads.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::registers::DEFAULT_ADDRESS;

/// Seesaw device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SeesawConfig {
    /// 7-bit I2C address
    pub address: u8,
    /// Delay between command and data phase for single-register reads (µs)
    pub standard_delay_us: u32,
    /// Time the firmware needs to reboot after a soft reset (ms)
    pub reset_settle_ms: u32,
    /// Identity polls after reset before giving up
    pub reset_attempts: u8,
    /// Pause between identity polls (ms)
    pub reset_retry_delay_ms: u32,
}

impl Default for SeesawConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            standard_delay_us: 100_000, // 100ms
            reset_settle_ms: 1_000,
            reset_attempts: 20,
            reset_retry_delay_ms: 20,
        }
    }
}

impl SeesawConfig {
    /// Default configuration at a different address
    pub const fn at_address(address: u8) -> Self {
        Self {
            address,
            standard_delay_us: 100_000,
            reset_settle_ms: 1_000,
            reset_attempts: 20,
            reset_retry_delay_ms: 20,
        }
    }
}
