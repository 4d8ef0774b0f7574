//! Error types for the seesaw protocol core

use core::fmt;

/// Errors that can occur when talking to a seesaw peripheral
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SeesawError<E> {
    /// Underlying bus transaction failed
    Bus(E),

    /// Write payload does not fit in a single transaction
    PayloadTooLarge {
        /// Requested payload length
        len: usize,
        /// Largest accepted payload
        max: usize,
    },

    /// Sending the soft-reset command failed
    SoftReset(E),

    /// The peripheral did not come back with a known identity after reset
    HandshakeFailed {
        /// Number of identity polls performed
        attempts: u8,
        /// Cause of the final failed poll
        last: HandshakeFault<E>,
    },
}

/// Why a single identity poll failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandshakeFault<E> {
    /// Reading the identity register failed
    Bus(E),
    /// The identity byte is not one of the supported silicon revisions
    UnknownHardwareId(u8),
}

// Allow ergonomic `?` propagation from raw bus errors.
impl<E> From<E> for SeesawError<E> {
    fn from(error: E) -> Self {
        SeesawError::Bus(error)
    }
}

impl<E: fmt::Debug> fmt::Display for HandshakeFault<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandshakeFault::Bus(e) => write!(f, "bus error: {:?}", e),
            HandshakeFault::UnknownHardwareId(id) => write!(f, "unknown hardware ID: {:#04x}", id),
        }
    }
}

impl<E: fmt::Debug> fmt::Display for SeesawError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeesawError::Bus(e) => write!(f, "bus error: {:?}", e),
            SeesawError::PayloadTooLarge { len, max } => {
                write!(f, "payload too large: {} > {} bytes", len, max)
            }
            SeesawError::SoftReset(e) => write!(f, "failed sending soft-reset command: {:?}", e),
            SeesawError::HandshakeFailed { attempts, last } => write!(
                f,
                "device did not start after {} attempts: {}",
                attempts, last
            ),
        }
    }
}
