//! Key events as stored in the keypad FIFO
//!
//! ```text
//! bit:   7 6 5 4 3 2 | 1 0
//!        key index   | edge
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Key edge / level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Edge {
    /// Key is held down
    #[default]
    High = 0,
    /// Key is up
    Low = 1,
    /// Key was pressed
    Falling = 2,
    /// Key was released
    Rising = 3,
}

impl Edge {
    /// Decode the low two bits of an event byte
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Edge::High,
            1 => Edge::Low,
            2 => Edge::Falling,
            _ => Edge::Rising,
        }
    }

    /// Bit mask used when configuring which edges a key reports
    pub const fn mask(self) -> u8 {
        1 << self as u8
    }
}

/// A pressed or released key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent(u8);

impl KeyEvent {
    /// Decode a raw FIFO byte
    pub const fn decode(byte: u8) -> Self {
        Self(byte)
    }

    /// Raw FIFO byte
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Which edge the key reported
    pub const fn edge(self) -> Edge {
        Edge::from_bits(self.0)
    }

    /// Key index (0-63)
    pub const fn key(self) -> u8 {
        self.0 >> 2
    }
}
