//! Seesaw register map
//!
//! The seesaw firmware uses a two-byte register addressing scheme:
//! - Byte 1: Module base address
//! - Byte 2: Function address within the module
//!
//! Every transaction starts with this pair. Only the registers used by the
//! Tempi drivers are listed here.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Address pair identifying a logical register inside the peripheral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Register {
    /// Module base address
    pub module: u8,
    /// Function address within the module
    pub function: u8,
}

impl Register {
    /// Create a register address pair
    pub const fn new(module: u8, function: u8) -> Self {
        Self { module, function }
    }

    /// The 2-byte command prefix sent ahead of every transaction
    pub const fn prefix(self) -> [u8; 2] {
        [self.module, self.function]
    }
}

/// Status module
pub mod status {
    use super::Register;

    /// Module base address
    pub const MODULE: u8 = 0x00;

    /// Hardware identity byte (see [`HardwareId`](super::HardwareId))
    pub const HW_ID: Register = Register::new(MODULE, 0x01);
    /// Product and firmware date code (32-bit)
    pub const VERSION: Register = Register::new(MODULE, 0x02);
    /// Die temperature, 16.16 fixed point °C (32-bit)
    pub const TEMP: Register = Register::new(MODULE, 0x04);
    /// Software reset (write-only)
    pub const SWRST: Register = Register::new(MODULE, 0x7F);

    /// Value written to [`SWRST`] to trigger a reset
    pub const SWRST_VALUE: u8 = 0xFF;
}

/// NeoPixel module
pub mod neopixel {
    use super::Register;

    /// Module base address
    pub const MODULE: u8 = 0x0E;

    /// Output pin
    pub const PIN: Register = Register::new(MODULE, 0x01);
    /// Protocol speed (400 kHz / 800 kHz)
    pub const SPEED: Register = Register::new(MODULE, 0x02);
    /// Device-side buffer length in bytes (16-bit big-endian)
    pub const BUF_LENGTH: Register = Register::new(MODULE, 0x03);
    /// Buffer data, prefixed with a 16-bit big-endian byte offset
    pub const BUF: Register = Register::new(MODULE, 0x04);
    /// Latch the buffer out to the strip
    pub const SHOW: Register = Register::new(MODULE, 0x05);
}

/// Capacitive touch module
pub mod touch {
    use super::Register;

    /// Module base address
    pub const MODULE: u8 = 0x0F;

    /// First touch channel (16-bit big-endian reading)
    pub const CHANNEL_OFFSET: Register = Register::new(MODULE, 0x10);
}

/// Keypad module
pub mod keypad {
    use super::Register;

    /// Module base address
    pub const MODULE: u8 = 0x10;

    /// Per-key edge configuration
    pub const EVENT: Register = Register::new(MODULE, 0x01);
    /// Interrupt enable (write-only)
    pub const INTENSET: Register = Register::new(MODULE, 0x02);
    /// Interrupt disable (write-only)
    pub const INTENCLR: Register = Register::new(MODULE, 0x03);
    /// Number of pending events in the FIFO
    pub const COUNT: Register = Register::new(MODULE, 0x04);
    /// Event FIFO
    pub const FIFO: Register = Register::new(MODULE, 0x10);
}

// ---------------------------------------------------------------------------
// Protocol constants
// ---------------------------------------------------------------------------

/// Default I2C address of a seesaw breakout
pub const DEFAULT_ADDRESS: u8 = 0x49;

/// Largest payload accepted in a single write, excluding the address pair
pub const MAX_PAYLOAD_SIZE: usize = 32;

/// Hardware identity reported by the status module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HardwareId {
    /// SAMD09 based boards
    Samd09,
    /// ATtiny816/817 based boards
    Tiny8x7,
}

impl HardwareId {
    /// Decode the identity byte, `None` for unsupported silicon
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x55 => Some(HardwareId::Samd09),
            0x87 => Some(HardwareId::Tiny8x7),
            _ => None,
        }
    }

    /// Raw identity byte
    pub fn as_byte(self) -> u8 {
        match self {
            HardwareId::Samd09 => 0x55,
            HardwareId::Tiny8x7 => 0x87,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_prefix() {
        assert_eq!(status::SWRST.prefix(), [0x00, 0x7F]);
        assert_eq!(neopixel::BUF.prefix(), [0x0E, 0x04]);
        assert_eq!(keypad::FIFO.prefix(), [0x10, 0x10]);
    }

    #[test]
    fn test_hardware_id() {
        assert_eq!(HardwareId::from_byte(0x55), Some(HardwareId::Samd09));
        assert_eq!(HardwareId::from_byte(0x87), Some(HardwareId::Tiny8x7));
        assert_eq!(HardwareId::from_byte(0x00), None);
        assert_eq!(HardwareId::from_byte(0xFF), None);

        for id in [HardwareId::Samd09, HardwareId::Tiny8x7] {
            assert_eq!(HardwareId::from_byte(id.as_byte()), Some(id));
        }
    }
}
