//! Seesaw device handle
//!
//! Owns the bus and a delay provider and implements the two-phase register
//! protocol:
//!
//! 1. Write the 2-byte address pair
//! 2. Wait for the firmware to prepare the answer (settle delay)
//! 3. Read the response in a second, read-only transaction
//!
//! Writes carry the address pair and payload in one transaction.
//!
//! The handle is not shareable. A second caller interleaving transactions
//! between the command and data phase would read the wrong answer, so the
//! handle is owned by exactly one driver.

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use tempi_hal::I2cBus;

use crate::config::SeesawConfig;
use crate::error::{HandshakeFault, SeesawError};
use crate::registers::{status, HardwareId, Register, MAX_PAYLOAD_SIZE};
use crate::Seesaw;

/// Reset handshake progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetState {
    /// No reset performed yet
    #[default]
    Unknown,
    /// Reset command sent, waiting for the firmware to come back
    Resetting,
    /// Firmware answered with a supported identity
    Ready,
    /// Retry budget exhausted (or reset command failed)
    Failed,
}

/// Firmware version information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Version {
    /// Adafruit product code (e.g. 4026 for the soil sensor)
    pub product: u16,
    /// Firmware date code
    pub date: u16,
}

impl Version {
    /// Decode the 32-bit big-endian version register
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        let raw = u32::from_be_bytes(bytes);
        Self {
            product: (raw >> 16) as u16,
            date: raw as u16,
        }
    }
}

/// Handle to one physical seesaw peripheral
pub struct SeesawDevice<B, D> {
    bus: B,
    delay: D,
    config: SeesawConfig,
    /// Identity seen during the last successful reset
    hardware_id: Option<HardwareId>,
    state: ResetState,
}

impl<B: I2cBus, D: DelayNs> SeesawDevice<B, D> {
    /// Create a device handle at the default address
    pub fn new(bus: B, delay: D) -> Self {
        Self::with_config(bus, delay, SeesawConfig::default())
    }

    /// Create a device handle with explicit configuration
    pub fn with_config(bus: B, delay: D, config: SeesawConfig) -> Self {
        Self {
            bus,
            delay,
            config,
            hardware_id: None,
            state: ResetState::Unknown,
        }
    }

    /// 7-bit I2C address
    pub fn address(&self) -> u8 {
        self.config.address
    }

    /// Change the I2C address (e.g. after moving the address jumpers)
    pub fn set_address(&mut self, address: u8) {
        self.config.address = address;
    }

    /// Active configuration
    pub fn config(&self) -> &SeesawConfig {
        &self.config
    }

    /// Reset handshake state
    pub fn state(&self) -> ResetState {
        self.state
    }

    /// Identity reported during the last successful reset
    pub fn hardware_id(&self) -> Option<HardwareId> {
        self.hardware_id
    }

    /// Give back the bus and delay provider
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }

    // -----------------------------------------------------------------------
    // Core protocol primitives
    // -----------------------------------------------------------------------

    /// Read `buf.len()` bytes from a register, waiting `delay_us` between the
    /// command and the data phase.
    ///
    /// The delay depends on the module and function; too short a delay gives
    /// garbage or intermittent failures.
    pub fn read(
        &mut self,
        register: Register,
        buf: &mut [u8],
        delay_us: u32,
    ) -> Result<(), SeesawError<B::Error>> {
        self.transfer(register, buf, delay_us)?;
        Ok(())
    }

    fn transfer(&mut self, register: Register, buf: &mut [u8], delay_us: u32) -> Result<(), B::Error> {
        self.bus.write(self.config.address, &register.prefix())?;

        // The firmware needs time to process the command and fill its TX buffer
        self.delay.delay_us(delay_us);

        self.bus.read(self.config.address, buf)
    }

    /// Write a payload to a register in a single transaction
    pub fn write(&mut self, register: Register, data: &[u8]) -> Result<(), SeesawError<B::Error>> {
        if data.len() > MAX_PAYLOAD_SIZE {
            return Err(SeesawError::PayloadTooLarge {
                len: data.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }

        // Full write buffer: [module, function, payload...]
        let mut frame: Vec<u8, { MAX_PAYLOAD_SIZE + 2 }> = Vec::new();
        frame
            .extend_from_slice(&register.prefix())
            .and_then(|_| frame.extend_from_slice(data))
            .map_err(|_| SeesawError::PayloadTooLarge {
                len: data.len(),
                max: MAX_PAYLOAD_SIZE,
            })?;

        self.bus.write(self.config.address, &frame)?;
        Ok(())
    }

    /// Read a single-byte register using the standard delay
    pub fn read_register(&mut self, register: Register) -> Result<u8, SeesawError<B::Error>> {
        let mut buf = [0u8; 1];
        let delay_us = self.config.standard_delay_us;
        self.read(register, &mut buf, delay_us)?;
        Ok(buf[0])
    }

    /// Write a single-byte register
    pub fn write_register(
        &mut self,
        register: Register,
        value: u8,
    ) -> Result<(), SeesawError<B::Error>> {
        self.write(register, &[value])
    }

    /// Read the product and firmware date code
    pub fn read_version(&mut self) -> Result<Version, SeesawError<B::Error>> {
        let mut buf = [0u8; 4];
        let delay_us = self.config.standard_delay_us;
        self.read(status::VERSION, &mut buf, delay_us)?;
        Ok(Version::from_bytes(buf))
    }

    // -----------------------------------------------------------------------
    // Reset handshake
    // -----------------------------------------------------------------------

    /// Soft-reset the peripheral and wait until it reports a known identity
    ///
    /// The firmware reboots, so the first polls after the settle window may
    /// still be NACKed. Each poll is retried until the attempt budget from
    /// [`SeesawConfig`] is spent.
    pub fn reset(&mut self) -> Result<HardwareId, SeesawError<B::Error>> {
        self.state = ResetState::Resetting;
        self.hardware_id = None;

        if let Err(e) = self.write_register(status::SWRST, status::SWRST_VALUE) {
            self.state = ResetState::Failed;
            return Err(match e {
                SeesawError::Bus(e) => SeesawError::SoftReset(e),
                other => other,
            });
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("seesaw {=u8:#x}: soft reset sent", self.config.address);

        self.delay.delay_ms(self.config.reset_settle_ms);

        let attempts = self.config.reset_attempts.max(1);
        let mut tries: u8 = 0;
        loop {
            tries += 1;
            match self.poll_hardware_id() {
                Ok(id) => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("seesaw ready after {} polls: {}", tries, id);

                    self.hardware_id = Some(id);
                    self.state = ResetState::Ready;
                    return Ok(id);
                }
                Err(fault) if tries >= attempts => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("seesaw handshake failed after {} polls", tries);

                    self.state = ResetState::Failed;
                    return Err(SeesawError::HandshakeFailed {
                        attempts: tries,
                        last: fault,
                    });
                }
                Err(_) => self.delay.delay_ms(self.config.reset_retry_delay_ms),
            }
        }
    }

    fn poll_hardware_id(&mut self) -> Result<HardwareId, HandshakeFault<B::Error>> {
        let mut buf = [0u8; 1];
        let delay_us = self.config.standard_delay_us;
        self.transfer(status::HW_ID, &mut buf, delay_us)
            .map_err(HandshakeFault::Bus)?;
        HardwareId::from_byte(buf[0]).ok_or(HandshakeFault::UnknownHardwareId(buf[0]))
    }
}

impl<B: I2cBus, D: DelayNs> Seesaw for SeesawDevice<B, D> {
    type Error = SeesawError<B::Error>;

    fn read(&mut self, register: Register, buf: &mut [u8], delay_us: u32) -> Result<(), Self::Error> {
        SeesawDevice::read(self, register, buf, delay_us)
    }

    fn write(&mut self, register: Register, data: &[u8]) -> Result<(), Self::Error> {
        SeesawDevice::write(self, register, data)
    }
}
