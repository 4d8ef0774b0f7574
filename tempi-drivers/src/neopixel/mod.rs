//! NeoPixel driver
//!
//! The seesaw keeps its own pixel buffer and clocks it out to the strip on
//! `SHOW`. Colors are uploaded into that buffer by byte offset.
//!
//! # Device buffer
//!
//! ```text
//! offset:  0   1   2   3   4   5  ...  count*3-1
//!          G0  R0  B0  G1  R1  B1 ...
//! ```
//!
//! Buffer writes are limited to 29 payload bytes per transaction. The
//! datasheet allows 30, but the firmware crashes above 29.

pub mod color;

pub use color::{Rgba, BYTES_PER_PIXEL};

use core::fmt;

use embedded_hal::delay::DelayNs;
use tempi_hal::Monotonic;
use tempi_seesaw::registers::neopixel;
use tempi_seesaw::Seesaw;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest RGB strip the seesaw firmware supports
pub const MAX_PIXELS: usize = 170;

/// Payload bytes per buffer write, excluding the 2-byte offset
pub const CHUNK_SIZE: usize = 29;

/// Minimum time between the last buffer write or show and the next show (µs)
///
/// The strip needs a reset-latch gap the firmware does not enforce itself.
const SHOW_INTERVAL_US: u64 = 300;

/// Sleep between clock polls while waiting for the show interval
const SHOW_POLL_US: u32 = 50;

/// NeoPixel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NeoPixelConfig {
    /// Seesaw pin driving the strip data line
    pub pin: u8,
    /// Number of RGB pixels on the strip
    pub led_count: usize,
    /// Time the firmware needs to reallocate its buffer after each setup write (ms)
    #[cfg_attr(feature = "serde", serde(default = "default_settle_ms"))]
    pub settle_ms: u32,
}

const fn default_settle_ms() -> u32 {
    50
}

impl NeoPixelConfig {
    /// Configuration with the default settle time
    pub const fn new(pin: u8, led_count: usize) -> Self {
        Self {
            pin,
            led_count,
            settle_ms: default_settle_ms(),
        }
    }
}

/// Errors that can occur with the NeoPixel driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NeoPixelError<E> {
    /// Requested strip is longer than the firmware supports
    TooManyPixels { count: usize, max: usize },
    /// More colors than configured pixels
    BufferTooLarge { len: usize, capacity: usize },
    /// Pixel offset past the end of the strip
    OffsetOutOfRange { offset: u16, count: usize },
    /// Setting the output pin failed
    SetupPin { pin: u8, source: E },
    /// Declaring the buffer length failed
    SetupLength { count: usize, source: E },
    /// Uploading buffer data failed
    WriteBuffer { byte_offset: u16, source: E },
    /// Latching the buffer failed
    Show(E),
}

impl<E: fmt::Debug> fmt::Display for NeoPixelError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NeoPixelError::TooManyPixels { count, max } => {
                write!(f, "invalid pixel count: {} > {}", count, max)
            }
            NeoPixelError::BufferTooLarge { len, capacity } => {
                write!(f, "buffer too big: {} > {} pixels", len, capacity)
            }
            NeoPixelError::OffsetOutOfRange { offset, count } => {
                write!(f, "pixel offset {} out of range for {} pixels", offset, count)
            }
            NeoPixelError::SetupPin { pin, source } => {
                write!(f, "failed to update pixel pin {}: {:?}", pin, source)
            }
            NeoPixelError::SetupLength { count, source } => {
                write!(f, "failed to update pixel count {}: {:?}", count, source)
            }
            NeoPixelError::WriteBuffer {
                byte_offset,
                source,
            } => write!(
                f,
                "failed to write NeoPixel buffer offset {}: {:?}",
                byte_offset, source
            ),
            NeoPixelError::Show(e) => write!(f, "failed to show pixels: {:?}", e),
        }
    }
}

/// NeoPixel strip attached to a seesaw
pub struct NeoPixel<S, D, C> {
    seesaw: S,
    delay: D,
    clock: C,
    config: NeoPixelConfig,
    /// Clock reading at the last buffer write or show
    last_operation_us: Option<u64>,
}

impl<S, D, C> NeoPixel<S, D, C>
where
    S: Seesaw,
    D: DelayNs,
    C: Monotonic,
{
    /// Configure the output pin and device buffer length
    ///
    /// The firmware reallocates its buffer on each setup write, so every
    /// write is separated by the configured settle time.
    pub fn new(
        seesaw: S,
        delay: D,
        clock: C,
        config: NeoPixelConfig,
    ) -> Result<Self, NeoPixelError<S::Error>> {
        if config.led_count > MAX_PIXELS {
            return Err(NeoPixelError::TooManyPixels {
                count: config.led_count,
                max: MAX_PIXELS,
            });
        }

        let mut pixels = Self {
            seesaw,
            delay,
            clock,
            config,
            last_operation_us: None,
        };

        pixels.delay.delay_ms(config.settle_ms);
        pixels
            .seesaw
            .write(neopixel::PIN, &[config.pin])
            .map_err(|source| NeoPixelError::SetupPin {
                pin: config.pin,
                source,
            })?;

        pixels.delay.delay_ms(config.settle_ms);
        let len_bytes = (config.led_count * BYTES_PER_PIXEL) as u16;
        pixels
            .seesaw
            .write(neopixel::BUF_LENGTH, &len_bytes.to_be_bytes())
            .map_err(|source| NeoPixelError::SetupLength {
                count: config.led_count,
                source,
            })?;

        pixels.delay.delay_ms(config.settle_ms);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "neopixel: {} pixels on pin {}",
            config.led_count,
            config.pin
        );

        Ok(pixels)
    }

    /// Number of configured pixels
    pub fn led_count(&self) -> usize {
        self.config.led_count
    }

    /// Active configuration
    pub fn config(&self) -> &NeoPixelConfig {
        &self.config
    }

    /// Update the color of a single pixel
    pub fn write_color_at_offset(
        &mut self,
        offset: u16,
        color: Rgba,
    ) -> Result<(), NeoPixelError<S::Error>> {
        if usize::from(offset) >= self.config.led_count {
            return Err(NeoPixelError::OffsetOutOfRange {
                offset,
                count: self.config.led_count,
            });
        }

        let byte_offset = offset * BYTES_PER_PIXEL as u16;
        self.write_buffer(byte_offset, &color.to_grb())
    }

    /// Upload colors starting at the first pixel
    ///
    /// Chunk boundaries follow the byte stream, not pixel boundaries; the
    /// device addresses its buffer by byte.
    pub fn write_colors(&mut self, colors: &[Rgba]) -> Result<(), NeoPixelError<S::Error>> {
        if colors.len() > self.config.led_count {
            return Err(NeoPixelError::BufferTooLarge {
                len: colors.len(),
                capacity: self.config.led_count,
            });
        }

        let mut tx = [0u8; MAX_PIXELS * BYTES_PER_PIXEL];
        for (slot, color) in tx.chunks_exact_mut(BYTES_PER_PIXEL).zip(colors) {
            slot.copy_from_slice(&color.to_grb());
        }
        let len = colors.len() * BYTES_PER_PIXEL;

        for (i, chunk) in tx[..len].chunks(CHUNK_SIZE).enumerate() {
            self.write_buffer((i * CHUNK_SIZE) as u16, chunk)?;
        }

        Ok(())
    }

    /// Latch the uploaded buffer out to the strip
    ///
    /// Waits until at least 300µs have passed since the previous buffer
    /// write or show.
    pub fn show(&mut self) -> Result<(), NeoPixelError<S::Error>> {
        self.wait_since_last_operation();

        self.seesaw
            .write(neopixel::SHOW, &[])
            .map_err(NeoPixelError::Show)?;
        self.last_operation_us = Some(self.clock.now_micros());
        Ok(())
    }

    /// Give back the seesaw handle, delay provider and clock
    pub fn release(self) -> (S, D, C) {
        (self.seesaw, self.delay, self.clock)
    }

    fn write_buffer(&mut self, byte_offset: u16, data: &[u8]) -> Result<(), NeoPixelError<S::Error>> {
        // [offset_hi, offset_lo, data...]
        let mut tx = [0u8; 2 + CHUNK_SIZE];
        tx[..2].copy_from_slice(&byte_offset.to_be_bytes());
        tx[2..2 + data.len()].copy_from_slice(data);

        self.seesaw
            .write(neopixel::BUF, &tx[..2 + data.len()])
            .map_err(|source| NeoPixelError::WriteBuffer {
                byte_offset,
                source,
            })?;
        self.last_operation_us = Some(self.clock.now_micros());
        Ok(())
    }

    fn wait_since_last_operation(&mut self) {
        let Some(last) = self.last_operation_us else {
            return;
        };
        while self.clock.elapsed_since(last) < SHOW_INTERVAL_US {
            self.delay.delay_us(SHOW_POLL_US);
        }
    }
}
