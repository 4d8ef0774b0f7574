//! Capacitive soil moisture sensor (Adafruit 4026)
//!
//! The moisture reading comes from the seesaw touch module. Raw readings
//! range from about 200 (dry) to 2000 (wet).

pub mod filter;

pub use filter::{MoistureFilter, DEFAULT_WINDOW};

use core::fmt;

use embedded_hal::delay::DelayNs;
use tempi_seesaw::registers::{status, touch};
use tempi_seesaw::Seesaw;

/// Default I2C address of the soil sensor
pub const DEFAULT_ADDRESS: u8 = 0x36;

/// Settle delay for the touch channel read
const MOISTURE_DELAY_US: u32 = 3_000;

/// The touch read fails intermittently; this many attempts are made
const MOISTURE_ATTEMPTS: u8 = 5;

/// Pause between failed moisture reads
const MOISTURE_RETRY_DELAY_US: u32 = 1_000;

/// Settle delay for the die temperature read
const TEMPERATURE_DELAY_US: u32 = 1_000;

/// Errors that can occur with the soil sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SoilError<E> {
    /// Every moisture read attempt failed
    Moisture {
        /// Number of attempts made
        attempts: u8,
        /// Error from the final attempt
        source: E,
    },
    /// Temperature read failed
    Temperature(E),
}

impl<E: fmt::Debug> fmt::Display for SoilError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoilError::Moisture { attempts, source } => {
                write!(f, "moisture read failed after {} attempts: {:?}", attempts, source)
            }
            SoilError::Temperature(e) => write!(f, "temperature read failed: {:?}", e),
        }
    }
}

/// Soil moisture sensor
///
/// Every successful non-zero moisture reading also feeds a sliding-window
/// filter of `N` samples, available through [`avg_moisture`](Self::avg_moisture).
pub struct SoilSensor<S, D, const N: usize = DEFAULT_WINDOW> {
    seesaw: S,
    delay: D,
    filter: MoistureFilter<N>,
}

impl<S: Seesaw, D: DelayNs> SoilSensor<S, D> {
    /// Create a sensor with the default filter window
    ///
    /// The seesaw handle should be addressed at [`DEFAULT_ADDRESS`] unless the
    /// address jumpers were changed.
    pub fn new(seesaw: S, delay: D) -> Self {
        Self::with_filter(seesaw, delay, MoistureFilter::new())
    }
}

impl<S: Seesaw, D: DelayNs, const N: usize> SoilSensor<S, D, N> {
    /// Create a sensor with a custom filter
    pub fn with_filter(seesaw: S, delay: D, filter: MoistureFilter<N>) -> Self {
        Self {
            seesaw,
            delay,
            filter,
        }
    }

    /// Read the raw moisture value
    ///
    /// Retries failed reads with a short backoff. A reading of zero means the
    /// sensor produced no sample; it is returned as-is but kept out of the
    /// filter.
    pub fn read_moisture(&mut self) -> Result<u16, SoilError<S::Error>> {
        let mut attempt = 0;
        let value = loop {
            attempt += 1;
            let mut buf = [0u8; 2];
            match self
                .seesaw
                .read(touch::CHANNEL_OFFSET, &mut buf, MOISTURE_DELAY_US)
            {
                Ok(()) => break u16::from_be_bytes(buf),
                Err(source) if attempt >= MOISTURE_ATTEMPTS => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("moisture read failed after {} attempts", attempt);

                    return Err(SoilError::Moisture {
                        attempts: attempt,
                        source,
                    });
                }
                Err(_) => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("moisture read attempt {} failed, retrying", attempt);

                    self.delay.delay_us(MOISTURE_RETRY_DELAY_US);
                }
            }
        };

        self.filter.push(value);
        Ok(value)
    }

    /// Average of the non-zero samples in the filter window
    ///
    /// Returns 0 until the first non-zero sample arrives. No bus traffic.
    pub fn avg_moisture(&self) -> u16 {
        self.filter.average()
    }

    /// Read the die temperature in 0.1°C units
    ///
    /// The register holds a 16.16 fixed-point value in °C.
    pub fn read_temperature_x10(&mut self) -> Result<i16, SoilError<S::Error>> {
        let mut buf = [0u8; 4];
        self.seesaw
            .read(status::TEMP, &mut buf, TEMPERATURE_DELAY_US)
            .map_err(SoilError::Temperature)?;

        let raw = i64::from(i32::from_be_bytes(buf));
        Ok(((raw * 10) >> 16) as i16)
    }

    /// The moisture filter
    pub fn filter(&self) -> &MoistureFilter<N> {
        &self.filter
    }

    /// Give back the seesaw handle and delay provider
    pub fn release(self) -> (S, D) {
        (self.seesaw, self.delay)
    }
}
