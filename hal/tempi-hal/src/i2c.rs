//! I2C bus abstractions
//!
//! Provides the blocking transport that the seesaw protocol core drives.
//! Every call is exactly one bus transaction against a 7-bit address.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

/// I2C bus master
///
/// Provides basic I2C read/write operations for communicating with
/// peripheral devices.
///
/// There is deliberately no combined write-then-read: seesaw peripherals need
/// a settle delay between the command and the answer, which a repeated-start
/// transaction cannot provide.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data from a device at the given address
    ///
    /// Implementations must fill `buf` completely or return an error. A
    /// short read is never reported as success.
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buf` - Buffer to read into
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        T::write(self, address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        T::read(self, address, buf)
    }
}

/// Error from I2C operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cBusError {
    /// Bus error
    Bus,
    /// Arbitration lost
    ArbitrationLost,
    /// NACK received
    Nack,
    /// Overrun
    Overrun,
    /// Other error
    Other,
}

impl From<ErrorKind> for I2cBusError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Bus => I2cBusError::Bus,
            ErrorKind::ArbitrationLoss => I2cBusError::ArbitrationLost,
            ErrorKind::NoAcknowledge(_) => I2cBusError::Nack,
            ErrorKind::Overrun => I2cBusError::Overrun,
            _ => I2cBusError::Other,
        }
    }
}

impl core::fmt::Display for I2cBusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            I2cBusError::Bus => "bus error",
            I2cBusError::ArbitrationLost => "arbitration lost",
            I2cBusError::Nack => "no acknowledge",
            I2cBusError::Overrun => "overrun",
            I2cBusError::Other => "other bus error",
        };
        f.write_str(msg)
    }
}

/// Adapter from any `embedded-hal` I2C master to [`I2cBus`]
///
/// Works with platform HALs and with `linux-embedded-hal` on a host.
pub struct EmbeddedHalBus<T> {
    i2c: T,
}

impl<T: I2c> EmbeddedHalBus<T> {
    /// Wrap an `embedded-hal` I2C peripheral
    pub fn new(i2c: T) -> Self {
        Self { i2c }
    }

    /// Give the wrapped peripheral back
    pub fn into_inner(self) -> T {
        self.i2c
    }
}

impl<T: I2c> I2cBus for EmbeddedHalBus<T> {
    type Error = I2cBusError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.i2c
            .write(address, data)
            .map_err(|e| I2cBusError::from(e.kind()))
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c
            .read(address, buf)
            .map_err(|e| I2cBusError::from(e.kind()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorType, NoAcknowledgeSource, Operation};

    /// Fake embedded-hal peripheral that answers reads with a fixed pattern
    struct FakeI2c {
        written: Vec<(u8, Vec<u8>)>,
        fail_with: Option<ErrorKind>,
    }

    impl ErrorType for FakeI2c {
        type Error = ErrorKind;
    }

    impl I2c for FakeI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if let Some(kind) = self.fail_with {
                return Err(kind);
            }
            for op in operations {
                match op {
                    Operation::Write(data) => self.written.push((address, data.to_vec())),
                    Operation::Read(buf) => {
                        for (i, b) in buf.iter_mut().enumerate() {
                            *b = i as u8 + 1;
                        }
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_adapter_forwards_transactions() {
        let mut bus = EmbeddedHalBus::new(FakeI2c {
            written: Vec::new(),
            fail_with: None,
        });

        bus.write(0x49, &[0x00, 0x01]).unwrap();
        let mut buf = [0u8; 3];
        bus.read(0x49, &mut buf).unwrap();

        assert_eq!(buf, [1, 2, 3]);
        let inner = bus.into_inner();
        assert_eq!(inner.written, vec![(0x49, vec![0x00, 0x01])]);
    }

    #[test]
    fn test_adapter_maps_error_kind() {
        let mut bus = EmbeddedHalBus::new(FakeI2c {
            written: Vec::new(),
            fail_with: Some(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)),
        });

        assert_eq!(bus.write(0x36, &[0]), Err(I2cBusError::Nack));

        let mut buf = [0u8; 1];
        assert_eq!(bus.read(0x36, &mut buf), Err(I2cBusError::Nack));
    }

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(I2cBusError::from(ErrorKind::Bus), I2cBusError::Bus);
        assert_eq!(
            I2cBusError::from(ErrorKind::ArbitrationLoss),
            I2cBusError::ArbitrationLost
        );
        assert_eq!(I2cBusError::from(ErrorKind::Overrun), I2cBusError::Overrun);
        assert_eq!(I2cBusError::from(ErrorKind::Other), I2cBusError::Other);
    }
}
