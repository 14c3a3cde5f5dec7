//! I2C bus abstractions
//!
//! HDMI sinks expose their EDID over the DDC channel, a plain I2C bus
//! running in standard mode.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

/// I2C transfer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cError {
    /// Target did not acknowledge its address or data
    Nack,
    /// Lost arbitration to another master
    ArbitrationLoss,
    /// Bus error (misplaced start/stop, overrun)
    Bus,
    /// Anything else reported by the controller
    Other,
}

/// I2C master carrying DDC traffic
///
/// Addresses are 7-bit. Errors only need to convert into [`I2cError`];
/// the DDC layer does not look any deeper.
pub trait I2cBus {
    /// Bus-specific error
    type Error: Into<I2cError>;

    /// Plain write; used for the E-DDC segment pointer
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Plain read
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write the word offset, then read with a repeated start
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;
}

/// Adapter exposing any `embedded-hal` I2C master as an [`I2cBus`]
pub struct EmbeddedHalI2c<T> {
    bus: T,
}

impl<T: I2c> EmbeddedHalI2c<T> {
    /// Wrap an `embedded-hal` bus
    pub fn new(bus: T) -> Self {
        Self { bus }
    }

    /// Release the wrapped bus
    pub fn into_inner(self) -> T {
        self.bus
    }
}

fn map_kind(kind: ErrorKind) -> I2cError {
    match kind {
        ErrorKind::NoAcknowledge(_) => I2cError::Nack,
        ErrorKind::ArbitrationLoss => I2cError::ArbitrationLoss,
        ErrorKind::Bus | ErrorKind::Overrun => I2cError::Bus,
        _ => I2cError::Other,
    }
}

impl<T: I2c> I2cBus for EmbeddedHalI2c<T> {
    type Error = I2cError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), I2cError> {
        self.bus
            .write(address, data)
            .map_err(|e| map_kind(e.kind()))
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), I2cError> {
        self.bus.read(address, buf).map_err(|e| map_kind(e.kind()))
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), I2cError> {
        self.bus
            .write_read(address, write_data, read_buf)
            .map_err(|e| map_kind(e.kind()))
    }
}
