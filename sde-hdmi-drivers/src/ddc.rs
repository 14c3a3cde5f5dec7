//! DDC (Display Data Channel) transport
//!
//! EDID lives behind I2C address 0x50 as 256-byte segments of two blocks.
//! Blocks past the first segment need the E-DDC segment pointer at 0x30
//! written first.

use sde_hdmi_core::traits::ControllerError;
use sde_hdmi_hal::{I2cBus, I2cError};

/// EDID EEPROM address
pub const DDC_ADDR: u8 = 0x50;

/// E-DDC segment pointer address
pub const DDC_SEGMENT_ADDR: u8 = 0x30;

/// EDID block size
pub const BLOCK_SIZE: usize = 128;

/// DDC transfer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DdcError {
    /// Sink did not acknowledge
    Nack,
    /// Bus failure
    Bus,
}

impl From<I2cError> for DdcError {
    fn from(e: I2cError) -> Self {
        match e {
            I2cError::Nack => DdcError::Nack,
            I2cError::ArbitrationLoss | I2cError::Bus | I2cError::Other => DdcError::Bus,
        }
    }
}

impl From<DdcError> for ControllerError {
    fn from(e: DdcError) -> Self {
        match e {
            DdcError::Nack => ControllerError::DdcNack,
            DdcError::Bus => ControllerError::DdcBus,
        }
    }
}

/// EDID reader on top of an I2C bus
pub struct Ddc<B> {
    bus: B,
}

impl<B: I2cBus> Ddc<B> {
    /// Create a DDC channel on a bus
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Release the bus
    pub fn into_inner(self) -> B {
        self.bus
    }

    /// Read one EDID block
    pub fn read_block(&mut self, block: u8, buf: &mut [u8; BLOCK_SIZE]) -> Result<(), DdcError> {
        let segment = block / 2;
        let offset = (block % 2) * BLOCK_SIZE as u8;

        if segment != 0 {
            self.bus
                .write(DDC_SEGMENT_ADDR, &[segment])
                .map_err(bus_error)?;
        }
        self.bus
            .write_read(DDC_ADDR, &[offset], buf)
            .map_err(bus_error)
    }
}

fn bus_error<E: Into<I2cError>>(e: E) -> DdcError {
    let e: I2cError = e.into();
    DdcError::from(e)
}
