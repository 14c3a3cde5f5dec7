//! HDMI transmitter controller trait

use crate::connector::EncoderHandle;

/// Errors reported by the transmitter hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerError {
    /// Clocks, regulators or pins could not be claimed
    ResourceUnavailable,
    /// Operation needs the transmitter powered
    NotPowered,
    /// Sink did not acknowledge on the DDC bus
    DdcNack,
    /// Other DDC bus failure
    DdcBus,
    /// Bridge could not be attached to the encoder
    BridgeUnavailable,
    /// Operation not supported by this transmitter
    Unsupported,
}

/// Trait for an HDMI transmitter
///
/// One controller belongs to exactly one display descriptor, which calls
/// it with its lock held.
pub trait HdmiController {
    /// Claim and power up the transmitter
    fn acquire_resources(&mut self) -> Result<(), ControllerError>;

    /// Power down and release the transmitter
    fn release_resources(&mut self);

    /// Sample the hot plug detect line
    fn hpd_asserted(&mut self) -> bool;

    /// Read one 128-byte EDID block from the sink
    fn read_edid_block(&mut self, block: u8, buf: &mut [u8; 128]) -> Result<(), ControllerError>;

    /// Enable or disable the test pattern generator
    fn set_tpg(&mut self, enabled: bool) -> Result<(), ControllerError>;

    /// Attach the bridge to an encoder
    fn bind(&mut self, encoder: EncoderHandle) -> Result<(), ControllerError>;

    /// Detach the bridge from its encoder
    fn unbind(&mut self);

    /// Highest TMDS pixel clock the transmitter supports (kHz)
    fn max_pixel_clock_khz(&self) -> u32;
}
