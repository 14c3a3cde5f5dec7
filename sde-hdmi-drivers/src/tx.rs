//! HDMI transmitter
//!
//! A transmitter composed from board pieces: the DDC bus towards the sink,
//! the hot plug detect input and the TX power enable output.

use sde_hdmi_core::connector::EncoderHandle;
use sde_hdmi_core::traits::{ControllerError, HdmiController};
use sde_hdmi_hal::gpio::ActiveLevel;
use sde_hdmi_hal::{I2cBus, InputPin, OutputPin};

use crate::ddc::Ddc;

/// Transmitter configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HdmiTxConfig {
    /// Highest TMDS clock the PHY can drive (kHz)
    pub max_pixel_clock_khz: u32,
    /// HPD pin reads low when a sink is attached
    pub hpd_active_low: bool,
}

impl Default for HdmiTxConfig {
    fn default() -> Self {
        Self {
            max_pixel_clock_khz: 297_000,
            hpd_active_low: false,
        }
    }
}

/// HDMI transmitter driver
pub struct HdmiTx<B, H, P> {
    ddc: Ddc<B>,
    hpd: ActiveLevel<H>,
    power: P,
    powered: bool,
    tpg_enabled: bool,
    encoder: Option<EncoderHandle>,
    max_pixel_clock_khz: u32,
}

impl<B, H, P> HdmiTx<B, H, P>
where
    B: I2cBus,
    H: InputPin,
    P: OutputPin,
{
    /// Create a powered-down transmitter
    pub fn new(bus: B, hpd: H, power: P, config: HdmiTxConfig) -> Self {
        let hpd = if config.hpd_active_low {
            ActiveLevel::active_low(hpd)
        } else {
            ActiveLevel::active_high(hpd)
        };
        Self {
            ddc: Ddc::new(bus),
            hpd,
            power,
            powered: false,
            tpg_enabled: false,
            encoder: None,
            max_pixel_clock_khz: config.max_pixel_clock_khz,
        }
    }

    /// Check if the transmitter is powered
    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Check if the test pattern generator is running
    pub fn is_tpg_enabled(&self) -> bool {
        self.tpg_enabled
    }

    /// Encoder the bridge is attached to
    pub fn encoder(&self) -> Option<EncoderHandle> {
        self.encoder
    }
}

impl<B, H, P> HdmiController for HdmiTx<B, H, P>
where
    B: I2cBus,
    H: InputPin,
    P: OutputPin,
{
    fn acquire_resources(&mut self) -> Result<(), ControllerError> {
        if !self.powered {
            self.power.set_high();
            self.powered = true;
        }
        Ok(())
    }

    fn release_resources(&mut self) {
        self.tpg_enabled = false;
        self.power.set_low();
        self.powered = false;
    }

    fn hpd_asserted(&mut self) -> bool {
        // HPD is only driven by the sink while +5V is supplied
        self.powered && self.hpd.is_asserted()
    }

    fn read_edid_block(&mut self, block: u8, buf: &mut [u8; 128]) -> Result<(), ControllerError> {
        if !self.powered {
            return Err(ControllerError::NotPowered);
        }
        self.ddc.read_block(block, buf)?;
        Ok(())
    }

    fn set_tpg(&mut self, enabled: bool) -> Result<(), ControllerError> {
        if !self.powered {
            return Err(ControllerError::NotPowered);
        }
        self.tpg_enabled = enabled;
        Ok(())
    }

    fn bind(&mut self, encoder: EncoderHandle) -> Result<(), ControllerError> {
        if self.encoder.is_some() || encoder.possible_crtcs == 0 {
            return Err(ControllerError::BridgeUnavailable);
        }
        self.encoder = Some(encoder);
        Ok(())
    }

    fn unbind(&mut self) {
        self.encoder = None;
    }

    fn max_pixel_clock_khz(&self) -> u32 {
        self.max_pixel_clock_khz
    }
}
