//! Null display backend
//!
//! Stands in for HDMI displays when the feature is disabled in the build
//! or at boot. Every operation succeeds with a neutral answer and touches
//! nothing.

use sde_hdmi_core::connector::{Connector, ConnectorInfo, ConnectorStatus, EncoderHandle};
use sde_hdmi_core::info::DisplayInfo;
use sde_hdmi_core::mode::{DisplayMode, ModeStatus};
use sde_hdmi_core::traits::{DisplayBackend, DisplayError};

/// Backend with no displays behind it
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDisplay;

/// Shared null backend instance
pub static NULL_DISPLAY: NullDisplay = NullDisplay;

impl DisplayBackend for NullDisplay {
    fn name(&self) -> &str {
        "null"
    }

    fn connector_pre_deinit(&self, _connector: &mut Connector) -> Result<(), DisplayError> {
        Ok(())
    }

    fn connector_post_init(
        &self,
        _connector: &mut Connector,
        _info: &mut ConnectorInfo,
    ) -> Result<(), DisplayError> {
        Ok(())
    }

    fn detect(&self, _connector: &Connector, _force: bool) -> ConnectorStatus {
        ConnectorStatus::Disconnected
    }

    fn get_modes(&self, _connector: &mut Connector) -> usize {
        0
    }

    fn mode_valid(&self, _connector: &Connector, _mode: &DisplayMode) -> ModeStatus {
        ModeStatus::Ok
    }

    fn dev_init(&self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn dev_deinit(&self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn drm_init(&self, _encoder: EncoderHandle) -> Result<(), DisplayError> {
        Ok(())
    }

    fn drm_deinit(&self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn get_info(&self) -> Result<DisplayInfo, DisplayError> {
        Ok(DisplayInfo::default())
    }
}
