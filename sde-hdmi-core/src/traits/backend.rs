//! Display backend trait
//!
//! The generic connector framework reaches every HDMI display through this
//! trait. The real descriptor and the null backend both implement it, and
//! the choice between them is made once at startup.

use crate::connector::{Connector, ConnectorInfo, ConnectorStatus, EncoderHandle, InfoError};
use crate::info::DisplayInfo;
use crate::mode::{DisplayMode, ModeStatus};
use crate::state::LifecycleError;

use super::controller::ControllerError;

/// Errors returned by display backend operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Device resources have not been initialized
    NotInitialized,
    /// Device resources are already initialized
    AlreadyInitialized,
    /// Framework objects are not bound
    NotBound,
    /// Framework objects are already bound
    AlreadyBound,
    /// Transmitter failure
    Controller(ControllerError),
    /// No room left in a connector info record
    InfoFull,
    /// Key or value does not fit a connector info entry
    InfoTooLong,
    /// Display configuration is unusable
    InvalidConfig,
    /// Controller is held by another operation
    Busy,
}

impl DisplayError {
    /// Negative errno for callers that speak integer status codes
    pub fn errno(&self) -> i32 {
        const EIO: i32 = 5;
        const ENOMEM: i32 = 12;
        const EBUSY: i32 = 16;
        const ENODEV: i32 = 19;
        const EINVAL: i32 = 22;
        const ENOTSUP: i32 = 95;
        const ENXIO: i32 = 6;

        let code = match self {
            DisplayError::NotInitialized => ENODEV,
            DisplayError::AlreadyInitialized | DisplayError::AlreadyBound => EBUSY,
            DisplayError::NotBound => EINVAL,
            DisplayError::Controller(e) => match e {
                ControllerError::ResourceUnavailable => ENODEV,
                ControllerError::NotPowered => ENXIO,
                ControllerError::DdcNack | ControllerError::DdcBus => EIO,
                ControllerError::BridgeUnavailable => EBUSY,
                ControllerError::Unsupported => ENOTSUP,
            },
            DisplayError::InfoFull => ENOMEM,
            DisplayError::InfoTooLong | DisplayError::InvalidConfig => EINVAL,
            DisplayError::Busy => EBUSY,
        };
        -code
    }
}

impl From<ControllerError> for DisplayError {
    fn from(e: ControllerError) -> Self {
        DisplayError::Controller(e)
    }
}

impl From<LifecycleError> for DisplayError {
    fn from(e: LifecycleError) -> Self {
        match e {
            LifecycleError::DeviceNotInitialized => DisplayError::NotInitialized,
            LifecycleError::AlreadyInitialized => DisplayError::AlreadyInitialized,
            LifecycleError::AlreadyBound => DisplayError::AlreadyBound,
            LifecycleError::NotBound => DisplayError::NotBound,
        }
    }
}

impl From<InfoError> for DisplayError {
    fn from(e: InfoError) -> Self {
        match e {
            InfoError::Full => DisplayError::InfoFull,
            InfoError::TooLong => DisplayError::InfoTooLong,
        }
    }
}

/// Contract between the connector framework and an HDMI display
///
/// Methods take `&self`: implementations serialize access internally so a
/// backend can be shared between the framework and the hotplug worker.
pub trait DisplayBackend {
    /// Display name
    fn name(&self) -> &str;

    /// Undo connector setup before the connector is destroyed
    fn connector_pre_deinit(&self, connector: &mut Connector) -> Result<(), DisplayError>;

    /// Finish connector setup and publish display properties
    fn connector_post_init(
        &self,
        connector: &mut Connector,
        info: &mut ConnectorInfo,
    ) -> Result<(), DisplayError>;

    /// Determine whether a sink is attached
    ///
    /// `force` asks for a fresh hardware check instead of cached state.
    fn detect(&self, connector: &Connector, force: bool) -> ConnectorStatus;

    /// Add the supported modes to the connector
    ///
    /// Returns the number of modes added.
    fn get_modes(&self, connector: &mut Connector) -> usize;

    /// Decide whether a mode can be driven; no side effects
    fn mode_valid(&self, connector: &Connector, mode: &DisplayMode) -> ModeStatus;

    /// Initialize device resources
    fn dev_init(&self) -> Result<(), DisplayError>;

    /// Release device resources
    fn dev_deinit(&self) -> Result<(), DisplayError>;

    /// Create and bind framework objects for the display
    fn drm_init(&self, encoder: EncoderHandle) -> Result<(), DisplayError>;

    /// Tear down framework objects
    fn drm_deinit(&self) -> Result<(), DisplayError>;

    /// Identity and physical properties of the display
    fn get_info(&self) -> Result<DisplayInfo, DisplayError>;
}
