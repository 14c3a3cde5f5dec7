//! Board-agnostic core of the SDE HDMI display backend
//!
//! This crate contains everything that does not depend on a specific
//! HDMI transmitter:
//!
//! - Display modes, the CEA-861 VIC table and the mode validation policy
//! - EDID parsing (base block and CEA-861 extensions)
//! - The device lifecycle state machine
//! - Display identity and connector/encoder framework types
//! - Configuration type definitions
//! - Backend and controller traits

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod connector;
pub mod edid;
pub mod info;
pub mod mode;
pub mod state;
pub mod traits;

pub use config::{DisplayConfig, HdmiConfig, ModeConfig};
pub use connector::{
    Connector, ConnectorInfo, ConnectorStatus, ConnectorType, EncoderHandle, InfoError,
};
pub use info::{DisplayCaps, DisplayInfo};
pub use mode::{DisplayMode, ModeFlags, ModeList, ModeStatus, ModeType};
pub use state::{LifecycleError, LifecycleEvent, LifecycleState};
pub use traits::{ControllerError, DisplayBackend, DisplayError, HdmiController};
