//! HDMI display backend
//!
//! This crate provides the concrete pieces behind the traits defined in
//! sde-hdmi-core:
//!
//! - [`SdeHdmi`], the per-output display descriptor
//! - [`HdmiTx`], a transmitter built from a DDC bus and HPD/power pins
//! - [`NullDisplay`], the backend used when HDMI support is disabled
//! - [`DisplayRegistry`], the process-wide list of displays
//! - Hotplug processing and debug inspection of a descriptor

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod ddc;
pub mod debug;
pub mod display;
pub mod hotplug;
pub mod null;
pub mod registry;
pub mod tx;

#[cfg(test)]
mod test_support;

pub use ddc::{Ddc, DdcError};
pub use debug::DebugRoot;
pub use display::{SdeHdmi, SdeHdmiCtrl};
pub use hotplug::{HotplugChange, HpdEvent};
pub use null::{NullDisplay, NULL_DISPLAY};
pub use registry::{
    get_displays, num_of_displays, select_backend, DisplayRef, DisplayRegistry, RegistryError,
    DISPLAYS,
};
pub use tx::{HdmiTx, HdmiTxConfig};
