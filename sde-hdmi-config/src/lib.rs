//! Host-side HDMI configuration loader
//!
//! Reads `hdmi.toml`, checks it against the capacity limits and rules of
//! sde-hdmi-core, and produces the postcard blob the device loads with
//! `HdmiConfig::from_blob`.

pub mod error;
pub mod loader;
mod raw;

pub use error::ConfigError;
pub use loader::{load_file, load_str, to_blob};
