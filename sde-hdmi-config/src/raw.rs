//! TOML document layout
//!
//! Mirrors the file with std strings and vectors so capacity problems can
//! be reported by field instead of as generic deserialization errors.

use serde::Deserialize;

use sde_hdmi_core::config::{ModeConfig, CONFIG_VERSION, DEFAULT_MAX_PIXEL_CLOCK_KHZ};

fn default_version() -> u8 {
    CONFIG_VERSION
}

fn default_display_type() -> String {
    "primary".into()
}

fn default_true() -> bool {
    true
}

fn default_max_pixel_clock() -> u32 {
    DEFAULT_MAX_PIXEL_CLOCK_KHZ
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawConfig {
    #[serde(default = "default_version")]
    pub version: u8,
    #[serde(default, rename = "display")]
    pub displays: Vec<RawDisplay>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawDisplay {
    pub name: String,
    #[serde(default = "default_display_type")]
    pub display_type: String,
    pub ctrl_idx: u32,
    #[serde(default)]
    pub of_node: String,
    #[serde(default)]
    pub non_pluggable: bool,
    #[serde(default = "default_true")]
    pub edid_supported: bool,
    #[serde(default)]
    pub width_mm: u32,
    #[serde(default)]
    pub height_mm: u32,
    #[serde(default = "default_max_pixel_clock")]
    pub max_pixel_clock_khz: u32,
    #[serde(default, rename = "mode")]
    pub modes: Vec<ModeConfig>,
}
