//! TOML to device configuration

use std::fs;
use std::path::Path;

use heapless::{String, Vec};

use sde_hdmi_core::config::{
    DisplayConfig, HdmiConfig, MAX_CONFIG_MODES, MAX_DISPLAYS, MAX_LABEL_LEN, MAX_NODE_LEN,
};

use crate::error::ConfigError;
use crate::raw::{RawConfig, RawDisplay};

/// Parse and validate a TOML document
pub fn load_str(input: &str) -> Result<HdmiConfig, ConfigError> {
    let raw: RawConfig = toml::from_str(input)?;
    convert(raw)
}

/// Read, parse and validate a TOML file
pub fn load_file(path: impl AsRef<Path>) -> Result<HdmiConfig, ConfigError> {
    let path = path.as_ref();
    let input = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_str(&input)
}

/// Encode a configuration as the on-device postcard blob
pub fn to_blob(config: &HdmiConfig) -> Result<std::vec::Vec<u8>, ConfigError> {
    Ok(postcard::to_allocvec(config)?)
}

fn convert(raw: RawConfig) -> Result<HdmiConfig, ConfigError> {
    if raw.displays.len() > MAX_DISPLAYS {
        return Err(ConfigError::TooManyDisplays { max: MAX_DISPLAYS });
    }

    let mut displays = Vec::new();
    for display in raw.displays {
        // Length checked above
        let _ = displays.push(convert_display(display)?);
    }

    let config = HdmiConfig {
        version: raw.version,
        displays,
    };
    config.validate()?;
    Ok(config)
}

fn convert_display(raw: RawDisplay) -> Result<DisplayConfig, ConfigError> {
    if raw.modes.len() > MAX_CONFIG_MODES {
        return Err(ConfigError::TooManyModes {
            display: raw.name,
            max: MAX_CONFIG_MODES,
        });
    }

    Ok(DisplayConfig {
        name: bounded::<MAX_LABEL_LEN>("name", &raw.name)?,
        display_type: bounded::<MAX_LABEL_LEN>("display_type", &raw.display_type)?,
        ctrl_idx: raw.ctrl_idx,
        of_node: bounded::<MAX_NODE_LEN>("of_node", &raw.of_node)?,
        non_pluggable: raw.non_pluggable,
        edid_supported: raw.edid_supported,
        width_mm: raw.width_mm,
        height_mm: raw.height_mm,
        max_pixel_clock_khz: raw.max_pixel_clock_khz,
        modes: raw.modes.into_iter().collect(),
    })
}

fn bounded<const N: usize>(field: &'static str, value: &str) -> Result<String<N>, ConfigError> {
    String::try_from(value).map_err(|_| ConfigError::TooLong { field, max: N })
}
