//! Configuration type definitions
//!
//! One [`DisplayConfig`] per HDMI output. Non-pluggable panels carry their
//! mode table here because they have no EDID to read it from.

use heapless::{String, Vec};

use crate::mode::{DisplayMode, ModeFlags, ModeType, SyncTiming};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum label length (names, display types)
pub const MAX_LABEL_LEN: usize = 32;

/// Maximum device-node path length
pub const MAX_NODE_LEN: usize = 64;

/// Maximum displays per config
pub const MAX_DISPLAYS: usize = 4;

/// Maximum configured modes per display
pub const MAX_CONFIG_MODES: usize = 8;

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Default TMDS clock ceiling (kHz), enough for 1080p and 4k30
pub const DEFAULT_MAX_PIXEL_CLOCK_KHZ: u32 = 297_000;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unsupported format version
    VersionMismatch,
    /// Display without a name
    MissingName,
    /// Two displays share a name
    DuplicateName,
    /// Two displays share a controller
    DuplicateController,
    /// Non-pluggable display without modes
    NoModes,
    /// Non-pluggable display without a physical size
    MissingPhysicalSize,
    /// Mode timings are inconsistent (index into the display's modes)
    InvalidMode(u8),
    /// Binary blob could not be decoded
    Deserialize,
}

/// One timing entry for a non-pluggable panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModeConfig {
    pub h_active: u16,
    pub h_front_porch: u16,
    pub h_pulse_width: u16,
    pub h_back_porch: u16,
    /// Positive horizontal sync polarity
    pub h_active_high: bool,
    pub v_active: u16,
    pub v_front_porch: u16,
    pub v_pulse_width: u16,
    pub v_back_porch: u16,
    /// Positive vertical sync polarity
    pub v_active_high: bool,
    /// Nominal refresh rate (Hz)
    pub refresh_rate: u32,
    /// Pixel clock (kHz)
    pub clock_khz: u32,
}

impl ModeConfig {
    /// Convert to a display mode
    pub fn to_mode(&self) -> DisplayMode {
        let mut flags = ModeFlags::empty();
        flags |= if self.h_active_high {
            ModeFlags::PHSYNC
        } else {
            ModeFlags::NHSYNC
        };
        flags |= if self.v_active_high {
            ModeFlags::PVSYNC
        } else {
            ModeFlags::NVSYNC
        };

        DisplayMode::from_timings(
            self.clock_khz,
            SyncTiming::new(
                self.h_active,
                self.h_front_porch,
                self.h_pulse_width,
                self.h_back_porch,
            ),
            SyncTiming::new(
                self.v_active,
                self.v_front_porch,
                self.v_pulse_width,
                self.v_back_porch,
            ),
            flags,
        )
        .with_type(ModeType::DRIVER)
    }

    /// Check the timings are usable and agree with the refresh rate
    ///
    /// One Hz of slack is allowed for clocks that do not divide evenly.
    pub fn is_consistent(&self) -> bool {
        let mode = self.to_mode();
        mode.is_well_formed()
            && self.refresh_rate != 0
            && mode.refresh_hz().abs_diff(self.refresh_rate) <= 1
    }
}

fn default_true() -> bool {
    true
}

fn default_max_pixel_clock() -> u32 {
    DEFAULT_MAX_PIXEL_CLOCK_KHZ
}

/// HDMI display configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Display name
    pub name: String<MAX_LABEL_LEN>,
    /// Display type label ("primary", "secondary", ...)
    pub display_type: String<MAX_LABEL_LEN>,
    /// HDMI controller index
    pub ctrl_idx: u32,
    /// Device-tree node of the controller
    pub of_node: String<MAX_NODE_LEN>,
    /// Panel is permanently attached
    pub non_pluggable: bool,
    /// Modes may be read from the sink's EDID
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub edid_supported: bool,
    /// Physical width (mm), required for non-pluggable panels
    pub width_mm: u32,
    /// Physical height (mm), required for non-pluggable panels
    pub height_mm: u32,
    /// TMDS clock ceiling (kHz)
    #[cfg_attr(feature = "serde", serde(default = "default_max_pixel_clock"))]
    pub max_pixel_clock_khz: u32,
    /// Fixed mode table for non-pluggable panels
    pub modes: Vec<ModeConfig, MAX_CONFIG_MODES>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            display_type: String::new(),
            ctrl_idx: 0,
            of_node: String::new(),
            non_pluggable: false,
            edid_supported: default_true(),
            width_mm: 0,
            height_mm: 0,
            max_pixel_clock_khz: default_max_pixel_clock(),
            modes: Vec::new(),
        }
    }
}

impl DisplayConfig {
    /// Validate a single display entry
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::MissingName);
        }
        for (i, mode) in self.modes.iter().enumerate() {
            if !mode.is_consistent() {
                return Err(ConfigError::InvalidMode(i as u8));
            }
        }
        if self.non_pluggable {
            if self.modes.is_empty() {
                return Err(ConfigError::NoModes);
            }
            if self.width_mm == 0 || self.height_mm == 0 {
                return Err(ConfigError::MissingPhysicalSize);
            }
        }
        Ok(())
    }
}

/// Complete HDMI configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HdmiConfig {
    /// Format version
    pub version: u8,
    /// Configured displays
    pub displays: Vec<DisplayConfig, MAX_DISPLAYS>,
}

impl Default for HdmiConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            displays: Vec::new(),
        }
    }
}

impl HdmiConfig {
    /// Validate every display and the relations between them
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch);
        }
        for (i, display) in self.displays.iter().enumerate() {
            display.validate()?;
            for other in &self.displays[..i] {
                if other.name == display.name {
                    return Err(ConfigError::DuplicateName);
                }
                if other.ctrl_idx == display.ctrl_idx {
                    return Err(ConfigError::DuplicateController);
                }
            }
        }
        Ok(())
    }

    /// Find a display by name
    pub fn find_display(&self, name: &str) -> Option<&DisplayConfig> {
        self.displays.iter().find(|d| d.name.as_str() == name)
    }

    /// Decode and validate a postcard blob
    #[cfg(feature = "serde")]
    pub fn from_blob(data: &[u8]) -> Result<Self, ConfigError> {
        let config: HdmiConfig =
            postcard::from_bytes(data).map_err(|_| ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }
}
