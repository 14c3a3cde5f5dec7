//! Display identity record

use bitflags::bitflags;
use heapless::String;

use crate::config::MAX_LABEL_LEN;

bitflags! {
    /// Capabilities reported alongside the identity
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DisplayCaps: u32 {
        /// Video mode (continuous scan-out) interface
        const VID_MODE = 1 << 0;
        /// Sink can be attached and detached at runtime
        const HOT_PLUG = 1 << 1;
        /// Modes come from the sink's EDID
        const EDID = 1 << 2;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DisplayCaps {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "DisplayCaps({=u32:#x})", self.bits());
    }
}

/// HDMI display properties
///
/// `width_mm`/`height_mm` are fixed for non-pluggable panels. For
/// hot-pluggable outputs they stay zero until a sink reports its size.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayInfo {
    /// Display type label from configuration
    pub display_type: String<MAX_LABEL_LEN>,
    /// Panel can be hot plugged
    pub is_hot_pluggable: bool,
    /// Panel is connected
    pub is_connected: bool,
    /// Panel supports reading EDID
    pub is_edid_supported: bool,
    /// Physical width in millimeters
    pub width_mm: u32,
    /// Physical height in millimeters
    pub height_mm: u32,
    /// Controller instance driving the single horizontal tile
    pub h_tile_instance: u32,
    /// Capability flags
    pub capabilities: DisplayCaps,
}

impl DisplayInfo {
    /// Physical interface of the display
    pub fn interface(&self) -> &'static str {
        "HDMI"
    }

    /// Check if the physical size is known
    pub fn has_physical_size(&self) -> bool {
        self.width_mm != 0 && self.height_mm != 0
    }
}
