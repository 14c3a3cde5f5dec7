//! Mode validation policy

use super::display_mode::DisplayMode;

/// Lowest TMDS clock an HDMI link runs at (25 MHz)
pub const MIN_TMDS_CLOCK_KHZ: u32 = 25_000;

/// Widest active area the timing engine supports
pub const MAX_HDISPLAY: u16 = 4096;

/// Tallest active area the timing engine supports
pub const MAX_VDISPLAY: u16 = 2160;

/// Validity verdict for a candidate mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeStatus {
    /// Mode can be driven
    Ok,
    /// Pixel clock above what the transmitter supports
    ClockHigh,
    /// Pixel clock below the minimum TMDS rate
    ClockLow,
    /// Active width too large
    HDisplayWide,
    /// Active height too large
    VDisplayTall,
    /// Sync positions out of order or zero sized
    BadTiming,
    /// Interlaced scan is not supported
    NoInterlace,
    /// Fixed panel does not list this mode
    NoMode,
}

impl ModeStatus {
    /// Check if the mode was accepted
    pub fn is_ok(&self) -> bool {
        matches!(self, ModeStatus::Ok)
    }
}

/// Limits a mode is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeLimits {
    /// Highest pixel clock in kHz
    pub max_clock_khz: u32,
    /// Lowest pixel clock in kHz
    pub min_clock_khz: u32,
    /// Widest active area
    pub max_hdisplay: u16,
    /// Tallest active area
    pub max_vdisplay: u16,
}

impl ModeLimits {
    /// Limits for a transmitter with the given maximum pixel clock
    pub const fn with_max_clock(max_clock_khz: u32) -> Self {
        Self {
            max_clock_khz,
            min_clock_khz: MIN_TMDS_CLOCK_KHZ,
            max_hdisplay: MAX_HDISPLAY,
            max_vdisplay: MAX_VDISPLAY,
        }
    }
}

/// Check a mode against the limits
///
/// Checks run in a fixed order and the first failure is reported.
pub fn validate(mode: &DisplayMode, limits: &ModeLimits) -> ModeStatus {
    if !mode.is_well_formed() {
        return ModeStatus::BadTiming;
    }
    if mode.is_interlaced() {
        return ModeStatus::NoInterlace;
    }
    if mode.clock_khz < limits.min_clock_khz {
        return ModeStatus::ClockLow;
    }
    if mode.clock_khz > limits.max_clock_khz {
        return ModeStatus::ClockHigh;
    }
    if mode.hdisplay > limits.max_hdisplay {
        return ModeStatus::HDisplayWide;
    }
    if mode.vdisplay > limits.max_vdisplay {
        return ModeStatus::VDisplayTall;
    }
    ModeStatus::Ok
}
