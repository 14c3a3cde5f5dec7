//! Display mode timing

use core::fmt::Write;

use bitflags::bitflags;
use heapless::{String, Vec};

/// Maximum modes a connector or descriptor keeps
pub const MAX_MODES: usize = 32;

/// Maximum mode name length ("4096x2160i")
pub const MODE_NAME_LEN: usize = 16;

/// Bounded list of modes
pub type ModeList = Vec<DisplayMode, MAX_MODES>;

bitflags! {
    /// Sync and scan flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ModeFlags: u32 {
        /// Positive horizontal sync
        const PHSYNC = 1 << 0;
        /// Negative horizontal sync
        const NHSYNC = 1 << 1;
        /// Positive vertical sync
        const PVSYNC = 1 << 2;
        /// Negative vertical sync
        const NVSYNC = 1 << 3;
        /// Interlaced scan
        const INTERLACE = 1 << 4;
        /// Every line is scanned twice
        const DBLSCAN = 1 << 5;
    }
}

bitflags! {
    /// Where a mode came from
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ModeType: u32 {
        /// The sink's (or panel's) native mode
        const PREFERRED = 1 << 3;
        /// Added by the user through configuration
        const USERDEF = 1 << 5;
        /// Added by the driver
        const DRIVER = 1 << 6;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ModeFlags {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ModeFlags({=u32:#x})", self.bits());
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ModeType {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ModeType({=u32:#x})", self.bits());
    }
}

/// One direction of a timing, described by its porches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncTiming {
    /// Active pixels or lines
    pub active: u16,
    /// Blanking before the sync pulse
    pub front_porch: u16,
    /// Sync pulse width
    pub sync_width: u16,
    /// Blanking after the sync pulse
    pub back_porch: u16,
}

impl SyncTiming {
    /// Create a timing from its four components
    pub const fn new(active: u16, front_porch: u16, sync_width: u16, back_porch: u16) -> Self {
        Self {
            active,
            front_porch,
            sync_width,
            back_porch,
        }
    }
}

/// A timing/resolution configuration a display can be driven at
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayMode {
    /// Human readable name, "WxH" with an "i" suffix when interlaced
    pub name: String<MODE_NAME_LEN>,
    /// Pixel clock in kHz
    pub clock_khz: u32,
    pub hdisplay: u16,
    pub hsync_start: u16,
    pub hsync_end: u16,
    pub htotal: u16,
    pub vdisplay: u16,
    pub vsync_start: u16,
    pub vsync_end: u16,
    pub vtotal: u16,
    /// Sync polarity and scan flags
    pub flags: ModeFlags,
    /// Origin of the mode
    pub mode_type: ModeType,
}

impl DisplayMode {
    /// Build a mode from porch-style horizontal and vertical timings
    ///
    /// Totals saturate at `u16::MAX`; such modes fail validation later.
    pub fn from_timings(clock_khz: u32, h: SyncTiming, v: SyncTiming, flags: ModeFlags) -> Self {
        let hsync_start = h.active.saturating_add(h.front_porch);
        let hsync_end = hsync_start.saturating_add(h.sync_width);
        let vsync_start = v.active.saturating_add(v.front_porch);
        let vsync_end = vsync_start.saturating_add(v.sync_width);

        let mut mode = Self {
            name: String::new(),
            clock_khz,
            hdisplay: h.active,
            hsync_start,
            hsync_end,
            htotal: hsync_end.saturating_add(h.back_porch),
            vdisplay: v.active,
            vsync_start,
            vsync_end,
            vtotal: vsync_end.saturating_add(v.back_porch),
            flags,
            mode_type: ModeType::empty(),
        };
        mode.set_name();
        mode
    }

    /// Same mode with a different type
    pub fn with_type(mut self, mode_type: ModeType) -> Self {
        self.mode_type = mode_type;
        self
    }

    /// Regenerate the name from the active area
    pub fn set_name(&mut self) {
        self.name.clear();
        // Longest possible name fits in MODE_NAME_LEN
        let _ = write!(self.name, "{}x{}", self.hdisplay, self.vdisplay);
        if self.is_interlaced() {
            let _ = self.name.push('i');
        }
    }

    /// Vertical refresh rate in Hz, rounded to the closest integer
    pub fn refresh_hz(&self) -> u32 {
        let mut num = u64::from(self.clock_khz) * 1000;
        let mut den = u64::from(self.htotal) * u64::from(self.vtotal);
        if den == 0 {
            return 0;
        }
        if self.is_interlaced() {
            num *= 2;
        }
        if self.flags.contains(ModeFlags::DBLSCAN) {
            den *= 2;
        }
        u32::try_from((num + den / 2) / den).unwrap_or(u32::MAX)
    }

    /// Check if the mode is interlaced
    pub fn is_interlaced(&self) -> bool {
        self.flags.contains(ModeFlags::INTERLACE)
    }

    /// Check if the mode is marked preferred
    pub fn is_preferred(&self) -> bool {
        self.mode_type.contains(ModeType::PREFERRED)
    }

    /// Check the ordering of the sync positions
    ///
    /// `active <= sync_start <= sync_end <= total` must hold in both
    /// directions, and the active area and clock must be non-zero.
    pub fn is_well_formed(&self) -> bool {
        self.clock_khz != 0
            && self.hdisplay != 0
            && self.vdisplay != 0
            && self.hdisplay <= self.hsync_start
            && self.hsync_start <= self.hsync_end
            && self.hsync_end <= self.htotal
            && self.vdisplay <= self.vsync_start
            && self.vsync_start <= self.vsync_end
            && self.vsync_end <= self.vtotal
    }

    /// Compare timings, ignoring name and type
    pub fn same_timing(&self, other: &DisplayMode) -> bool {
        self.clock_khz == other.clock_khz
            && self.hdisplay == other.hdisplay
            && self.hsync_start == other.hsync_start
            && self.hsync_end == other.hsync_end
            && self.htotal == other.htotal
            && self.vdisplay == other.vdisplay
            && self.vsync_start == other.vsync_start
            && self.vsync_end == other.vsync_end
            && self.vtotal == other.vtotal
            && self.flags == other.flags
    }
}

/// Push a mode unless one with the same timing is already present
///
/// Returns true if the mode was added.
pub fn push_unique(list: &mut ModeList, mode: DisplayMode) -> bool {
    if list.iter().any(|m| m.same_timing(&mode)) {
        return false;
    }
    list.push(mode).is_ok()
}
