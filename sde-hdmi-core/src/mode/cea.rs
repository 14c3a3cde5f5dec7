//! CEA-861 video identification codes
//!
//! Only progressive formats are listed; interlaced VICs are never driven.

use super::display_mode::{DisplayMode, ModeFlags, ModeType, SyncTiming};

struct VicEntry {
    vic: u8,
    clock_khz: u32,
    h: SyncTiming,
    v: SyncTiming,
    positive_sync: bool,
}

const fn vic(
    vic: u8,
    clock_khz: u32,
    h: (u16, u16, u16, u16),
    v: (u16, u16, u16, u16),
    positive_sync: bool,
) -> VicEntry {
    VicEntry {
        vic,
        clock_khz,
        h: SyncTiming::new(h.0, h.1, h.2, h.3),
        v: SyncTiming::new(v.0, v.1, v.2, v.3),
        positive_sync,
    }
}

#[rustfmt::skip]
static VIC_TABLE: &[VicEntry] = &[
    vic(1,  25_175,  (640, 16, 96, 48),      (480, 10, 2, 33),  false),
    vic(2,  27_000,  (720, 16, 62, 60),      (480, 9, 6, 30),   false),
    vic(3,  27_000,  (720, 16, 62, 60),      (480, 9, 6, 30),   false),
    vic(4,  74_250,  (1280, 110, 40, 220),   (720, 5, 5, 20),   true),
    vic(16, 148_500, (1920, 88, 44, 148),    (1080, 4, 5, 36),  true),
    vic(17, 27_000,  (720, 12, 64, 68),      (576, 5, 5, 39),   false),
    vic(18, 27_000,  (720, 12, 64, 68),      (576, 5, 5, 39),   false),
    vic(19, 74_250,  (1280, 440, 40, 220),   (720, 5, 5, 20),   true),
    vic(31, 148_500, (1920, 528, 44, 148),   (1080, 4, 5, 36),  true),
    vic(32, 74_250,  (1920, 638, 44, 148),   (1080, 4, 5, 36),  true),
    vic(33, 74_250,  (1920, 528, 44, 148),   (1080, 4, 5, 36),  true),
    vic(34, 74_250,  (1920, 88, 44, 148),    (1080, 4, 5, 36),  true),
    vic(93, 297_000, (3840, 1276, 88, 296),  (2160, 8, 10, 72), true),
    vic(94, 297_000, (3840, 1056, 88, 296),  (2160, 8, 10, 72), true),
    vic(95, 297_000, (3840, 176, 88, 296),   (2160, 8, 10, 72), true),
    vic(97, 594_000, (3840, 176, 88, 296),   (2160, 8, 10, 72), true),
];

/// Look up the timing of a video identification code
pub fn cea_mode(code: u8) -> Option<DisplayMode> {
    VIC_TABLE.iter().find(|e| e.vic == code).map(|e| {
        let flags = if e.positive_sync {
            ModeFlags::PHSYNC | ModeFlags::PVSYNC
        } else {
            ModeFlags::NHSYNC | ModeFlags::NVSYNC
        };
        DisplayMode::from_timings(e.clock_khz, e.h, e.v, flags).with_type(ModeType::DRIVER)
    })
}

/// 640x480@60, which every HDMI sink must accept
pub fn failsafe_mode() -> DisplayMode {
    DisplayMode::from_timings(
        25_175,
        SyncTiming::new(640, 16, 96, 48),
        SyncTiming::new(480, 10, 2, 33),
        ModeFlags::NHSYNC | ModeFlags::NVSYNC,
    )
    .with_type(ModeType::DRIVER)
}
