//! Shared test doubles

use critical_section as _;
use heapless::{String, Vec};

use sde_hdmi_core::config::{DisplayConfig, ModeConfig};
use sde_hdmi_core::connector::EncoderHandle;
use sde_hdmi_core::edid::{EDID_HEADER, MAX_EDID_LEN};
use sde_hdmi_core::traits::{ControllerError, HdmiController};

pub const ENCODER: EncoderHandle = EncoderHandle {
    id: 40,
    possible_crtcs: 0b11,
};

/// Scripted transmitter
#[derive(Debug)]
pub struct MockController {
    pub powered: bool,
    pub hpd: bool,
    pub tpg: bool,
    pub encoder: Option<EncoderHandle>,
    pub edid: Vec<u8, MAX_EDID_LEN>,
    pub max_clock_khz: u32,
    pub acquire_error: Option<ControllerError>,
    pub tpg_error: Option<ControllerError>,
    pub edid_error: Option<ControllerError>,
    pub acquire_calls: u32,
    pub release_calls: u32,
    pub edid_reads: u32,
}

impl Default for MockController {
    fn default() -> Self {
        Self {
            powered: false,
            hpd: false,
            tpg: false,
            encoder: None,
            edid: Vec::new(),
            max_clock_khz: 297_000,
            acquire_error: None,
            tpg_error: None,
            edid_error: None,
            acquire_calls: 0,
            release_calls: 0,
            edid_reads: 0,
        }
    }
}

impl MockController {
    /// Controller with a monitor plugged in
    pub fn with_sink() -> Self {
        let mut edid = Vec::new();
        edid.extend_from_slice(&monitor_edid()).unwrap();
        Self {
            hpd: true,
            edid,
            ..Default::default()
        }
    }
}

impl HdmiController for MockController {
    fn acquire_resources(&mut self) -> Result<(), ControllerError> {
        self.acquire_calls += 1;
        if let Some(e) = self.acquire_error {
            return Err(e);
        }
        self.powered = true;
        Ok(())
    }

    fn release_resources(&mut self) {
        self.release_calls += 1;
        self.powered = false;
        self.tpg = false;
    }

    fn hpd_asserted(&mut self) -> bool {
        self.powered && self.hpd
    }

    fn read_edid_block(&mut self, block: u8, buf: &mut [u8; 128]) -> Result<(), ControllerError> {
        self.edid_reads += 1;
        if let Some(e) = self.edid_error {
            return Err(e);
        }
        let start = usize::from(block) * 128;
        let data = self
            .edid
            .get(start..start + 128)
            .ok_or(ControllerError::DdcNack)?;
        buf.copy_from_slice(data);
        Ok(())
    }

    fn set_tpg(&mut self, enabled: bool) -> Result<(), ControllerError> {
        if let Some(e) = self.tpg_error {
            return Err(e);
        }
        self.tpg = enabled;
        Ok(())
    }

    fn bind(&mut self, encoder: EncoderHandle) -> Result<(), ControllerError> {
        if self.encoder.is_some() {
            return Err(ControllerError::BridgeUnavailable);
        }
        self.encoder = Some(encoder);
        Ok(())
    }

    fn unbind(&mut self) {
        self.encoder = None;
    }

    fn max_pixel_clock_khz(&self) -> u32 {
        self.max_clock_khz
    }
}

/// EDID base block of a 52x29 cm monitor with a 1080p preferred timing
/// and the 640x480 established timing
pub fn monitor_edid() -> [u8; 128] {
    let mut b = [0u8; 128];
    b[..8].copy_from_slice(&EDID_HEADER);
    // "SAM"
    b[8] = 0x4C;
    b[9] = 0x2D;
    b[18] = 1;
    b[19] = 3;
    b[21] = 52;
    b[22] = 29;
    b[35] = 0x20;
    b[54..72].copy_from_slice(&[
        0x02, 0x3A, 0x80, 0x18, 0x71, 0x38, 0x2D, 0x40, 0x58, 0x2C, 0x45, 0x00, 0x0F, 0x28,
        0x21, 0x00, 0x00, 0x1E,
    ]);
    b[72..77].copy_from_slice(&[0, 0, 0, 0xFC, 0]);
    b[77..90].copy_from_slice(b"SDE MONITOR\n ");
    let sum = b[..127].iter().fold(0u8, |acc, x| acc.wrapping_add(*x));
    b[127] = 0u8.wrapping_sub(sum);
    b
}

pub fn mode(h: (u16, u16, u16, u16), v: (u16, u16, u16, u16), clock_khz: u32) -> ModeConfig {
    let total = u32::from(h.0 + h.1 + h.2 + h.3) * u32::from(v.0 + v.1 + v.2 + v.3);
    ModeConfig {
        h_active: h.0,
        h_front_porch: h.1,
        h_pulse_width: h.2,
        h_back_porch: h.3,
        h_active_high: true,
        v_active: v.0,
        v_front_porch: v.1,
        v_pulse_width: v.2,
        v_back_porch: v.3,
        v_active_high: true,
        refresh_rate: (clock_khz * 1000 + total / 2) / total,
        clock_khz,
    }
}

/// Fixed 160x90 mm panel with 1080p60 and 720p60
pub fn panel() -> DisplayConfig {
    let mut modes = Vec::new();
    modes
        .push(mode((1920, 88, 44, 148), (1080, 4, 5, 36), 148_500))
        .unwrap();
    modes
        .push(mode((1280, 110, 40, 220), (720, 5, 5, 20), 74_250))
        .unwrap();
    DisplayConfig {
        name: String::try_from("hdmi_panel").unwrap(),
        display_type: String::try_from("secondary").unwrap(),
        ctrl_idx: 1,
        of_node: String::try_from("/soc/hdmi@1").unwrap(),
        non_pluggable: true,
        width_mm: 160,
        height_mm: 90,
        modes,
        ..Default::default()
    }
}

/// Hot-pluggable output reading EDID
pub fn monitor() -> DisplayConfig {
    monitor_named("hdmi_display")
}

pub fn monitor_named(name: &str) -> DisplayConfig {
    DisplayConfig {
        name: String::try_from(name).unwrap(),
        display_type: String::try_from("primary").unwrap(),
        ctrl_idx: 0,
        of_node: String::try_from("/soc/hdmi@0").unwrap(),
        ..Default::default()
    }
}
