//! Debug inspection
//!
//! A descriptor gets a debug root while it is bound to an encoder. The
//! dump gives a text view of the descriptor for a debug console.

use core::fmt::{self, Write};

use embassy_sync::blocking_mutex::raw::RawMutex;
use heapless::String;

use sde_hdmi_core::config::MAX_NODE_LEN;
use sde_hdmi_core::traits::HdmiController;

use crate::display::SdeHdmi;

/// Debug directory created for a bound display
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebugRoot {
    path: String<MAX_NODE_LEN>,
}

impl DebugRoot {
    /// Root for a display name
    pub fn new(name: &str) -> Self {
        let mut path = String::new();
        // Names are bounded well below the path length
        let _ = write!(path, "sde_hdmi/{}", name);
        Self { path }
    }

    /// Path of the root
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl<C: HdmiController, M: RawMutex> SdeHdmi<C, M> {
    /// Debug root, present between `drm_init` and `drm_deinit`
    pub fn debug_root(&self) -> Option<DebugRoot> {
        self.with_inner(|inner| inner.debug.clone())
    }

    /// Write a text view of the descriptor
    pub fn dump<W: Write>(&self, w: &mut W) -> fmt::Result {
        self.with_inner(|inner| {
            writeln!(w, "name: {}", self.name)?;
            writeln!(w, "type: {}", self.display_type)?;
            writeln!(w, "ctrl: {} ({})", self.ctrl.ctrl_idx, self.ctrl.of_node)?;
            writeln!(w, "state: {:?}", inner.state)?;
            writeln!(w, "non_pluggable: {}", self.non_pluggable)?;
            writeln!(w, "connected: {}", inner.connected)?;
            writeln!(w, "tpg: {}", inner.tpg_enabled)?;
            writeln!(w, "modes: {}", inner.modes.len())?;
            for mode in &inner.modes {
                writeln!(
                    w,
                    "  {} {} kHz {}Hz",
                    mode.name,
                    mode.clock_khz,
                    mode.refresh_hz()
                )?;
            }
            Ok(())
        })
    }
}
