//! HDMI display descriptor
//!
//! One [`SdeHdmi`] exists per HDMI output. Two locks guard it. The
//! controller sits behind an async mutex and is held across bus transfers
//! and power sequencing. Everything the connector framework and the hotplug
//! worker share sits behind a blocking mutex that is only held for short
//! updates, never across controller I/O.
//!
//! Lifecycle operations take the controller lock first and the state lock
//! inside it, which serializes them against each other.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --dev_init--> DevInitialized --drm_init--> DrmInitialized
//!                                   ^                          |
//!                                   |                      drm_deinit
//!                                dev_init                      v
//!                                   |                   DrmDeinitialized
//!                            DevDeinitialized <--dev_deinit----'
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embassy_sync::signal::Signal;
use heapless::{String, Vec};

use sde_hdmi_core::config::{DisplayConfig, MAX_LABEL_LEN, MAX_NODE_LEN};
use sde_hdmi_core::connector::{Connector, ConnectorInfo, ConnectorStatus, EncoderHandle};
use sde_hdmi_core::edid::{read_edid, Edid, MAX_EDID_LEN};
use sde_hdmi_core::info::{DisplayCaps, DisplayInfo};
use sde_hdmi_core::mode::{
    failsafe_mode, validate, DisplayMode, ModeLimits, ModeList, ModeStatus, ModeType,
};
use sde_hdmi_core::state::{LifecycleEvent, LifecycleState};
use sde_hdmi_core::traits::{DisplayBackend, DisplayError, HdmiController};

use crate::debug::DebugRoot;
use crate::hotplug::HpdEvent;

/// Controller handle of a display
pub struct SdeHdmiCtrl<C, M: RawMutex = CriticalSectionRawMutex> {
    /// Transmitter driving the output
    pub ctrl: Mutex<M, C>,
    /// Device-tree node of the controller
    pub of_node: String<MAX_NODE_LEN>,
    /// Controller index
    pub ctrl_idx: u32,
}

/// State shared with the hotplug worker
pub(crate) struct Inner {
    pub(crate) state: LifecycleState,
    pub(crate) modes: ModeList,
    pub(crate) connected: bool,
    pub(crate) tpg_enabled: bool,
    pub(crate) encoder: Option<EncoderHandle>,
    /// Physical size reported by the attached sink
    pub(crate) sink_size: (u32, u32),
    pub(crate) sink_is_hdmi: bool,
    pub(crate) debug: Option<DebugRoot>,
}

impl Inner {
    /// Forget what was learned from the sink
    pub(crate) fn drop_sink(&mut self) {
        self.sink_size = (0, 0);
        self.sink_is_hdmi = false;
    }
}

/// HDMI display descriptor
pub struct SdeHdmi<C, M: RawMutex = CriticalSectionRawMutex> {
    pub(crate) name: String<MAX_LABEL_LEN>,
    pub(crate) display_type: String<MAX_LABEL_LEN>,
    pub(crate) non_pluggable: bool,
    edid_supported: bool,
    width_mm: u32,
    height_mm: u32,
    /// Configured ceiling clamped to what the controller can drive
    max_clock_khz: u32,
    pub(crate) ctrl: SdeHdmiCtrl<C, M>,
    pub(crate) inner: BlockingMutex<M, RefCell<Inner>>,
    pub(crate) hpd_work: Signal<M, HpdEvent>,
}

impl<C: HdmiController, M: RawMutex> SdeHdmi<C, M> {
    /// Create a descriptor from its configuration
    ///
    /// Configured modes are cached for non-pluggable panels; the first one
    /// is marked preferred.
    pub fn new(config: &DisplayConfig, ctrl: C) -> Result<Self, DisplayError> {
        config.validate().map_err(|e| {
            warn!("{}: invalid configuration: {:?}", config.name.as_str(), e);
            DisplayError::InvalidConfig
        })?;

        let mut modes = ModeList::new();
        if config.non_pluggable {
            for mode in &config.modes {
                let mut mode = mode.to_mode();
                if modes.is_empty() {
                    mode.mode_type |= ModeType::PREFERRED;
                }
                // Capacity is checked by the config limits
                let _ = modes.push(mode);
            }
        }

        Ok(Self {
            name: config.name.clone(),
            display_type: config.display_type.clone(),
            non_pluggable: config.non_pluggable,
            edid_supported: config.edid_supported,
            width_mm: config.width_mm,
            height_mm: config.height_mm,
            max_clock_khz: config.max_pixel_clock_khz.min(ctrl.max_pixel_clock_khz()),
            ctrl: SdeHdmiCtrl {
                ctrl: Mutex::new(ctrl),
                of_node: config.of_node.clone(),
                ctrl_idx: config.ctrl_idx,
            },
            inner: BlockingMutex::new(RefCell::new(Inner {
                state: LifecycleState::Uninitialized,
                modes,
                connected: false,
                tpg_enabled: false,
                encoder: None,
                sink_size: (0, 0),
                sink_is_hdmi: false,
                debug: None,
            })),
            hpd_work: Signal::new(),
        })
    }

    /// Run `f` with the state lock held
    pub(crate) fn with_inner<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Readiness and cached connection status
    fn snapshot(&self) -> (bool, bool) {
        self.with_inner(|inner| (inner.state.is_device_ready(), inner.connected))
    }

    /// Take the controller without waiting
    fn lock_ctrl(&self) -> Result<MutexGuard<'_, M, C>, DisplayError> {
        self.ctrl.ctrl.try_lock().map_err(|_| {
            debug!("{}: controller busy", self.name.as_str());
            DisplayError::Busy
        })
    }

    /// Run `f` on the controller if no other operation holds it
    pub fn with_controller<R>(&self, f: impl FnOnce(&mut C) -> R) -> Result<R, DisplayError> {
        let mut ctrl = self.lock_ctrl()?;
        Ok(f(&mut ctrl))
    }

    /// Wait for the controller
    pub async fn controller(&self) -> MutexGuard<'_, M, C> {
        self.ctrl.ctrl.lock().await
    }

    /// Display type label
    pub fn display_type(&self) -> &str {
        &self.display_type
    }

    /// Check if the panel is permanently attached
    pub fn is_non_pluggable(&self) -> bool {
        self.non_pluggable
    }

    /// Check if modes are read from the sink's EDID
    pub fn is_edid_supported(&self) -> bool {
        !self.non_pluggable && self.edid_supported
    }

    /// Controller index
    pub fn ctrl_idx(&self) -> u32 {
        self.ctrl.ctrl_idx
    }

    /// Current lifecycle state
    pub fn state(&self) -> LifecycleState {
        self.with_inner(|inner| inner.state)
    }

    /// Cached connection status
    pub fn is_connected(&self) -> bool {
        self.with_inner(|inner| inner.connected)
    }

    /// Check if the test pattern generator is enabled
    pub fn is_tpg_enabled(&self) -> bool {
        self.with_inner(|inner| inner.tpg_enabled)
    }

    /// Number of cached modes
    pub fn num_of_modes(&self) -> usize {
        self.with_inner(|inner| inner.modes.len())
    }

    /// Check if the last EDID read declared an HDMI sink
    pub fn sink_is_hdmi(&self) -> bool {
        self.with_inner(|inner| inner.sink_is_hdmi)
    }

    /// Encoder the display is bound to
    pub fn encoder(&self) -> Option<EncoderHandle> {
        self.with_inner(|inner| inner.encoder)
    }

    /// Enable or disable the test pattern generator
    pub fn set_tpg(&self, enabled: bool) -> Result<(), DisplayError> {
        let mut ctrl = self.lock_ctrl()?;
        if !self.state().is_device_ready() {
            return Err(DisplayError::NotInitialized);
        }
        ctrl.set_tpg(enabled)?;
        self.with_inner(|inner| inner.tpg_enabled = enabled);
        info!("{}: test pattern {}", self.name.as_str(), enabled);
        Ok(())
    }

    /// Unbind framework objects; state is left to the caller
    fn teardown_drm(&self, ctrl: &mut C) {
        ctrl.unbind();
        let root = self.with_inner(|inner| {
            inner.encoder = None;
            inner.debug.take()
        });
        if let Some(root) = root {
            debug!("{}: removed debug root {}", self.name.as_str(), root.path());
        }
    }

    /// Read and parse the sink's EDID, adding its modes to the connector
    fn probe_edid(&self, connector: &mut Connector) -> usize {
        let mut raw: Vec<u8, MAX_EDID_LEN> = Vec::new();
        {
            let Ok(mut ctrl) = self.lock_ctrl() else {
                return 0;
            };
            if let Err(e) = read_edid(&mut *ctrl, &mut raw) {
                warn!("{}: EDID read failed: {:?}", self.name.as_str(), e);
                return 0;
            }
        }
        let edid = match Edid::parse(&raw) {
            Ok(edid) => edid,
            Err(e) => {
                warn!("{}: EDID invalid: {:?}", self.name.as_str(), e);
                return 0;
            }
        };

        // The sink may have left while the bus was busy
        let attached = self.with_inner(|inner| {
            if !inner.state.is_device_ready() || !inner.connected {
                return false;
            }
            inner.sink_size = (edid.width_mm, edid.height_mm);
            inner.sink_is_hdmi = edid.is_hdmi;
            true
        });
        if !attached {
            debug!("{}: sink removed during EDID read", self.name.as_str());
            return 0;
        }

        connector.set_physical_size(edid.width_mm, edid.height_mm);
        debug!(
            "{}: sink {} {}x{} mm, hdmi={}",
            self.name.as_str(),
            edid.manufacturer_str(),
            edid.width_mm,
            edid.height_mm,
            edid.is_hdmi
        );

        edid.modes
            .into_iter()
            .filter(|mode| connector.probed_add(mode.clone()))
            .count()
    }
}

impl<C: HdmiController, M: RawMutex> DisplayBackend for SdeHdmi<C, M> {
    fn name(&self) -> &str {
        &self.name
    }

    fn connector_pre_deinit(&self, connector: &mut Connector) -> Result<(), DisplayError> {
        let mut ctrl = self.lock_ctrl()?;
        if self.is_tpg_enabled() {
            ctrl.set_tpg(false)?;
            self.with_inner(|inner| inner.tpg_enabled = false);
        }
        connector.clear_probed();
        connector.detach_driver();
        Ok(())
    }

    fn connector_post_init(
        &self,
        connector: &mut Connector,
        info: &mut ConnectorInfo,
    ) -> Result<(), DisplayError> {
        if !self.with_inner(|inner| inner.state.is_bound()) {
            return Err(DisplayError::NotBound);
        }

        // Published all together or not at all
        let mut staged = info.clone();
        staged.add_str("display type", &self.display_type)?;
        staged.add_str("hot plug", if self.non_pluggable { "no" } else { "yes" })?;
        staged.add_str("edid", if self.is_edid_supported() { "yes" } else { "no" })?;
        staged.add_u32("max pixel clock", self.max_clock_khz)?;
        *info = staged;

        connector.attach_driver(&self.name);
        if self.non_pluggable {
            connector.set_physical_size(self.width_mm, self.height_mm);
        }
        Ok(())
    }

    fn detect(&self, _connector: &Connector, force: bool) -> ConnectorStatus {
        let (ready, connected) = self.snapshot();
        if !ready {
            return ConnectorStatus::Unknown;
        }
        if self.non_pluggable {
            return ConnectorStatus::Connected;
        }
        if !force {
            return ConnectorStatus::from_connected(connected);
        }

        let Ok(mut ctrl) = self.lock_ctrl() else {
            return ConnectorStatus::from_connected(connected);
        };
        let level = ctrl.hpd_asserted();
        self.with_inner(|inner| {
            if !inner.state.is_device_ready() {
                return ConnectorStatus::Unknown;
            }
            if inner.connected && !level {
                inner.drop_sink();
            }
            inner.connected = level;
            ConnectorStatus::from_connected(level)
        })
    }

    fn get_modes(&self, connector: &mut Connector) -> usize {
        let (ready, connected) = self.snapshot();
        if !ready {
            return 0;
        }
        if self.non_pluggable {
            connector.set_physical_size(self.width_mm, self.height_mm);
            return self.with_inner(|inner| {
                inner
                    .modes
                    .iter()
                    .filter(|mode| connector.probed_add((*mode).clone()))
                    .count()
            });
        }
        if !connected {
            return 0;
        }
        if !self.edid_supported {
            return usize::from(connector.probed_add(failsafe_mode()));
        }
        self.probe_edid(connector)
    }

    fn mode_valid(&self, _connector: &Connector, mode: &DisplayMode) -> ModeStatus {
        let limits = ModeLimits::with_max_clock(self.max_clock_khz);
        let status = validate(mode, &limits);
        if !status.is_ok() {
            return status;
        }
        if self.non_pluggable
            && !self.with_inner(|inner| inner.modes.iter().any(|m| m.same_timing(mode)))
        {
            return ModeStatus::NoMode;
        }
        ModeStatus::Ok
    }

    fn dev_init(&self) -> Result<(), DisplayError> {
        let mut ctrl = self.lock_ctrl()?;
        let next = self.with_inner(|inner| inner.state.transition(LifecycleEvent::DevInit))?;
        ctrl.acquire_resources().map_err(|e| {
            error!("{}: resources unavailable: {:?}", self.name.as_str(), e);
            e
        })?;

        // Levels queued before the sample below are stale
        self.hpd_work.reset();
        let connected = self.non_pluggable || ctrl.hpd_asserted();
        self.with_inner(|inner| {
            inner.connected = connected;
            inner.state = next;
        });
        info!(
            "{}: device initialized, ctrl {} connected={}",
            self.name.as_str(),
            self.ctrl.ctrl_idx,
            connected
        );
        Ok(())
    }

    fn dev_deinit(&self) -> Result<(), DisplayError> {
        let mut ctrl = self.lock_ctrl()?;
        let mut state = self.state();
        if state == LifecycleState::DevDeinitialized {
            return Ok(());
        }
        if state.is_bound() {
            debug!("{}: tearing down bound objects", self.name.as_str());
            self.teardown_drm(&mut ctrl);
            state = state.transition(LifecycleEvent::DrmDeinit)?;
            self.with_inner(|inner| inner.state = state);
        }
        let next = state.transition(LifecycleEvent::DevDeinit)?;

        ctrl.release_resources();
        self.hpd_work.reset();
        self.with_inner(|inner| {
            inner.connected = false;
            inner.tpg_enabled = false;
            inner.drop_sink();
            inner.state = next;
        });
        info!("{}: device deinitialized", self.name.as_str());
        Ok(())
    }

    fn drm_init(&self, encoder: EncoderHandle) -> Result<(), DisplayError> {
        let mut ctrl = self.lock_ctrl()?;
        let next = self.with_inner(|inner| inner.state.transition(LifecycleEvent::DrmInit))?;
        ctrl.bind(encoder)?;

        let root = DebugRoot::new(&self.name);
        debug!("{}: created debug root {}", self.name.as_str(), root.path());
        self.with_inner(|inner| {
            inner.encoder = Some(encoder);
            inner.debug = Some(root);
            inner.state = next;
        });
        Ok(())
    }

    fn drm_deinit(&self) -> Result<(), DisplayError> {
        let mut ctrl = self.lock_ctrl()?;
        let state = self.state();
        let next = state.transition(LifecycleEvent::DrmDeinit)?;
        if state.is_bound() {
            self.teardown_drm(&mut ctrl);
        }
        self.with_inner(|inner| inner.state = next);
        Ok(())
    }

    fn get_info(&self) -> Result<DisplayInfo, DisplayError> {
        self.with_inner(|inner| {
            if !inner.state.is_device_ready() {
                return Err(DisplayError::NotInitialized);
            }

            let (width_mm, height_mm) = if self.non_pluggable {
                (self.width_mm, self.height_mm)
            } else {
                inner.sink_size
            };

            let mut capabilities = DisplayCaps::VID_MODE;
            if !self.non_pluggable {
                capabilities |= DisplayCaps::HOT_PLUG;
            }
            if self.is_edid_supported() {
                capabilities |= DisplayCaps::EDID;
            }

            Ok(DisplayInfo {
                display_type: self.display_type.clone(),
                is_hot_pluggable: !self.non_pluggable,
                is_connected: inner.connected,
                is_edid_supported: self.is_edid_supported(),
                width_mm,
                height_mm,
                h_tile_instance: self.ctrl.ctrl_idx,
                capabilities,
            })
        })
    }
}
