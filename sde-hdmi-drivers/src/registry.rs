//! Display registry
//!
//! Process-wide list of HDMI displays. Board code registers its
//! descriptors at boot; the display pipeline enumerates them through
//! [`num_of_displays`] and [`get_displays`].

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;

use sde_hdmi_core::config::MAX_DISPLAYS;
use sde_hdmi_core::traits::DisplayBackend;

use crate::null::NULL_DISPLAY;

/// Borrowed view of a registered display
pub type DisplayRef<'a> = &'a (dyn DisplayBackend + Sync);

/// Registry errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// `init` has not been called
    Uninitialized,
    /// No room for another display
    Full,
    /// A display with the same name is registered
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegistryState {
    Uninitialized,
    Disabled,
    Enabled,
}

struct Entries<'a, const N: usize> {
    state: RegistryState,
    displays: Vec<DisplayRef<'a>, N>,
}

/// Bounded registry of displays
pub struct DisplayRegistry<'a, const N: usize, M: RawMutex = CriticalSectionRawMutex> {
    entries: Mutex<M, RefCell<Entries<'a, N>>>,
}

impl<'a, const N: usize, M: RawMutex> DisplayRegistry<'a, N, M> {
    /// Create an uninitialized registry
    pub const fn new() -> Self {
        Self {
            entries: Mutex::new(RefCell::new(Entries {
                state: RegistryState::Uninitialized,
                displays: Vec::new(),
            })),
        }
    }

    fn with_entries<R>(&self, f: impl FnOnce(&mut Entries<'a, N>) -> R) -> R {
        self.entries.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Bring the registry up
    ///
    /// A disabled registry reports no displays and ignores registrations.
    pub fn init(&self, enabled: bool) {
        self.with_entries(|e| {
            e.displays.clear();
            e.state = if enabled {
                RegistryState::Enabled
            } else {
                RegistryState::Disabled
            };
        });
        debug!("display registry up, enabled={}", enabled);
    }

    /// Drop every display and return to the uninitialized state
    pub fn teardown(&self) {
        self.with_entries(|e| {
            e.displays.clear();
            e.state = RegistryState::Uninitialized;
        });
    }

    /// Check if registrations are accepted
    pub fn is_enabled(&self) -> bool {
        self.with_entries(|e| e.state == RegistryState::Enabled)
    }

    /// Add a display
    pub fn register(&self, display: DisplayRef<'a>) -> Result<(), RegistryError> {
        self.with_entries(|e| match e.state {
            RegistryState::Uninitialized => Err(RegistryError::Uninitialized),
            RegistryState::Disabled => Ok(()),
            RegistryState::Enabled => {
                if e.displays.iter().any(|d| d.name() == display.name()) {
                    return Err(RegistryError::Duplicate);
                }
                e.displays.push(display).map_err(|_| RegistryError::Full)?;
                info!("registered display {}", display.name());
                Ok(())
            }
        })
    }

    /// Remove a display by name
    ///
    /// Returns true if it was registered.
    pub fn unregister(&self, name: &str) -> bool {
        self.with_entries(|e| {
            match e.displays.iter().position(|d| d.name() == name) {
                Some(index) => {
                    e.displays.remove(index);
                    true
                }
                None => false,
            }
        })
    }

    /// Look up a display by name
    pub fn find(&self, name: &str) -> Option<DisplayRef<'a>> {
        self.with_entries(|e| e.displays.iter().copied().find(|d| d.name() == name))
    }

    /// Number of registered displays
    pub fn count(&self) -> usize {
        self.with_entries(|e| e.displays.len())
    }

    /// Copy out registered displays in registration order
    ///
    /// Writes at most `max` entries and never past the end of `out`.
    /// Returns the number written.
    pub fn get_displays(&self, out: &mut [Option<DisplayRef<'a>>], max: usize) -> usize {
        self.with_entries(|e| {
            let n = e.displays.len().min(max).min(out.len());
            for (slot, display) in out.iter_mut().zip(e.displays.iter()).take(n) {
                *slot = Some(*display);
            }
            n
        })
    }
}

impl<'a, const N: usize, M: RawMutex> Default for DisplayRegistry<'a, N, M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Global display registry
pub static DISPLAYS: DisplayRegistry<'static, MAX_DISPLAYS> = DisplayRegistry::new();

/// Number of displays in the global registry
pub fn num_of_displays() -> u32 {
    DISPLAYS.count() as u32
}

/// Enumerate the global registry
pub fn get_displays(out: &mut [Option<DisplayRef<'static>>], max: usize) -> usize {
    DISPLAYS.get_displays(out, max)
}

/// Pick the backend for the connector framework
///
/// With HDMI support disabled the framework talks to the null backend.
pub fn select_backend<'a>(enabled: bool, display: DisplayRef<'a>) -> DisplayRef<'a> {
    if enabled {
        display
    } else {
        &NULL_DISPLAY
    }
}
