//! Lifecycle states and transitions

use super::events::LifecycleEvent;

/// Lifecycle states of a display device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleState {
    /// Descriptor created, no resources held
    #[default]
    Uninitialized,
    /// Hardware resources acquired
    DevInitialized,
    /// Connector/bridge bound to an encoder
    DrmInitialized,
    /// DRM objects torn down, hardware still held
    DrmDeinitialized,
    /// All resources released
    DevDeinitialized,
}

/// Illegal lifecycle orderings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleError {
    /// Operation needs `dev_init` first
    DeviceNotInitialized,
    /// `dev_init` on a device that is already up
    AlreadyInitialized,
    /// `drm_init` while DRM objects exist
    AlreadyBound,
    /// `drm_deinit` without a prior `drm_init`
    NotBound,
}

impl LifecycleState {
    /// Check if hardware resources are held
    pub fn is_device_ready(&self) -> bool {
        matches!(
            self,
            LifecycleState::DevInitialized
                | LifecycleState::DrmInitialized
                | LifecycleState::DrmDeinitialized
        )
    }

    /// Check if DRM objects are currently bound
    pub fn is_bound(&self) -> bool {
        matches!(self, LifecycleState::DrmInitialized)
    }

    /// Process an event and return the next state
    ///
    /// Repeating `drm_deinit` or `dev_deinit` is accepted and leaves the
    /// state unchanged. `dev_deinit` is accepted from every state that
    /// holds hardware, including while DRM objects are bound; the caller
    /// tears them down first.
    pub fn transition(self, event: LifecycleEvent) -> Result<Self, LifecycleError> {
        use LifecycleEvent::*;
        use LifecycleState::*;

        match (self, event) {
            (Uninitialized | DevDeinitialized, DevInit) => Ok(DevInitialized),
            (DevInitialized | DrmInitialized | DrmDeinitialized, DevInit) => {
                Err(LifecycleError::AlreadyInitialized)
            }

            (DevInitialized | DrmDeinitialized, DrmInit) => Ok(DrmInitialized),
            (DrmInitialized, DrmInit) => Err(LifecycleError::AlreadyBound),
            (Uninitialized | DevDeinitialized, DrmInit) => {
                Err(LifecycleError::DeviceNotInitialized)
            }

            (DrmInitialized | DrmDeinitialized, DrmDeinit) => Ok(DrmDeinitialized),
            (Uninitialized | DevInitialized | DevDeinitialized, DrmDeinit) => {
                Err(LifecycleError::NotBound)
            }

            (DevInitialized | DrmInitialized | DrmDeinitialized | DevDeinitialized, DevDeinit) => {
                Ok(DevDeinitialized)
            }
            (Uninitialized, DevDeinit) => Err(LifecycleError::DeviceNotInitialized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LifecycleEvent::*;

    #[test]
    fn test_full_lifecycle() {
        let state = LifecycleState::default();
        let state = state.transition(DevInit).unwrap();
        assert_eq!(state, LifecycleState::DevInitialized);
        let state = state.transition(DrmInit).unwrap();
        assert_eq!(state, LifecycleState::DrmInitialized);
        let state = state.transition(DrmDeinit).unwrap();
        assert_eq!(state, LifecycleState::DrmDeinitialized);
        let state = state.transition(DevDeinit).unwrap();
        assert_eq!(state, LifecycleState::DevDeinitialized);
    }

    #[test]
    fn test_drm_init_before_dev_init_fails() {
        assert_eq!(
            LifecycleState::Uninitialized.transition(DrmInit),
            Err(LifecycleError::DeviceNotInitialized)
        );
        assert_eq!(
            LifecycleState::DevDeinitialized.transition(DrmInit),
            Err(LifecycleError::DeviceNotInitialized)
        );
    }

    #[test]
    fn test_repeated_teardown_is_idempotent() {
        let state = LifecycleState::DrmDeinitialized;
        assert_eq!(state.transition(DrmDeinit), Ok(state));

        let state = LifecycleState::DevDeinitialized;
        assert_eq!(state.transition(DevDeinit), Ok(state));
    }

    #[test]
    fn test_dev_deinit_without_drm() {
        assert_eq!(
            LifecycleState::DevInitialized.transition(DevDeinit),
            Ok(LifecycleState::DevDeinitialized)
        );
        assert_eq!(
            LifecycleState::DrmInitialized.transition(DevDeinit),
            Ok(LifecycleState::DevDeinitialized)
        );
        assert_eq!(
            LifecycleState::Uninitialized.transition(DevDeinit),
            Err(LifecycleError::DeviceNotInitialized)
        );
    }

    #[test]
    fn test_rebind_and_reprobe() {
        assert_eq!(
            LifecycleState::DrmDeinitialized.transition(DrmInit),
            Ok(LifecycleState::DrmInitialized)
        );
        assert_eq!(
            LifecycleState::DevDeinitialized.transition(DevInit),
            Ok(LifecycleState::DevInitialized)
        );
    }

    #[test]
    fn test_illegal_orderings() {
        assert_eq!(
            LifecycleState::DrmInitialized.transition(DrmInit),
            Err(LifecycleError::AlreadyBound)
        );
        assert_eq!(
            LifecycleState::DevInitialized.transition(DrmDeinit),
            Err(LifecycleError::NotBound)
        );
        assert_eq!(
            LifecycleState::DrmInitialized.transition(DevInit),
            Err(LifecycleError::AlreadyInitialized)
        );
    }

    #[test]
    fn test_state_queries() {
        assert!(!LifecycleState::Uninitialized.is_device_ready());
        assert!(LifecycleState::DevInitialized.is_device_ready());
        assert!(LifecycleState::DrmDeinitialized.is_device_ready());
        assert!(!LifecycleState::DevDeinitialized.is_device_ready());
        assert!(LifecycleState::DrmInitialized.is_bound());
        assert!(!LifecycleState::DrmDeinitialized.is_bound());
    }
}
