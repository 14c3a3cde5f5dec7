//! Events that drive lifecycle transitions

/// Lifecycle operations requested by the display framework
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleEvent {
    /// Acquire hardware, clock and power resources
    DevInit,
    /// Create and wire the connector/bridge to an encoder
    DrmInit,
    /// Destroy the DRM-facing objects
    DrmDeinit,
    /// Release all device resources
    DevDeinit,
}
