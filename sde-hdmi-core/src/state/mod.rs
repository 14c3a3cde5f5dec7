//! Device lifecycle state machine
//!
//! A display walks through device bring-up, DRM object creation and the
//! reverse teardown. The machine is explicit, finite and deterministic;
//! illegal orderings are reported instead of silently ignored.

pub mod events;
pub mod lifecycle;

pub use events::LifecycleEvent;
pub use lifecycle::{LifecycleError, LifecycleState};
