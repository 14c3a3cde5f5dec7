//! Backend and hardware traits
//!
//! [`DisplayBackend`] is what the connector framework calls into.
//! [`HdmiController`] is what a backend drives: the transmitter, its
//! DDC channel and its bridge.

pub mod backend;
pub mod controller;

pub use backend::{DisplayBackend, DisplayError};
pub use controller::{ControllerError, HdmiController};
