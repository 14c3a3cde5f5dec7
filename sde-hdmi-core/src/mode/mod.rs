//! Display modes
//!
//! Timing descriptions, the CEA-861 short video descriptor table and the
//! policy deciding whether the transmitter can drive a mode.

pub mod cea;
pub mod display_mode;
pub mod validate;

pub use cea::{cea_mode, failsafe_mode};
pub use display_mode::{DisplayMode, ModeFlags, ModeList, ModeType, SyncTiming, MAX_MODES};
pub use validate::{validate, ModeLimits, ModeStatus};
