//! SDE HDMI Hardware Abstraction Layer
//!
//! This crate defines the board-facing traits an HDMI transmitter needs.
//! Chip-specific code implements them; the display backend only ever sees
//! the traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Display backend (sde-hdmi-drivers)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  sde-hdmi-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  SoC-specific │       │  embedded-hal │
//! │     HAL       │       │    adapter    │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - HPD sense and power enable lines
//! - [`i2c::I2cBus`] - DDC channel used to fetch EDID

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, OutputPin};
pub use i2c::{EmbeddedHalI2c, I2cBus, I2cError};
