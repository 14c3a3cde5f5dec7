//! Configuration types
//!
//! Board-agnostic display configuration stored as postcard binary data.

pub mod types;

pub use types::*;
