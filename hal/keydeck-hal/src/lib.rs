//! HID abstraction traits for keydeck
//!
//! This crate defines hardware-agnostic traits that the core logic
//! talks to, so the device manager and transport can run against the
//! real `hidapi` backend or a scripted one in tests.
//!
//! # Modules
//!
//! - `device`: listing, matching descriptor and the report I/O trait
//! - `error`: HID error type shared by every backend

pub mod device;
pub mod error;

pub use device::{DeviceListing, DeviceMatch, HidBackend, HidDevice};
pub use error::HidError;
