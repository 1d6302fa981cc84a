//! Device lifecycle
//!
//! Discovery by descriptor match, connection with the init handshake, and
//! discarding the handle on any I/O error.

pub mod manager;

pub use manager::{DeviceManager, LinkState};
