//! Daemon configuration
//!
//! Loaded once at startup from a TOML file. Timing types come from
//! `keydeck-core`; the device target, logging and screen list live here.

mod loader;
mod types;

pub use loader::{load, parse, ConfigError};
pub use types::*;
