//! Configuration types
//!
//! Timing structures shared by the scheduler and transport. The daemon
//! deserializes them from its TOML file with the `serde` feature.

pub mod types;

pub use types::*;
