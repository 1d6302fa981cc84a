//! Display scheduling and HID transport for keyboard character displays
//!
//! This crate contains all daemon logic that does not depend on a
//! specific HID library or data source:
//!
//! - Device discovery, connection and error recovery
//! - Input report handling (screen selection, display size)
//! - Screen scheduler (refresh cadence, frame pushes)
//! - Chunked, paced, single-flight report transport
//! - Timing configuration types
//! - Text layout helpers for renderers

#![deny(unsafe_code)]

pub mod config;
pub mod device;
pub mod render;
pub mod scheduler;
pub mod state;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use device::{DeviceManager, LinkState};
pub use scheduler::{LoopClock, Renderer, ScreenScheduler, SlotTable, SlotUpdate};
pub use state::{InputListener, ScheduleState};
pub use transport::{ChunkedTransport, PushOutcome, StepOutcome, TransportError};
