//! Frame transport
//!
//! Moves encoded frames to the keyboard as paced raw HID packets.

pub mod chunked;

pub use chunked::{ChunkedTransport, PushOutcome, SendJob, StepOutcome, TransportError};
