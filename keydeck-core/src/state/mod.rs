//! Display selection state
//!
//! What the keyboard asked for (screen, width, height) and the listener
//! that applies its selection reports.

pub mod input;
pub mod schedule;

pub use input::{InputListener, MAX_REPORTS_PER_POLL};
pub use schedule::ScheduleState;
