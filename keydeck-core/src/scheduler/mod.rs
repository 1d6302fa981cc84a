//! Screen scheduling
//!
//! Decides when data sources refresh and when the selected screen is
//! rendered, encoded and pushed to the keyboard.

pub mod clock;
pub mod screen;
pub mod slots;

pub use clock::LoopClock;
pub use screen::ScreenScheduler;
pub use slots::{Renderer, ScreenSlot, SlotTable, SlotUpdate};
