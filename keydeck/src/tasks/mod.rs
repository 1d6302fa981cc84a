//! Daemon loops
//!
//! Both loops run on the same executor and talk through the channels in
//! [`crate::channels`].

pub mod display;
pub mod source;

pub use display::display_loop;
pub use source::source_loop;
