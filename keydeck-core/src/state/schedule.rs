//! Schedule state

/// Screen and dimensions requested by the keyboard
///
/// `Copy` on purpose: a render takes a snapshot so index, width and height
/// always belong to the same selection report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScheduleState {
    /// Selected slot (0 = none)
    pub screen: u8,
    /// Display width in characters
    pub width: u8,
    /// Display height in lines
    pub height: u8,
}

impl ScheduleState {
    /// Nothing selected, nothing renderable
    pub const fn new() -> Self {
        Self {
            screen: 0,
            width: 0,
            height: 0,
        }
    }

    /// True when a data screen is selected
    pub fn has_selection(&self) -> bool {
        self.screen != 0
    }

    /// Selected slot index, if any
    pub fn selected_slot(&self) -> Option<usize> {
        self.has_selection().then_some(self.screen as usize)
    }
}
