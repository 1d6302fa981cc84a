//! Screen slots
//!
//! Slot 0 is "no screen"; data screens occupy indices `1..=N`. Each slot
//! holds the latest renderer produced by its data source and the time of
//! that source's last successful refresh.

use log::{debug, warn};

use crate::config::SlotTiming;

/// Renders a slot for a `(width, height)` display
///
/// Called at push time on the event loop, so it must not block. The
/// returned text should already be laid out line by line, see
/// [`crate::render::layout`].
pub type Renderer = Box<dyn Fn(u8, u8) -> String + Send>;

/// Message from a data source back to the scheduler
pub enum SlotUpdate {
    /// Refresh succeeded with a new renderer
    Rendered { slot: usize, renderer: Renderer },
    /// Refresh failed; the previous renderer stays in effect
    Failed { slot: usize },
}

impl SlotUpdate {
    /// Slot this update belongs to
    pub fn slot(&self) -> usize {
        match self {
            SlotUpdate::Rendered { slot, .. } | SlotUpdate::Failed { slot } => *slot,
        }
    }
}

impl core::fmt::Debug for SlotUpdate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SlotUpdate::Rendered { slot, .. } => write!(f, "Rendered({})", slot),
            SlotUpdate::Failed { slot } => write!(f, "Failed({})", slot),
        }
    }
}

/// One data screen
pub struct ScreenSlot {
    name: String,
    timing: SlotTiming,
    renderer: Option<Renderer>,
    last_refresh_ms: Option<u64>,
    /// Request time of the refresh that has not reported back yet
    requested_ms: Option<u64>,
}

impl ScreenSlot {
    fn new(name: String, timing: SlotTiming) -> Self {
        Self {
            name,
            timing,
            renderer: None,
            last_refresh_ms: None,
            requested_ms: None,
        }
    }

    /// Display name, for logs
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Refresh cadence
    pub fn timing(&self) -> SlotTiming {
        self.timing
    }

    /// Latest renderer, absent until the first successful refresh
    pub fn renderer(&self) -> Option<&Renderer> {
        self.renderer.as_ref()
    }

    /// Request time of the last successful refresh
    ///
    /// Refresh intervals count from the request, not from the arrival of
    /// the result.
    pub fn last_refresh_ms(&self) -> Option<u64> {
        self.last_refresh_ms
    }

    /// True while a refresh is outstanding
    pub fn is_pending(&self) -> bool {
        self.requested_ms.is_some()
    }

    /// Whether this slot needs a refresh at `now_ms`
    ///
    /// A never-refreshed slot is always stale.
    fn is_due(&self, selected: bool, now_ms: u64) -> bool {
        if self.is_pending() {
            return false;
        }
        let elapsed = match self.last_refresh_ms {
            Some(at) => now_ms.saturating_sub(at),
            None => u64::MAX,
        };
        (selected && elapsed >= self.timing.active_ms) || elapsed >= self.timing.background_ms
    }
}

/// All registered data screens
#[derive(Default)]
pub struct SlotTable {
    slots: Vec<ScreenSlot>,
}

impl SlotTable {
    /// Largest number of data screens; the slot count must fit a byte
    pub const MAX_SCREENS: usize = u8::MAX as usize - 1;

    /// Empty table
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Register a data screen and return its slot index
    ///
    /// Returns `None` once [`SlotTable::MAX_SCREENS`] are registered.
    pub fn register(&mut self, name: impl Into<String>, timing: SlotTiming) -> Option<usize> {
        if self.slots.len() >= Self::MAX_SCREENS {
            return None;
        }
        self.slots.push(ScreenSlot::new(name.into(), timing));
        Some(self.slots.len())
    }

    /// Number of slots announced to the keyboard, "none" slot included
    pub fn slot_count(&self) -> u8 {
        (self.slots.len() + 1) as u8
    }

    /// Number of data screens
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no data screens are registered
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot by index; index 0 and out-of-range indices have none
    pub fn get(&self, index: usize) -> Option<&ScreenSlot> {
        index.checked_sub(1).and_then(|i| self.slots.get(i))
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut ScreenSlot> {
        index.checked_sub(1).and_then(|i| self.slots.get_mut(i))
    }

    /// Renderer of a slot, if it has produced one
    pub fn renderer(&self, index: usize) -> Option<&Renderer> {
        self.get(index).and_then(ScreenSlot::renderer)
    }

    /// Slots needing a refresh at `now_ms`, marked pending
    pub fn take_due(&mut self, selected: Option<usize>, now_ms: u64) -> Vec<usize> {
        let mut due = Vec::new();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let index = i + 1;
            if slot.is_due(selected == Some(index), now_ms) {
                slot.requested_ms = Some(now_ms);
                due.push(index);
            }
        }
        due
    }

    /// Clear the pending marker of a refresh that never started
    pub fn cancel_refresh(&mut self, index: usize) {
        if let Some(slot) = self.get_mut(index) {
            slot.requested_ms = None;
        }
    }

    /// Apply a data source result
    ///
    /// A renderer nobody asked for is stamped with `now_ms`. Returns true
    /// if the slot got a new renderer.
    pub fn apply(&mut self, update: SlotUpdate, now_ms: u64) -> bool {
        let index = update.slot();
        let Some(slot) = self.get_mut(index) else {
            warn!("Update for unknown slot {}", index);
            return false;
        };
        let requested_ms = slot.requested_ms.take();

        match update {
            SlotUpdate::Rendered { renderer, .. } => {
                slot.renderer = Some(renderer);
                slot.last_refresh_ms = Some(requested_ms.unwrap_or(now_ms));
                true
            }
            SlotUpdate::Failed { .. } => {
                debug!("Refresh of {} failed, keeping previous output", slot.name);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMING: SlotTiming = SlotTiming {
        active_ms: 1000,
        background_ms: 30_000,
    };

    fn table(n: usize) -> SlotTable {
        let mut table = SlotTable::new();
        for i in 0..n {
            table.register(format!("screen{}", i + 1), TIMING);
        }
        table
    }

    fn text_renderer(text: &'static str) -> Renderer {
        Box::new(move |_, _| text.to_string())
    }

    #[test]
    fn test_indices_start_at_one() {
        let mut table = SlotTable::new();
        assert_eq!(table.register("perf", TIMING), Some(1));
        assert_eq!(table.register("clock", TIMING), Some(2));
        assert_eq!(table.slot_count(), 3);
        assert!(table.get(0).is_none());
        assert_eq!(table.get(2).map(ScreenSlot::name), Some("clock"));
        assert!(table.get(3).is_none());
    }

    #[test]
    fn test_never_refreshed_is_due() {
        let mut table = table(2);
        assert_eq!(table.take_due(None, 0), vec![1, 2]);
    }

    #[test]
    fn test_pending_not_requested_twice() {
        let mut table = table(1);
        assert_eq!(table.take_due(Some(1), 0), vec![1]);
        assert!(table.take_due(Some(1), 5000).is_empty());

        table.apply(SlotUpdate::Failed { slot: 1 }, 5000);
        // Failure keeps the slot stale
        assert_eq!(table.take_due(Some(1), 5001), vec![1]);
    }

    #[test]
    fn test_active_vs_background_interval() {
        let mut table = table(2);
        table.take_due(None, 0);
        table.apply(
            SlotUpdate::Rendered {
                slot: 1,
                renderer: text_renderer("a"),
            },
            0,
        );
        table.apply(
            SlotUpdate::Rendered {
                slot: 2,
                renderer: text_renderer("b"),
            },
            0,
        );

        // Screen 1 selected: only it is refreshed after 1001 ms
        assert_eq!(table.take_due(Some(1), 1001), vec![1]);
        // Screen 2 waits for the background interval
        assert_eq!(table.take_due(Some(1), 29_999), Vec::<usize>::new());
        assert_eq!(table.take_due(Some(1), 30_000), vec![2]);
    }

    #[test]
    fn test_refresh_time_is_request_time() {
        let mut table = table(1);
        assert_eq!(table.take_due(Some(1), 1000), vec![1]);
        table.apply(
            SlotUpdate::Rendered {
                slot: 1,
                renderer: text_renderer("a"),
            },
            1001,
        );

        assert_eq!(table.get(1).unwrap().last_refresh_ms(), Some(1000));
        // One active interval after the request, not after the arrival
        assert_eq!(table.take_due(Some(1), 2000), vec![1]);
    }

    #[test]
    fn test_failed_update_keeps_renderer() {
        let mut table = table(1);
        table.apply(
            SlotUpdate::Rendered {
                slot: 1,
                renderer: text_renderer("old"),
            },
            100,
        );
        assert!(!table.apply(SlotUpdate::Failed { slot: 1 }, 200));

        let slot = table.get(1).unwrap();
        assert_eq!(slot.last_refresh_ms(), Some(100));
        assert_eq!(slot.renderer().map(|r| r(3, 1)), Some("old".to_string()));
    }

    #[test]
    fn test_update_for_unknown_slot() {
        let mut table = table(1);
        assert!(!table.apply(
            SlotUpdate::Rendered {
                slot: 5,
                renderer: text_renderer("x"),
            },
            0
        ));
    }

    #[test]
    fn test_cancel_refresh() {
        let mut table = table(1);
        table.take_due(None, 0);
        assert!(table.get(1).unwrap().is_pending());
        table.cancel_refresh(1);
        assert!(!table.get(1).unwrap().is_pending());
    }
}
