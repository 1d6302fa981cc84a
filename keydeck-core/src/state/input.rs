//! Input listener
//!
//! Validates inbound reports and applies selection changes. Invalid
//! reports are dropped without affecting anything else.

use log::{debug, trace};

use keydeck_hal::{HidDevice, HidError};
use keydeck_protocol::{SelectionReport, PACKET_SIZE};

use super::ScheduleState;

/// Upper bound on reports drained per poll, so a chatty device cannot
/// starve the rest of the loop
pub const MAX_REPORTS_PER_POLL: usize = 16;

/// Applies keyboard selection reports to the schedule state
#[derive(Debug, Clone, Copy)]
pub struct InputListener {
    slot_count: u8,
}

impl InputListener {
    /// Listener accepting screen indices `0..slot_count`
    pub fn new(slot_count: u8) -> Self {
        Self { slot_count }
    }

    /// Validate a report and apply it
    ///
    /// Screen, width and height are replaced together. Returns the new
    /// state, or `None` if the report was invalid.
    pub fn handle_report(
        &self,
        state: &mut ScheduleState,
        report: &[u8],
    ) -> Option<ScheduleState> {
        let selection = match SelectionReport::from_report(report) {
            Ok(selection) => selection,
            Err(e) => {
                trace!("Dropping inbound report: {:?}", e);
                return None;
            }
        };

        if selection.screen >= self.slot_count {
            trace!(
                "Dropping selection of screen {} (only {} slots)",
                selection.screen,
                self.slot_count
            );
            return None;
        }

        *state = ScheduleState {
            screen: selection.screen,
            width: selection.width,
            height: selection.height,
        };
        debug!(
            "Screen {} selected at {}x{}",
            state.screen, state.width, state.height
        );
        Some(*state)
    }

    /// Drain pending reports from the device without blocking
    ///
    /// Returns `Ok(true)` if at least one valid selection was applied.
    /// A read error is returned to the caller, which discards the device.
    pub fn poll<D: HidDevice>(
        &self,
        device: &mut D,
        state: &mut ScheduleState,
    ) -> Result<bool, HidError> {
        let mut buf = [0u8; PACKET_SIZE];
        let mut selected = false;

        for _ in 0..MAX_REPORTS_PER_POLL {
            let n = device.read_report(&mut buf)?;
            if n == 0 {
                break;
            }
            if self.handle_report(state, &buf[..n]).is_some() {
                selected = true;
            }
        }

        Ok(selected)
    }

    /// Number of valid screen indices
    pub fn slot_count(&self) -> u8 {
        self.slot_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;
    use keydeck_hal::HidBackend;

    #[test]
    fn test_valid_selection_applied() {
        let listener = InputListener::new(4);
        let mut state = ScheduleState::new();

        let applied = listener.handle_report(&mut state, &[0x01, 3, 21, 4]);
        assert_eq!(
            applied,
            Some(ScheduleState {
                screen: 3,
                width: 21,
                height: 4
            })
        );
        assert_eq!(state.selected_slot(), Some(3));
    }

    #[test]
    fn test_index_one_past_max_ignored() {
        let listener = InputListener::new(4);
        let mut state = ScheduleState {
            screen: 1,
            width: 10,
            height: 2,
        };
        let before = state;

        assert!(listener.handle_report(&mut state, &[0x01, 4, 21, 4]).is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn test_screen_zero_is_valid() {
        let listener = InputListener::new(4);
        let mut state = ScheduleState {
            screen: 2,
            width: 21,
            height: 4,
        };

        assert!(listener.handle_report(&mut state, &[0x01, 0, 21, 4]).is_some());
        assert!(!state.has_selection());
    }

    #[test]
    fn test_malformed_reports_ignored() {
        let listener = InputListener::new(4);
        let mut state = ScheduleState::new();

        assert!(listener.handle_report(&mut state, &[0x02, 1, 21, 4]).is_none());
        assert!(listener.handle_report(&mut state, &[0x01, 1]).is_none());
        assert_eq!(state, ScheduleState::new());
    }

    #[test]
    fn test_poll_applies_last_valid_report() {
        let (mut backend, bus) = MockBackend::with_keyboard();
        let listing = backend.listings[1].clone();
        let mut device = backend.open(&listing).unwrap();
        {
            let mut bus = bus.borrow_mut();
            bus.inbound.push_back(vec![0x01, 1, 21, 4]);
            bus.inbound.push_back(vec![0x7F, 0, 0, 0]);
            bus.inbound.push_back(vec![0x01, 2, 16, 2]);
        }

        let listener = InputListener::new(3);
        let mut state = ScheduleState::new();

        assert_eq!(listener.poll(&mut device, &mut state), Ok(true));
        assert_eq!(
            state,
            ScheduleState {
                screen: 2,
                width: 16,
                height: 2
            }
        );
        assert_eq!(listener.poll(&mut device, &mut state), Ok(false));
    }

    #[test]
    fn test_poll_read_error_propagates() {
        let (mut backend, bus) = MockBackend::with_keyboard();
        let listing = backend.listings[1].clone();
        let mut device = backend.open(&listing).unwrap();
        bus.borrow_mut().fail_read = true;

        let listener = InputListener::new(3);
        let mut state = ScheduleState::new();
        assert!(listener.poll(&mut device, &mut state).is_err());
    }
}
