//! Event loop timing
//!
//! Tracks the scheduler tick and the input poll deadlines and decides,
//! for each timer wakeup, which scheduler work runs. The event loop only
//! sleeps until [`LoopClock::deadline`] and hands the wakeup time to
//! [`LoopClock::on_timer`].

use keydeck_hal::HidBackend;

use super::screen::ScreenScheduler;

/// Tick and poll deadlines of the event loop, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopClock {
    tick_ms: u64,
    poll_ms: u64,
    next_tick_ms: u64,
    next_poll_ms: u64,
}

impl LoopClock {
    /// Clock starting at `start_ms`; the first tick is due immediately
    pub fn new(tick_ms: u64, poll_ms: u64, start_ms: u64) -> Self {
        Self {
            tick_ms,
            poll_ms,
            next_tick_ms: start_ms,
            next_poll_ms: start_ms + poll_ms,
        }
    }

    /// Earliest of the next tick, the next poll and the transport deadline
    pub fn deadline(&self, transport_ms: Option<u64>) -> u64 {
        let own = self.next_tick_ms.min(self.next_poll_ms);
        transport_ms.map_or(own, |at| own.min(at))
    }

    /// Restart the tick cadence after a valid selection
    pub fn on_selection(&mut self, now_ms: u64) {
        self.next_tick_ms = now_ms + self.tick_ms;
    }

    /// Handle a timer wakeup
    ///
    /// Polls input when due; a valid selection runs an immediate pass and
    /// pushes the next tick one interval out, so a tick due at the same
    /// instant does not run a second pass. Then runs the tick pass if still
    /// due and writes the next packet if one is due. Returns the slots to
    /// refresh.
    pub fn on_timer<B: HidBackend>(
        &mut self,
        scheduler: &mut ScreenScheduler<B>,
        now_ms: u64,
    ) -> Vec<usize> {
        let mut due = Vec::new();

        if now_ms >= self.next_poll_ms {
            self.next_poll_ms = now_ms + self.poll_ms;
            if scheduler.poll_input() {
                self.on_selection(now_ms);
                due.extend(scheduler.run_pass(now_ms));
            }
        }

        if now_ms >= self.next_tick_ms {
            self.next_tick_ms = now_ms + self.tick_ms;
            due.extend(scheduler.run_pass(now_ms));
        }

        scheduler.drive_transport(now_ms);
        due
    }

    /// Time of the next scheduler tick
    pub fn next_tick_ms(&self) -> u64 {
        self.next_tick_ms
    }

    /// Time of the next input poll
    pub fn next_poll_ms(&self) -> u64 {
        self.next_poll_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SlotTiming;
    use crate::scheduler::SlotTable;
    use crate::testing::{target, MockBackend, SharedBus};

    const TIMING: SlotTiming = SlotTiming {
        active_ms: 1000,
        background_ms: 30_000,
    };

    fn scheduler() -> (ScreenScheduler<MockBackend>, SharedBus) {
        let (backend, bus) = MockBackend::with_keyboard();
        let mut slots = SlotTable::new();
        slots.register("perf", TIMING);
        slots.register("clock", TIMING);
        (ScreenScheduler::new(backend, target(), slots, 5), bus)
    }

    fn select(bus: &SharedBus, screen: u8) {
        bus.borrow_mut()
            .inbound
            .push_back(vec![0x01, screen, 21, 4]);
    }

    #[test]
    fn test_deadline_is_earliest() {
        let mut clock = LoopClock::new(1000, 20, 0);
        assert_eq!(clock.deadline(None), 0);

        let (mut sched, _bus) = scheduler();
        clock.on_timer(&mut sched, 0);
        assert_eq!(clock.next_tick_ms(), 1000);
        assert_eq!(clock.next_poll_ms(), 20);

        assert_eq!(clock.deadline(None), 20);
        assert_eq!(clock.deadline(Some(7)), 7);
        assert_eq!(clock.deadline(Some(5000)), 20);
    }

    #[test]
    fn test_first_wakeup_runs_pass() {
        let (mut sched, _bus) = scheduler();
        let mut clock = LoopClock::new(1000, 20, 0);

        assert_eq!(clock.on_timer(&mut sched, 0), vec![1, 2]);
        assert_eq!(sched.pass_count(), 1);
        assert!(sched.is_connected());
    }

    #[test]
    fn test_selection_restarts_tick() {
        let (mut sched, bus) = scheduler();
        let mut clock = LoopClock::new(1000, 20, 0);
        clock.on_timer(&mut sched, 0);

        select(&bus, 1);
        clock.on_timer(&mut sched, 400);
        assert_eq!(sched.pass_count(), 2);
        assert_eq!(clock.next_tick_ms(), 1400);

        // The old tick time passes without a scheduler pass
        clock.on_timer(&mut sched, 1000);
        assert_eq!(sched.pass_count(), 2);

        clock.on_timer(&mut sched, 1400);
        assert_eq!(sched.pass_count(), 3);
        assert_eq!(clock.next_tick_ms(), 2400);
    }

    #[test]
    fn test_selection_and_tick_together_run_one_pass() {
        let (mut sched, bus) = scheduler();
        let mut clock = LoopClock::new(1000, 20, 0);
        clock.on_timer(&mut sched, 0);
        assert_eq!(clock.next_tick_ms(), 1000);

        select(&bus, 2);
        clock.on_timer(&mut sched, 1000);

        assert_eq!(sched.pass_count(), 2);
        assert_eq!(clock.next_tick_ms(), 2000);
        assert_eq!(sched.schedule().screen, 2);
    }

    #[test]
    fn test_invalid_report_keeps_tick() {
        let (mut sched, bus) = scheduler();
        let mut clock = LoopClock::new(1000, 20, 0);
        clock.on_timer(&mut sched, 0);

        // Screen 3 is out of range with two data screens
        select(&bus, 3);
        clock.on_timer(&mut sched, 400);
        assert_eq!(sched.pass_count(), 1);
        assert_eq!(clock.next_tick_ms(), 1000);
    }

    #[test]
    fn test_poll_not_repeated_before_interval() {
        let (mut sched, bus) = scheduler();
        let mut clock = LoopClock::new(1000, 20, 0);
        clock.on_timer(&mut sched, 0);
        clock.on_timer(&mut sched, 20);
        assert_eq!(clock.next_poll_ms(), 40);

        // A report queued before the next poll is not read early
        select(&bus, 1);
        clock.on_timer(&mut sched, 30);
        assert_eq!(sched.schedule().screen, 0);
        clock.on_timer(&mut sched, 40);
        assert_eq!(sched.schedule().screen, 1);
    }
}
