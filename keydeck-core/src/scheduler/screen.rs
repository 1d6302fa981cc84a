//! Screen scheduler
//!
//! Single owner of the display state: schedule, slots, device and
//! transport. The event loop calls into it on ticks, input polls, packet
//! deadlines and data source updates; nothing else mutates this state.

use log::{debug, info, warn};

use keydeck_hal::{DeviceMatch, HidBackend, HidError};
use keydeck_protocol::Frame;

use crate::device::DeviceManager;
use crate::state::{InputListener, ScheduleState};
use crate::transport::{ChunkedTransport, PushOutcome};

use super::slots::{SlotTable, SlotUpdate};

/// Display scheduler and owner of all display state
pub struct ScreenScheduler<B: HidBackend> {
    schedule: ScheduleState,
    slots: SlotTable,
    listener: InputListener,
    devices: DeviceManager<B>,
    transport: ChunkedTransport,
    /// Scheduler passes run so far, for diagnostics
    passes: u64,
}

impl<B: HidBackend> ScreenScheduler<B> {
    /// Create a scheduler for the registered slots
    pub fn new(backend: B, target: DeviceMatch, slots: SlotTable, packet_delay_ms: u64) -> Self {
        let slot_count = slots.slot_count();
        Self {
            schedule: ScheduleState::new(),
            slots,
            listener: InputListener::new(slot_count),
            devices: DeviceManager::new(backend, target, slot_count),
            transport: ChunkedTransport::new(packet_delay_ms),
            passes: 0,
        }
    }

    /// One scheduler pass, run on every tick and after every selection
    ///
    /// Reconnects if needed, returns the slots whose data sources must
    /// refresh (already marked pending), and pushes the selected screen.
    pub fn run_pass(&mut self, now_ms: u64) -> Vec<usize> {
        self.passes += 1;
        self.connect_if_needed();

        let due = self.slots.take_due(self.schedule.selected_slot(), now_ms);
        if !due.is_empty() {
            debug!("Refresh requested for slots {:?}", due);
        }

        self.push_current(now_ms);
        due
    }

    /// Drain inbound reports
    ///
    /// Returns true if a valid selection was applied; the caller then runs
    /// an immediate pass and re-anchors its tick timer.
    pub fn poll_input(&mut self) -> bool {
        let Some(device) = self.devices.device_mut() else {
            return false;
        };

        match self.listener.poll(device, &mut self.schedule) {
            Ok(selected) => selected,
            Err(e) => {
                self.drop_device(&e);
                false
            }
        }
    }

    /// Apply a data source result
    ///
    /// A new renderer for the selected screen is pushed right away.
    pub fn apply_update(&mut self, update: SlotUpdate, now_ms: u64) {
        let slot = update.slot();
        if self.slots.apply(update, now_ms) && self.schedule.selected_slot() == Some(slot) {
            self.push_current(now_ms);
        }
    }

    /// Forget a refresh request that could not be delivered
    pub fn cancel_refresh(&mut self, slot: usize) {
        self.slots.cancel_refresh(slot);
    }

    /// Write the next packet of the in-flight frame if it is due
    pub fn drive_transport(&mut self, now_ms: u64) {
        if !self.transport.is_busy() {
            return;
        }

        let Some(device) = self.devices.device_mut() else {
            self.transport.abort();
            return;
        };

        if let Err(e) = self.transport.step(device, now_ms) {
            warn!("Frame send failed: {}", e);
            self.devices.discard(e.hid_error());
        }
    }

    /// Next time [`ScreenScheduler::drive_transport`] has work to do
    pub fn next_deadline(&self) -> Option<u64> {
        self.transport.next_deadline()
    }

    /// Current selection
    pub fn schedule(&self) -> ScheduleState {
        self.schedule
    }

    /// Registered slots
    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    /// Device manager
    pub fn devices(&self) -> &DeviceManager<B> {
        &self.devices
    }

    /// Transport state
    pub fn transport(&self) -> &ChunkedTransport {
        &self.transport
    }

    /// Number of scheduler passes run so far
    pub fn pass_count(&self) -> u64 {
        self.passes
    }

    /// True while a device is open
    pub fn is_connected(&self) -> bool {
        self.devices.is_connected()
    }

    fn connect_if_needed(&mut self) {
        if self.devices.is_connected() {
            return;
        }
        if self.devices.ensure_connected().is_some() {
            // Whatever the keyboard shows now was not sent on this link
            self.transport.abort();
            self.transport.invalidate();
            info!("Display link up, {} screens", self.slots.len());
        }
    }

    /// Render, encode and push the selected screen
    fn push_current(&mut self, now_ms: u64) {
        if !self.devices.is_connected() {
            return;
        }

        let snapshot = self.schedule;
        let Some(renderer) = self.slots.renderer(snapshot.screen as usize) else {
            return;
        };

        let text = renderer(snapshot.width, snapshot.height);
        let frame = Frame::encode(&text, snapshot.width, snapshot.height);

        if self.transport.push(frame) == PushOutcome::Started {
            self.drive_transport(now_ms);
        }
    }

    fn drop_device(&mut self, err: &HidError) {
        self.devices.discard(err);
        self.transport.abort();
    }
}
