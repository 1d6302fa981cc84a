//! Display loop
//!
//! Owns the [`ScreenScheduler`] and sleeps until the [`LoopClock`]
//! deadline (scheduler tick, input poll or next packet write) or until a
//! slot update arrives. Only one of them is handled at a time.

use embassy_futures::select::{select, Either};
use embassy_time::{Instant, Timer};
use log::{info, warn};

use keydeck_core::config::TimingConfig;
use keydeck_core::{LoopClock, ScreenScheduler};
use keydeck_hal::HidBackend;

use crate::channels::{REFRESH_REQUESTS, SLOT_UPDATES};

/// Display loop - schedules screens and writes frames
pub async fn display_loop<B: HidBackend>(mut scheduler: ScreenScheduler<B>, timing: TimingConfig) {
    info!(
        "Display loop started (tick {} ms, poll {} ms, packet delay {} ms)",
        timing.tick_ms,
        timing.poll_ms,
        scheduler.transport().packet_delay_ms()
    );

    let mut clock = LoopClock::new(timing.tick_ms, timing.poll_ms, Instant::now().as_millis());

    loop {
        let deadline = Instant::from_millis(clock.deadline(scheduler.next_deadline()));

        match select(Timer::at(deadline), SLOT_UPDATES.receive()).await {
            Either::First(()) => {
                let due = clock.on_timer(&mut scheduler, Instant::now().as_millis());
                request_refreshes(&mut scheduler, due);
            }
            Either::Second(update) => {
                scheduler.apply_update(update, Instant::now().as_millis());
            }
        }
    }
}

/// Forward refresh requests to the source loop
fn request_refreshes<B: HidBackend>(scheduler: &mut ScreenScheduler<B>, due: Vec<usize>) {
    for slot in due {
        if REFRESH_REQUESTS.try_send(slot).is_err() {
            warn!("Refresh queue full, skipping slot {} until next tick", slot);
            scheduler.cancel_refresh(slot);
        }
    }
}
