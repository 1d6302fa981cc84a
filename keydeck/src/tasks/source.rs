//! Data source loop
//!
//! Serves refresh requests one at a time and reports every outcome, so
//! the scheduler can clear the slot's pending marker.

use log::{debug, info, warn};

use keydeck_core::SlotUpdate;

use crate::channels::{REFRESH_REQUESTS, SLOT_UPDATES};
use crate::sources::Source;

/// A data source with the slot it renders into
pub struct SourceSlot {
    pub slot: usize,
    pub name: String,
    pub source: Source,
}

/// Source loop - refreshes data sources on request
pub async fn source_loop(mut sources: Vec<SourceSlot>) {
    info!("Source loop started with {} sources", sources.len());

    loop {
        let slot = REFRESH_REQUESTS.receive().await;

        let update = match sources.iter_mut().find(|s| s.slot == slot) {
            Some(entry) => match entry.source.refresh() {
                Ok(renderer) => {
                    debug!("Refreshed {}", entry.name);
                    SlotUpdate::Rendered { slot, renderer }
                }
                Err(e) => {
                    warn!("Refresh of {} failed: {}", entry.name, e);
                    SlotUpdate::Failed { slot }
                }
            },
            None => {
                warn!("Refresh requested for slot {} with no source", slot);
                SlotUpdate::Failed { slot }
            }
        };

        SLOT_UPDATES.send(update).await;
    }
}
