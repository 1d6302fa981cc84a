//! Inter-loop communication channels
//!
//! The display loop asks the source loop for refreshes and receives the
//! results back as slot updates.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use keydeck_core::SlotUpdate;

/// Capacity for pending refresh requests
const REFRESH_CHANNEL_SIZE: usize = 16;

/// Capacity for completed refreshes
const UPDATE_CHANNEL_SIZE: usize = 8;

/// Slot indices whose data source should refresh
pub static REFRESH_REQUESTS: Channel<CriticalSectionRawMutex, usize, REFRESH_CHANNEL_SIZE> =
    Channel::new();

/// Refresh results from the data sources
pub static SLOT_UPDATES: Channel<CriticalSectionRawMutex, SlotUpdate, UPDATE_CHANNEL_SIZE> =
    Channel::new();
