//! Configuration type definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default scheduler tick interval
pub const DEFAULT_TICK_MS: u64 = 1000;

/// Default input report poll interval
pub const DEFAULT_POLL_MS: u64 = 20;

/// Default refresh interval for the selected screen
pub const DEFAULT_ACTIVE_REFRESH_MS: u64 = 1000;

/// Default refresh interval for screens in the background
pub const DEFAULT_BACKGROUND_REFRESH_MS: u64 = 30_000;

/// Inter-packet delay on HID stacks known to drop fast writes
pub const SLOW_STACK_PACKET_DELAY_MS: u64 = 20;

/// Inter-packet delay elsewhere
pub const FAST_STACK_PACKET_DELAY_MS: u64 = 5;

/// Platform default for the delay between two packet writes
///
/// Always strictly positive: the keyboard's raw HID buffer holds a single
/// report and overruns if the next one arrives before it is consumed.
pub const fn default_packet_delay_ms() -> u64 {
    if cfg!(any(target_os = "windows", target_os = "macos")) {
        SLOW_STACK_PACKET_DELAY_MS
    } else {
        FAST_STACK_PACKET_DELAY_MS
    }
}

/// Event loop and transport timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct TimingConfig {
    /// Periodic scheduler pass interval (ms)
    pub tick_ms: u64,
    /// Input report poll interval (ms)
    pub poll_ms: u64,
    /// Default refresh interval for the selected screen (ms)
    pub active_refresh_ms: u64,
    /// Default refresh interval for unselected screens (ms)
    pub background_refresh_ms: u64,
    /// Delay between packet writes (ms)
    pub packet_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            poll_ms: DEFAULT_POLL_MS,
            active_refresh_ms: DEFAULT_ACTIVE_REFRESH_MS,
            background_refresh_ms: DEFAULT_BACKGROUND_REFRESH_MS,
            packet_delay_ms: default_packet_delay_ms(),
        }
    }
}

impl TimingConfig {
    /// Refresh timing for a slot that does not override anything
    pub fn slot_timing(&self) -> SlotTiming {
        SlotTiming {
            active_ms: self.active_refresh_ms,
            background_ms: self.background_refresh_ms,
        }
    }

    /// Check the values the event loop depends on
    pub fn validate(&self) -> Result<(), TimingError> {
        if self.tick_ms == 0 {
            return Err(TimingError::Zero("tick_ms"));
        }
        if self.poll_ms == 0 {
            return Err(TimingError::Zero("poll_ms"));
        }
        if self.packet_delay_ms == 0 {
            return Err(TimingError::Zero("packet_delay_ms"));
        }
        self.slot_timing().validate()
    }
}

/// Refresh cadence of one screen slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotTiming {
    /// Refresh interval while the slot is selected (ms)
    pub active_ms: u64,
    /// Refresh interval while the slot is in the background (ms)
    pub background_ms: u64,
}

impl SlotTiming {
    /// Active interval must be positive and no longer than the background one
    pub fn validate(&self) -> Result<(), TimingError> {
        if self.active_ms == 0 {
            return Err(TimingError::Zero("active_refresh_ms"));
        }
        if self.background_ms < self.active_ms {
            return Err(TimingError::BackgroundFasterThanActive {
                active_ms: self.active_ms,
                background_ms: self.background_ms,
            });
        }
        Ok(())
    }
}

/// Invalid timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TimingError {
    /// A value that must be positive is zero
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    /// Background refresh would run more often than active refresh
    #[error("background_refresh_ms ({background_ms}) is shorter than active_refresh_ms ({active_ms})")]
    BackgroundFasterThanActive { active_ms: u64, background_ms: u64 },
}
