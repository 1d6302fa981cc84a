//! Configuration file structures

use serde::Deserialize;

use keydeck_core::config::{SlotTiming, TimingConfig};
use keydeck_hal::DeviceMatch;

/// QMK raw HID usage ID
pub const DEFAULT_USAGE: u16 = 0x61;

/// QMK raw HID usage page
pub const DEFAULT_USAGE_PAGE: u16 = 0xFF60;

/// Default clock line
pub const DEFAULT_CLOCK_FORMAT: &str = "%H:%M:%S";

/// Default clock date line
pub const DEFAULT_DATE_FORMAT: &str = "%a %d %b";

/// Whole configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub device: DeviceConfig,
    pub timing: TimingConfig,
    pub logging: LoggingConfig,
    pub screens: Vec<ScreenConfig>,
}

impl Config {
    /// Configured screens, or the built-in pair when none are listed
    pub fn screens_or_default(&self) -> Vec<ScreenConfig> {
        if !self.screens.is_empty() {
            return self.screens.clone();
        }
        vec![
            ScreenConfig::new(ScreenKind::Perf),
            ScreenConfig::new(ScreenKind::Clock {
                format: DEFAULT_CLOCK_FORMAT.to_string(),
                date_format: DEFAULT_DATE_FORMAT.to_string(),
            }),
        ]
    }
}

/// `[device]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceConfig {
    /// Exact HID product string
    pub product: String,
    pub usage: u16,
    pub usage_page: u16,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            product: String::new(),
            usage: DEFAULT_USAGE,
            usage_page: DEFAULT_USAGE_PAGE,
        }
    }
}

impl DeviceConfig {
    /// Descriptor the device manager matches against
    pub fn target(&self) -> DeviceMatch {
        DeviceMatch {
            product: self.product.clone(),
            usage: self.usage,
            usage_page: self.usage_page,
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `env_logger` filter used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// One `[[screens]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScreenConfig {
    #[serde(flatten)]
    pub kind: ScreenKind,
    /// Name used in logs, defaults to the kind
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub active_refresh_ms: Option<u64>,
    #[serde(default)]
    pub background_refresh_ms: Option<u64>,
}

impl ScreenConfig {
    /// Screen with the global timing
    pub fn new(kind: ScreenKind) -> Self {
        Self {
            kind,
            name: None,
            active_refresh_ms: None,
            background_refresh_ms: None,
        }
    }

    /// Name for logs
    pub fn display_name(&self) -> &str {
        match &self.name {
            Some(name) => name,
            None => self.kind.label(),
        }
    }

    /// Refresh timing with per-screen overrides applied
    pub fn timing(&self, global: &TimingConfig) -> SlotTiming {
        let defaults = global.slot_timing();
        SlotTiming {
            active_ms: self.active_refresh_ms.unwrap_or(defaults.active_ms),
            background_ms: self.background_refresh_ms.unwrap_or(defaults.background_ms),
        }
    }
}

/// Data source behind a screen
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScreenKind {
    /// CPU, memory and load
    Perf,
    /// Local time
    Clock {
        #[serde(default = "default_clock_format")]
        format: String,
        #[serde(default = "default_date_format")]
        date_format: String,
    },
    /// Fixed lines
    Text { lines: Vec<String> },
}

impl ScreenKind {
    /// Kind name as written in the config file
    pub fn label(&self) -> &'static str {
        match self {
            ScreenKind::Perf => "perf",
            ScreenKind::Clock { .. } => "clock",
            ScreenKind::Text { .. } => "text",
        }
    }
}

fn default_clock_format() -> String {
    DEFAULT_CLOCK_FORMAT.to_string()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}
