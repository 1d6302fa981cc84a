//! Configuration loading
//!
//! Reads the TOML file, deserializes it and checks every value the event
//! loop and the data sources rely on.

use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use log::debug;

use keydeck_core::config::TimingError;
use keydeck_core::SlotTable;

use super::types::{Config, ScreenKind};

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML syntax or schema error
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
    /// Global timing out of range
    #[error("[timing]: {0}")]
    Timing(#[from] TimingError),
    /// Per-screen timing out of range
    #[error("screen {index} ({name}): {source}")]
    ScreenTiming {
        index: usize,
        name: String,
        #[source]
        source: TimingError,
    },
    /// Clock format string chrono cannot render
    #[error("screen {index}: invalid time format {format:?}")]
    ClockFormat { index: usize, format: String },
    /// Device product string missing
    #[error("[device] product must be set")]
    MissingProduct,
    /// More screens than the slot count byte can announce
    #[error("{count} screens configured, at most {max} supported")]
    TooManyScreens { count: usize, max: usize },
}

/// Load and validate the configuration file at `path`
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Loaded {} bytes of config from {}", text.len(), path.display());
    parse(&text)
}

/// Parse and validate configuration text
pub fn parse(text: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(text)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.device.product.is_empty() {
        return Err(ConfigError::MissingProduct);
    }

    config.timing.validate()?;

    if config.screens.len() > SlotTable::MAX_SCREENS {
        return Err(ConfigError::TooManyScreens {
            count: config.screens.len(),
            max: SlotTable::MAX_SCREENS,
        });
    }

    for (i, screen) in config.screens.iter().enumerate() {
        let index = i + 1;
        screen
            .timing(&config.timing)
            .validate()
            .map_err(|source| ConfigError::ScreenTiming {
                index,
                name: screen.display_name().to_string(),
                source,
            })?;

        if let ScreenKind::Clock {
            format,
            date_format,
        } = &screen.kind
        {
            for fmt in [format, date_format] {
                if !is_valid_time_format(fmt) {
                    return Err(ConfigError::ClockFormat {
                        index,
                        format: fmt.clone(),
                    });
                }
            }
        }
    }

    Ok(())
}

/// chrono panics when displaying a format with bad specifiers
fn is_valid_time_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}
