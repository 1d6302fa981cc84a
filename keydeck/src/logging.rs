//! Logger setup

use env_logger::Env;

use crate::config::LoggingConfig;

/// Initialise `env_logger`; `RUST_LOG` overrides the configured level
pub fn init(config: &LoggingConfig) {
    env_logger::Builder::from_env(Env::default().default_filter_or(config.level.as_str()))
        .format_timestamp_millis()
        .init();
}
