//! Built-in data sources
//!
//! Each source owns whatever state its data needs and, on refresh,
//! produces a new renderer for its slot. Refreshes run on the source
//! loop, never on the display loop.

mod clock;
mod perf;
mod text;

use std::path::PathBuf;

use keydeck_core::Renderer;

pub use clock::ClockSource;
pub use perf::PerfSource;
pub use text::TextSource;

use crate::config::{ScreenConfig, ScreenKind};

/// Data source refresh failure
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// A system file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A system file did not have the expected layout
    #[error("unexpected contents in {0}")]
    Parse(&'static str),
}

/// Any built-in source
pub enum Source {
    Perf(PerfSource),
    Clock(ClockSource),
    Text(TextSource),
}

impl Source {
    /// Build the source for a configured screen
    pub fn from_config(screen: &ScreenConfig) -> Self {
        match &screen.kind {
            ScreenKind::Perf => Source::Perf(PerfSource::new()),
            ScreenKind::Clock {
                format,
                date_format,
            } => Source::Clock(ClockSource::new(format.clone(), date_format.clone())),
            ScreenKind::Text { lines } => Source::Text(TextSource::new(lines.clone())),
        }
    }

    /// Recompute this source's renderer
    pub fn refresh(&mut self) -> Result<Renderer, SourceError> {
        match self {
            Source::Perf(source) => source.refresh(),
            Source::Clock(source) => Ok(source.refresh()),
            Source::Text(source) => Ok(source.refresh()),
        }
    }
}
