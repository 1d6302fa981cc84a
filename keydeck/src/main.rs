//! keydeck - Keyboard Display Daemon
//!
//! Multiplexes several information screens onto the character display
//! of a QMK keyboard. The keyboard picks the screen and reports its
//! display size; the daemon keeps each screen's data fresh and streams
//! the selected one as paced 32-byte raw HID reports.

use anyhow::{Context, Result};
use clap::Parser;
use embassy_executor::Spawner;
use embassy_futures::join::join;
use log::info;

use keydeck_core::config::TimingConfig;
use keydeck_core::{ScreenScheduler, SlotTable};
use keydeck_hal::HidBackend;
use keydeck_hal_hidapi::HidapiBackend;

mod channels;
mod cli;
mod config;
mod logging;
mod sources;
mod tasks;

use crate::cli::Cli;
use crate::config::Config;
use crate::sources::Source;
use crate::tasks::source::SourceSlot;

/// Everything the two loops need
struct Daemon {
    scheduler: ScreenScheduler<HidapiBackend>,
    timing: TimingConfig,
    sources: Vec<SourceSlot>,
}

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let cli = Cli::parse();

    let daemon = match setup(&cli) {
        Ok(Some(daemon)) => daemon,
        Ok(None) => std::process::exit(0),
        Err(err) => {
            eprintln!("keydeck: {:#}", err);
            std::process::exit(1);
        }
    };

    info!("keydeck starting, {} screens", daemon.sources.len());

    join(
        tasks::display_loop(daemon.scheduler, daemon.timing),
        tasks::source_loop(daemon.sources),
    )
    .await;
}

/// Load configuration and build the daemon
///
/// Returns `None` when the command line asked for a one-shot action.
fn setup(cli: &Cli) -> Result<Option<Daemon>> {
    let mut backend = HidapiBackend::new().context("failed to initialise HID backend")?;

    if cli.list_devices {
        list_devices(&mut backend)?;
        return Ok(None);
    }

    let config = config::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    logging::init(&config.logging);

    let target = config.device.target();
    info!(
        "Looking for \"{}\" (usage 0x{:02X}, usage page 0x{:04X})",
        target.product, target.usage, target.usage_page
    );

    let (slots, sources) = build_screens(&config)?;
    let scheduler = ScreenScheduler::new(backend, target, slots, config.timing.packet_delay_ms);

    Ok(Some(Daemon {
        scheduler,
        timing: config.timing,
        sources,
    }))
}

/// Register every configured screen and create its data source
fn build_screens(config: &Config) -> Result<(SlotTable, Vec<SourceSlot>)> {
    let mut slots = SlotTable::new();
    let mut sources = Vec::new();

    for screen in config.screens_or_default() {
        let name = screen.display_name().to_string();
        let slot = slots
            .register(name.clone(), screen.timing(&config.timing))
            .context("too many screens")?;
        info!("Screen {}: {}", slot, name);

        sources.push(SourceSlot {
            slot,
            name,
            source: Source::from_config(&screen),
        });
    }

    Ok((slots, sources))
}

/// Print attached HID interfaces for filling in `[device]`
fn list_devices<B: HidBackend>(backend: &mut B) -> Result<()> {
    let listings = backend
        .enumerate()
        .context("failed to enumerate HID devices")?;

    for listing in &listings {
        let is_raw_hid = listing.usage == config::DEFAULT_USAGE
            && listing.usage_page == config::DEFAULT_USAGE_PAGE;
        let marker = if is_raw_hid { "*" } else { " " };
        println!(
            "{} {:04x}:{:04x} usage 0x{:02X} page 0x{:04X} {:?} {}",
            marker,
            listing.vendor_id,
            listing.product_id,
            listing.usage,
            listing.usage_page,
            listing.product.as_deref().unwrap_or(""),
            listing.path
        );
    }
    println!("{} interfaces, * = QMK raw HID", listings.len());

    Ok(())
}
