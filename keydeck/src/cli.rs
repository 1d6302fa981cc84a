use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "keydeck",
    author,
    version,
    about = "Drive a keyboard's character display over raw HID"
)]
pub struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "keydeck.toml")]
    pub config: PathBuf,

    /// List attached HID interfaces and exit
    #[arg(long)]
    pub list_devices: bool,
}
