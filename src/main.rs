//! Entry point for `udp-viewer`.
//!
//! Owns only process setup (logging, argument parsing) and teardown; the
//! receive/reassemble/decode/display pipeline lives in the library modules.

use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use udp_viewer::{viewer, JpegDecoder, MinifbScreen, UdpSource};

/// Display a fragmented JPEG stream sent over UDP by a remote camera.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// UDP port to listen on (must match the camera's destination port).
    #[arg(short, long, default_value_t = 2222)]
    port: u16,

    /// Receive timeout in seconds; bounds how long the loop blocks with no
    /// traffic before re-checking for exit.
    #[arg(short, long, default_value_t = 2)]
    timeout: u64,

    /// Disable the frame-rate overlay.
    #[arg(long)]
    no_fps: bool,
}

fn main() -> anyhow::Result<()> {
    // Initialise env_logger; set RUST_LOG to control verbosity.
    env_logger::init();

    let cli = Cli::parse();

    let mut source = UdpSource::bind(cli.port, Duration::from_secs(cli.timeout))
        .with_context(|| format!("failed to bind UDP port {}", cli.port))?;
    log::info!("Listening for camera stream on UDP port {}", cli.port);

    let decoder = JpegDecoder;
    let mut screen = MinifbScreen::new("Camera UDP Stream");

    viewer::run(&mut source, &decoder, &mut screen, !cli.no_fps)?;

    // Socket and window are dropped here, before the process exits.
    Ok(())
}
