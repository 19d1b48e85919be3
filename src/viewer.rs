//! The single-threaded viewer loop.
//!
//! Cooperative cycle: receive → reassemble → (on completion) decode →
//! display → exit check → repeat.  The only blocking point is the bounded
//! datagram receive; its timeout is what keeps the loop responsive to the
//! Escape key when the sender goes quiet.  Cancellation is polled once per
//! display cycle, never asynchronous.
//!
//! All three collaborators sit behind traits ([`DatagramSource`],
//! [`Decoder`], [`Screen`]) so the loop itself runs under test against
//! scripted inputs.

use std::time::Instant;

use log::{debug, info, warn};
use thiserror::Error;

use crate::decode::Decoder;
use crate::display::{DisplayError, KeyPoll, Overlay, Screen};
use crate::fps::FpsCounter;
use crate::reassembler::{Progress, Reassembler};
use crate::source::{DatagramSource, Recv, SourceError};

/// Fatal viewer failures; timeouts and undecodable frames never surface here.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Display(#[from] DisplayError),
}

/// Run the viewer until Escape is pressed, the window is closed, or a
/// fatal socket/window error occurs.
///
/// With `show_fps` set, every decoded frame is counted and the current
/// rate is overlaid as `FPS: {rate:.1}` in the top-left corner.  Frames
/// that fail to decode are dropped without a display update; reassembly
/// has already reset by then, so the next header resynchronises the
/// stream.
pub fn run<S, D, W>(
    source: &mut S,
    decoder: &D,
    screen: &mut W,
    show_fps: bool,
) -> Result<(), ViewerError>
where
    S: DatagramSource,
    D: Decoder,
    W: Screen,
{
    let mut reassembler = Reassembler::new();
    let mut fps = FpsCounter::new(Instant::now());

    loop {
        let datagram = match source.recv()? {
            Recv::Datagram(d) => d,
            Recv::TimedOut => {
                debug!("receive timed out; waiting for traffic");
                continue;
            }
        };

        let Progress::Frame(bytes) = reassembler.push(&datagram) else {
            continue;
        };

        let Some(frame) = decoder.decode(&bytes) else {
            warn!("dropping undecodable {}-byte frame", bytes.len());
            continue;
        };

        let overlay = show_fps.then(|| {
            let rate = fps.record_frame(Instant::now());
            Overlay::readout(format!("FPS: {rate:.1}"))
        });

        match screen.show(&frame, overlay.as_ref())? {
            KeyPoll::Escape => {
                info!("Escape pressed; shutting down");
                return Ok(());
            }
            KeyPoll::Closed => {
                info!("window closed; shutting down");
                return Ok(());
            }
            KeyPoll::None => {}
        }
    }
}
