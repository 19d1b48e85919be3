//! `udp-viewer` — display a fragmented, length-prefixed JPEG stream sent
//! over UDP by a remote camera (e.g. an ESP32-CAM).
//!
//! # Architecture
//!
//! ```text
//!  ┌──────────────┐  datagrams   ┌──────────────┐  frame bytes
//!  │  UdpSource   │─────────────▶│ Reassembler  │──────────────┐
//!  └──────────────┘              └──────────────┘              │
//!        ▲                                                     ▼
//!        │ recv(timeout)                               ┌──────────────┐
//!  ┌─────┴────────────────────────────────────────┐    │ JpegDecoder  │
//!  │                viewer loop                   │    └──────┬───────┘
//!  │  receive → reassemble → decode → display     │           │ Frame
//!  └─────┬────────────────────────────────────────┘           ▼
//!        │ Esc / window closed                         ┌──────────────┐
//!        ▼                                             │ MinifbScreen │
//!     shutdown                                         └──────────────┘
//! ```
//!
//! Each module has a single responsibility:
//! - [`source`]      — bounded-wait UDP datagram receive (thin socket wrapper)
//! - [`reassembler`] — header/fragment state machine producing frame buffers
//! - [`decode`]      — byte buffer → decoded image, failure is `None`
//! - [`display`]     — window rendering, text overlay, key polling
//! - [`fps`]         — rolling one-second frame-rate estimate for the overlay
//! - [`viewer`]      — the single-threaded loop wiring the above together
//!
//! The reassembler is pure (no I/O) and the decoder and display sit behind
//! traits, so the whole pipeline can be driven by scripted inputs in tests
//! without a socket or a window.

pub mod decode;
pub mod display;
pub mod fps;
pub mod reassembler;
pub mod source;
pub mod viewer;

pub use decode::{Decoder, Frame, JpegDecoder};
pub use display::{KeyPoll, MinifbScreen, Overlay, Screen};
pub use fps::FpsCounter;
pub use reassembler::{FrameIter, Progress, Reassembler};
pub use source::{DatagramSource, Recv, SourceError, UdpSource};
