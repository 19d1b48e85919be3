//! Bounded-wait UDP datagram receive.
//!
//! [`UdpSource`] is a thin wrapper around `std::net::UdpSocket` bound to the
//! wildcard address.  All protocol logic lives elsewhere; this module owns
//! only byte I/O and the timeout/fatal error split:
//!
//! - A kernel read timeout is expected with no traffic and surfaces as
//!   [`Recv::TimedOut`], never as an error.  The caller treats it as a
//!   no-op and keeps looping, which is what keeps the viewer responsive to
//!   the exit key when the sender goes quiet.
//! - Any other socket error is fatal and propagates as [`SourceError`].
//!
//! The socket is exclusively owned by the source for the life of the
//! process and released on drop.  [`DatagramSource`] exists so the viewer
//! loop can be fed a scripted datagram sequence in tests.

use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::time::Duration;

use thiserror::Error;

/// Receive buffer size; larger datagrams are truncated by the kernel.
/// The camera keeps its fragments well under this.
pub const RECV_BUFFER: usize = 2048;

/// Fatal socket errors (bind failure, OS-level receive failure).
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("socket I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of one bounded receive attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recv {
    /// One datagram, truncated to its received length.
    Datagram(Vec<u8>),
    /// The timeout elapsed with no traffic; not an error.
    TimedOut,
}

/// Anything that can yield datagrams with a bounded wait.
///
/// Implemented by [`UdpSource`] for the real socket and by scripted sources
/// in tests.
pub trait DatagramSource {
    fn recv(&mut self) -> Result<Recv, SourceError>;
}

/// A blocking UDP socket with a fixed read timeout.
#[derive(Debug)]
pub struct UdpSource {
    /// Address this socket is bound to (filled in after OS assigns the port).
    pub local_addr: SocketAddr,
    socket: UdpSocket,
}

impl UdpSource {
    /// Bind to `0.0.0.0:port` and arm the kernel read timeout.
    ///
    /// Port 0 lets the OS choose an ephemeral port (used by tests).
    /// `timeout` must be nonzero; `set_read_timeout` rejects zero durations.
    pub fn bind(port: u16, timeout: Duration) -> Result<Self, SourceError> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, port))?;
        socket.set_read_timeout(Some(timeout))?;
        let local_addr = socket.local_addr()?;
        Ok(Self { local_addr, socket })
    }
}

/// Returns true for the io error kinds the kernel uses to signal an elapsed
/// read timeout (platform-dependent: `WouldBlock` on Unix, `TimedOut` on
/// Windows).
fn is_timeout(e: &std::io::Error) -> bool {
    matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}

impl DatagramSource for UdpSource {
    fn recv(&mut self) -> Result<Recv, SourceError> {
        let mut buf = [0u8; RECV_BUFFER];
        match self.socket.recv_from(&mut buf) {
            Ok((n, _)) => Ok(Recv::Datagram(buf[..n].to_vec())),
            Err(e) if is_timeout(&e) => Ok(Recv::TimedOut),
            Err(e) => Err(e.into()),
        }
    }
}
