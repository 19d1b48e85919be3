//! Frame reassembly state machine.
//!
//! The camera splits each JPEG frame into UDP datagrams using the simplest
//! possible framing: a 4-byte little-endian length header, then the frame
//! payload in arbitrarily sized fragments.  The [`Reassembler`] consumes
//! datagrams one at a time and emits a completed frame buffer whenever the
//! accumulated bytes reach the advertised length.
//!
//! The machine has two states:
//!
//! ```text
//!              4-byte datagram (value N > 0)
//!      IDLE ────────────────────────────────▶ ACCUMULATING
//!        ▲                                        │   │
//!        │  accumulated ≥ N → emit frame          │   │ fragment:
//!        └────────────────────────────────────────┘   │ append
//!                                                     ▼
//!                                               ACCUMULATING
//! ```
//!
//! Protocol quirks, preserved deliberately for wire compatibility:
//! - **Any** 4-byte datagram is read as a header, whatever the current
//!   state.  There is no magic byte or sequence number, so a payload
//!   fragment that happens to be exactly 4 bytes long is indistinguishable
//!   from a header.  The next real header resynchronises the stream.
//! - Completion uses `>=`, not `==`: if the sender's final fragment
//!   overshoots the declared length, the excess bytes are kept in the
//!   emitted frame rather than truncated.
//! - A header value of 0 returns the machine to idle; fragments arriving
//!   while idle are silently dropped.
//!
//! There is no integrity check.  Loss, reordering, or duplication corrupts
//! the assembled bytes; the downstream decoder is expected to reject them.

/// Byte length of a frame-length header datagram.
pub const HEADER_LEN: usize = 4;

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Observable state of the [`Reassembler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReassemblyState {
    /// No active frame; fragments are dropped until a nonzero header arrives.
    Idle,
    /// A header has been seen; fragments are being accumulated.
    Accumulating,
}

/// Outcome of feeding one datagram to [`Reassembler::push`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// The datagram completed a frame; contains every byte accumulated since
    /// the last header (including any overshoot past the declared length).
    Frame(Vec<u8>),
    /// The datagram was consumed (header or fragment) but no frame is
    /// complete yet.
    Accumulating,
    /// The datagram was discarded: either a fragment with no active frame,
    /// or a header declaring a zero-length frame.
    Dropped,
}

/// Reassembles frames from a stream of header and fragment datagrams.
///
/// Owns the in-progress accumulator exclusively; at most one frame is live
/// at a time.  All former module-level mutable state of the protocol lives
/// in these two fields.
#[derive(Debug, Default)]
pub struct Reassembler {
    /// Target byte count from the most recent header; 0 means no active frame.
    expected_len: usize,
    /// Fragment bytes received since the last header, in arrival order.
    buf: Vec<u8>,
}

impl Reassembler {
    /// Create a reassembler in the idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state, derived from the expected length sentinel.
    pub fn state(&self) -> ReassemblyState {
        if self.expected_len == 0 {
            ReassemblyState::Idle
        } else {
            ReassemblyState::Accumulating
        }
    }

    /// Number of fragment bytes buffered so far.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Target length from the most recent header (0 while idle).
    pub fn expected_len(&self) -> usize {
        self.expected_len
    }

    /// Feed one datagram through the state machine.
    ///
    /// Exactly 4 bytes → header: the accumulator is discarded (a partial
    /// frame is never emitted) and accumulation restarts under the new
    /// length.  Any other length → fragment: appended if a frame is active,
    /// dropped otherwise.  Returns [`Progress::Frame`] once the accumulator
    /// reaches the expected length.
    pub fn push(&mut self, datagram: &[u8]) -> Progress {
        if datagram.len() == HEADER_LEN {
            // try_into cannot fail: length checked above.
            let declared = u32::from_le_bytes(datagram.try_into().unwrap());
            self.expected_len = declared as usize;
            self.buf.clear();
            log::debug!("frame header: expecting {} bytes", self.expected_len);
            return if self.expected_len == 0 {
                Progress::Dropped
            } else {
                Progress::Accumulating
            };
        }

        if self.expected_len == 0 {
            log::debug!("dropping {}-byte fragment with no active frame", datagram.len());
            return Progress::Dropped;
        }

        self.buf.extend_from_slice(datagram);
        if self.buf.len() >= self.expected_len {
            log::debug!(
                "frame complete: {} bytes ({} overshoot)",
                self.buf.len(),
                self.buf.len() - self.expected_len
            );
            self.expected_len = 0;
            return Progress::Frame(std::mem::take(&mut self.buf));
        }
        Progress::Accumulating
    }
}

// ---------------------------------------------------------------------------
// Iterator adapter
// ---------------------------------------------------------------------------

/// Adapts an iterator of raw datagrams into an iterator of completed frames.
///
/// Lazy and non-restartable: datagrams are consumed exactly once, and the
/// sequence is as long as the underlying datagram stream allows (infinite
/// over a live socket, finite over a scripted test sequence).
pub struct FrameIter<I> {
    datagrams: I,
    reassembler: Reassembler,
}

impl<I> FrameIter<I> {
    pub fn new(datagrams: I) -> Self {
        Self {
            datagrams,
            reassembler: Reassembler::new(),
        }
    }
}

impl<I> Iterator for FrameIter<I>
where
    I: Iterator<Item = Vec<u8>>,
{
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        for datagram in self.datagrams.by_ref() {
            if let Progress::Frame(frame) = self.reassembler.push(&datagram) {
                return Some(frame);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a 4-byte little-endian header datagram for length `n`.
    fn header(n: u32) -> Vec<u8> {
        n.to_le_bytes().to_vec()
    }

    #[test]
    fn starts_idle_and_empty() {
        let r = Reassembler::new();
        assert_eq!(r.state(), ReassemblyState::Idle);
        assert_eq!(r.buffered(), 0);
        assert_eq!(r.expected_len(), 0);
    }

    #[test]
    fn header_moves_to_accumulating() {
        let mut r = Reassembler::new();
        assert_eq!(r.push(&header(100)), Progress::Accumulating);
        assert_eq!(r.state(), ReassemblyState::Accumulating);
        assert_eq!(r.expected_len(), 100);
    }

    #[test]
    fn exact_length_emits_frame_and_resets() {
        let mut r = Reassembler::new();
        r.push(&header(6));
        assert_eq!(r.push(b"abc"), Progress::Accumulating);
        assert_eq!(r.push(b"def"), Progress::Frame(b"abcdef".to_vec()));
        assert_eq!(r.state(), ReassemblyState::Idle);
        assert_eq!(r.buffered(), 0);
    }

    #[test]
    fn overshoot_is_preserved_not_truncated() {
        let mut r = Reassembler::new();
        r.push(&header(5));
        // Final fragment overshoots the declared length by 3 bytes.
        assert_eq!(r.push(b"abcdefgh"), Progress::Frame(b"abcdefgh".to_vec()));
    }

    #[test]
    fn new_header_discards_partial_frame() {
        let mut r = Reassembler::new();
        r.push(&header(10));
        r.push(b"stale");
        // Second header before completion: the 5 buffered bytes must vanish.
        assert_eq!(r.push(&header(3)), Progress::Accumulating);
        assert_eq!(r.buffered(), 0);
        assert_eq!(r.push(b"xyz"), Progress::Frame(b"xyz".to_vec()));
    }

    #[test]
    fn idle_fragments_are_dropped() {
        let mut r = Reassembler::new();
        assert_eq!(r.push(b"no header yet"), Progress::Dropped);
        assert_eq!(r.state(), ReassemblyState::Idle);
        // A later frame must not contain the dropped bytes.
        r.push(&header(2));
        assert_eq!(r.push(b"ok"), Progress::Frame(b"ok".to_vec()));
    }

    #[test]
    fn zero_header_returns_to_idle() {
        let mut r = Reassembler::new();
        r.push(&header(8));
        assert_eq!(r.push(&header(0)), Progress::Dropped);
        assert_eq!(r.state(), ReassemblyState::Idle);
        assert_eq!(r.push(b"dropped"), Progress::Dropped);
        // Recovers on the next nonzero header.
        r.push(&header(2));
        assert_eq!(r.push(b"hi"), Progress::Frame(b"hi".to_vec()));
    }

    #[test]
    fn four_byte_fragment_is_read_as_header() {
        // Known protocol ambiguity: a 4-byte payload fragment restarts
        // accumulation instead of being appended.
        let mut r = Reassembler::new();
        r.push(&header(8));
        r.push(b"data");
        // 4-byte "fragment" 0x61616161 = 1_633_771_873 becomes the new length.
        assert_eq!(r.push(b"aaaa"), Progress::Accumulating);
        assert_eq!(r.expected_len(), u32::from_le_bytes(*b"aaaa") as usize);
        assert_eq!(r.buffered(), 0);
    }

    #[test]
    fn frame_iter_yields_each_completed_frame() {
        let datagrams = vec![
            header(3),
            b"one".to_vec(),
            b"mid-stream noise".to_vec(), // arrives while idle, dropped
            header(3),
            b"two".to_vec(),
        ];
        let frames: Vec<Vec<u8>> = FrameIter::new(datagrams.into_iter()).collect();
        assert_eq!(frames, vec![b"one".to_vec(), b"two".to_vec()]);
    }

    #[test]
    fn frame_iter_is_lazy() {
        let datagrams = vec![header(1), b"a!".to_vec(), header(1), b"b!".to_vec()];
        let mut iter = FrameIter::new(datagrams.into_iter());
        assert_eq!(iter.next(), Some(b"a!".to_vec()));
        assert_eq!(iter.next(), Some(b"b!".to_vec()));
        assert_eq!(iter.next(), None);
    }
}
