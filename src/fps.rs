//! Rolling one-second frame-rate estimate for the display overlay.

use std::time::{Duration, Instant};

/// Minimum window length before the rate is recomputed.
const WINDOW: Duration = Duration::from_secs(1);

/// Counts frame completions and reports frames-per-second over rolling
/// windows of at least one second.
///
/// Timestamps are passed in by the caller so tests can simulate time.
/// Single-threaded; no interior mutability needed.
#[derive(Debug)]
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    rate: f64,
}

impl FpsCounter {
    /// Start a counter whose first window opens at `now`.  The reported
    /// rate is 0.0 until the first full window elapses.
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            rate: 0.0,
        }
    }

    /// Record one completed frame at `now` and return the current rate.
    ///
    /// When at least one second has passed since the window opened, the
    /// rate becomes `frames / elapsed` and a fresh window starts; between
    /// updates the previous rate is returned unchanged.
    pub fn record_frame(&mut self, now: Instant) -> f64 {
        self.frames += 1;
        let elapsed = now.duration_since(self.window_start);
        if elapsed >= WINDOW {
            self.rate = f64::from(self.frames) / elapsed.as_secs_f64();
            self.frames = 0;
            self.window_start = now;
        }
        self.rate
    }

    /// Last computed rate without recording a frame.
    pub fn rate(&self) -> f64 {
        self.rate
    }
}
