//! Cooperative frame-rate cap.
//!
//! The host loop calls [`FrameLimiter::wait`] once per frame; it sleeps
//! just long enough that consecutive calls are at least `1 / fps` apart.
//! Frames that already took longer than that are never slowed further.

use std::time::{Duration, Instant};

/// Remembers when the previous frame ended.
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    last: Instant,
}

impl Default for FrameLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLimiter {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a limiter whose first frame is measured from `start`.
    pub fn starting_at(start: Instant) -> Self {
        Self { last: start }
    }

    /// Minimum spacing between frames at `fps`, or `None` when `fps` is
    /// not a positive finite number (no cap).
    pub fn period(fps: f64) -> Option<Duration> {
        if fps.is_finite() && fps > 0.0 {
            Some(Duration::from_secs_f64(1.0 / fps))
        } else {
            None
        }
    }

    /// How long a caller arriving at `now` still has to wait.
    pub fn delay_at(&self, now: Instant, fps: f64) -> Duration {
        match Self::period(fps) {
            Some(period) => period.saturating_sub(now.saturating_duration_since(self.last)),
            None => Duration::ZERO,
        }
    }

    /// Record a frame boundary at `now` (after any sleep).
    ///
    /// The mark only ever moves forward.
    pub fn mark(&mut self, now: Instant) {
        if now > self.last {
            self.last = now;
        }
    }

    /// Block until at least `1 / fps` has passed since the previous call,
    /// then start the next frame.
    pub fn wait(&mut self, fps: f64) {
        let delay = self.delay_at(Instant::now(), fps);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        self.mark(Instant::now());
    }

    /// When the previous frame ended.
    pub fn last_frame(&self) -> Instant {
        self.last
    }
}

// ── Tests ────────────────────────────────────────────────────────
