//! Frame pacing and frame-time accounting

use std::time::{Duration, Instant};

/// How long to sleep so a frame that started at `frame_start` lasts `target`.
/// Zero once the frame has already overrun; there is no catch-up.
#[inline]
pub fn pacing_delay(now: Instant, frame_start: Instant, target: Duration) -> Duration {
    target.saturating_sub(now.saturating_duration_since(frame_start))
}

/// Target period for a frame rate. Non-positive or non-finite rates disable pacing.
pub fn target_period(fps: f64) -> Duration {
    if fps.is_finite() && fps > 0.0 {
        Duration::from_nanos((1e9 / fps) as u64)
    } else {
        Duration::ZERO
    }
}

// ============================================================================
// Frame Clock
// ============================================================================

/// Fixed-rate frame clock
/// Holds the target period, the start of the last frame and the last measured period.
#[derive(Debug, Clone)]
pub struct FrameClock {
    target: Duration,
    last_frame: Option<Instant>,
    measured: Option<Duration>,
}

impl FrameClock {
    pub fn new(target_fps: f64) -> Self {
        Self {
            target: target_period(target_fps),
            last_frame: None,
            measured: None,
        }
    }

    pub fn set_target_fps(&mut self, fps: f64) {
        self.target = target_period(fps);
    }

    #[inline]
    pub fn target(&self) -> Duration {
        self.target
    }

    /// Call at the top of each frame
    pub fn begin(&mut self) -> Instant {
        let now = Instant::now();
        self.last_frame = Some(now);
        now
    }

    /// Block until the frame that began at `start` has lasted the target period,
    /// then record how long it actually took
    pub fn finish(&mut self, start: Instant) -> Duration {
        let delay = pacing_delay(Instant::now(), start, self.target);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        let elapsed = start.elapsed();
        self.record(elapsed);
        elapsed
    }

    /// Store a measured period directly
    pub fn record(&mut self, period: Duration) {
        self.measured = Some(period);
    }

    pub fn last_frame(&self) -> Option<Instant> {
        self.last_frame
    }

    /// Last measured period in seconds, 0 before any frame
    pub fn frame_period(&self) -> f64 {
        self.measured.map_or(0.0, |p| p.as_nanos() as f64 / 1e9)
    }

    /// Frames per second from the last measured period, 0 before any frame
    pub fn fps(&self) -> f64 {
        match self.measured {
            Some(p) if !p.is_zero() => 1e9 / p.as_nanos() as f64,
            _ => 0.0,
        }
    }
}
