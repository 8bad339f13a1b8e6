//! Frame timing and delta time.
//!
//! The [`Time`] value is owned by the [`Backdrop`](crate::backdrop::Backdrop)
//! and updated at the start of each frame. Live hosts call [`Time::update`],
//! which reads the wall clock; replay and tests call [`Time::advance_to`] with
//! an explicit cumulative elapsed time so the same sequence always produces
//! the same frames.

use std::time::{Duration, Instant};

/// Frame timing: delta, cumulative elapsed time and frame counter.
#[derive(Debug, Clone, Copy)]
pub struct Time {
    /// When the clock started.
    startup: Instant,
    /// Duration of the previous frame.
    delta: Duration,
    /// Total time since the clock started.
    elapsed: Duration,
    /// Frame counter.
    frame_count: u64,
}

impl Time {
    pub fn new() -> Self {
        Self {
            startup: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Call at the start of each frame to update timing from the wall clock.
    pub fn update(&mut self) {
        let elapsed = self.startup.elapsed();
        self.advance_to(elapsed);
    }

    /// Set the cumulative elapsed time explicitly and count one frame.
    ///
    /// Going backwards is allowed (the delta saturates to zero).
    pub fn advance_to(&mut self, elapsed: Duration) {
        self.delta = elapsed.saturating_sub(self.elapsed);
        self.elapsed = elapsed;
        self.frame_count += 1;
    }

    /// Restart the clock from zero.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Duration of the previous frame.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Delta time in seconds (f32).
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Total elapsed time since the clock started.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Total elapsed time in seconds (f32).
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Number of frames counted so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Estimated FPS based on the last frame's delta.
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_tracks_delta_and_frames() {
        let mut time = Time::new();
        time.advance_to(Duration::from_millis(16));
        time.advance_to(Duration::from_millis(48));
        assert_eq!(time.frame_count(), 2);
        assert_eq!(time.delta(), Duration::from_millis(32));
        assert_eq!(time.elapsed(), Duration::from_millis(48));
        assert!((time.fps() - 31.25).abs() < 1e-3);
    }

    #[test]
    fn going_backwards_saturates_delta() {
        let mut time = Time::new();
        time.advance_to(Duration::from_secs(2));
        time.advance_to(Duration::from_secs(1));
        assert_eq!(time.delta(), Duration::ZERO);
        assert_eq!(time.fps(), 0.0);
    }
}
