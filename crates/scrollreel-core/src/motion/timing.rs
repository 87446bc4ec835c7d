//! Time calculation utilities for frame-clock driven animations

use std::time::Duration;

/// Calculate animation progress (0.0 to 1.0) from elapsed time and duration
///
/// # Returns
/// Progress value clamped to [0.0, 1.0]
#[inline]
pub fn progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Linear interpolation for f32 channels
#[inline]
pub fn lerp_f32(from: f32, to: f32, t: f64) -> f32 {
    lerp(from as f64, to as f64, t) as f32
}

/// Scale a duration by a ratio, in whole milliseconds
#[inline]
pub fn scale_ms(ms: u64, ratio: f64) -> Duration {
    Duration::from_millis((ms as f64 * ratio).round().max(0.0) as u64)
}

/// Accumulates frame-clock time for one animation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stopwatch {
    elapsed: Duration,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame
    #[inline]
    pub fn advance(&mut self, dt: Duration) -> Duration {
        self.elapsed = self.elapsed.saturating_add(dt);
        self.elapsed
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Check whether a window starting at `delay` and lasting `duration` has ended
    #[inline]
    pub fn has_passed(&self, delay: Duration, duration: Duration) -> bool {
        self.elapsed >= delay.saturating_add(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 1.0) - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_lerp_f32_endpoints_are_exact() {
        assert_eq!(lerp_f32(100.0, 0.0, 1.0), 0.0);
        assert_eq!(lerp_f32(-100.0, 0.0, 0.0), -100.0);
    }

    #[test]
    fn test_progress_zero_duration() {
        assert!((progress(Duration::from_millis(5), Duration::ZERO) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_clamps() {
        let d = Duration::from_millis(100);
        assert_eq!(progress(Duration::from_millis(50), d), 0.5);
        assert_eq!(progress(Duration::from_millis(500), d), 1.0);
    }

    #[test]
    fn test_scale_ms() {
        assert_eq!(scale_ms(640, 0.6), Duration::from_millis(384));
        assert_eq!(scale_ms(640, 0.5), Duration::from_millis(320));
    }

    #[test]
    fn test_stopwatch() {
        let mut watch = Stopwatch::new();
        watch.advance(Duration::from_millis(30));
        assert!(!watch.has_passed(Duration::from_millis(10), Duration::from_millis(30)));
        watch.advance(Duration::from_millis(10));
        assert!(watch.has_passed(Duration::from_millis(10), Duration::from_millis(30)));
    }
}
