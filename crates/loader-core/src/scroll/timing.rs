//! Time calculation utilities for surface animations
//!
//! Times are `tokio::time::Instant` so tests can pause and advance the clock.

use std::time::Duration;

use tokio::time::Instant;

/// Progress (0.0 to 1.0) of an animation that waits `delay` after `start`
/// and then runs for `duration`
///
/// Returns `None` while the delay has not elapsed yet.
#[inline]
pub fn delayed_progress(start: Instant, delay: Duration, duration: Duration, now: Instant) -> Option<f64> {
    let elapsed = now.saturating_duration_since(start);
    if elapsed < delay {
        return None;
    }
    if duration.is_zero() {
        return Some(1.0);
    }
    let running = elapsed - delay;
    Some((running.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0))
}

/// Check if a delayed animation is complete
#[inline]
pub fn is_complete(start: Instant, delay: Duration, duration: Duration, now: Instant) -> bool {
    now.saturating_duration_since(start) >= delay + duration
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}
