//! Animations of a surface's content offset and insets
//!
//! A [`SurfaceAnimation`] is a tween from the values a surface had when the
//! animation started to a target, sampled once per frame. [`spring_back`] is
//! the frame-by-frame decay a surface uses to settle after a drag.

use std::time::Duration;

use tokio::time::Instant;

use super::easing::{EasingType, EasingTypeExt};
use super::timing::{delayed_progress, is_complete, lerp};
use crate::surface::EdgeInsets;

/// Values to apply to a surface for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    pub offset_y: f64,
    /// `None` when the animation leaves insets alone
    pub insets: Option<EdgeInsets>,
    /// This is the last frame; the target values are exact
    pub done: bool,
}

/// Tween of the vertical content offset and, optionally, the content insets
#[derive(Debug, Clone)]
pub struct SurfaceAnimation {
    start: Instant,
    delay: Duration,
    duration: Duration,
    easing: EasingType,
    offset: (f64, f64),
    insets: Option<(EdgeInsets, EdgeInsets)>,
}

impl SurfaceAnimation {
    /// Animate the offset only
    pub fn offset(start: Instant, from: f64, to: f64, duration: Duration, easing: EasingType) -> Self {
        Self {
            start,
            delay: Duration::ZERO,
            duration,
            easing,
            offset: (from, to),
            insets: None,
        }
    }

    /// Also animate the insets
    pub fn with_insets(mut self, from: EdgeInsets, to: EdgeInsets) -> Self {
        self.insets = Some((from, to));
        self
    }

    /// Hold the start values for `delay` before moving
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn target_offset(&self) -> f64 {
        self.offset.1
    }

    pub fn target_insets(&self) -> Option<EdgeInsets> {
        self.insets.map(|(_, to)| to)
    }

    pub fn is_complete(&self, now: Instant) -> bool {
        is_complete(self.start, self.delay, self.duration, now)
    }

    /// Values for the frame at `now`, or `None` while still delayed
    pub fn sample(&self, now: Instant) -> Option<AnimationFrame> {
        if self.is_complete(now) {
            return Some(AnimationFrame {
                offset_y: self.offset.1,
                insets: self.target_insets(),
                done: true,
            });
        }

        let t = delayed_progress(self.start, self.delay, self.duration, now)?;
        let eased = self.easing.apply(t);
        Some(AnimationFrame {
            offset_y: lerp(self.offset.0, self.offset.1, eased),
            insets: self.insets.map(|(from, to)| from.lerp(&to, eased)),
            done: false,
        })
    }
}

/// One frame of elastic settle-back toward `target`
///
/// Removes `speed` of the remaining distance; snaps once within half a point.
pub fn spring_back(offset: f64, target: f64, speed: f64) -> f64 {
    let next = target + (offset - target) * (1.0 - speed.clamp(0.0, 1.0));
    if (next - target).abs() < 0.5 {
        target
    } else {
        next
    }
}
