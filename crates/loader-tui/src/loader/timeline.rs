//! Stroke geometry of the material loader
//!
//! The stroke runs along a path that winds around the circle `arcs` times.
//! Stroke positions are fractions of that whole path, so one winding is
//! `1 / arcs`. The indeterminate animation walks the stroke forward in
//! cycles of two sweeps: the head runs ahead while the tail trails, then the
//! tail catches up and leaves a short arc behind.

use std::f64::consts::{PI, TAU};
use std::time::Duration;

use loader_core::config::LoaderConfig;
use loader_core::scroll::{EasingType, EasingTypeExt};

const MAX_CYCLES: u32 = 10_000;

/// Visible part of the ring, as angles in radians measured clockwise from
/// three o'clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSpan {
    pub start: f64,
    pub end: f64,
}

impl ArcSpan {
    pub fn length(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// The arc covers `angle`, taken modulo a full turn
    pub fn contains(&self, angle: f64) -> bool {
        let length = self.length();
        if length <= 0.0 {
            return false;
        }
        if length >= TAU {
            return true;
        }
        (angle - self.start).rem_euclid(TAU) <= length
    }

    /// Rotate the whole arc clockwise
    pub fn rotated(self, by: f64) -> Self {
        Self {
            start: self.start + by,
            end: self.end + by,
        }
    }

    /// Angle of the leading edge within one turn
    pub fn head(&self) -> f64 {
        self.end.rem_euclid(TAU)
    }
}

/// Stroke start and end, as fractions of the wound path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub start: f64,
    pub end: f64,
}

impl Stroke {
    /// Map onto the circle given the path's total angle
    pub fn span(&self, path_angle: f64) -> ArcSpan {
        ArcSpan {
            start: self.start * path_angle,
            end: self.end * path_angle,
        }
    }
}

/// Total angle of the wound path
pub fn path_angle(config: &LoaderConfig) -> f64 {
    config.arcs as f64 * 6.0 + 1.5 * PI
}

fn value_scale(config: &LoaderConfig) -> f64 {
    1.0 / config.arcs.max(1) as f64
}

/// Stroke drawn for a pull gesture at `progress`
pub fn releasing_stroke(progress: f64, config: &LoaderConfig) -> Stroke {
    Stroke {
        start: 0.0,
        end: value_scale(config) * progress,
    }
}

/// Rotation of the stroke layer for a pull gesture at `progress`
pub fn releasing_rotation(progress: f64) -> f64 {
    progress * 3.0 * PI / 2.0
}

/// Number of cycles before the stroke start lands on a whole path again
pub fn cycle_count(config: &LoaderConfig) -> u32 {
    let delta = value_scale(config) * (config.max_stroke + config.min_stroke);
    (1..MAX_CYCLES)
        .find(|&n| {
            let milli = (n as f64 * delta * 1000.0 + 1e-6).floor() as i64;
            milli % 1000 == 0
        })
        .unwrap_or(MAX_CYCLES)
}

/// Length of one full pass of the indeterminate animation
pub fn loop_duration(config: &LoaderConfig) -> Duration {
    Duration::from_millis(config.arc_duration_ms) * 2 * cycle_count(config)
}

/// Stroke of the indeterminate animation `elapsed` into spinning
pub fn indeterminate_stroke(elapsed: Duration, config: &LoaderConfig) -> Stroke {
    let sweep = config.arc_duration_ms as f64 / 1000.0;
    if sweep <= 0.0 {
        return Stroke { start: 0.0, end: 0.0 };
    }

    let scale = value_scale(config);
    let grown = scale * (config.max_stroke + config.min_stroke);
    let cycles = cycle_count(config);

    let t = elapsed.as_secs_f64() % (sweep * 2.0 * cycles as f64);
    let cycle = (t / (sweep * 2.0)).floor();
    let base = cycle * grown;
    let local = t - cycle * sweep * 2.0;

    if local < sweep {
        let eased = EasingType::EaseInOut.apply(local / sweep);
        Stroke {
            start: base - scale * config.min_stroke * (1.0 - eased),
            end: base + grown * eased,
        }
    } else {
        let eased = EasingType::EaseInOut.apply((local - sweep) / sweep);
        Stroke {
            start: base + scale * config.max_stroke * eased,
            end: base + grown,
        }
    }
}

/// Container rotation `elapsed` into spinning
pub fn container_rotation(elapsed: Duration, config: &LoaderConfig) -> f64 {
    if config.rotation_period_ms == 0 {
        return 0.0;
    }
    let period = config.rotation_period_ms as f64 / 1000.0;
    TAU * (elapsed.as_secs_f64() % period) / period
}
