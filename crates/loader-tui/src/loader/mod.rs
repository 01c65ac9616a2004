//! Material-style circular loader
//!
//! - `timeline` - Stroke geometry and the indeterminate animation
//! - `ring` - Ring widget drawing the loader into a buffer
//! - `overlay` - Centered card showing a spinning loader over a view

pub mod overlay;
pub mod ring;
pub mod timeline;

use loader_core::config::LoaderConfig;
use loader_core::{RefreshAnimator, State};
use ratatui::style::Color;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::themes::parse_hex_color;
pub use overlay::LoaderOverlay;
pub use ring::LoaderRing;
pub use timeline::{ArcSpan, Stroke};

/// What the loader is currently showing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoaderMode {
    /// A fixed stroke, driven by pull progress
    Static { progress: f64 },
    /// The indeterminate animation, started at `since`
    Spinning { since: Instant },
}

/// Circular loader that follows refresh states
#[derive(Debug, Clone)]
pub struct MaterialLoader {
    config: LoaderConfig,
    color: Color,
    mode: LoaderMode,
}

impl MaterialLoader {
    pub fn new(config: LoaderConfig) -> Self {
        let color = parse_hex_color(&config.color).unwrap_or_else(|| {
            warn!(color = %config.color, "Invalid loader color, using red");
            Color::Red
        });
        Self {
            config,
            color,
            mode: LoaderMode::Static { progress: 0.0 },
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn mode(&self) -> LoaderMode {
        self.mode
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.mode, LoaderMode::Spinning { .. })
    }

    /// Pull progress of the static stroke; 0 while spinning
    pub fn progress(&self) -> f64 {
        match self.mode {
            LoaderMode::Static { progress } => progress,
            LoaderMode::Spinning { .. } => 0.0,
        }
    }

    /// Start the indeterminate animation from its first frame
    pub fn start(&mut self) {
        self.mode = LoaderMode::Spinning {
            since: Instant::now(),
        };
    }

    /// Stop animating and keep the last pull stroke
    pub fn stop(&mut self, last_progress: f64) {
        self.mode = LoaderMode::Static {
            progress: last_progress,
        };
    }

    pub fn set_progress(&mut self, progress: f64) {
        self.mode = LoaderMode::Static {
            progress: progress.clamp(0.0, 1.0),
        };
    }

    /// Visible arc at `now`, with every rotation applied
    pub fn arc_at(&self, now: Instant) -> ArcSpan {
        let path_angle = timeline::path_angle(&self.config);
        match self.mode {
            LoaderMode::Static { progress } => timeline::releasing_stroke(progress, &self.config)
                .span(path_angle)
                .rotated(timeline::releasing_rotation(progress)),
            LoaderMode::Spinning { since } => {
                let elapsed = now.saturating_duration_since(since);
                timeline::indeterminate_stroke(elapsed, &self.config)
                    .span(path_angle)
                    .rotated(timeline::container_rotation(elapsed, &self.config))
            }
        }
    }
}

impl Default for MaterialLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

impl RefreshAnimator for MaterialLoader {
    fn render(&mut self, state: State) {
        match state {
            State::Idle | State::Finished => {
                if self.is_spinning() {
                    debug!(%state, "Loader stopped");
                }
                let last = self.progress();
                self.stop(last);
            }
            State::Loading => {
                debug!("Loader spinning");
                self.start();
            }
            State::Releasing { progress } => self.set_progress(progress),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_releasing_sets_static_stroke() {
        let mut loader = MaterialLoader::default();
        loader.render(State::releasing(0.5));
        assert_eq!(loader.mode(), LoaderMode::Static { progress: 0.5 });

        let arc = loader.arc_at(Instant::now());
        let path = timeline::path_angle(loader.config());
        assert!((arc.length() - path * 0.025).abs() < 1e-9);
        assert!((arc.start - 0.75 * PI).abs() < 1e-9);
    }

    #[test]
    fn test_loading_starts_spinning() {
        let mut loader = MaterialLoader::default();
        loader.render(State::Loading);
        assert!(loader.is_spinning());
        assert_eq!(loader.progress(), 0.0);
    }

    #[test]
    fn test_finished_and_idle_stop() {
        let mut loader = MaterialLoader::default();
        loader.render(State::Loading);
        loader.render(State::Finished);
        assert!(!loader.is_spinning());

        loader.render(State::releasing(0.3));
        loader.render(State::Idle);
        assert_eq!(loader.mode(), LoaderMode::Static { progress: 0.3 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_spinning_arc_moves_with_time() {
        let mut loader = MaterialLoader::default();
        loader.render(State::Loading);
        let first = loader.arc_at(Instant::now());
        tokio::time::advance(Duration::from_millis(300)).await;
        let later = loader.arc_at(Instant::now());
        assert_ne!(first.end, later.end);
    }

    #[test]
    fn test_invalid_color_falls_back() {
        let config = LoaderConfig {
            color: "not-a-color".to_string(),
            ..Default::default()
        };
        assert_eq!(MaterialLoader::new(config).color(), Color::Red);
        assert_eq!(MaterialLoader::default().color(), Color::Rgb(0xea, 0x69, 0x62));
    }
}
