//! Pull-to-refresh lifecycle states

use std::fmt;

use serde::Serialize;

/// Lifecycle of a pull-to-refresh interaction
///
/// `PartialEq` compares variants only: two `Releasing` values are equal
/// whatever their progress. Transition guards go through [`State::same_case`].
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum State {
    /// No interaction in progress
    #[default]
    Idle,
    /// Content is pulled past the top edge; `progress` runs from 0 to 1 as
    /// the pull approaches the header height
    Releasing { progress: f64 },
    /// Refresh action triggered and in flight
    Loading,
    /// Refresh action completed; resets to `Idle` once the header is hidden
    Finished,
}

impl State {
    /// Build a releasing state, clamping progress into `[0, 1]`
    pub fn releasing(progress: f64) -> Self {
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        State::Releasing { progress }
    }

    /// Compare variants, ignoring the releasing progress
    pub fn same_case(&self, other: &State) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, State::Idle)
    }

    pub fn is_releasing(&self) -> bool {
        matches!(self, State::Releasing { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, State::Loading)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, State::Finished)
    }

    /// Releasing progress, or `None` outside of `Releasing`
    pub fn progress(&self) -> Option<f64> {
        match self {
            State::Releasing { progress } => Some(*progress),
            _ => None,
        }
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.same_case(other)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Idle => write!(f, "Idle"),
            State::Releasing { progress } => write!(f, "Releasing:{}", progress),
            State::Loading => write!(f, "Loading"),
            State::Finished => write!(f, "Finished"),
        }
    }
}
