//! Offset band classification

use crate::state::State;

/// Decide the state to assign for one offset sample
///
/// `adjusted` is the observed offset plus the default top inset, so 0 is the
/// resting top edge and negative values are overscroll. Bands are checked in
/// order; the `-header_height` boundary belongs to the releasing band.
///
/// Returns `None` when the sample falls outside every band or the current
/// state blocks the band it falls in.
pub fn next_state(
    current: State,
    adjusted: f64,
    header_height: f64,
    overscroll_limit: f64,
    dragging: bool,
) -> Option<State> {
    let loading = current.same_case(&State::Loading);
    let busy = loading || current.same_case(&State::Finished);

    if adjusted == 0.0 && !loading {
        Some(State::Idle)
    } else if (-header_height..=0.0).contains(&adjusted) && !busy {
        Some(State::releasing(-adjusted / header_height))
    } else if (-overscroll_limit..=-header_height).contains(&adjusted) {
        if current.same_case(&State::releasing(1.0)) && !dragging {
            Some(State::Loading)
        } else if !busy {
            Some(State::releasing(1.0))
        } else {
            None
        }
    } else {
        None
    }
}
