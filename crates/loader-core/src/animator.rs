use crate::state::State;

/// Anything that can show a visual response to a refresh state
///
/// The controller calls `render` on every state assignment, including
/// repeated assignments of the same variant (releasing progress updates).
pub trait RefreshAnimator {
    fn render(&mut self, state: State);
}

impl<F> RefreshAnimator for F
where
    F: FnMut(State),
{
    fn render(&mut self, state: State) {
        self(state)
    }
}

/// Animator that keeps every rendered state, for traces and tests
#[derive(Debug, Clone, Default)]
pub struct RecordingAnimator {
    rendered: Vec<State>,
}

impl RecordingAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rendered(&self) -> &[State] {
        &self.rendered
    }

    pub fn last(&self) -> Option<State> {
        self.rendered.last().copied()
    }

    /// Remove and return everything rendered so far
    pub fn drain(&mut self) -> Vec<State> {
        std::mem::take(&mut self.rendered)
    }
}

impl RefreshAnimator for RecordingAnimator {
    fn render(&mut self, state: State) {
        self.rendered.push(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_animator() {
        let mut seen = Vec::new();
        {
            let mut animator = |state: State| seen.push(state);
            animator.render(State::Loading);
            animator.render(State::Idle);
        }
        assert_eq!(seen, vec![State::Loading, State::Idle]);
    }

    #[test]
    fn test_shared_through_closure() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let shared = Rc::new(RefCell::new(RecordingAnimator::new()));
        let handle = shared.clone();
        let mut animator = move |state: State| handle.borrow_mut().render(state);
        animator.render(State::releasing(0.3));
        assert_eq!(shared.borrow().last(), Some(State::releasing(0.3)));
    }

    #[test]
    fn test_drain() {
        let mut recorder = RecordingAnimator::new();
        recorder.render(State::Finished);
        assert_eq!(recorder.drain(), vec![State::Finished]);
        assert!(recorder.rendered().is_empty());
    }
}
