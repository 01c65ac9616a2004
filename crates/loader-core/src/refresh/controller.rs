//! Pull-to-refresh controller
//!
//! Observes a scroll surface's offset, turns overscroll into [`State`]
//! assignments, drives the animator and runs the refresh action.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use super::decision::next_state;
use crate::animator::RefreshAnimator;
use crate::config::RefreshConfig;
use crate::scroll::{EasingType, SurfaceAnimation};
use crate::state::State;
use crate::surface::{EdgeInsets, HeaderView, Layer, ScrollSurface, Subscription};

/// Zero-argument callback run once per loading cycle
pub type RefreshAction = Box<dyn FnMut()>;

const DEFAULT_HEADER_WIDTH: f64 = 320.0;

/// Work scheduled for later in the interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Continuation {
    /// Programmatic start finished settling
    EnterLoading,
    /// Loading reveal animation ended
    RestoreBounce,
    /// Finished reset animation ended
    ResetToIdle,
}

#[derive(Debug)]
struct Timer {
    due: Instant,
    then: Continuation,
}

#[derive(Debug)]
struct Running {
    animation: SurfaceAnimation,
    then: Option<Continuation>,
}

/// Pull-to-refresh state machine bound to one scroll surface at a time
pub struct RefreshController<A> {
    header: HeaderView,
    animator: A,
    action: Option<RefreshAction>,
    config: RefreshConfig,
    state: State,
    default_insets: EdgeInsets,
    previous_offset_y: f64,
    subscription: Option<Subscription>,
    attached: bool,
    running: Option<Running>,
    timers: Vec<Timer>,
}

impl<A: RefreshAnimator> RefreshController<A> {
    pub fn new(animator: A, config: RefreshConfig) -> Self {
        Self {
            header: HeaderView::new(DEFAULT_HEADER_WIDTH, config.header_height),
            animator,
            action: None,
            config,
            state: State::Idle,
            default_insets: EdgeInsets::default(),
            previous_offset_y: 0.0,
            subscription: None,
            attached: false,
            running: None,
            timers: Vec::new(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn header(&self) -> &HeaderView {
        &self.header
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut A {
        &mut self.animator
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    /// Insets the surface had when the controller was attached
    pub fn default_insets(&self) -> EdgeInsets {
        self.default_insets
    }

    pub fn previous_offset_y(&self) -> f64 {
        self.previous_offset_y
    }

    pub fn hide_delay(&self) -> Duration {
        self.config.hide_delay()
    }

    /// Delay between finishing and sliding the header away
    pub fn set_hide_delay(&mut self, delay: Duration) {
        self.config.hide_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_observing(&self) -> bool {
        self.subscription.is_some()
    }

    /// An animation or a programmatic start currently owns the surface offset
    pub fn is_driving_surface(&self) -> bool {
        self.running.is_some() || self.has_pending_start()
    }

    fn has_pending_start(&self) -> bool {
        self.timers
            .iter()
            .any(|timer| timer.then == Continuation::EnterLoading)
    }

    /// Bind to a surface: snapshot its insets, put the header above the
    /// visible area behind the content and start observing offsets
    pub fn attach<S, F>(&mut self, surface: &mut S, action: F)
    where
        S: ScrollSurface,
        F: FnMut() + 'static,
    {
        if self.attached {
            warn!("Refresh controller is already attached; ignoring attach");
            return;
        }

        self.default_insets = surface.content_inset();
        self.action = Some(Box::new(action));
        self.header.origin_y = -self.header.height;
        self.header.layer = Layer::Back;
        surface.insert_header(&self.header);
        self.attached = true;

        debug!(
            header_height = self.header.height,
            default_top_inset = self.default_insets.top,
            "Refresh controller attached"
        );
        self.start_observing(surface);
    }

    /// Handle an offset-changed notification from the surface
    ///
    /// Classifies the previously observed offset, then records the current one.
    pub fn on_offset_changed<S: ScrollSurface>(&mut self, surface: &mut S) {
        if self.subscription.is_none() {
            trace!("Offset change ignored while not observing");
            return;
        }

        let adjusted = self.previous_offset_y + self.default_insets.top;
        trace!(adjusted, state = %self.state, "Offset sample");

        if let Some(next) = next_state(
            self.state,
            adjusted,
            self.header.height,
            self.config.overscroll_limit,
            surface.is_dragging(),
        ) {
            self.set_state(next, surface);
        }

        self.previous_offset_y = surface.content_offset_y();
    }

    /// Scroll the header into view and enter loading after the settle delay
    ///
    /// No-op unless idle with no start already pending.
    pub fn start_refreshing<S: ScrollSurface>(&mut self, surface: &mut S) {
        if !self.state.same_case(&State::Idle) || self.has_pending_start() {
            debug!(state = %self.state, "start_refreshing ignored");
            return;
        }

        let now = Instant::now();
        let target = -self.header.height - self.default_insets.top;
        let scroll = SurfaceAnimation::offset(
            now,
            surface.content_offset_y(),
            target,
            self.config.scroll_duration(),
            EasingType::EaseInOut,
        );
        self.run(scroll, None, surface);
        self.timers.push(Timer {
            due: now + self.config.start_delay(),
            then: Continuation::EnterLoading,
        });
    }

    /// Finish a loading cycle; no-op unless loading
    pub fn end_refreshing<S: ScrollSurface>(&mut self, surface: &mut S) {
        if self.state.same_case(&State::Loading) {
            self.set_state(State::Finished, surface);
        } else {
            debug!(state = %self.state, "end_refreshing ignored");
        }
    }

    /// Advance the running animation and fire due timers
    pub fn tick<S: ScrollSurface>(&mut self, surface: &mut S) {
        let now = Instant::now();

        let frame = self
            .running
            .as_ref()
            .and_then(|running| running.animation.sample(now));
        if let Some(frame) = frame {
            if let Some(insets) = frame.insets {
                surface.set_content_inset(insets);
            }
            surface.set_content_offset_y(frame.offset_y);

            if frame.done {
                if let Some(then) = self.running.take().and_then(|running| running.then) {
                    self.complete(then, surface);
                }
            }
        }

        let (due, pending): (Vec<Timer>, Vec<Timer>) = std::mem::take(&mut self.timers)
            .into_iter()
            .partition(|timer| timer.due <= now);
        self.timers = pending;
        for timer in due {
            self.complete(timer.then, surface);
        }
    }

    fn set_state<S: ScrollSurface>(&mut self, new: State, surface: &mut S) {
        let old = std::mem::replace(&mut self.state, new);
        if !old.same_case(&new) {
            debug!(from = %old, to = %new, "Refresh state changed");
        }

        self.animator.render(new);

        match new {
            State::Loading if !old.same_case(&State::Loading) => self.begin_loading(surface),
            State::Finished => self.begin_finishing(surface),
            _ => {}
        }
    }

    fn begin_loading<S: ScrollSurface>(&mut self, surface: &mut S) {
        surface.set_content_offset_y(self.previous_offset_y);
        surface.set_bounces(false);

        let from = surface.content_inset();
        let top = self.header.height + self.default_insets.top;
        let reveal = SurfaceAnimation::offset(
            Instant::now(),
            self.previous_offset_y,
            -top,
            self.config.reveal_duration(),
            EasingType::EaseInOut,
        )
        .with_insets(from, from.with_top(top));
        self.run(reveal, Some(Continuation::RestoreBounce), surface);

        info!("Refreshing");
        if let Some(action) = self.action.as_mut() {
            action();
        }
    }

    fn begin_finishing<S: ScrollSurface>(&mut self, surface: &mut S) {
        self.stop_observing(surface);

        let reset = SurfaceAnimation::offset(
            Instant::now(),
            surface.content_offset_y(),
            -self.default_insets.top,
            self.config.reset_duration(),
            self.config.reset_easing,
        )
        .with_insets(surface.content_inset(), self.default_insets)
        .with_delay(self.config.hide_delay());
        self.run(reset, Some(Continuation::ResetToIdle), surface);
    }

    /// Replace the running animation; an interrupted animation still gets
    /// its completion
    fn run<S: ScrollSurface>(
        &mut self,
        animation: SurfaceAnimation,
        then: Option<Continuation>,
        surface: &mut S,
    ) {
        let interrupted = self.running.replace(Running { animation, then });
        if let Some(then) = interrupted.and_then(|running| running.then) {
            debug!(?then, "Surface animation interrupted");
            self.complete(then, surface);
        }
    }

    fn complete<S: ScrollSurface>(&mut self, then: Continuation, surface: &mut S) {
        match then {
            Continuation::EnterLoading => self.set_state(State::Loading, surface),
            Continuation::RestoreBounce => surface.set_bounces(true),
            Continuation::ResetToIdle => {
                if self.attached {
                    self.start_observing(surface);
                }
                self.set_state(State::Idle, surface);
            }
        }
    }

    /// Subscribe and process the current offset right away
    fn start_observing<S: ScrollSurface>(&mut self, surface: &mut S) {
        if self.subscription.is_none() {
            self.subscription = Some(surface.observe_offset());
        }
        self.on_offset_changed(surface);
    }
}

impl<A> RefreshController<A> {
    /// Unbind from the surface; pending timers stay queued
    pub fn detach<S: ScrollSurface>(&mut self, surface: &mut S) {
        if !self.attached {
            return;
        }
        self.stop_observing(surface);
        surface.remove_header();
        self.attached = false;
        debug!(state = %self.state, "Refresh controller detached");
    }

    fn stop_observing<S: ScrollSurface>(&mut self, surface: &mut S) {
        if let Some(subscription) = self.subscription.take() {
            surface.unobserve_offset(subscription);
        }
    }
}

impl<A> Drop for RefreshController<A> {
    fn drop(&mut self) {
        if self.subscription.is_some() {
            warn!("Refresh controller dropped while still observing a surface");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::animator::RecordingAnimator;
    use crate::surface::ScrollGeometry;

    fn controller(header_height: f64) -> RefreshController<RecordingAnimator> {
        let config = RefreshConfig {
            header_height,
            ..Default::default()
        };
        RefreshController::new(RecordingAnimator::new(), config)
    }

    fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
        let count = Rc::new(Cell::new(0));
        let handle = count.clone();
        (count, move || handle.set(handle.get() + 1))
    }

    /// Set the offset and deliver the notification, as a host view would
    fn feed(
        controller: &mut RefreshController<RecordingAnimator>,
        surface: &mut ScrollGeometry,
        y: f64,
    ) {
        surface.set_content_offset_y(y);
        controller.on_offset_changed(surface);
    }

    #[test]
    fn test_attach_positions_header_and_observes() {
        let mut surface = ScrollGeometry::new(500.0, 2000.0);
        surface.set_content_inset(EdgeInsets::top(64.0));
        surface.set_content_offset_y(-64.0);

        let mut controller = controller(70.0);
        controller.attach(&mut surface, || {});

        let header = surface.header().expect("header inserted");
        assert_eq!(header.origin_y, -70.0);
        assert_eq!(header.layer, Layer::Back);
        assert_eq!(controller.default_insets().top, 64.0);
        assert!(controller.is_observing());
        assert_eq!(surface.observer_count(), 1);
        // Initial notification recorded the current offset
        assert_eq!(controller.previous_offset_y(), -64.0);

        controller.detach(&mut surface);
    }

    #[test]
    fn test_default_inset_shifts_bands() {
        let mut surface = ScrollGeometry::new(500.0, 2000.0);
        surface.set_content_inset(EdgeInsets::top(64.0));
        surface.set_content_offset_y(-64.0);
        let mut controller = controller(100.0);
        controller.attach(&mut surface, || {});
        surface.set_dragging(true);

        feed(&mut controller, &mut surface, -114.0);
        assert!(controller.state().is_idle());
        feed(&mut controller, &mut surface, -114.0);
        assert_eq!(controller.state().progress(), Some(0.5));

        controller.detach(&mut surface);
    }

    #[test]
    fn test_loading_runs_action_once() {
        let mut surface = ScrollGeometry::new(500.0, 2000.0);
        let mut controller = controller(100.0);
        let (count, action) = counter();
        controller.attach(&mut surface, action);

        surface.set_dragging(true);
        feed(&mut controller, &mut surface, -150.0);
        feed(&mut controller, &mut surface, -150.0);
        surface.set_dragging(false);
        feed(&mut controller, &mut surface, -140.0);

        assert!(controller.state().is_loading());
        assert_eq!(count.get(), 1);
        assert!(!surface.bounces());
        // Snapped back to the offset that triggered loading
        assert_eq!(surface.content_offset_y(), -150.0);

        // Further samples keep loading without re-running the action
        feed(&mut controller, &mut surface, -300.0);
        feed(&mut controller, &mut surface, 0.0);
        feed(&mut controller, &mut surface, -120.0);
        assert!(controller.state().is_loading());
        assert_eq!(count.get(), 1);

        controller.detach(&mut surface);
    }

    #[test]
    fn test_every_assignment_renders() {
        let mut surface = ScrollGeometry::new(500.0, 2000.0);
        let mut controller = controller(100.0);
        controller.attach(&mut surface, || {});
        surface.set_dragging(true);

        feed(&mut controller, &mut surface, -30.0);
        feed(&mut controller, &mut surface, -60.0);
        feed(&mut controller, &mut surface, -60.0);

        let progress: Vec<f64> = controller
            .animator()
            .rendered()
            .iter()
            .filter_map(|state| state.progress())
            .collect();
        assert_eq!(progress.len(), 2);
        assert!((progress[0] - 0.3).abs() < 1e-9);
        assert!((progress[1] - 0.6).abs() < 1e-9);

        controller.detach(&mut surface);
    }

    #[test]
    fn test_end_refreshing_requires_loading() {
        let mut surface = ScrollGeometry::new(500.0, 2000.0);
        let mut controller = controller(100.0);
        controller.attach(&mut surface, || {});
        let rendered = controller.animator().rendered().len();

        controller.end_refreshing(&mut surface);

        assert!(controller.state().is_idle());
        assert_eq!(controller.animator().rendered().len(), rendered);
        assert!(controller.is_observing());

        controller.detach(&mut surface);
    }

    #[test]
    fn test_detached_controller_ignores_offsets() {
        let mut surface = ScrollGeometry::new(500.0, 2000.0);
        let mut controller = controller(100.0);
        controller.attach(&mut surface, || {});
        controller.detach(&mut surface);

        assert!(!controller.is_observing());
        assert_eq!(surface.observer_count(), 0);
        assert!(surface.header().is_none());

        surface.set_dragging(true);
        feed(&mut controller, &mut surface, -50.0);
        feed(&mut controller, &mut surface, -50.0);
        assert!(controller.state().is_idle());
    }

    #[test]
    fn test_hide_delay_setter() {
        let mut controller = controller(100.0);
        controller.set_hide_delay(Duration::from_millis(400));
        assert_eq!(controller.hide_delay(), Duration::from_millis(400));
    }

    #[test]
    fn test_hide_delay_saturates() {
        let mut controller = controller(100.0);
        controller.set_hide_delay(Duration::MAX);
        assert_eq!(controller.config().hide_delay_ms, u64::MAX);
    }

    type Log = Rc<RefCell<Vec<String>>>;

    /// Geometry that records observer and bounce changes into a shared log
    struct LoggedSurface {
        inner: ScrollGeometry,
        log: Log,
    }

    impl ScrollSurface for LoggedSurface {
        fn content_offset_y(&self) -> f64 {
            self.inner.content_offset_y()
        }

        fn set_content_offset_y(&mut self, y: f64) {
            self.inner.set_content_offset_y(y);
        }

        fn content_inset(&self) -> EdgeInsets {
            self.inner.content_inset()
        }

        fn set_content_inset(&mut self, insets: EdgeInsets) {
            self.inner.set_content_inset(insets);
        }

        fn is_dragging(&self) -> bool {
            self.inner.is_dragging()
        }

        fn bounces(&self) -> bool {
            self.inner.bounces()
        }

        fn set_bounces(&mut self, bounces: bool) {
            self.log.borrow_mut().push(format!("bounces {}", bounces));
            self.inner.set_bounces(bounces);
        }

        fn observe_offset(&mut self) -> Subscription {
            self.log.borrow_mut().push("observe".to_string());
            self.inner.observe_offset()
        }

        fn unobserve_offset(&mut self, subscription: Subscription) {
            self.log.borrow_mut().push("unobserve".to_string());
            self.inner.unobserve_offset(subscription);
        }

        fn insert_header(&mut self, header: &HeaderView) {
            self.inner.insert_header(header);
        }

        fn remove_header(&mut self) {
            self.inner.remove_header();
        }
    }

    fn logged_controller(log: &Log) -> RefreshController<impl FnMut(State)> {
        let config = RefreshConfig {
            header_height: 100.0,
            ..Default::default()
        };
        let renders = log.clone();
        RefreshController::new(
            move |state: State| renders.borrow_mut().push(format!("render {}", state)),
            config,
        )
    }

    fn tail(log: &Log, from: usize) -> Vec<String> {
        log.borrow()[from..].to_vec()
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_precedes_side_effects() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut surface = LoggedSurface {
            inner: ScrollGeometry::new(500.0, 2000.0),
            log: log.clone(),
        };
        let mut controller = logged_controller(&log);
        let actions = log.clone();
        controller.attach(&mut surface, move || {
            actions.borrow_mut().push("action".to_string())
        });

        surface.inner.set_dragging(true);
        for y in [0.0, -20.0, -60.0, -100.0, -100.0] {
            surface.set_content_offset_y(y);
            controller.on_offset_changed(&mut surface);
        }
        surface.inner.set_dragging(false);

        // The sample at the header height only confirms full release
        surface.set_content_offset_y(-101.0);
        controller.on_offset_changed(&mut surface);
        assert!(!controller.state().is_loading());

        let before = log.borrow().len();
        controller.on_offset_changed(&mut surface);
        assert!(controller.state().is_loading());
        assert_eq!(tail(&log, before), ["render Loading", "bounces false", "action"]);

        // Let the reveal finish so it does not complete during finishing
        tokio::time::advance(Duration::from_millis(400)).await;
        controller.tick(&mut surface);
        assert_eq!(log.borrow().last().map(String::as_str), Some("bounces true"));

        let before = log.borrow().len();
        controller.end_refreshing(&mut surface);
        assert_eq!(tail(&log, before), ["render Finished", "unobserve"]);

        let before = log.borrow().len();
        tokio::time::advance(Duration::from_millis(1100)).await;
        controller.tick(&mut surface);
        let reset = tail(&log, before);
        assert!(controller.state().is_idle());
        assert_eq!(reset.first().map(String::as_str), Some("observe"));
        assert_eq!(reset.last().map(String::as_str), Some("render Idle"));

        controller.detach(&mut surface);
    }
}
