//! Host scroll view
//!
//! Owns the surface geometry and at most one refresh controller, and emits
//! an offset-changed notification whenever the offset is set or moves
//! during a frame.

use tokio::time::Instant;

use crate::animator::RefreshAnimator;
use crate::config::ScrollConfig;
use crate::refresh::RefreshController;
use crate::scroll::{spring_back, SurfaceAnimation};
use crate::state::State;
use crate::surface::{EdgeInsets, ScrollGeometry, ScrollSurface};

const DEFAULT_BOUNCE_SPEED: f64 = 0.35;

pub struct ScrollView<A> {
    geometry: ScrollGeometry,
    refresh: Option<RefreshController<A>>,
    bounce_speed: f64,
    /// Smooth non-drag scroll in flight
    scroll_animation: Option<SurfaceAnimation>,
    /// The offset moved during the last frame
    moving: bool,
}

impl<A: RefreshAnimator> ScrollView<A> {
    pub fn new(viewport_height: f64, content_height: f64) -> Self {
        Self {
            geometry: ScrollGeometry::new(viewport_height, content_height),
            refresh: None,
            bounce_speed: DEFAULT_BOUNCE_SPEED,
            scroll_animation: None,
            moving: false,
        }
    }

    /// Start with content insets, resting at the top edge
    pub fn with_insets(mut self, insets: EdgeInsets) -> Self {
        self.geometry.set_content_inset(insets);
        self.geometry.set_content_offset_y(-insets.top);
        self
    }

    /// Fraction of the remaining overscroll removed per frame after a drag
    pub fn with_bounce_speed(mut self, speed: f64) -> Self {
        self.bounce_speed = speed;
        self
    }

    pub fn geometry(&self) -> &ScrollGeometry {
        &self.geometry
    }

    pub fn content_offset_y(&self) -> f64 {
        self.geometry.content_offset_y()
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.geometry.set_viewport_height(height);
    }

    pub fn set_content_height(&mut self, height: f64) {
        self.geometry.set_content_height(height);
    }

    pub fn refresh_controller(&self) -> Option<&RefreshController<A>> {
        self.refresh.as_ref()
    }

    pub fn refresh_controller_mut(&mut self) -> Option<&mut RefreshController<A>> {
        self.refresh.as_mut()
    }

    pub fn refresh_state(&self) -> Option<State> {
        self.refresh.as_ref().map(|controller| controller.state())
    }

    /// Attach a controller, detaching the current one first
    pub fn add_pull_to_refresh<F>(&mut self, mut controller: RefreshController<A>, action: F)
    where
        F: FnMut() + 'static,
    {
        if self.refresh.is_some() {
            self.remove_pull_to_refresh();
        }
        controller.attach(&mut self.geometry, action);
        self.refresh = Some(controller);
    }

    /// Detach and hand back the current controller
    pub fn remove_pull_to_refresh(&mut self) -> Option<RefreshController<A>> {
        let mut controller = self.refresh.take()?;
        controller.detach(&mut self.geometry);
        Some(controller)
    }

    pub fn start_refreshing(&mut self) {
        if let Some(controller) = self.refresh.as_mut() {
            controller.start_refreshing(&mut self.geometry);
        }
    }

    pub fn end_refreshing(&mut self) {
        if let Some(controller) = self.refresh.as_mut() {
            controller.end_refreshing(&mut self.geometry);
        }
    }

    /// Set the offset directly; always notifies
    pub fn set_content_offset_y(&mut self, y: f64) {
        self.geometry.set_content_offset_y(y);
        self.notify_offset_changed();
    }

    pub fn is_dragging(&self) -> bool {
        self.geometry.is_dragging()
    }

    /// Grab the content; cancels any smooth scroll in flight
    pub fn begin_drag(&mut self) {
        self.scroll_animation = None;
        self.geometry.set_dragging(true);
    }

    /// Move the content under the user's finger
    pub fn drag_to(&mut self, y: f64) {
        if !self.geometry.is_dragging() {
            self.begin_drag();
        }
        self.set_content_offset_y(y);
    }

    pub fn drag_by(&mut self, dy: f64) {
        self.drag_to(self.geometry.content_offset_y() + dy);
    }

    pub fn end_drag(&mut self) {
        self.geometry.set_dragging(false);
    }

    /// Non-drag scroll, clamped to the resting range
    pub fn scroll_by(&mut self, delta: f64) {
        let target = (self.geometry.content_offset_y() + delta)
            .clamp(self.geometry.min_offset_y(), self.geometry.max_offset_y());
        self.set_content_offset_y(target);
    }

    /// Non-drag scroll that eases toward its target over the next frames
    ///
    /// Successive calls accumulate onto the pending target. Falls back to
    /// [`scroll_by`](Self::scroll_by) when smooth scrolling is off.
    pub fn scroll_by_animated(&mut self, delta: f64, config: &ScrollConfig) {
        if !config.is_smooth() {
            self.scroll_animation = None;
            self.scroll_by(delta);
            return;
        }

        let from = self.geometry.content_offset_y();
        let base = self
            .scroll_animation
            .as_ref()
            .map(|animation| animation.target_offset())
            .unwrap_or(from);
        let target = (base + delta).clamp(self.geometry.min_offset_y(), self.geometry.max_offset_y());
        self.scroll_animation = Some(SurfaceAnimation::offset(
            Instant::now(),
            from,
            target,
            config.animation_duration(),
            config.easing,
        ));
    }

    pub fn scroll_to_top(&mut self) {
        self.set_content_offset_y(self.geometry.min_offset_y());
    }

    /// Something will still move on the next frames
    pub fn is_animating(&self) -> bool {
        let driven = self
            .refresh
            .as_ref()
            .map(|controller| controller.is_driving_surface())
            .unwrap_or(false);
        driven
            || self.scroll_animation.is_some()
            || (!self.geometry.is_dragging() && self.resting_offset() != self.content_offset_y())
    }

    /// Advance one frame: controller animations and timers, then elastic
    /// settle-back when nothing else owns the offset
    ///
    /// Every frame that moves the offset notifies, and so does the first
    /// still frame after movement, so observers see the resting offset.
    pub fn tick(&mut self) {
        let before = self.geometry.content_offset_y();

        let driven = match self.refresh.as_mut() {
            Some(controller) => {
                controller.tick(&mut self.geometry);
                controller.is_driving_surface()
            }
            None => false,
        };

        if driven || self.geometry.is_dragging() {
            self.scroll_animation = None;
        } else if let Some(animation) = self.scroll_animation.take() {
            if let Some(frame) = animation.sample(Instant::now()) {
                self.geometry.set_content_offset_y(frame.offset_y);
                if !frame.done {
                    self.scroll_animation = Some(animation);
                }
            }
        } else if self.geometry.bounces() {
            let current = self.geometry.content_offset_y();
            let target = self.resting_offset();
            if current != target {
                self.geometry
                    .set_content_offset_y(spring_back(current, target, self.bounce_speed));
            }
        }

        let moved = self.geometry.content_offset_y() != before;
        if moved || self.moving {
            self.notify_offset_changed();
        }
        self.moving = moved;
    }

    fn resting_offset(&self) -> f64 {
        self.geometry
            .content_offset_y()
            .clamp(self.geometry.min_offset_y(), self.geometry.max_offset_y())
    }

    fn notify_offset_changed(&mut self) {
        if let Some(controller) = self.refresh.as_mut() {
            controller.on_offset_changed(&mut self.geometry);
        }
    }
}

impl<A> Drop for ScrollView<A> {
    fn drop(&mut self) {
        if let Some(mut controller) = self.refresh.take() {
            controller.detach(&mut self.geometry);
        }
    }
}
