//! Scroll surfaces as seen by the refresh controller
//!
//! [`ScrollSurface`] is the narrow interface the controller needs from a host
//! scroll view. [`ScrollGeometry`] is an in-memory implementation that keeps
//! offset, insets, drag state, the header slot and the offset observers.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::scroll::timing::lerp;

/// Reserved space around a surface's content
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EdgeInsets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl EdgeInsets {
    /// Insets with only a top edge
    pub fn top(top: f64) -> Self {
        Self {
            top,
            ..Default::default()
        }
    }

    pub fn with_top(self, top: f64) -> Self {
        Self { top, ..self }
    }

    /// Interpolate every edge toward `to`
    pub fn lerp(&self, to: &EdgeInsets, t: f64) -> Self {
        Self {
            top: lerp(self.top, to.top, t),
            left: lerp(self.left, to.left, t),
            bottom: lerp(self.bottom, to.bottom, t),
            right: lerp(self.right, to.right, t),
        }
    }
}

/// Z-order of a view relative to the surface's content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Back,
    Front,
}

/// Frame of the refresh header
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderView {
    pub width: f64,
    pub height: f64,
    /// Vertical position in content coordinates
    pub origin_y: f64,
    pub layer: Layer,
}

impl HeaderView {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            origin_y: 0.0,
            layer: Layer::Front,
        }
    }
}

/// Handle for an active offset observation
///
/// Not clonable: it goes back to the surface exactly once, through
/// [`ScrollSurface::unobserve_offset`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping a subscription leaves the surface notifying a dead observer"]
pub struct Subscription {
    id: u64,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// What the refresh controller reads from and writes to its host surface
pub trait ScrollSurface {
    /// Vertical content offset; negative when pulled past the top edge
    fn content_offset_y(&self) -> f64;
    fn set_content_offset_y(&mut self, y: f64);

    fn content_inset(&self) -> EdgeInsets;
    fn set_content_inset(&mut self, insets: EdgeInsets);

    /// The user is actively dragging the content
    fn is_dragging(&self) -> bool;

    fn bounces(&self) -> bool;
    /// Enable or disable elastic settle-back after a drag
    fn set_bounces(&mut self, bounces: bool);

    /// Register for offset-changed notifications
    fn observe_offset(&mut self) -> Subscription;
    fn unobserve_offset(&mut self, subscription: Subscription);

    /// Insert the header behind the existing content
    fn insert_header(&mut self, header: &HeaderView);
    fn remove_header(&mut self);
}

/// In-memory scroll surface
#[derive(Debug, Clone)]
pub struct ScrollGeometry {
    offset_y: f64,
    insets: EdgeInsets,
    dragging: bool,
    bounces: bool,
    viewport_height: f64,
    content_height: f64,
    header: Option<HeaderView>,
    observers: BTreeSet<u64>,
    next_observer: u64,
}

impl ScrollGeometry {
    pub fn new(viewport_height: f64, content_height: f64) -> Self {
        Self {
            offset_y: 0.0,
            insets: EdgeInsets::default(),
            dragging: false,
            bounces: true,
            viewport_height,
            content_height,
            header: None,
            observers: BTreeSet::new(),
            next_observer: 0,
        }
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height;
    }

    pub fn content_height(&self) -> f64 {
        self.content_height
    }

    pub fn set_content_height(&mut self, height: f64) {
        self.content_height = height;
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    /// Resting offset at the top edge
    pub fn min_offset_y(&self) -> f64 {
        -self.insets.top
    }

    /// Resting offset at the bottom edge
    pub fn max_offset_y(&self) -> f64 {
        (self.content_height + self.insets.bottom - self.viewport_height).max(self.min_offset_y())
    }

    /// Distance the content is currently pulled past its top edge
    pub fn overscroll(&self) -> f64 {
        (self.min_offset_y() - self.offset_y).max(0.0)
    }

    pub fn header(&self) -> Option<&HeaderView> {
        self.header.as_ref()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn is_observed_by(&self, subscription: &Subscription) -> bool {
        self.observers.contains(&subscription.id)
    }
}

impl ScrollSurface for ScrollGeometry {
    fn content_offset_y(&self) -> f64 {
        self.offset_y
    }

    fn set_content_offset_y(&mut self, y: f64) {
        self.offset_y = y;
    }

    fn content_inset(&self) -> EdgeInsets {
        self.insets
    }

    fn set_content_inset(&mut self, insets: EdgeInsets) {
        self.insets = insets;
    }

    fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn bounces(&self) -> bool {
        self.bounces
    }

    fn set_bounces(&mut self, bounces: bool) {
        self.bounces = bounces;
    }

    fn observe_offset(&mut self) -> Subscription {
        let id = self.next_observer;
        self.next_observer += 1;
        self.observers.insert(id);
        Subscription { id }
    }

    fn unobserve_offset(&mut self, subscription: Subscription) {
        if !self.observers.remove(&subscription.id) {
            tracing::warn!(id = subscription.id, "Unobserving an unknown offset subscription");
        }
    }

    fn insert_header(&mut self, header: &HeaderView) {
        self.header = Some(header.clone());
    }

    fn remove_header(&mut self) {
        self.header = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriptions_are_unique() {
        let mut geometry = ScrollGeometry::new(100.0, 500.0);
        let first = geometry.observe_offset();
        let second = geometry.observe_offset();
        assert_ne!(first.id(), second.id());
        assert_eq!(geometry.observer_count(), 2);

        geometry.unobserve_offset(first);
        assert_eq!(geometry.observer_count(), 1);
        assert!(geometry.is_observed_by(&second));
        geometry.unobserve_offset(second);
        assert_eq!(geometry.observer_count(), 0);
    }

    #[test]
    fn test_offset_bounds_follow_insets() {
        let mut geometry = ScrollGeometry::new(100.0, 500.0);
        assert_eq!(geometry.min_offset_y(), 0.0);
        assert_eq!(geometry.max_offset_y(), 400.0);

        geometry.set_content_inset(EdgeInsets::top(64.0));
        assert_eq!(geometry.min_offset_y(), -64.0);

        geometry.set_content_offset_y(-100.0);
        assert_eq!(geometry.overscroll(), 36.0);
    }

    #[test]
    fn test_short_content_cannot_scroll() {
        let geometry = ScrollGeometry::new(300.0, 100.0);
        assert_eq!(geometry.max_offset_y(), geometry.min_offset_y());
    }

    #[test]
    fn test_insets_lerp() {
        let from = EdgeInsets::top(0.0);
        let to = EdgeInsets { top: 100.0, left: 10.0, bottom: 0.0, right: 0.0 };
        let mid = from.lerp(&to, 0.5);
        assert_eq!(mid.top, 50.0);
        assert_eq!(mid.left, 5.0);
        assert_eq!(from.with_top(3.0).top, 3.0);
    }

    #[test]
    fn test_header_slot() {
        let mut geometry = ScrollGeometry::new(100.0, 500.0);
        geometry.insert_header(&HeaderView::new(320.0, 70.0));
        assert_eq!(geometry.header().map(|h| h.height), Some(70.0));
        geometry.remove_header();
        assert!(geometry.header().is_none());
    }
}
