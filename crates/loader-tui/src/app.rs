use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use loader_core::{AppConfig, RefreshController, ScrollView, State};
use tracing::{debug, info};

use crate::event::RefreshResult;
use crate::input::Action;
use crate::loader::MaterialLoader;
use crate::theme::Theme;

const INITIAL_ITEMS: usize = 30;

/// Where a pointer drag started
#[derive(Debug, Clone, Copy)]
struct DragAnchor {
    row: u16,
    offset_y: f64,
}

/// Application state
pub struct App {
    /// Application configuration
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    /// List surface with the pull-to-refresh header
    pub scroll_view: ScrollView<MaterialLoader>,
    /// Rows of the list, newest first
    pub items: Vec<String>,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Completed refreshes
    pub refresh_count: u32,
    /// Set by the refresh action, taken by the host loop
    refresh_requested: Rc<Cell<bool>>,
    drag_anchor: Option<DragAnchor>,
    /// A keyboard pull is in progress
    pulling: bool,
    viewport_rows: u16,
}

impl App {
    pub fn new(config: Arc<AppConfig>, theme: Theme) -> Self {
        let points = config.ui.points_per_row;
        let items: Vec<String> = (1..=INITIAL_ITEMS).map(|i| format!("Item {}", i)).collect();

        let mut scroll_view = ScrollView::new(0.0, items.len() as f64 * points)
            .with_bounce_speed(config.scroll.bounce_speed);

        let refresh_requested = Rc::new(Cell::new(false));
        let request = refresh_requested.clone();
        scroll_view.add_pull_to_refresh(
            RefreshController::new(MaterialLoader::new(config.loader.clone()), config.refresh.clone()),
            move || request.set(true),
        );

        Self {
            config,
            theme,
            scroll_view,
            items,
            should_quit: false,
            status_message: None,
            refresh_count: 0,
            refresh_requested,
            drag_anchor: None,
            pulling: false,
            viewport_rows: 0,
        }
    }

    fn points_per_row(&self) -> f64 {
        self.config.ui.points_per_row
    }

    /// Resize the list viewport, in terminal rows
    pub fn set_viewport_rows(&mut self, rows: u16) {
        if rows != self.viewport_rows {
            self.viewport_rows = rows;
            self.scroll_view
                .set_viewport_height(rows as f64 * self.points_per_row());
        }
    }

    pub fn refresh_state(&self) -> State {
        self.scroll_view.refresh_state().unwrap_or_default()
    }

    pub fn loader(&self) -> Option<&MaterialLoader> {
        self.scroll_view
            .refresh_controller()
            .map(|controller| controller.animator())
    }

    pub fn is_pulling(&self) -> bool {
        self.pulling
    }

    /// The refresh action ran since the last call
    pub fn take_refresh_request(&mut self) -> bool {
        self.refresh_requested.replace(false)
    }

    /// Rows pulled down past the top of the list
    pub fn header_rows(&self) -> u16 {
        let overscroll = (-self.scroll_view.content_offset_y()).max(0.0);
        (overscroll / self.points_per_row()).round() as u16
    }

    pub fn first_visible_item(&self) -> usize {
        (self.scroll_view.content_offset_y().max(0.0) / self.points_per_row()).floor() as usize
    }

    /// Something moves on the next frames; poll at the animation rate
    pub fn needs_fast_update(&self) -> bool {
        self.scroll_view.is_animating()
            || self.scroll_view.is_dragging()
            || self.loader().map(|loader| loader.is_spinning()).unwrap_or(false)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn tick(&mut self) {
        self.scroll_view.tick();
    }

    pub fn apply(&mut self, action: Action) {
        let step = self.config.scroll.scroll_lines as f64 * self.points_per_row();
        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollDown => self.scroll_view.scroll_by_animated(step, &self.config.scroll),
            Action::ScrollUp => self.scroll_view.scroll_by_animated(-step, &self.config.scroll),
            Action::JumpToTop => self.scroll_view.scroll_to_top(),
            Action::StartRefresh => {
                if self.refresh_state().is_idle() {
                    self.set_status("Refreshing...");
                }
                self.scroll_view.start_refreshing();
            }
            Action::Pull => {
                self.pulling = true;
                self.scroll_view.drag_by(-self.points_per_row());
            }
            Action::Release => {
                self.pulling = false;
                self.scroll_view.end_drag();
            }
            Action::DragStart(row) => {
                self.drag_anchor = Some(DragAnchor {
                    row,
                    offset_y: self.scroll_view.content_offset_y(),
                });
                self.scroll_view.begin_drag();
            }
            Action::DragTo(row) => {
                if let Some(anchor) = self.drag_anchor {
                    let rows = row as f64 - anchor.row as f64;
                    self.scroll_view
                        .drag_to(anchor.offset_y - rows * self.points_per_row());
                }
            }
            Action::DragEnd => {
                if self.drag_anchor.take().is_some() {
                    self.scroll_view.end_drag();
                }
            }
            Action::None => {}
        }
    }

    /// Fold a finished refresh into the list and end the loading state
    pub fn handle_refresh_result(&mut self, result: RefreshResult) {
        match result {
            RefreshResult::Success { new_count } => {
                self.refresh_count += 1;
                let fresh = (1..=new_count).map(|i| format!("Refresh {} / item {}", self.refresh_count, i));
                self.items.splice(0..0, fresh);
                self.scroll_view
                    .set_content_height(self.items.len() as f64 * self.points_per_row());
                info!(new_count, total = self.items.len(), "Refresh finished");
                self.set_status(format!("Refreshed: {} new items", new_count));
            }
            RefreshResult::Failure { error } => {
                debug!(%error, "Refresh failed");
                self.set_status(format!("Refresh failed: {}", error));
            }
        }
        self.scroll_view.end_refreshing();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn app() -> App {
        let mut app = App::new(Arc::new(AppConfig::default()), Theme::default());
        app.set_viewport_rows(20);
        app
    }

    async fn frames(app: &mut App, count: u32) {
        for _ in 0..count {
            tokio::time::advance(Duration::from_millis(16)).await;
            app.tick();
        }
    }

    #[test]
    fn test_new_app_is_idle_at_top() {
        let app = app();
        assert!(app.refresh_state().is_idle());
        assert_eq!(app.header_rows(), 0);
        assert_eq!(app.first_visible_item(), 0);
        assert_eq!(app.items.len(), INITIAL_ITEMS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keyboard_pull_and_release_requests_refresh() {
        let mut app = app();
        for _ in 0..8 {
            app.apply(Action::Pull);
        }
        assert_eq!(app.header_rows(), 8);
        assert_eq!(app.refresh_state().progress(), Some(1.0));

        app.apply(Action::Release);
        frames(&mut app, 1).await;

        assert!(app.refresh_state().is_loading());
        assert!(app.take_refresh_request());
        assert!(!app.take_refresh_request());
        assert!(app.loader().map(|l| l.is_spinning()).unwrap_or(false));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mouse_drag_follows_rows() {
        let mut app = app();
        app.apply(Action::DragStart(2));
        app.apply(Action::DragTo(5));
        assert_eq!(app.scroll_view.content_offset_y(), -30.0);
        assert!(app.refresh_state().is_idle());
        app.apply(Action::DragTo(6));
        assert!(app.refresh_state().is_releasing());

        app.apply(Action::DragEnd);
        frames(&mut app, 60).await;
        assert_eq!(app.header_rows(), 0);
        assert!(app.refresh_state().is_idle());
        assert!(!app.take_refresh_request());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_result_prepends_and_finishes() {
        let mut app = app();
        app.apply(Action::StartRefresh);
        frames(&mut app, 40).await;
        assert!(app.refresh_state().is_loading());
        assert!(app.take_refresh_request());
        assert_eq!(app.header_rows(), 7);

        app.handle_refresh_result(RefreshResult::Success { new_count: 3 });
        assert!(app.refresh_state().is_finished());
        assert_eq!(app.items.len(), INITIAL_ITEMS + 3);
        assert_eq!(app.items[0], "Refresh 1 / item 1");
        assert_eq!(app.status_message.as_deref(), Some("Refreshed: 3 new items"));

        frames(&mut app, 80).await;
        assert!(app.refresh_state().is_idle());
        assert_eq!(app.header_rows(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refresh_still_finishes() {
        let mut app = app();
        app.apply(Action::StartRefresh);
        frames(&mut app, 40).await;
        app.handle_refresh_result(RefreshResult::Failure {
            error: "offline".to_string(),
        });
        assert!(app.refresh_state().is_finished());
        assert_eq!(app.status_message.as_deref(), Some("Refresh failed: offline"));
    }
}
