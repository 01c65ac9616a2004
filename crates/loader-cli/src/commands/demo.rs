use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use ratatui::layout::{Constraint, Direction, Layout};
use tokio::sync::mpsc;
use tracing::info;

use loader_core::AppConfig;
use loader_tui::{
    event::{AppEvent, EventHandler, RefreshResult},
    input::{handle_key_event, handle_mouse_event},
    load_theme,
    widgets::{RefreshListWidget, StatusBarWidget},
    App,
};

use super::terminal::{self, Tui};

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    let mut terminal = terminal::setup("Material Loader")?;
    let result = run_loop(&mut terminal, config).await;
    terminal::restore(&mut terminal)?;
    result
}

async fn run_loop(terminal: &mut Tui, config: Arc<AppConfig>) -> Result<()> {
    let theme = load_theme(&config.ui.theme);
    let mut app = App::new(config.clone(), theme);

    // Create event handler with animation FPS support
    let event_handler = EventHandler::with_animation_tick(
        config.ui.tick_rate_ms,
        config.scroll.animation_tick_duration(),
    );

    // Create channel for async refresh results
    let (refresh_tx, mut refresh_rx) = mpsc::unbounded_channel::<RefreshResult>();
    let refresh_delay = Duration::from_secs(config.ui.demo_refresh_secs);
    let mut attempts: u32 = 0;

    info!("Demo started");

    // Main loop
    loop {
        // Process any completed refresh operations (non-blocking)
        while let Ok(result) = refresh_rx.try_recv() {
            app.handle_refresh_result(result);
        }

        app.tick();

        if app.take_refresh_request() {
            spawn_refresh(refresh_tx.clone(), refresh_delay, attempts);
            attempts = attempts.wrapping_add(1);
        }

        // Draw UI
        terminal.draw(|frame| {
            // Main layout: content + status bar
            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(frame.area());

            // Borders take two rows
            app.set_viewport_rows(main_layout[0].height.saturating_sub(2));

            RefreshListWidget::render(frame, main_layout[0], &app);
            StatusBarWidget::render(frame, main_layout[1], &app);
        })?;

        // Handle events (use faster tick rate while something moves)
        let event = if app.needs_fast_update() {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, &app);
                    app.apply(action);
                }
                AppEvent::Mouse(mouse) => app.apply(handle_mouse_event(mouse)),
                AppEvent::Resize(_, _) | AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    info!(refreshes = app.refresh_count, "Demo finished");
    Ok(())
}

/// Every fifth simulated fetch fails
const FAILURE_EVERY: u32 = 5;

/// Pretend to fetch new items in the background
fn spawn_refresh(tx: mpsc::UnboundedSender<RefreshResult>, delay: Duration, attempt: u32) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(simulated_result(attempt));
    });
}

fn simulated_result(attempt: u32) -> RefreshResult {
    if attempt % FAILURE_EVERY == FAILURE_EVERY - 1 {
        RefreshResult::Failure {
            error: "connection timed out".to_string(),
        }
    } else {
        RefreshResult::Success {
            new_count: 1 + attempt % 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_spawned_refresh_reports_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_refresh(tx, Duration::from_secs(2), 5);

        tokio::time::sleep(Duration::from_millis(1900)).await;
        assert!(rx.try_recv().is_err());

        let result = rx.recv().await;
        assert_eq!(result, Some(RefreshResult::Success { new_count: 2 }));
    }

    #[test]
    fn test_simulated_refresh_fails_periodically() {
        let failures: Vec<u32> = (0..12)
            .filter(|attempt| matches!(simulated_result(*attempt), RefreshResult::Failure { .. }))
            .collect();
        assert_eq!(failures, vec![4, 9]);
    }
}
