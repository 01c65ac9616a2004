use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::KeyCode;
use tokio::time::Instant;
use tracing::info;

use loader_core::AppConfig;
use loader_tui::{
    event::{AppEvent, EventHandler},
    load_theme, LoaderOverlay,
};

use super::terminal::{self, Tui};

pub async fn run(config: Arc<AppConfig>, seconds: u64) -> Result<()> {
    let mut terminal = terminal::setup("Material Loader")?;
    let result = run_loop(&mut terminal, &config, Duration::from_secs(seconds));
    terminal::restore(&mut terminal)?;
    result
}

fn run_loop(terminal: &mut Tui, config: &AppConfig, duration: Duration) -> Result<()> {
    let theme = load_theme(&config.ui.theme);
    let event_handler = EventHandler::with_animation_tick(
        config.ui.tick_rate_ms,
        config.scroll.animation_tick_duration(),
    );

    let mut overlay = LoaderOverlay::show(config.loader.clone()).with_message("Loading");
    let deadline = Instant::now() + duration;
    info!(seconds = duration.as_secs(), "Spinner shown");

    while overlay.is_visible() {
        terminal.draw(|frame| overlay.render(frame, &theme))?;

        if let Some(AppEvent::Key(key)) = event_handler.next_animation()? {
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                overlay.dismiss();
            }
        }
        if Instant::now() >= deadline {
            overlay.dismiss();
        }
    }

    terminal.draw(|frame| overlay.render(frame, &theme))?;
    Ok(())
}
