use loader_core::config::LoaderConfig;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tokio::time::Instant;
use tracing::debug;

use super::{LoaderRing, MaterialLoader};
use crate::theme::Theme;

const CARD_WIDTH: u16 = 21;
const CARD_HEIGHT: u16 = 9;

/// A spinning loader shown on top of a view until dismissed
pub struct LoaderOverlay {
    loader: MaterialLoader,
    message: Option<String>,
    visible: bool,
}

impl LoaderOverlay {
    /// Create the overlay already spinning
    pub fn show(config: LoaderConfig) -> Self {
        let mut loader = MaterialLoader::new(config);
        loader.start();
        debug!("Loader overlay shown");
        Self {
            loader,
            message: None,
            visible: true,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn loader(&self) -> &MaterialLoader {
        &self.loader
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Remove the overlay; later renders draw nothing
    pub fn dismiss(&mut self) {
        if self.visible {
            debug!("Loader overlay dismissed");
        }
        self.visible = false;
    }

    pub fn render(&self, frame: &mut Frame, theme: &Theme) {
        if !self.visible {
            return;
        }

        let area = frame.area();
        let card = centered_rect(
            CARD_WIDTH.min(area.width),
            CARD_HEIGHT.min(area.height),
            area,
        );

        frame.render_widget(Clear, card);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.muted))
            .style(Style::default().bg(theme.card));
        let inner = block.inner(card);
        frame.render_widget(block, card);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Ring
                Constraint::Length(1), // Message
            ])
            .split(inner);

        let ring_area = if self.message.is_some() { chunks[0] } else { inner };
        frame.render_widget(
            LoaderRing::new(&self.loader, Instant::now()).track(Style::default().fg(theme.selection)),
            ring_area,
        );

        if let Some(message) = &self.message {
            let paragraph = Paragraph::new(Line::styled(message.as_str(), Style::default().fg(theme.fg)))
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, chunks[1]);
        }
    }
}

/// Helper function to create a centered rect
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
