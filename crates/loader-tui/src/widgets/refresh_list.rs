use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tokio::time::Instant;

use crate::app::App;
use crate::loader::overlay::centered_rect;
use crate::loader::LoaderRing;

/// Ring size inside the pulled-down header
const RING_WIDTH: u16 = 11;
const RING_HEIGHT: u16 = 5;

pub struct RefreshListWidget;

impl RefreshListWidget {
    /// Render the list with the refresh header revealed above it
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let block = Block::default()
            .title(" Items ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let header_rows = app.header_rows().min(inner.height);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(header_rows), Constraint::Min(0)])
            .split(inner);

        if header_rows > 0 {
            if let Some(loader) = app.loader() {
                let ring = centered_rect(
                    RING_WIDTH.min(chunks[0].width),
                    RING_HEIGHT.min(chunks[0].height),
                    chunks[0],
                );
                frame.render_widget(
                    LoaderRing::new(loader, Instant::now()).track(Style::default().fg(theme.selection)),
                    ring,
                );
            }
        }

        let first = app.first_visible_item();
        let lines: Vec<Line> = app
            .items
            .iter()
            .skip(first)
            .take(chunks[1].height as usize)
            .enumerate()
            .map(|(i, item)| {
                let style = if (first + i) % 2 == 0 {
                    Style::default().fg(theme.fg)
                } else {
                    Style::default().fg(theme.muted)
                };
                Line::from(vec![Span::raw(" "), Span::styled(item.as_str(), style)])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use loader_core::AppConfig;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    use super::*;
    use crate::input::Action;
    use crate::theme::Theme;

    fn draw(app: &App) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(30, 14)).unwrap();
        terminal
            .draw(|frame| RefreshListWidget::render(frame, frame.area(), app))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn test_items_start_below_border() {
        let app = App::new(Arc::new(AppConfig::default()), Theme::default());
        let buf = draw(&app);
        assert!(row_text(&buf, 1).contains("Item 1"));
        assert!(row_text(&buf, 2).contains("Item 2"));
    }

    #[test]
    fn test_pull_pushes_items_down_and_shows_ring() {
        let mut app = App::new(Arc::new(AppConfig::default()), Theme::default());
        for _ in 0..6 {
            app.apply(Action::Pull);
        }
        let buf = draw(&app);

        assert!(row_text(&buf, 7).contains("Item 1"));
        let header: String = (1..7).map(|y| row_text(&buf, y)).collect();
        assert!(header.contains('●'));
    }
}
