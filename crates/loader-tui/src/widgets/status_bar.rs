use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {} | {}", app.refresh_state(), msg)
        } else {
            format!(
                " {} | offset {:.0} | Items: {}",
                app.refresh_state(),
                app.scroll_view.content_offset_y(),
                app.items.len()
            )
        };

        let help_hint = " q:quit j/k:scroll p:pull space:release r:refresh ";
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + help_hint.width());

        let line = Line::from(vec![
            Span::styled(
                status_text,
                Style::default().fg(theme.fg).bg(theme.selection),
            ),
            Span::styled(
                " ".repeat(padding_len),
                Style::default().bg(theme.selection),
            ),
            Span::styled(
                help_hint,
                Style::default().fg(theme.muted).bg(theme.selection),
            ),
        ]);

        let paragraph = Paragraph::new(line);
        frame.render_widget(paragraph, area);
    }
}
