use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::App;

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    JumpToTop,
    /// Scroll the header into view and refresh
    StartRefresh,
    /// Pull the content down one row, as if dragging
    Pull,
    /// Let go of a keyboard pull
    Release,
    /// Pointer pressed on a terminal row
    DragStart(u16),
    /// Pointer moved to a terminal row while pressed
    DragTo(u16),
    DragEnd,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Esc, _) if !app.is_pulling() => Action::Quit,

        // Scrolling
        (KeyCode::Char('j'), KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::Char('k'), KeyModifiers::NONE) => Action::ScrollUp,
        (KeyCode::Down, KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::Up, KeyModifiers::NONE) => Action::ScrollUp,
        (KeyCode::Char('g'), KeyModifiers::NONE) => Action::JumpToTop,
        (KeyCode::Home, _) => Action::JumpToTop,

        // Refresh
        (KeyCode::Char('r'), KeyModifiers::NONE) => Action::StartRefresh,
        (KeyCode::Char('p'), KeyModifiers::NONE) => Action::Pull,
        (KeyCode::Char(' '), _) | (KeyCode::Enter, _) | (KeyCode::Esc, _) if app.is_pulling() => {
            Action::Release
        }

        _ => Action::None,
    }
}

/// Handle a mouse event and return the corresponding action
pub fn handle_mouse_event(mouse: MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Action::DragStart(mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => Action::DragTo(mouse.row),
        MouseEventKind::Up(MouseButton::Left) => Action::DragEnd,
        MouseEventKind::ScrollDown => Action::ScrollDown,
        MouseEventKind::ScrollUp => Action::ScrollUp,
        _ => Action::None,
    }
}
