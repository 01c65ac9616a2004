use ratatui::style::Color;

/// Runtime theme with configurable colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg: Color,
    pub card: Color,
    pub selection: Color,

    // Foreground colors
    pub fg: Color,
    pub muted: Color,

    // Semantic colors
    pub accent: Color,
    pub success: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        crate::themes::gruvbox::dark()
    }
}
