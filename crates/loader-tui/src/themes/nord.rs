//! Nord theme
//! https://www.nordtheme.com/

use ratatui::style::Color;

use crate::theme::Theme;

/// Nord default theme
pub fn default() -> Theme {
    Theme {
        bg: Color::Rgb(0x2e, 0x34, 0x40),        // nord0
        card: Color::Rgb(0x3b, 0x42, 0x52),      // nord1
        selection: Color::Rgb(0x43, 0x4c, 0x5e), // nord2
        fg: Color::Rgb(0xec, 0xef, 0xf4),        // nord6
        muted: Color::Rgb(0x5e, 0x68, 0x7a),
        accent: Color::Rgb(0x88, 0xc0, 0xd0),  // nord8
        success: Color::Rgb(0xa3, 0xbe, 0x8c), // nord14
        error: Color::Rgb(0xbf, 0x61, 0x6a),   // nord11
    }
}
