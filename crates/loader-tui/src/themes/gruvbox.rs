//! Gruvbox Material themes

use ratatui::style::Color;

use crate::theme::Theme;

pub fn dark() -> Theme {
    Theme {
        bg: Color::Rgb(0x28, 0x28, 0x28),
        card: Color::Rgb(0x32, 0x30, 0x2f),
        selection: Color::Rgb(0x45, 0x40, 0x3d),
        fg: Color::Rgb(0xd4, 0xbe, 0x98),
        muted: Color::Rgb(0x92, 0x83, 0x74),
        accent: Color::Rgb(0x89, 0xb4, 0x82),
        success: Color::Rgb(0xa9, 0xb6, 0x65),
        error: Color::Rgb(0xea, 0x69, 0x62),
    }
}

pub fn light() -> Theme {
    Theme {
        bg: Color::Rgb(0xfb, 0xf1, 0xc7),
        card: Color::Rgb(0xf4, 0xe8, 0xbe),
        selection: Color::Rgb(0xeb, 0xdb, 0xb2),
        fg: Color::Rgb(0x65, 0x47, 0x35),
        muted: Color::Rgb(0xa8, 0x99, 0x84),
        accent: Color::Rgb(0x4c, 0x7a, 0x5d),
        success: Color::Rgb(0x6c, 0x78, 0x2e),
        error: Color::Rgb(0xc1, 0x4a, 0x4a),
    }
}
