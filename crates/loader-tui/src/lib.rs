pub mod app;
pub mod event;
pub mod input;
pub mod loader;
pub mod theme;
pub mod themes;
pub mod widgets;

pub use app::App;
pub use loader::{LoaderOverlay, LoaderRing, MaterialLoader};
pub use theme::Theme;
pub use themes::{available_themes, load_theme, parse_hex_color};
