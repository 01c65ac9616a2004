mod refresh_list;
mod status_bar;

pub use refresh_list::RefreshListWidget;
pub use status_bar::StatusBarWidget;
