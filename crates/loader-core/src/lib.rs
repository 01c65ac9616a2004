pub mod animator;
pub mod config;
pub mod error;
pub mod refresh;
pub mod scroll;
pub mod state;
pub mod surface;
pub mod view;

pub use animator::{RecordingAnimator, RefreshAnimator};
pub use config::{AppConfig, EasingType, LoaderConfig, RefreshConfig, ScrollConfig, UiConfig};
pub use error::{Error, Result};
pub use refresh::{RefreshAction, RefreshController};
pub use state::State;
pub use surface::{EdgeInsets, HeaderView, ScrollGeometry, ScrollSurface, Subscription};
pub use view::ScrollView;
