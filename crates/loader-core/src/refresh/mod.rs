//! Pull-to-refresh interaction
//!
//! - `decision` - Pure offset band classification
//! - `controller` - State machine bound to a scroll surface

pub mod controller;
pub mod decision;

pub use controller::{RefreshAction, RefreshController};
pub use decision::next_state;
