//! Motion primitives for scroll surfaces
//!
//! - `easing` - Pure easing functions (cubic, quintic, exponential, spring)
//! - `timing` - Time calculation utilities (delayed progress, interpolation)
//! - `animation` - Offset/inset tweens and elastic settle-back
//!
//! # Usage
//!
//! ```ignore
//! use loader_core::scroll::{EasingType, SurfaceAnimation};
//!
//! let anim = SurfaceAnimation::offset(Instant::now(), 0.0, -70.0, duration, EasingType::Cubic)
//!     .with_insets(current_insets, revealed_insets);
//!
//! // Each frame
//! if let Some(frame) = anim.sample(Instant::now()) {
//!     surface.set_content_offset_y(frame.offset_y);
//! }
//! ```

pub mod animation;
pub mod easing;
pub mod timing;

pub use animation::{spring_back, AnimationFrame, SurfaceAnimation};
pub use easing::{EasingType, EasingTypeExt};
