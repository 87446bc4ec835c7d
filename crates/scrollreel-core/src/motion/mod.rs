//! Motion primitives shared by glides, wheel scrolling and transitions
//!
//! ## Atomic layer
//! - `easing` - Pure easing functions mapping [0, 1] to [0, 1]
//! - `timing` - Frame-clock progress and interpolation helpers
//!
//! Everything here is driven by elapsed `Duration`s handed in by the frame
//! clock, never by wall time, so animations are deterministic under test.

pub mod easing;
pub mod timing;

pub use crate::config::EasingType;
pub use timing::{lerp, progress, Stopwatch};
