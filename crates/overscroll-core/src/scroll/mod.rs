//! Fling and overscroll physics for a single scroll axis
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `spline` - Sampled deceleration curve and its inverse
//! - `physics` - Fling distance/duration from velocity
//! - `easing` - Easing functions for time-boxed scrolls
//! - `timing` - Animation clocks and rounding helpers
//! - `spring` - Spring integrator behind a trait
//!
//! ## L3 Molecular Layer
//! - `state` - Phase state machine (spline, ballistic, cubic, spring)
//! - `scroller` - Public controller with flywheel chaining
//! - `trace` - Fixed-rate frame sampling
//!
//! # Usage
//!
//! ```ignore
//! use overscroll_core::{OverScroller, ScrollerConfig};
//!
//! let mut scroller = OverScroller::new(&ScrollerConfig::default());
//! scroller.fling_with_over(0, 4000, 0, 1000, 100);
//!
//! // Once per display frame
//! while scroller.compute_scroll_offset() {
//!     let position = scroller.curr_pos();
//!     // ...
//! }
//! ```

// L4 Atomic Layer
pub mod easing;
pub mod physics;
pub mod spline;
pub mod spring;
pub mod timing;

// L3 Molecular Layer
pub mod scroller;
pub mod state;
pub mod trace;

// Re-exports for convenient access
pub use easing::{EasingType, EasingTypeExt};
pub use physics::FlingPhysics;
pub use scroller::OverScroller;
pub use spring::{DampedSpring, SpringIntegrator};
pub use state::Phase;
pub use timing::{AnimationClock, ManualClock, SystemClock};
pub use trace::{record_frames, Frame};
