//! L4 Atomic Layer: Animation clocks and time helpers
//!
//! The engine never reads wall time directly. Every reading comes from an
//! [`AnimationClock`] so drivers can supply vsync timestamps and tests can
//! step time by hand.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Source of animation time in milliseconds
///
/// Readings must never decrease.
pub trait AnimationClock {
    fn now_millis(&self) -> i64;
}

/// Monotonic clock measured from its own creation
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationClock for SystemClock {
    #[inline]
    fn now_millis(&self) -> i64 {
        i64::try_from(self.origin.elapsed().as_millis()).unwrap_or(i64::MAX)
    }
}

/// Hand-driven clock
///
/// Clones share the same reading, so a driver can keep one handle while the
/// scroller owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<i64>>,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_millis)),
        }
    }

    /// Move time forward by `millis`
    pub fn advance(&self, millis: i64) {
        self.now.set(self.now.get() + millis.max(0));
    }

    /// Jump to an absolute time; earlier readings are ignored
    pub fn set(&self, millis: i64) {
        if millis >= self.now.get() {
            self.now.set(millis);
        }
    }
}

impl AnimationClock for ManualClock {
    #[inline]
    fn now_millis(&self) -> i64 {
        self.now.get()
    }
}

impl<C: AnimationClock + ?Sized> AnimationClock for &C {
    #[inline]
    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }
}

/// Elapsed fraction of `duration_ms`, clamped to [0.0, 1.0]
#[inline]
pub fn progress(elapsed_ms: i64, duration_ms: i32) -> f32 {
    if duration_ms <= 0 {
        return 1.0;
    }
    (elapsed_ms as f32 / duration_ms as f32).clamp(0.0, 1.0)
}

/// Linear interpolation between two positions, rounding half up
#[inline]
pub fn lerp_i32(from: i32, to: i32, t: f32) -> i32 {
    from + round_half_up(t * (to - from) as f32)
}

/// Round to nearest, ties toward positive infinity
#[inline]
pub fn round_half_up(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}

/// Sign of `value` as -1, 0 or 1
#[inline]
pub fn signum(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new(100);
        let handle = clock.clone();
        handle.advance(16);
        assert_eq!(clock.now_millis(), 116);
        clock.set(50);
        assert_eq!(handle.now_millis(), 116);
        clock.set(200);
        assert_eq!(handle.now_millis(), 200);
    }

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_millis();
        let b = clock.now_millis();
        assert!(b >= a);
    }

    #[test]
    fn test_progress() {
        assert_eq!(progress(0, 0), 1.0);
        assert!((progress(50, 100) - 0.5).abs() < 0.001);
        assert_eq!(progress(150, 100), 1.0);
    }

    #[test]
    fn test_lerp_i32() {
        assert_eq!(lerp_i32(0, 100, 0.0), 0);
        assert_eq!(lerp_i32(0, 100, 0.5), 50);
        assert_eq!(lerp_i32(100, 0, 1.0), 0);
        assert_eq!(lerp_i32(0, -100, 0.005), 0);
    }

    #[test]
    fn test_round_and_sign() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
        assert_eq!(signum(0.0), 0.0);
        assert_eq!(signum(-3.0), -1.0);
    }
}
