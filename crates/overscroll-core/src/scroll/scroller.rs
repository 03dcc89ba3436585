//! L3 Molecular Layer: Scroll controller
//!
//! Wraps a [`ScrollState`] with a clock, an interpolator and flywheel
//! chaining. Arm it with `fling()`, `start_scroll()` or `spring_back()`, then
//! call `compute_scroll_offset()` once per frame until it returns false.

use super::easing::{EasingType, EasingTypeExt};
use super::physics::FlingPhysics;
use super::spring::{DampedSpring, SpringIntegrator};
use super::state::{Phase, ScrollState};
use super::timing::{progress, signum, AnimationClock, SystemClock};
use crate::config::ScrollerConfig;

/// How `compute_scroll_offset` advances the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Scroll,
    Fling,
}

/// One-dimensional scroller with fling, overscroll and spring-back support
#[derive(Debug)]
pub struct OverScroller<C: AnimationClock = SystemClock> {
    mode: Mode,
    state: ScrollState,
    interpolator: EasingType,
    flywheel: bool,
    default_duration_ms: i32,
    clock: C,
}

impl OverScroller<SystemClock> {
    /// Create a scroller reading the system monotonic clock
    pub fn new(config: &ScrollerConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }
}

impl Default for OverScroller<SystemClock> {
    fn default() -> Self {
        Self::new(&ScrollerConfig::default())
    }
}

impl<C: AnimationClock> OverScroller<C> {
    pub fn with_clock(config: &ScrollerConfig, clock: C) -> Self {
        Self {
            mode: Mode::Scroll,
            state: ScrollState::new(
                FlingPhysics::new(config.density, config.friction),
                Box::new(DampedSpring::new(config.spring)),
            ),
            interpolator: config.interpolator,
            flywheel: config.flywheel,
            default_duration_ms: config.default_duration_ms,
            clock,
        }
    }

    /// Replace the spring used by `start_scroll_spring`
    pub fn set_spring_integrator(&mut self, spring: Box<dyn SpringIntegrator>) {
        self.state.set_spring(spring);
    }

    pub fn set_interpolator(&mut self, interpolator: EasingType) {
        self.interpolator = interpolator;
    }

    pub fn interpolator(&self) -> EasingType {
        self.interpolator
    }

    /// Friction applied to flings; defaults to the configured value
    pub fn set_friction(&mut self, friction: f32) {
        self.state.set_friction(friction);
    }

    pub fn friction(&self) -> f32 {
        self.state.physics().friction()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Set the finished flag without moving to the final position
    pub fn force_finished(&mut self, finished: bool) {
        self.state.set_finished(finished);
    }

    #[inline]
    pub fn curr_pos(&self) -> i32 {
        self.state.current()
    }

    /// Instantaneous velocity in px/s
    #[inline]
    pub fn curr_velocity(&self) -> f32 {
        self.state.curr_velocity()
    }

    /// Velocity the current phase was entered with, in px/s
    pub fn start_velocity(&self) -> i32 {
        self.state.velocity()
    }

    pub fn start_pos(&self) -> i32 {
        self.state.start()
    }

    /// Where the current phase ends
    pub fn final_pos(&self) -> i32 {
        self.state.final_position()
    }

    /// Duration of the current phase in milliseconds
    pub fn duration(&self) -> i32 {
        self.state.duration()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Let a running animation go further and longer, see `set_final_position`
    pub fn extend_duration(&mut self, extend: i32) {
        let now = self.clock.now_millis();
        self.state.extend_duration(extend, now);
    }

    pub fn set_final_position(&mut self, position: i32) {
        self.state.set_final_position(position);
    }

    /// Advance to the current clock time
    ///
    /// Returns true while the animation is still running.
    pub fn compute_scroll_offset(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }

        let now = self.clock.now_millis();
        match self.mode {
            Mode::Scroll => {
                if self.is_springing() {
                    self.state.step_spring(now);
                    return true;
                }
                let elapsed = now - self.state.start_time();
                let duration = self.state.duration();
                if elapsed < duration as i64 {
                    let q = self.interpolator.interpolate(progress(elapsed, duration));
                    self.state.update_scroll(q);
                } else {
                    self.abort_animation();
                }
            }
            Mode::Fling => {
                if !self.state.update(now) && !self.state.continue_when_finished(now) {
                    self.state.finish();
                }
            }
        }

        true
    }

    /// Scroll by `delta` over the configured default duration
    pub fn start_scroll(&mut self, start: i32, delta: i32) {
        self.start_scroll_with_duration(start, delta, self.default_duration_ms);
    }

    pub fn start_scroll_with_duration(&mut self, start: i32, delta: i32, duration: i32) {
        self.mode = Mode::Scroll;
        let now = self.clock.now_millis();
        self.state.start_scroll(start, delta, duration, None, now);
    }

    /// Scroll by `delta` on a spring leaving `start` at `velocity` px/s
    ///
    /// The spring decides when the motion ends; `duration` is only reported.
    pub fn start_scroll_spring(&mut self, start: i32, delta: i32, duration: i32, velocity: f32) {
        self.mode = Mode::Scroll;
        let now = self.clock.now_millis();
        self.state.start_scroll(start, delta, duration, Some(velocity), now);
    }

    /// Spring back into `[min, max]`
    ///
    /// Returns false when `start` is already valid.
    pub fn spring_back(&mut self, start: i32, min: i32, max: i32) -> bool {
        self.mode = Mode::Fling;
        let now = self.clock.now_millis();
        self.state.springback(start, min, max, now)
    }

    pub fn fling(&mut self, start: i32, velocity: i32, min: i32, max: i32) {
        self.fling_with_over(start, velocity, min, max, 0);
    }

    /// Start a fling that may overshoot `[min, max]` by up to `over`
    ///
    /// While a previous fling is still running and moving in the same
    /// direction, its current velocity is added to `velocity`.
    pub fn fling_with_over(&mut self, start: i32, velocity: i32, min: i32, max: i32, over: i32) {
        let mut velocity = velocity;
        if self.flywheel && !self.is_finished() {
            let old_velocity = self.state.curr_velocity();
            if signum(velocity as f32) == signum(old_velocity) {
                velocity = (velocity as f32 + old_velocity) as i32;
            }
        }

        self.mode = Mode::Fling;
        let now = self.clock.now_millis();
        self.state.fling(start, velocity, min, max, over, now);
    }

    /// Tell the scroller an edge was hit that was unknown when the fling started
    pub fn notify_edge_reached(&mut self, start: i32, final_pos: i32, over: i32) {
        let now = self.clock.now_millis();
        self.state.notify_edge_reached(start, final_pos, over, now);
    }

    /// Whether the scroller is running outside the spline phase
    ///
    /// A spline fling that started out of bounds and travels back inside is
    /// not reported, even while its position is still past the boundary.
    pub fn is_over_scrolled(&self) -> bool {
        !self.state.is_finished() && self.state.phase() != Phase::Spline
    }

    /// Stop and jump to the final position
    pub fn abort_animation(&mut self) {
        self.state.finish();
    }

    /// Milliseconds since the current phase started
    pub fn time_passed(&self) -> i32 {
        (self.clock.now_millis() - self.state.start_time()) as i32
    }

    pub fn is_springing(&self) -> bool {
        self.state.phase() == Phase::Spring && !self.is_finished()
    }

    /// Slack left for the current bounce
    pub fn over(&self) -> i32 {
        self.state.over()
    }
}
