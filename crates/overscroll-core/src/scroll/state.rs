//! L3 Molecular Layer: Single-axis motion state machine
//!
//! [`ScrollState`] holds one axis of motion and switches between four analytic
//! models ([`Phase`]). Every method takes the current animation time as an
//! argument, so the state itself never reads a clock.

use serde::Serialize;

use super::physics::{deceleration_for, FlingPhysics};
use super::spline;
use super::spring::SpringIntegrator;
use super::timing::{lerp_i32, round_half_up, signum};

/// Analytic model driving the current motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Friction decay along the sampled deceleration curve
    #[default]
    Spline,
    /// Eased return to a boundary
    Cubic,
    /// Constant deceleration past a boundary
    Ballistic,
    /// Externally integrated spring
    Spring,
}

#[derive(Debug)]
pub(crate) struct ScrollState {
    start: i32,
    current: i32,
    final_position: i32,
    /// Velocity when the phase was entered, px/s
    velocity: i32,
    curr_velocity: f32,
    deceleration: f32,
    start_time: i64,
    duration: i32,
    spline_duration: i32,
    spline_distance: i32,
    finished: bool,
    /// Allowed overshoot past the boundary
    over: i32,
    phase: Phase,
    physics: FlingPhysics,
    spring: Box<dyn SpringIntegrator>,
}

impl ScrollState {
    pub(crate) fn new(physics: FlingPhysics, spring: Box<dyn SpringIntegrator>) -> Self {
        Self {
            start: 0,
            current: 0,
            final_position: 0,
            velocity: 0,
            curr_velocity: 0.0,
            deceleration: 0.0,
            start_time: 0,
            duration: 0,
            spline_duration: 0,
            spline_distance: 0,
            finished: true,
            over: 0,
            phase: Phase::Spline,
            physics,
            spring,
        }
    }

    pub(crate) fn start(&self) -> i32 {
        self.start
    }

    pub(crate) fn current(&self) -> i32 {
        self.current
    }

    pub(crate) fn final_position(&self) -> i32 {
        self.final_position
    }

    pub(crate) fn velocity(&self) -> i32 {
        self.velocity
    }

    pub(crate) fn curr_velocity(&self) -> f32 {
        self.curr_velocity
    }

    pub(crate) fn start_time(&self) -> i64 {
        self.start_time
    }

    pub(crate) fn duration(&self) -> i32 {
        self.duration
    }

    pub(crate) fn over(&self) -> i32 {
        self.over
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished
    }

    pub(crate) fn set_finished(&mut self, finished: bool) {
        self.finished = finished;
    }

    pub(crate) fn physics(&self) -> &FlingPhysics {
        &self.physics
    }

    pub(crate) fn set_friction(&mut self, friction: f32) {
        self.physics.set_friction(friction);
    }

    pub(crate) fn set_spring(&mut self, spring: Box<dyn SpringIntegrator>) {
        self.cancel_spring();
        self.spring = spring;
    }

    /// Move along the time-boxed scroll, `q` being the eased progress
    pub(crate) fn update_scroll(&mut self, q: f32) {
        if self.phase == Phase::Spring {
            return;
        }
        self.current = lerp_i32(self.start, self.final_position, q);
    }

    /// Arm a time-boxed scroll, or a spring toward `start + distance` when
    /// `spring_velocity` is given
    pub(crate) fn start_scroll(
        &mut self,
        start: i32,
        distance: i32,
        duration: i32,
        spring_velocity: Option<f32>,
        now: i64,
    ) {
        self.finished = false;

        self.start = start;
        self.current = start;
        self.final_position = start.saturating_add(distance);

        self.start_time = now;
        self.duration = duration.max(0);

        self.cancel_spring();
        if let Some(velocity) = spring_velocity {
            self.phase = Phase::Spring;
            self.spring
                .start(start as f32, velocity, self.final_position as f32);
        }

        self.deceleration = 0.0;
        self.velocity = 0;
    }

    /// Advance the spring to `now`, finishing once it settles
    pub(crate) fn step_spring(&mut self, now: i64) {
        if self.phase != Phase::Spring || self.finished {
            return;
        }
        let position = self.spring.step(now - self.start_time);
        self.current = position as i32;
        if !self.spring.is_running() {
            self.finish();
        }
    }

    /// Stop a running spring, leaving the spring phase
    fn cancel_spring(&mut self) {
        if self.spring.is_running() {
            self.spring.cancel();
        }
        if self.phase == Phase::Spring {
            self.phase = Phase::Spline;
        }
    }

    pub(crate) fn finish(&mut self) {
        self.cancel_spring();

        self.current = self.final_position;
        // curr_velocity is kept so a following fling can still chain on it
        self.finished = true;
    }

    pub(crate) fn set_final_position(&mut self, position: i32) {
        self.final_position = position;
        if self.phase == Phase::Spring && self.spring.is_running() {
            self.spring.set_target(position as f32);
        }
        self.spline_distance = self.final_position - self.start;
        self.finished = false;
    }

    pub(crate) fn extend_duration(&mut self, extend: i32, now: i64) {
        let elapsed = (now - self.start_time) as i32;
        self.duration = (elapsed + extend).max(0);
        self.spline_duration = self.duration;
        self.finished = false;
    }

    /// Returns whether a spring-back toward `[min, max]` was started
    pub(crate) fn springback(&mut self, start: i32, min: i32, max: i32, now: i64) -> bool {
        self.cancel_spring();
        self.finished = true;

        self.start = start;
        self.current = start;
        self.final_position = start;
        self.velocity = 0;

        self.start_time = now;
        self.duration = 0;

        if start < min {
            self.start_springback(start, min);
        } else if start > max {
            self.start_springback(start, max);
        }

        !self.finished
    }

    fn start_springback(&mut self, start: i32, end: i32) {
        // start_time has been set by the caller
        self.finished = false;
        self.phase = Phase::Cubic;
        self.start = start;
        self.current = start;
        self.final_position = end;
        let delta = start as i64 - end as i64;
        self.deceleration = deceleration_for(delta.signum() as i32);
        // Only the sign is used by the cubic update
        self.velocity = (-delta).clamp(i32::MIN as i64, i32::MAX as i64) as i32;
        self.over = delta.abs().min(i32::MAX as i64) as i32;
        self.duration = if delta == 0 {
            0
        } else {
            (1000.0 * (-2.0 * delta as f64 / self.deceleration as f64).sqrt()) as i32
        };
        tracing::debug!(start, end, duration = self.duration, "Spring back");
    }

    pub(crate) fn fling(&mut self, start: i32, velocity: i32, min: i32, max: i32, over: i32, now: i64) {
        self.cancel_spring();
        self.over = over.max(0);
        self.finished = false;
        self.velocity = velocity;
        self.curr_velocity = velocity as f32;
        self.duration = 0;
        self.spline_duration = 0;
        self.start_time = now;
        self.start = start;
        self.current = start;

        if start > max || start < min {
            self.start_after_edge(start, min, max, velocity, now);
            return;
        }

        self.phase = Phase::Spline;
        let mut total_distance = 0.0;

        if velocity != 0 {
            self.duration = self.physics.fling_duration(velocity);
            self.spline_duration = self.duration;
            total_distance = self.physics.fling_distance(velocity);
        }

        self.spline_distance = (total_distance * signum(velocity as f32) as f64) as i32;
        self.final_position = start.saturating_add(self.spline_distance);

        // Clamp to a valid final position
        if self.final_position < min {
            self.adjust_duration(self.start, self.final_position, min);
            self.final_position = min;
        }

        if self.final_position > max {
            self.adjust_duration(self.start, self.final_position, max);
            self.final_position = max;
        }

        if velocity == 0 {
            // Nothing to animate
            self.finished = true;
        }

        tracing::trace!(
            start,
            velocity,
            distance = self.spline_distance,
            final_position = self.final_position,
            duration = self.duration,
            "Fling"
        );
    }

    /// Rescale `duration` so the spline reaches `new_final` instead of `old_final`
    fn adjust_duration(&mut self, start: i32, old_final: i32, new_final: i32) {
        let old_distance = old_final - start;
        if old_distance == 0 {
            return;
        }
        let new_distance = new_final - start;
        let x = (new_distance as f32 / old_distance as f32).abs();
        if let Some(time_coef) = spline::tables().time(x) {
            self.duration = (self.duration as f32 * time_coef) as i32;
        }
    }

    /// Place the motion on a ballistic curve that leaves `end` at the speed it
    /// would have had after travelling from `start` with `velocity`
    fn fit_on_bounce_curve(&mut self, start: i32, end: i32, velocity: i32) {
        let deceleration = self.deceleration.abs();
        let duration_to_apex = -(velocity as f32) / self.deceleration;
        let velocity_squared = velocity as f32 * velocity as f32;
        let distance_to_apex = velocity_squared / 2.0 / deceleration;
        let distance_to_edge = (end as f32 - start as f32).abs();
        let total_duration =
            (2.0 * (distance_to_apex + distance_to_edge) as f64 / deceleration as f64).sqrt() as f32;
        self.start_time -= (1000.0 * (total_duration - duration_to_apex)) as i64;
        self.start = end;
        self.current = end;
        self.velocity = (-self.deceleration * total_duration) as i32;
    }

    fn start_bounce_after_edge(&mut self, start: i32, end: i32, velocity: i32) {
        self.deceleration = deceleration_for(if velocity == 0 { start - end } else { velocity });
        self.fit_on_bounce_curve(start, end, velocity);
        self.on_edge_reached();
    }

    /// Leave an out-of-bounds `start`, either bouncing further out, flinging
    /// back in, or springing back
    pub(crate) fn start_after_edge(&mut self, start: i32, min: i32, max: i32, velocity: i32, now: i64) {
        if start > min && start < max {
            tracing::error!(start, min, max, "start_after_edge called from a valid position");
            self.finished = true;
            return;
        }
        let positive = start > max;
        let edge = if positive { max } else { min };
        let over_distance = start - edge;
        let keep_increasing = (over_distance as i64) * (velocity as i64) >= 0;
        if keep_increasing {
            // Bounce or head to the boundary depending on velocity
            self.start_bounce_after_edge(start, edge, velocity);
        } else {
            let total_distance = self.physics.fling_distance(velocity);
            if total_distance > (over_distance as f64).abs() {
                let (min, max) = if positive { (min, start) } else { (start, max) };
                self.fling(start, velocity, min, max, self.over, now);
            } else {
                self.start_springback(start, edge);
            }
        }
    }

    pub(crate) fn notify_edge_reached(&mut self, start: i32, end: i32, over: i32, now: i64) {
        // A bounce already in progress ignores repeated notifications
        if self.phase == Phase::Spline {
            self.over = over.max(0);
            self.start_time = now;
            // Distance to the edge is increasing, so no new fling is started
            self.start_after_edge(start, end, end, self.curr_velocity as i32, now);
        }
    }

    /// Enter the ballistic phase; `start`, `velocity` and `start_time` already
    /// describe the moment the edge was reached
    fn on_edge_reached(&mut self) {
        let velocity_squared = self.velocity as f32 * self.velocity as f32;
        let mut distance = velocity_squared / (2.0 * self.deceleration.abs());
        let sign = signum(self.velocity as f32);

        let mut no_slack = false;
        if distance > self.over as f32 {
            // Default deceleration cannot stop us before the overscroll limit
            if self.over > 0 {
                self.deceleration = -sign * velocity_squared / (2.0 * self.over as f32);
            } else {
                no_slack = true;
            }
            distance = self.over as f32;
        }

        self.over = distance as i32;
        self.phase = Phase::Ballistic;
        self.final_position =
            self.start + if self.velocity > 0 { distance as i32 } else { -(distance as i32) };
        self.duration = if no_slack || self.deceleration == 0.0 {
            0
        } else {
            (-(1000.0 * self.velocity as f32 / self.deceleration) as i32).max(0)
        };
        tracing::debug!(
            start = self.start,
            apex = self.final_position,
            velocity = self.velocity,
            duration = self.duration,
            "Edge reached"
        );
    }

    /// Chain into the next phase once the current one ran out of time
    ///
    /// Returns false when the motion is over.
    pub(crate) fn continue_when_finished(&mut self, now: i64) -> bool {
        match self.phase {
            Phase::Spline => {
                if self.duration < self.spline_duration {
                    // The fling was clamped, so the edge was reached
                    self.start = self.final_position;
                    self.current = self.final_position;
                    self.velocity = self.curr_velocity as i32;
                    self.deceleration = deceleration_for(self.velocity);
                    self.start_time += self.duration as i64;
                    self.on_edge_reached();
                } else {
                    return false;
                }
            }
            Phase::Ballistic => {
                self.start_time += self.duration as i64;
                self.start_springback(self.final_position, self.start);
            }
            Phase::Cubic | Phase::Spring => return false,
        }

        self.update(now);
        true
    }

    /// Recompute position and velocity for `now`
    ///
    /// Returns false once the phase duration has elapsed.
    pub(crate) fn update(&mut self, now: i64) -> bool {
        if self.phase == Phase::Spring {
            return !self.finished;
        }

        let current_time = now - self.start_time;

        if current_time == 0 {
            // Still going if there is anything left to do
            return self.duration > 0;
        }
        if current_time > self.duration as i64 {
            return false;
        }

        let distance = match self.phase {
            Phase::Spline => {
                let t = if self.spline_duration > 0 {
                    current_time as f32 / self.spline_duration as f32
                } else {
                    1.0
                };
                let (distance_coef, velocity_coef) = spline::tables().position(t);
                self.curr_velocity = if self.spline_duration > 0 {
                    velocity_coef * self.spline_distance as f32 / self.spline_duration as f32
                        * 1000.0
                } else {
                    0.0
                };
                distance_coef * self.spline_distance as f32
            }
            Phase::Ballistic => {
                let t = current_time as f32 / 1000.0;
                self.curr_velocity = self.velocity as f32 + self.deceleration * t;
                self.velocity as f32 * t + self.deceleration * t * t / 2.0
            }
            Phase::Cubic => {
                let t = current_time as f32 / self.duration as f32;
                let t2 = t * t;
                let sign = signum(self.velocity as f32);
                self.curr_velocity = sign * self.over as f32 * 6.0 * (-t + t2);
                sign * self.over as f32 * (3.0 * t2 - 2.0 * t * t2)
            }
            Phase::Spring => return !self.finished,
        };

        self.current = self.start.saturating_add(round_half_up(distance));

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::spring::DampedSpring;

    fn state() -> ScrollState {
        ScrollState::new(FlingPhysics::new(1.0, 0.015), Box::new(DampedSpring::default()))
    }

    #[test]
    fn test_starts_at_rest() {
        let state = state();
        assert!(state.is_finished());
        assert_eq!(state.phase(), Phase::Spline);
    }

    #[test]
    fn test_start_after_edge_from_valid_position_finishes() {
        let mut state = state();
        state.fling(5, 0, 0, 10, 0, 0);
        state.finished = false;
        state.start_after_edge(5, 0, 10, 100, 0);
        assert!(state.is_finished());
    }

    #[test]
    fn test_unclamped_fling_ends_without_bounce() {
        let mut state = state();
        state.fling(0, 1000, -10_000, 10_000, 0, 0);
        assert_eq!(state.final_position(), 194);
        let duration = state.duration() as i64;
        assert!(state.update(duration));
        assert!(!state.update(duration + 1));
        assert!(!state.continue_when_finished(duration + 1));
    }

    #[test]
    fn test_clamped_fling_chains_into_ballistic() {
        let mut state = state();
        state.fling(0, 5000, 0, 1000, 50, 0);
        assert_eq!(state.final_position(), 1000);
        let duration = state.duration() as i64;
        assert!(state.update(duration));
        let velocity = state.curr_velocity();
        assert!(velocity > 0.0);

        assert!(state.continue_when_finished(duration + 1));
        assert_eq!(state.phase(), Phase::Ballistic);
        assert_eq!(state.start(), 1000);
        assert_eq!(state.velocity(), velocity as i32);
        assert_eq!(state.final_position(), 1050);
    }

    #[test]
    fn test_ballistic_returns_with_cubic() {
        let mut state = state();
        state.fling(0, 5000, 0, 1000, 50, 0);
        let mut now = 0;
        while state.phase() != Phase::Cubic {
            now += 4;
            if !state.update(now) {
                assert!(state.continue_when_finished(now));
            }
        }
        assert_eq!(state.start(), 1050);
        assert_eq!(state.final_position(), 1000);
        assert_eq!(state.over(), 50);
    }

    #[test]
    fn test_zero_overscroll_bounce_is_instant() {
        let mut state = state();
        // Out of bounds and moving further out, with no slack
        state.fling(20, 800, 0, 10, 0, 0);
        assert_eq!(state.phase(), Phase::Ballistic);
        assert_eq!(state.duration(), 0);
        assert_eq!(state.final_position(), 10);
    }

    #[test]
    fn test_out_of_bounds_fling_back_inside() {
        let mut state = state();
        state.fling(1200, -5000, 0, 1000, 100, 0);
        assert_eq!(state.phase(), Phase::Spline);
        assert_eq!(state.final_position(), 0);
    }

    #[test]
    fn test_out_of_bounds_slow_fling_springs_back() {
        let mut state = state();
        state.fling(1200, -100, 0, 1000, 100, 0);
        assert_eq!(state.phase(), Phase::Cubic);
        assert_eq!(state.final_position(), 1000);
    }

    #[test]
    fn test_fling_at_edge_bounces() {
        let mut state = state();
        state.fling(1000, 3000, 0, 1000, 40, 0);
        assert!(!state.is_finished());
        assert!(!state.update(16));
        assert!(state.continue_when_finished(16));
        assert_eq!(state.phase(), Phase::Ballistic);
        assert_eq!(state.final_position(), 1040);
    }

    #[test]
    fn test_update_is_pure_in_time() {
        let mut state = state();
        state.fling(0, 3000, 0, 100_000, 0, 0);
        state.update(120);
        let first = (state.current(), state.curr_velocity());
        state.update(120);
        assert_eq!(first, (state.current(), state.curr_velocity()));
    }
}
