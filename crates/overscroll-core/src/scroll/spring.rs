//! L4 Atomic Layer: Spring integrator used by spring scrolls
//!
//! The scroller only talks to [`SpringIntegrator`]; [`DampedSpring`] is the
//! default, an analytic damped harmonic oscillator with unit mass.

use crate::config::SpringConfig;

/// Minimal surface the scroller needs from a spring simulation
pub trait SpringIntegrator: std::fmt::Debug {
    /// Arm the spring at `position` moving with `velocity` (px/s) toward `target`
    fn start(&mut self, position: f32, velocity: f32, target: f32);

    /// Position `elapsed_ms` after `start`
    ///
    /// Stops running once the spring has settled, and then returns the target.
    fn step(&mut self, elapsed_ms: i64) -> f32;

    /// Retarget a running spring, keeping its current position and velocity
    fn set_target(&mut self, target: f32);

    fn is_running(&self) -> bool;

    fn cancel(&mut self);
}

/// Smallest change in position worth animating, in pixels
const MIN_VISIBLE_CHANGE: f32 = 1.0;
const VALUE_THRESHOLD: f32 = MIN_VISIBLE_CHANGE * 0.75;
const VELOCITY_THRESHOLD: f32 = VALUE_THRESHOLD * 62.5;

/// Closed-form damped spring
#[derive(Debug, Clone)]
pub struct DampedSpring {
    params: SpringConfig,
    /// Displacement from target at `origin_ms`
    from: f32,
    to: f32,
    initial_velocity: f32,
    /// Time of the last (re)start, relative to `start`
    origin_ms: i64,
    last_ms: i64,
    running: bool,
}

impl DampedSpring {
    pub fn new(params: SpringConfig) -> Self {
        Self {
            params,
            from: 0.0,
            to: 0.0,
            initial_velocity: 0.0,
            origin_ms: 0,
            last_ms: 0,
            running: false,
        }
    }

    /// Position and velocity `t` seconds after the last restart
    fn oscillate(&self, t: f32) -> (f32, f32) {
        let k = self.params.stiffness;
        let omega0 = k.sqrt();
        let beta = self.params.damping_ratio * omega0;
        let x0 = self.from - self.to;
        let v0 = self.initial_velocity;
        let envelope = (-beta * t).exp();

        let (x, dx) = if (beta - omega0).abs() <= f32::EPSILON {
            // Critically damped
            let c = beta * x0 + v0;
            let x = envelope * (x0 + c * t);
            (x, -beta * x + envelope * c)
        } else if beta < omega0 {
            let omega1 = (omega0 * omega0 - beta * beta).sqrt();
            let c = (beta * x0 + v0) / omega1;
            let (sin, cos) = (omega1 * t).sin_cos();
            let x = envelope * (x0 * cos + c * sin);
            (x, -beta * x + envelope * omega1 * (c * cos - x0 * sin))
        } else {
            let omega2 = (beta * beta - omega0 * omega0).sqrt();
            let c = (beta * x0 + v0) / omega2;
            let (sinh, cosh) = ((omega2 * t).sinh(), (omega2 * t).cosh());
            let x = envelope * (x0 * cosh + c * sinh);
            (x, -beta * x + envelope * omega2 * (x0 * sinh + c * cosh))
        };

        (self.to + x, dx)
    }

    fn seconds_since_origin(&self, elapsed_ms: i64) -> f32 {
        (elapsed_ms - self.origin_ms).max(0) as f32 / 1000.0
    }
}

impl Default for DampedSpring {
    fn default() -> Self {
        Self::new(SpringConfig::default())
    }
}

impl SpringIntegrator for DampedSpring {
    fn start(&mut self, position: f32, velocity: f32, target: f32) {
        self.from = position;
        self.to = target;
        self.initial_velocity = velocity;
        self.origin_ms = 0;
        self.last_ms = 0;
        self.running = true;
    }

    fn step(&mut self, elapsed_ms: i64) -> f32 {
        if !self.running {
            return self.to;
        }
        self.last_ms = self.last_ms.max(elapsed_ms);

        let (position, velocity) = self.oscillate(self.seconds_since_origin(self.last_ms));
        if (position - self.to).abs() < VALUE_THRESHOLD && velocity.abs() < VELOCITY_THRESHOLD {
            self.running = false;
            tracing::debug!(target = self.to, elapsed_ms, "Spring settled");
            return self.to;
        }
        position
    }

    fn set_target(&mut self, target: f32) {
        if self.running {
            let (position, velocity) = self.oscillate(self.seconds_since_origin(self.last_ms));
            self.from = position;
            self.initial_velocity = velocity;
            self.origin_ms = self.last_ms;
        }
        self.to = target;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn cancel(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(spring: &mut DampedSpring) -> (Vec<f32>, i64) {
        let mut samples = Vec::new();
        let mut elapsed = 0;
        while spring.is_running() && elapsed < 10_000 {
            elapsed += 16;
            samples.push(spring.step(elapsed));
        }
        (samples, elapsed)
    }

    #[test]
    fn test_underdamped_overshoots_and_settles() {
        let mut spring = DampedSpring::default();
        spring.start(0.0, 0.0, 500.0);
        let (samples, elapsed) = settle(&mut spring);

        assert!(!spring.is_running());
        assert!(elapsed < 2000, "took {}ms", elapsed);
        assert_eq!(*samples.last().unwrap(), 500.0);
        assert!(samples.iter().any(|p| *p > 500.0), "low bouncy spring should overshoot");
    }

    #[test]
    fn test_critically_damped_does_not_overshoot() {
        let mut spring = DampedSpring::new(SpringConfig {
            stiffness: 200.0,
            damping_ratio: 1.0,
        });
        spring.start(0.0, 0.0, 300.0);
        let (samples, _) = settle(&mut spring);
        assert!(samples.iter().all(|p| *p <= 300.0));
    }

    #[test]
    fn test_initial_velocity_is_respected() {
        let mut spring = DampedSpring::default();
        spring.start(0.0, 2000.0, 0.0);
        // Moving away from the target first
        assert!(spring.step(16) > 0.0);
    }

    #[test]
    fn test_retarget_keeps_position() {
        let mut spring = DampedSpring::default();
        spring.start(0.0, 0.0, 500.0);
        let before = spring.step(100);
        spring.set_target(1000.0);
        let after = spring.step(100);
        assert!((before - after).abs() < 0.01);
        let (samples, _) = settle(&mut spring);
        assert_eq!(*samples.last().unwrap(), 1000.0);
    }

    #[test]
    fn test_cancel_stops() {
        let mut spring = DampedSpring::default();
        spring.start(0.0, 0.0, 100.0);
        spring.cancel();
        assert!(!spring.is_running());
        assert_eq!(spring.step(16), 100.0);
    }
}
