//! L4 Atomic Layer: Fling friction model
//!
//! Distance and duration of a fling follow an exponential decay tuned so that
//! the same gesture feels identical across display densities.

use super::spline::INFLEXION;

/// Constant deceleration of the ballistic phase, in px/s²
pub const GRAVITY: f32 = 2000.0;

const GRAVITY_EARTH: f32 = 9.80665;
const INCHES_PER_METER: f32 = 39.37;
/// Dots per inch at density 1.0
const BASE_DPI: f32 = 160.0;
const LOOK_AND_FEEL_TUNING: f32 = 0.84;

/// ln(0.78) / ln(0.9)
fn deceleration_rate() -> f64 {
    0.78f64.ln() / 0.9f64.ln()
}

/// Friction model bound to one display density
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlingPhysics {
    physical_coeff: f32,
    friction: f32,
}

impl FlingPhysics {
    pub fn new(density: f32, friction: f32) -> Self {
        let ppi = density * BASE_DPI;
        Self {
            physical_coeff: GRAVITY_EARTH * INCHES_PER_METER * ppi * LOOK_AND_FEEL_TUNING,
            friction,
        }
    }

    pub fn physical_coeff(&self) -> f32 {
        self.physical_coeff
    }

    pub fn friction(&self) -> f32 {
        self.friction
    }

    pub fn set_friction(&mut self, friction: f32) {
        self.friction = friction;
    }

    fn spline_deceleration(&self, velocity: i32) -> f64 {
        (INFLEXION as f64 * (velocity as f64).abs()
            / (self.friction as f64 * self.physical_coeff as f64))
            .ln()
    }

    /// Unsigned distance a fling at `velocity` px/s covers before resting
    pub fn fling_distance(&self, velocity: i32) -> f64 {
        if velocity == 0 {
            return 0.0;
        }
        let l = self.spline_deceleration(velocity);
        let rate = deceleration_rate();
        self.friction as f64 * self.physical_coeff as f64 * (rate / (rate - 1.0) * l).exp()
    }

    /// Time in milliseconds a fling at `velocity` px/s takes to rest
    pub fn fling_duration(&self, velocity: i32) -> i32 {
        if velocity == 0 {
            return 0;
        }
        let l = self.spline_deceleration(velocity);
        (1000.0 * (l / (deceleration_rate() - 1.0)).exp()) as i32
    }
}

/// Signed deceleration that slows down motion in the direction of `velocity`
#[inline]
pub fn deceleration_for(velocity: i32) -> f32 {
    if velocity > 0 {
        -GRAVITY
    } else {
        GRAVITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physical_coeff_scales_with_density() {
        let base = FlingPhysics::new(1.0, 0.015);
        let dense = FlingPhysics::new(3.0, 0.015);
        assert!((base.physical_coeff() - 51890.2).abs() < 1.0);
        assert!((dense.physical_coeff() / base.physical_coeff() - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_fling_distance_and_duration() {
        let physics = FlingPhysics::new(1.0, 0.015);
        let distance = physics.fling_distance(1000);
        let duration = physics.fling_duration(1000);
        assert!((distance - 194.3).abs() < 1.0, "distance {}", distance);
        assert!((550..=560).contains(&duration), "duration {}", duration);

        // Direction does not matter
        assert_eq!(physics.fling_distance(-1000), distance);
        assert_eq!(physics.fling_duration(-1000), duration);
    }

    #[test]
    fn test_faster_flings_go_further() {
        let physics = FlingPhysics::new(1.0, 0.015);
        assert!(physics.fling_distance(5000) > physics.fling_distance(1000));
        assert!(physics.fling_duration(5000) > physics.fling_duration(1000));
    }

    #[test]
    fn test_zero_velocity() {
        let physics = FlingPhysics::new(1.0, 0.015);
        assert_eq!(physics.fling_distance(0), 0.0);
        assert_eq!(physics.fling_duration(0), 0);
    }

    #[test]
    fn test_more_friction_shortens_fling() {
        let mut physics = FlingPhysics::new(1.0, 0.015);
        let before = physics.fling_distance(3000);
        physics.set_friction(0.03);
        assert!(physics.fling_distance(3000) < before);
    }

    #[test]
    fn test_deceleration_opposes_velocity() {
        assert_eq!(deceleration_for(10), -GRAVITY);
        assert_eq!(deceleration_for(-10), GRAVITY);
        assert_eq!(deceleration_for(0), GRAVITY);
    }
}
