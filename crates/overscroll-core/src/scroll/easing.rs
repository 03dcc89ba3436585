//! L4 Atomic Layer: Interpolators for time-boxed scrolls
//!
//! Every curve maps elapsed fraction to distance fraction, fixing both ends
//! at 0 and 1.

use std::f32::consts::E;

pub use crate::config::EasingType;

/// Curve evaluation for [`EasingType`]
pub trait EasingTypeExt {
    /// Distance fraction at elapsed fraction `input`, clamped to [0, 1]
    fn interpolate(&self, input: f32) -> f32;
}

impl EasingTypeExt for EasingType {
    #[inline]
    fn interpolate(&self, input: f32) -> f32 {
        let t = input.clamp(0.0, 1.0);
        let rest = 1.0 - t;
        match self {
            EasingType::None => {
                if t < 1.0 {
                    0.0
                } else {
                    1.0
                }
            }
            EasingType::Linear => t,
            EasingType::Cubic => 1.0 - rest.powi(3),
            EasingType::Quintic => 1.0 - rest.powi(5),
            EasingType::EaseOut if t >= 1.0 => 1.0,
            EasingType::EaseOut => 1.0 - 2.0f32.powf(-10.0 * t),
            EasingType::ViscousFluid => viscous::interpolate(t),
        }
    }
}

mod viscous {
    use super::E;

    /// Controls the viscous fluid effect (how much of it)
    const SCALE: f32 = 8.0;

    /// Exponential approach up to `x = 1`, then the remaining `1 - 1/e`
    /// is covered by an exponential decay
    fn curve(x: f32) -> f32 {
        let x = x * SCALE;
        if x < 1.0 {
            x - (1.0 - (-x).exp())
        } else {
            let reached = 1.0 / E;
            reached + (1.0 - (1.0 - x).exp()) * (1.0 - reached)
        }
    }

    pub(super) fn interpolate(t: f32) -> f32 {
        let normalize = 1.0 / curve(1.0);
        let offset = 1.0 - normalize * curve(1.0);
        let value = normalize * curve(t);
        if value > 0.0 {
            value + offset
        } else {
            value
        }
    }
}
