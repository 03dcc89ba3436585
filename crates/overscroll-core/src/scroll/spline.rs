//! L4 Atomic Layer: Sampled deceleration curve
//!
//! The fling curve is a cubic with fixed tensions that has no closed-form
//! inverse. Both directions are sampled once into monotonic tables and
//! interpolated linearly between samples.

use std::sync::LazyLock;

/// Tension lines cross at (INFLEXION, 1)
pub const INFLEXION: f32 = 0.35;
const START_TENSION: f32 = 0.5;
const END_TENSION: f32 = 1.0;
const P1: f32 = START_TENSION * INFLEXION;
const P2: f32 = 1.0 - END_TENSION * (1.0 - INFLEXION);

/// Number of intervals in each table
pub const NB_SAMPLES: usize = 100;

const TOLERANCE: f32 = 1e-5;
const MAX_BISECTIONS: usize = 64;

static TABLES: LazyLock<SplineTables> = LazyLock::new(SplineTables::build);

/// Precomputed `position-by-time` and `time-by-position` samples
#[derive(Debug)]
pub struct SplineTables {
    position: [f32; NB_SAMPLES + 1],
    time: [f32; NB_SAMPLES + 1],
}

/// Shared tables, built on first use
pub fn tables() -> &'static SplineTables {
    &TABLES
}

impl SplineTables {
    fn build() -> Self {
        let mut position = [0.0; NB_SAMPLES + 1];
        let mut time = [0.0; NB_SAMPLES + 1];

        // Lower bounds carry over between samples since both curves are monotonic
        let mut x_min = 0.0f32;
        let mut y_min = 0.0f32;
        for i in 0..NB_SAMPLES {
            let alpha = i as f32 / NB_SAMPLES as f32;

            let x = bisect(&mut x_min, alpha, |x| curve(x, P1, P2));
            position[i] = curve(x, START_TENSION, 1.0);

            let y = bisect(&mut y_min, alpha, |y| curve(y, START_TENSION, 1.0));
            time[i] = curve(y, P1, P2);
        }
        position[NB_SAMPLES] = 1.0;
        time[NB_SAMPLES] = 1.0;

        tracing::trace!(samples = NB_SAMPLES, "Built spline tables");
        Self { position, time }
    }

    /// Distance fraction and its slope at elapsed fraction `t`
    ///
    /// Past the last sample the motion is complete: `(1.0, 0.0)`.
    #[inline]
    pub fn position(&self, t: f32) -> (f32, f32) {
        let index = (NB_SAMPLES as f32 * t) as usize;
        if index < NB_SAMPLES {
            let t_inf = index as f32 / NB_SAMPLES as f32;
            let t_sup = (index + 1) as f32 / NB_SAMPLES as f32;
            let d_inf = self.position[index];
            let d_sup = self.position[index + 1];
            let velocity_coef = (d_sup - d_inf) / (t_sup - t_inf);
            (d_inf + (t - t_inf) * velocity_coef, velocity_coef)
        } else {
            (1.0, 0.0)
        }
    }

    /// Elapsed fraction needed to cover distance fraction `x`
    #[inline]
    pub fn time(&self, x: f32) -> Option<f32> {
        let index = (NB_SAMPLES as f32 * x) as usize;
        if index < NB_SAMPLES {
            let x_inf = index as f32 / NB_SAMPLES as f32;
            let x_sup = (index + 1) as f32 / NB_SAMPLES as f32;
            let t_inf = self.time[index];
            let t_sup = self.time[index + 1];
            Some(t_inf + (x - x_inf) / (x_sup - x_inf) * (t_sup - t_inf))
        } else {
            None
        }
    }

    pub fn position_samples(&self) -> &[f32] {
        &self.position
    }

    pub fn time_samples(&self) -> &[f32] {
        &self.time
    }
}

/// Cubic with end points (0,0), (1,1) and inner control values `a`, `b`
#[inline]
fn curve(s: f32, a: f32, b: f32) -> f32 {
    let coef = 3.0 * s * (1.0 - s);
    coef * ((1.0 - s) * a + s * b) + s * s * s
}

fn bisect(lower: &mut f32, target: f32, f: impl Fn(f32) -> f32) -> f32 {
    let mut upper = 1.0f32;
    let mut s = *lower + (upper - *lower) / 2.0;
    for _ in 0..MAX_BISECTIONS {
        s = *lower + (upper - *lower) / 2.0;
        let value = f(s);
        if (value - target).abs() < TOLERANCE {
            break;
        }
        if value > target {
            upper = s;
        } else {
            *lower = s;
        }
    }
    s
}
