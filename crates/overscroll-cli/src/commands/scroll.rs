use anyhow::{ensure, Result};

use overscroll_core::AppConfig;

use crate::driver::{self, DriveOptions, Motion};
use crate::output;

pub async fn run(
    config: &AppConfig,
    options: &DriveOptions,
    start: i32,
    delta: i32,
    duration: Option<i32>,
    spring_velocity: Option<f32>,
) -> Result<()> {
    let duration = duration.unwrap_or(config.scroller.default_duration_ms);
    ensure!(duration >= 0, "--duration must not be negative");

    let motion = match spring_velocity {
        Some(velocity) => Motion::SpringScroll {
            start,
            delta,
            duration,
            velocity,
        },
        None => Motion::Scroll {
            start,
            delta,
            duration,
        },
    };
    let last = driver::drive(config, options, motion).await?;
    output::print_summary(options.json, last.as_ref());
    Ok(())
}
