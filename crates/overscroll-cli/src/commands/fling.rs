use anyhow::{ensure, Result};

use overscroll_core::AppConfig;

use crate::driver::{self, DriveOptions, Motion};
use crate::output;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    config: &AppConfig,
    options: &DriveOptions,
    start: i32,
    velocity: i32,
    min: i32,
    max: i32,
    over: i32,
    edge_at: Option<i32>,
) -> Result<()> {
    ensure!(min <= max, "--min ({}) must not exceed --max ({})", min, max);
    ensure!(over >= 0, "--over must not be negative");

    let motion = Motion::Fling {
        start,
        velocity,
        min,
        max,
        over,
        edge_at,
    };
    let last = driver::drive(config, options, motion).await?;
    output::print_summary(options.json, last.as_ref());
    Ok(())
}
