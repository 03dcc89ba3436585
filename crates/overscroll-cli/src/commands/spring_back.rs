use anyhow::{ensure, Result};

use overscroll_core::AppConfig;

use crate::driver::{self, DriveOptions, Motion};
use crate::output;

pub async fn run(
    config: &AppConfig,
    options: &DriveOptions,
    start: i32,
    min: i32,
    max: i32,
) -> Result<()> {
    ensure!(min <= max, "--min ({}) must not exceed --max ({})", min, max);

    let last = driver::drive(config, options, Motion::SpringBack { start, min, max }).await?;
    if last.is_none() && !options.json {
        println!("{} is already within [{}, {}].", start, min, max);
        return Ok(());
    }
    output::print_summary(options.json, last.as_ref());
    Ok(())
}
