use anyhow::Result;
use serde::Serialize;

use overscroll_core::scroll::spline;

#[derive(Serialize)]
struct Sample {
    index: usize,
    alpha: f32,
    position: f32,
    time: f32,
}

fn samples() -> Vec<Sample> {
    let tables = spline::tables();
    tables
        .position_samples()
        .iter()
        .zip(tables.time_samples())
        .enumerate()
        .map(|(index, (&position, &time))| Sample {
            index,
            alpha: index as f32 / spline::NB_SAMPLES as f32,
            position,
            time,
        })
        .collect()
}

pub fn run(json: bool) -> Result<()> {
    let samples = samples();

    if json {
        for sample in &samples {
            println!("{}", serde_json::to_string(sample)?);
        }
        return Ok(());
    }

    println!("Deceleration curve ({} samples):\n", spline::NB_SAMPLES);
    println!("{:>5} {:>6} {:>10} {:>10}", "i", "alpha", "position", "time");
    for sample in &samples {
        println!(
            "{:>5} {:>6.2} {:>10.5} {:>10.5}",
            sample.index, sample.alpha, sample.position, sample.time
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_cover_both_ends() {
        let samples = samples();
        assert_eq!(samples.len(), spline::NB_SAMPLES + 1);
        assert!(samples[0].position.abs() < 1e-3);
        assert_eq!(samples[spline::NB_SAMPLES].position, 1.0);
        assert_eq!(samples[spline::NB_SAMPLES].alpha, 1.0);
    }
}
