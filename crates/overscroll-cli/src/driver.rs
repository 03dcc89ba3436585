//! Runs one motion either on simulated frames or against the wall clock

use std::time::Duration;

use anyhow::Result;
use tokio::time::MissedTickBehavior;

use overscroll_core::scroll::{record_frames, AnimationClock, Frame, ManualClock, OverScroller};
use overscroll_core::AppConfig;

use crate::output::FramePrinter;

/// Global flags shared by every simulation command
#[derive(Debug, Clone)]
pub struct DriveOptions {
    pub json: bool,
    pub frame_ms: u64,
    pub max_frames: usize,
    pub realtime: bool,
}

/// What to start on a fresh scroller
#[derive(Debug, Clone, Copy)]
pub enum Motion {
    Fling {
        start: i32,
        velocity: i32,
        min: i32,
        max: i32,
        over: i32,
        /// Edge reported once the fling passes it
        edge_at: Option<i32>,
    },
    SpringBack {
        start: i32,
        min: i32,
        max: i32,
    },
    Scroll {
        start: i32,
        delta: i32,
        duration: i32,
    },
    SpringScroll {
        start: i32,
        delta: i32,
        duration: i32,
        velocity: f32,
    },
}

impl Motion {
    /// Start the motion, false when there is nothing to animate
    fn arm<C: AnimationClock>(&self, scroller: &mut OverScroller<C>) -> bool {
        match *self {
            Motion::Fling {
                start,
                velocity,
                min,
                max,
                over,
                ..
            } => {
                scroller.fling_with_over(start, velocity, min, max, over);
                !scroller.is_finished()
            }
            Motion::SpringBack { start, min, max } => scroller.spring_back(start, min, max),
            Motion::Scroll {
                start,
                delta,
                duration,
            } => {
                scroller.start_scroll_with_duration(start, delta, duration);
                true
            }
            Motion::SpringScroll {
                start,
                delta,
                duration,
                velocity,
            } => {
                scroller.start_scroll_spring(start, delta, duration, velocity);
                true
            }
        }
    }

    /// Report the configured edge the first frame the fling crosses it
    fn poke<C: AnimationClock>(
        &self,
        scroller: &mut OverScroller<C>,
        frame: &Frame,
        reported: &mut bool,
    ) {
        let Motion::Fling {
            start,
            velocity,
            over,
            edge_at: Some(edge),
            ..
        } = *self
        else {
            return;
        };
        if *reported {
            return;
        }
        let crossed = if velocity > 0 {
            frame.position >= edge && start < edge
        } else {
            frame.position <= edge && start > edge
        };
        if crossed {
            tracing::info!(edge, position = frame.position, "Reporting edge");
            scroller.notify_edge_reached(frame.position, edge, over);
            *reported = true;
        }
    }
}

/// Run `motion` to rest and print every frame
pub async fn drive(
    config: &AppConfig,
    options: &DriveOptions,
    motion: Motion,
) -> Result<Option<Frame>> {
    if options.realtime {
        drive_realtime(config, options, motion).await
    } else {
        drive_simulated(config, options, motion)
    }
}

fn drive_simulated(
    config: &AppConfig,
    options: &DriveOptions,
    motion: Motion,
) -> Result<Option<Frame>> {
    let clock = ManualClock::new(0);
    let mut scroller = OverScroller::with_clock(&config.scroller, clock);
    if !motion.arm(&mut scroller) {
        return Ok(None);
    }
    tracing::debug!(?motion, duration = scroller.duration(), "Simulating");

    let mut reported = false;
    let frames = record_frames(&mut scroller, options.frame_ms, options.max_frames, |s, frame| {
        motion.poke(s, frame, &mut reported)
    });

    let mut printer = FramePrinter::new(options.json);
    for frame in &frames {
        printer.print(frame)?;
    }
    Ok(frames.last().copied())
}

async fn drive_realtime(
    config: &AppConfig,
    options: &DriveOptions,
    motion: Motion,
) -> Result<Option<Frame>> {
    let mut scroller = OverScroller::new(&config.scroller);
    let origin = scroller.clock().now_millis();
    if !motion.arm(&mut scroller) {
        return Ok(None);
    }
    tracing::debug!(?motion, duration = scroller.duration(), "Running in real time");

    let mut ticker = tokio::time::interval(Duration::from_millis(options.frame_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately
    ticker.tick().await;

    let mut printer = FramePrinter::new(options.json);
    let mut reported = false;
    let mut last = None;
    for _ in 0..options.max_frames {
        ticker.tick().await;
        let running = scroller.compute_scroll_offset();
        let frame = Frame::capture(&scroller, scroller.clock().now_millis() - origin);
        printer.print(&frame)?;
        last = Some(frame);
        if !running || frame.finished {
            return Ok(last);
        }
        motion.poke(&mut scroller, &frame, &mut reported);
    }

    tracing::warn!(max_frames = options.max_frames, "Scroller still running after frame limit");
    Ok(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> DriveOptions {
        DriveOptions {
            json: true,
            frame_ms: 16,
            max_frames: 2000,
            realtime: false,
        }
    }

    #[test]
    fn test_spring_back_inside_range_does_nothing() {
        let config = AppConfig::default();
        let motion = Motion::SpringBack {
            start: 5,
            min: 0,
            max: 10,
        };
        assert!(drive_simulated(&config, &options(), motion).unwrap().is_none());
    }

    #[test]
    fn test_fling_settles_inside_bounds() {
        let config = AppConfig::default();
        let motion = Motion::Fling {
            start: 0,
            velocity: 4000,
            min: 0,
            max: 300,
            over: 40,
            edge_at: None,
        };
        let last = drive_simulated(&config, &options(), motion).unwrap().unwrap();
        assert!(last.finished);
        assert_eq!(last.position, 300);
    }

    #[test]
    fn test_edge_report_stops_at_edge() {
        let config = AppConfig::default();
        let motion = Motion::Fling {
            start: 0,
            velocity: 3000,
            min: 0,
            max: 100_000,
            over: 0,
            edge_at: Some(200),
        };
        let last = drive_simulated(&config, &options(), motion).unwrap().unwrap();
        assert!(last.finished);
        assert_eq!(last.position, 200);
    }

    #[tokio::test]
    async fn test_realtime_scroll_reaches_target() {
        let config = AppConfig::default();
        let motion = Motion::Scroll {
            start: 0,
            delta: 100,
            duration: 0,
        };
        let last = drive_realtime(&config, &options(), motion).await.unwrap().unwrap();
        assert_eq!(last.position, 100);
    }
}
