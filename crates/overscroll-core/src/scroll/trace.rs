//! L3 Molecular Layer: Frame sampling
//!
//! Drives a scroller on a [`ManualClock`] at a fixed frame interval and
//! reports what a display loop would have seen.

use serde::Serialize;

use super::scroller::OverScroller;
use super::state::Phase;
use super::timing::{AnimationClock, ManualClock};

/// Snapshot of a scroller after one `compute_scroll_offset`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    /// Milliseconds since sampling started
    pub time_ms: i64,
    pub position: i32,
    pub velocity: f32,
    pub phase: Phase,
    pub finished: bool,
}

impl Frame {
    pub fn capture<C: AnimationClock>(scroller: &OverScroller<C>, time_ms: i64) -> Self {
        Self {
            time_ms,
            position: scroller.curr_pos(),
            velocity: scroller.curr_velocity(),
            phase: scroller.phase(),
            finished: scroller.is_finished(),
        }
    }

    pub fn to_json_line(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Step `scroller` every `frame_ms` until it stops or `max_frames` is hit
///
/// `on_frame` may poke the scroller between frames, e.g. to report an edge.
/// Returns every sampled frame, the last one being the resting state.
pub fn record_frames<F>(
    scroller: &mut OverScroller<ManualClock>,
    frame_ms: u64,
    max_frames: usize,
    mut on_frame: F,
) -> Vec<Frame>
where
    F: FnMut(&mut OverScroller<ManualClock>, &Frame),
{
    let clock = scroller.clock().clone();
    let origin = clock.now_millis();
    let mut frames = Vec::new();

    for _ in 0..max_frames {
        clock.advance(frame_ms as i64);
        let running = scroller.compute_scroll_offset();
        let frame = Frame::capture(scroller, clock.now_millis() - origin);
        frames.push(frame);
        if !running || frame.finished {
            return frames;
        }
        on_frame(scroller, &frame);
    }

    tracing::warn!(max_frames, "Scroller still running after frame limit");
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScrollerConfig;

    #[test]
    fn test_records_until_rest() {
        let clock = ManualClock::new(0);
        let mut scroller = OverScroller::with_clock(&ScrollerConfig::default(), clock);
        scroller.fling_with_over(0, 4000, 0, 500, 50);

        let frames = record_frames(&mut scroller, 16, 1000, |_, _| {});
        let last = frames.last().unwrap();
        assert!(last.finished);
        assert_eq!(last.position, 500);
        assert!(frames.windows(2).all(|w| w[1].time_ms - w[0].time_ms == 16));
        assert!(frames.iter().any(|f| f.phase == Phase::Ballistic));
        assert!(frames.iter().any(|f| f.phase == Phase::Cubic));
    }

    #[test]
    fn test_frame_limit() {
        let clock = ManualClock::new(0);
        let mut scroller = OverScroller::with_clock(&ScrollerConfig::default(), clock);
        scroller.fling(0, 8000, 0, 1_000_000);
        let frames = record_frames(&mut scroller, 16, 3, |_, _| {});
        assert_eq!(frames.len(), 3);
        assert!(!frames[2].finished);
    }

    #[test]
    fn test_callback_can_report_edge() {
        let clock = ManualClock::new(0);
        let mut scroller = OverScroller::with_clock(&ScrollerConfig::default(), clock);
        scroller.fling(0, 6000, 0, 1_000_000);

        let edge = 300;
        let frames = record_frames(&mut scroller, 16, 1000, |scroller, frame| {
            if frame.phase == Phase::Spline && frame.position >= edge {
                scroller.notify_edge_reached(frame.position, edge, 40);
            }
        });
        assert!(frames.iter().any(|f| f.phase == Phase::Ballistic));
        assert_eq!(frames.last().unwrap().position, edge);
    }

    #[test]
    fn test_json_line() {
        let frame = Frame {
            time_ms: 16,
            position: 42,
            velocity: -1.5,
            phase: Phase::Cubic,
            finished: false,
        };
        assert_eq!(
            frame.to_json_line().unwrap(),
            r#"{"time_ms":16,"position":42,"velocity":-1.5,"phase":"cubic","finished":false}"#
        );
    }
}
