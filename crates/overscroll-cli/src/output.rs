use anyhow::Result;

use overscroll_core::scroll::Frame;

/// Prints frames as a text table or as JSON lines
pub struct FramePrinter {
    json: bool,
    header_done: bool,
}

impl FramePrinter {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            header_done: false,
        }
    }

    pub fn print(&mut self, frame: &Frame) -> Result<()> {
        if self.json {
            println!("{}", frame.to_json_line()?);
            return Ok(());
        }
        if !self.header_done {
            println!("{:>8} {:>8} {:>12}  {:<10} {}", "time_ms", "pos", "velocity", "phase", "done");
            self.header_done = true;
        }
        println!("{}", format_row(frame));
        Ok(())
    }
}

fn format_row(frame: &Frame) -> String {
    format!(
        "{:>8} {:>8} {:>12.1}  {:<10} {}",
        frame.time_ms,
        frame.position,
        frame.velocity,
        format!("{:?}", frame.phase).to_lowercase(),
        if frame.finished { "yes" } else { "" }
    )
}

/// Closing line for text output
pub fn print_summary(json: bool, last: Option<&Frame>) {
    if json {
        return;
    }
    match last {
        Some(frame) => println!(
            "\nSettled at {} after {} ms",
            frame.position, frame.time_ms
        ),
        None => println!("Nothing to animate."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overscroll_core::Phase;

    #[test]
    fn test_format_row() {
        let frame = Frame {
            time_ms: 32,
            position: -12,
            velocity: 250.04,
            phase: Phase::Ballistic,
            finished: false,
        };
        let row = format_row(&frame);
        assert!(row.contains("-12"));
        assert!(row.contains("250.0"));
        assert!(row.contains("ballistic"));
        assert!(!row.contains("yes"));
    }
}
