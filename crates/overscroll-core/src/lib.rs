pub mod config;
pub mod error;
pub mod scroll;

pub use config::{AppConfig, EasingType, ScrollerConfig, SimulationConfig, SpringConfig};
pub use error::{Error, Result};
pub use scroll::{AnimationClock, ManualClock, OverScroller, Phase, SystemClock};
