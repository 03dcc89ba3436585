use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use overscroll_core::AppConfig;

mod commands;
mod driver;
mod output;

use driver::DriveOptions;

#[derive(Parser)]
#[command(name = "overscroll")]
#[command(author, version, about = "Simulate fling, overscroll and spring-back motion")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ~/.config/overscroll/config.toml)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Print one JSON object per frame
    #[arg(long, global = true)]
    json: bool,

    /// Frame interval in milliseconds (overrides the configuration)
    #[arg(long, global = true)]
    frame_ms: Option<u64>,

    /// Drive the scroller from the system clock instead of simulated time
    #[arg(long, global = true)]
    realtime: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fling from a position with an initial velocity
    Fling {
        #[arg(short, long, allow_hyphen_values = true)]
        start: i32,
        /// Initial velocity in px/s
        #[arg(short, long, allow_hyphen_values = true)]
        velocity: i32,
        #[arg(long, allow_hyphen_values = true)]
        min: i32,
        #[arg(long, allow_hyphen_values = true)]
        max: i32,
        /// Allowed overscroll past min/max
        #[arg(short, long, default_value_t = 0)]
        over: i32,
        /// Report an edge at this position while flinging
        #[arg(long, allow_hyphen_values = true)]
        edge_at: Option<i32>,
    },
    /// Return from an out-of-range position to the nearest bound
    SpringBack {
        #[arg(short, long, allow_hyphen_values = true)]
        start: i32,
        #[arg(long, allow_hyphen_values = true)]
        min: i32,
        #[arg(long, allow_hyphen_values = true)]
        max: i32,
    },
    /// Time-boxed scroll by a distance
    Scroll {
        #[arg(short, long, allow_hyphen_values = true)]
        start: i32,
        #[arg(short, long, allow_hyphen_values = true)]
        delta: i32,
        /// Duration in milliseconds (defaults to the configured duration)
        #[arg(long)]
        duration: Option<i32>,
        /// Use a spring leaving with this velocity (px/s) instead of easing
        #[arg(long, allow_hyphen_values = true)]
        spring_velocity: Option<f32>,
    },
    /// Print the sampled deceleration curve
    Curve,
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let options = DriveOptions {
        json: cli.json,
        frame_ms: cli.frame_ms.unwrap_or(config.simulation.frame_interval_ms),
        max_frames: config.simulation.max_frames,
        realtime: cli.realtime,
    };

    match cli.command {
        Commands::Fling {
            start,
            velocity,
            min,
            max,
            over,
            edge_at,
        } => {
            commands::fling::run(&config, &options, start, velocity, min, max, over, edge_at).await
        }
        Commands::SpringBack { start, min, max } => {
            commands::spring_back::run(&config, &options, start, min, max).await
        }
        Commands::Scroll {
            start,
            delta,
            duration,
            spring_velocity,
        } => commands::scroll::run(&config, &options, start, delta, duration, spring_velocity).await,
        Commands::Curve => commands::curve::run(cli.json),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Init { force } => commands::config::init(force),
            ConfigAction::Path => commands::config::path(),
        },
    }
}
