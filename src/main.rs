//! Replays a recorded head pose trace through the tracking loop and prints
//! the published zones and fired actions.

use anyhow::{Context, Result};
use clap::Parser;
use head_zone_control::{
    config::{Config, EXAMPLE_CONFIG},
    gesture::DebounceMode,
    replay::{PoseTrace, RecordedPerception, TraceSource},
    tracking::{FrameSource, TickOutcome, TrackingLoop},
    zones::Zone,
};
use log::{info, warn};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Pose trace to replay (YAML format)
    #[arg(required_unless_present = "print_example_config")]
    trace: Option<String>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Zone that fires the action (e.g. BOTTOM_LEFT, up-right)
    #[arg(short, long)]
    trigger_zone: Option<Zone>,

    /// Exponential smoothing factor in (0, 1]
    #[arg(short, long)]
    alpha: Option<f64>,

    /// Minimum interval between two actions in milliseconds
    #[arg(long)]
    debounce_millis: Option<i64>,

    /// Only fire when the trigger zone is entered
    #[arg(long)]
    rising_edge: bool,

    /// Pace frames by their timestamps
    #[arg(short, long)]
    realtime: bool,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_example_config: bool,
}

impl Args {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(zone) = self.trigger_zone {
            config.tracking.trigger_zone = zone;
        }
        if let Some(alpha) = self.alpha {
            config.tracking.alpha = alpha;
        }
        if let Some(millis) = self.debounce_millis {
            config.tracking.debounce_millis = millis;
        }
        if self.rising_edge {
            config.tracking.debounce_mode = DebounceMode::RisingEdge;
        }
        if self.realtime {
            config.replay.realtime = true;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_example_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };
    args.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;

    let trace_path = args.trace.as_deref().context("No trace given")?;
    let trace = PoseTrace::from_file(trace_path).with_context(|| format!("Failed to load trace {trace_path}"))?;
    let mut source = TraceSource::new(trace.expand(config.replay.frame_interval_ms)?);
    info!("Replaying {} frames from {}", source.remaining(), trace_path);

    let mut tracker = TrackingLoop::new(&config.tracking)?;
    tracker.on_action(|| println!("ACTION"));
    tracker.start(async { Ok(RecordedPerception::new()) }).await?;

    let mut previous_ms: Option<i64> = None;
    while let Some(frame) = source.next_frame() {
        if config.replay.realtime {
            if let Some(previous) = previous_ms {
                let delay = u64::try_from(frame.timestamp_ms - previous).unwrap_or(0);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            previous_ms = Some(frame.timestamp_ms);
        }

        match tracker.tick(&frame) {
            TickOutcome::Published { state, action } => {
                println!(
                    "{:>7} ms  {:<12} yaw {:>6.1}  pitch {:>6.1}{}",
                    frame.timestamp_ms,
                    state.zone,
                    state.yaw_deg,
                    state.pitch_deg,
                    if action.is_some() { "  *" } else { "" }
                );
            }
            TickOutcome::Missed(state) => {
                println!("{:>7} ms  {:<12} (no detection)", frame.timestamp_ms, state.zone);
            }
            TickOutcome::WarmingUp => {
                println!("{:>7} ms  warming up", frame.timestamp_ms);
            }
            TickOutcome::Inactive => break,
        }
    }

    tracker.stop();
    let stats = tracker.stats();
    info!("Replay finished: {stats}");

    Ok(())
}
