//! Head zone control: turns a stream of head rotations into gaze zones and
//! debounced gesture actions.
//!
//! The processing chain for each frame:
//! 1. Orientation extraction from the rotation transform's forward vector
//! 2. Exponential smoothing of yaw and pitch
//! 3. Symmetric clamp and nine-zone classification
//! 4. Debouncing of the trigger zone into discrete action events
//!
//! [`tracking::TrackingLoop`] drives that chain one frame at a time, owning the
//! perception collaborator and publishing each result to subscribers.
//!
//! # Examples
//!
//! ## Single pipeline
//!
//! ```
//! use head_zone_control::{
//!     config::TrackingConfig, orientation::RotationTransform, pipeline::ZonePipeline, zones::Zone,
//! };
//!
//! # fn main() -> head_zone_control::Result<()> {
//! let mut pipeline = ZonePipeline::new(&TrackingConfig::default())?;
//!
//! // Looking down and to the left
//! let transform = RotationTransform::from_yaw_pitch(-30.0, 30.0);
//! let result = pipeline.process(&transform, 0)?;
//!
//! assert_eq!(result.zone, Zone::BottomLeft);
//! assert!(result.action.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## Tracking loop
//!
//! ```no_run
//! use head_zone_control::{
//!     config::TrackingConfig,
//!     replay::{RecordedPerception, TraceFrame},
//!     tracking::TrackingLoop,
//! };
//!
//! # async fn run() -> head_zone_control::Result<()> {
//! let mut tracker = TrackingLoop::new(&TrackingConfig::default())?;
//! tracker.subscribe(|state| println!("{} ({:.1}, {:.1})", state.zone, state.yaw_deg, state.pitch_deg));
//! tracker.on_action(|| println!("action"));
//!
//! tracker.start(async { Ok(RecordedPerception::new()) }).await?;
//! let outcome = tracker.tick(&TraceFrame::looking(0, -30.0, 30.0));
//! assert!(outcome.action().is_some());
//!
//! tracker.stop();
//! # Ok(())
//! # }
//! ```

/// Rotation transforms and yaw/pitch extraction
pub mod orientation;

/// Signal filtering for smoothing pose estimates
pub mod filters;

/// Nine-zone gaze classification
pub mod zones;

/// Zone debouncing into action events
pub mod gesture;

/// Per-session processing chain
pub mod pipeline;

/// Frame-paced tracking loop
pub mod tracking;

/// Recorded traces standing in for camera and perception model
pub mod replay;

/// Error types and result handling
pub mod error;

/// Constants used throughout the library
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
