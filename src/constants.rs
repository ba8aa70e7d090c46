//! Constants used throughout the library

/// Default exponential smoothing factor
pub const DEFAULT_ALPHA: f64 = 0.5;

/// Exponential smoothing factor bounds, lower bound exclusive
pub const ALPHA_MIN: f64 = 0.0;
pub const ALPHA_MAX: f64 = 1.0;

/// Zone classification thresholds in degrees
pub const DEFAULT_DEADBAND_DEG: f64 = 8.0;
pub const DEFAULT_CENTER_YAW_DEG: f64 = 5.0;
pub const DEFAULT_CENTER_PITCH_DEG: f64 = 14.0;

/// Symmetric clamp applied to smoothed angles before classification
pub const DEFAULT_CLAMP_DEG: f64 = 45.0;

/// Minimum interval between two action events
pub const DEFAULT_DEBOUNCE_MILLIS: i64 = 1500;

/// Frame period used by the replay driver when a trace omits timestamps
pub const DEFAULT_FRAME_INTERVAL_MS: i64 = 33;
