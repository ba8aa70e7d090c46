//! Configuration management for zone tracking and the replay driver

use crate::{
    constants::{
        ALPHA_MAX, ALPHA_MIN, DEFAULT_ALPHA, DEFAULT_CENTER_PITCH_DEG, DEFAULT_CENTER_YAW_DEG, DEFAULT_CLAMP_DEG,
        DEFAULT_DEADBAND_DEG, DEFAULT_DEBOUNCE_MILLIS, DEFAULT_FRAME_INTERVAL_MS,
    },
    gesture::DebounceMode,
    zones::Zone,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Smoothing, classification and debounce options
    pub tracking: TrackingConfig,

    /// Trace replay options
    pub replay: ReplayConfig,
}

/// Options of the orientation to zone to gesture pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Exponential smoothing factor in (0, 1]
    pub alpha: f64,

    /// Minimum angle for a non-center zone, degrees
    #[serde(alias = "deadbandDeg")]
    pub deadband_deg: f64,

    /// Half-width of the center band on yaw, degrees
    #[serde(alias = "centerYawDeg")]
    pub center_yaw_deg: f64,

    /// Half-width of the center band on pitch, degrees
    #[serde(alias = "centerPitchDeg")]
    pub center_pitch_deg: f64,

    /// Symmetric clamp applied to smoothed angles, degrees
    #[serde(alias = "clampDeg")]
    pub clamp_deg: f64,

    /// Zone that fires the action
    #[serde(alias = "triggerZone")]
    pub trigger_zone: Zone,

    /// Minimum interval between two actions, milliseconds
    #[serde(alias = "debounceMillis")]
    pub debounce_millis: i64,

    /// Level-triggered (default) or rising-edge debouncing
    #[serde(alias = "debounceMode")]
    pub debounce_mode: DebounceMode,
}

/// Replay driver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Pace ticks by the trace timestamps instead of running flat out
    pub realtime: bool,

    /// Timestamp spacing for trace frames without an explicit timestamp
    pub frame_interval_ms: i64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            deadband_deg: DEFAULT_DEADBAND_DEG,
            center_yaw_deg: DEFAULT_CENTER_YAW_DEG,
            center_pitch_deg: DEFAULT_CENTER_PITCH_DEG,
            clamp_deg: DEFAULT_CLAMP_DEG,
            trigger_zone: Zone::BottomLeft,
            debounce_millis: DEFAULT_DEBOUNCE_MILLIS,
            debounce_mode: DebounceMode::Level,
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            realtime: false,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
        }
    }
}

impl TrackingConfig {
    /// Validate option ranges
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` naming the first out-of-range option.
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > ALPHA_MIN && self.alpha <= ALPHA_MAX) {
            return Err(Error::ConfigError(format!(
                "alpha must be in (0, 1], got {}",
                self.alpha
            )));
        }

        for (name, value) in [
            ("deadband_deg", self.deadband_deg),
            ("center_yaw_deg", self.center_yaw_deg),
            ("center_pitch_deg", self.center_pitch_deg),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::ConfigError(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if !self.clamp_deg.is_finite() || self.clamp_deg <= 0.0 {
            return Err(Error::ConfigError(format!(
                "clamp_deg must be positive, got {}",
                self.clamp_deg
            )));
        }

        if self.debounce_millis < 0 {
            return Err(Error::ConfigError(format!(
                "debounce_millis must be non-negative, got {}",
                self.debounce_millis
            )));
        }

        Ok(())
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any option is out of range.
    pub fn validate(&self) -> Result<()> {
        self.tracking.validate()?;

        if self.replay.frame_interval_ms <= 0 {
            return Err(Error::ConfigError(
                "Replay frame interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Head Zone Control Configuration

# Orientation to zone to gesture pipeline
tracking:
  alpha: 0.5
  deadband_deg: 8.0
  center_yaw_deg: 5.0
  center_pitch_deg: 14.0
  clamp_deg: 45.0
  trigger_zone: BOTTOM_LEFT
  debounce_millis: 1500
  debounce_mode: level

# Trace replay
replay:
  realtime: false
  frame_interval_ms: 33
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_matches_defaults() {
        let config = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_yaml("tracking:\n  alpha: 0.25\n").unwrap();
        assert_eq!(config.tracking.alpha, 0.25);
        assert_eq!(config.tracking.deadband_deg, DEFAULT_DEADBAND_DEG);
        assert_eq!(config.replay, ReplayConfig::default());
    }

    #[test]
    fn test_camel_case_aliases() {
        let yaml = "tracking:\n  deadbandDeg: 10\n  triggerZone: TOP_RIGHT\n  debounceMillis: 800\n  debounceMode: rising_edge\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.tracking.deadband_deg, 10.0);
        assert_eq!(config.tracking.trigger_zone, Zone::TopRight);
        assert_eq!(config.tracking.debounce_millis, 800);
        assert_eq!(config.tracking.debounce_mode, DebounceMode::RisingEdge);
    }

    #[test]
    fn test_hyphenated_trigger_zone() {
        let config = Config::from_yaml("tracking:\n  trigger_zone: down-left\n").unwrap();
        assert_eq!(config.tracking.trigger_zone, Zone::BottomLeft);
        assert!(Config::from_yaml("tracking:\n  trigger_zone: NOWHERE\n").is_err());
    }

    #[test]
    fn test_validation() {
        let cases: [fn(&mut TrackingConfig); 8] = [
            |c: &mut TrackingConfig| c.alpha = 0.0,
            |c: &mut TrackingConfig| c.alpha = 1.5,
            |c: &mut TrackingConfig| c.alpha = f64::NAN,
            |c: &mut TrackingConfig| c.deadband_deg = -1.0,
            |c: &mut TrackingConfig| c.center_yaw_deg = f64::INFINITY,
            |c: &mut TrackingConfig| c.center_pitch_deg = -0.1,
            |c: &mut TrackingConfig| c.clamp_deg = 0.0,
            |c: &mut TrackingConfig| c.debounce_millis = -1,
        ];

        for mutate in cases {
            let mut config = TrackingConfig::default();
            mutate(&mut config);
            assert!(
                matches!(config.validate(), Err(Error::ConfigError(_))),
                "accepted {config:?}"
            );
        }

        let mut config = Config::default();
        config.replay.frame_interval_ms = 0;
        assert!(config.validate().is_err());
    }
}
