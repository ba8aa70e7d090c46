//! Zone classification for smoothed head orientation.
//!
//! Nine discrete zones cover the orientation space. Angles follow the
//! [`AngularPose`](crate::orientation::AngularPose) convention: positive yaw
//! is the viewer's right, positive pitch is looking down. So a head turned
//! left and tilted down lands in [`Zone::BottomLeft`].

use crate::{
    constants::{DEFAULT_CENTER_PITCH_DEG, DEFAULT_CENTER_YAW_DEG, DEFAULT_DEADBAND_DEG},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discrete head orientation zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum Zone {
    #[default]
    Center,
    Up,
    Down,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Zone {
    /// All zones in declaration order
    pub const ALL: [Self; 9] = [
        Self::Center,
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Canonical upper-case name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Center => "CENTER",
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::TopLeft => "TOP_LEFT",
            Self::TopRight => "TOP_RIGHT",
            Self::BottomLeft => "BOTTOM_LEFT",
            Self::BottomRight => "BOTTOM_RIGHT",
        }
    }

    /// Whether this is one of the four corner zones
    #[must_use]
    pub const fn is_diagonal(&self) -> bool {
        matches!(
            self,
            Self::TopLeft | Self::TopRight | Self::BottomLeft | Self::BottomRight
        )
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = Error;

    /// Parse a zone name. Case-insensitive; `-` and `_` are interchangeable and
    /// the `UP-`/`DOWN-` corner names are accepted for the top/bottom corners.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        let zone = match normalized.as_str() {
            "CENTER" => Self::Center,
            "UP" => Self::Up,
            "DOWN" => Self::Down,
            "LEFT" => Self::Left,
            "RIGHT" => Self::Right,
            "TOP_LEFT" | "UP_LEFT" => Self::TopLeft,
            "TOP_RIGHT" | "UP_RIGHT" => Self::TopRight,
            "BOTTOM_LEFT" | "DOWN_LEFT" => Self::BottomLeft,
            "BOTTOM_RIGHT" | "DOWN_RIGHT" => Self::BottomRight,
            _ => return Err(Error::InvalidInput(format!("Unknown zone: {s}"))),
        };
        Ok(zone)
    }
}

impl TryFrom<String> for Zone {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Threshold-based zone classifier.
///
/// The center band is wider on pitch than on yaw because vertical head noise
/// (nodding, talking) is larger than horizontal noise. Between the center
/// band and the deadband no rule matches and the result stays `Center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneClassifier {
    center_yaw: f64,
    center_pitch: f64,
    deadband: f64,
}

impl Default for ZoneClassifier {
    fn default() -> Self {
        Self {
            center_yaw: DEFAULT_CENTER_YAW_DEG,
            center_pitch: DEFAULT_CENTER_PITCH_DEG,
            deadband: DEFAULT_DEADBAND_DEG,
        }
    }
}

impl ZoneClassifier {
    /// Create a classifier with explicit thresholds in degrees
    ///
    /// # Errors
    ///
    /// Returns an error if any threshold is negative or not finite.
    pub fn new(center_yaw: f64, center_pitch: f64, deadband: f64) -> Result<Self> {
        for (name, value) in [
            ("center_yaw_deg", center_yaw),
            ("center_pitch_deg", center_pitch),
            ("deadband_deg", deadband),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::ConfigError(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(Self {
            center_yaw,
            center_pitch,
            deadband,
        })
    }

    /// Classify a smoothed, clamped pose. Rules are evaluated in order and the
    /// first match wins; corners are checked before single axes.
    #[must_use]
    pub fn classify(&self, yaw: f64, pitch: f64) -> Zone {
        let dead = self.deadband;

        if yaw.abs() <= self.center_yaw && pitch.abs() <= self.center_pitch {
            Zone::Center
        } else if yaw <= -dead && pitch >= dead {
            Zone::BottomLeft
        } else if yaw >= dead && pitch >= dead {
            Zone::BottomRight
        } else if yaw <= -dead && pitch <= -dead {
            Zone::TopLeft
        } else if yaw >= dead && pitch <= -dead {
            Zone::TopRight
        } else if yaw > dead {
            Zone::Right
        } else if yaw < -dead {
            Zone::Left
        } else if pitch > dead {
            Zone::Down
        } else if pitch < -dead {
            Zone::Up
        } else {
            Zone::Center
        }
    }
}
