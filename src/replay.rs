//! Recorded pose traces.
//!
//! A trace stands in for the camera and the perception model: each entry
//! records frame dimensions and what the model reported for that frame.
//!
//! ```yaml
//! frame_interval_ms: 33
//! frames:
//!   - { width: 0, height: 0, repeat: 3 }      # stream still loading
//!   - pose: { yaw: 0.0, pitch: 0.0 }
//!   - pose: { yaw: -25.0, pitch: 20.0 }
//!     repeat: 60
//!   - {}                                      # no face
//!   - matrix: [1, 0, 0, 0, 1, 0, 0, 0, 1]     # row-major 3x3
//!   - fault: "model timeout"
//!   - t: 5000
//!     matrix4: [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1]  # column-major 4x4
//! ```

use crate::{
    constants::DEFAULT_FRAME_INTERVAL_MS,
    orientation::{AngularPose, RotationTransform},
    tracking::{FrameSource, PerceptionModel, VideoFrame},
    Error, Result,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;

const DEFAULT_WIDTH: u32 = 640;
const DEFAULT_HEIGHT: u32 = 480;

/// What the perception model reported for a frame
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    NoFace,
    Transform(RotationTransform),
    /// The detection call failed with this message
    Fault(String),
}

/// One frame of a trace
#[derive(Debug, Clone, PartialEq)]
pub struct TraceFrame {
    pub timestamp_ms: i64,
    pub width: u32,
    pub height: u32,
    pub detection: Detection,
}

impl TraceFrame {
    #[must_use]
    pub const fn new(timestamp_ms: i64, width: u32, height: u32, detection: Detection) -> Self {
        Self {
            timestamp_ms,
            width,
            height,
            detection,
        }
    }

    /// Full-size frame whose face looks in the given direction
    #[must_use]
    pub fn looking(timestamp_ms: i64, yaw_deg: f64, pitch_deg: f64) -> Self {
        Self::new(
            timestamp_ms,
            DEFAULT_WIDTH,
            DEFAULT_HEIGHT,
            Detection::Transform(RotationTransform::from_yaw_pitch(yaw_deg, pitch_deg)),
        )
    }

    /// Full-size frame without a face
    #[must_use]
    pub const fn no_face(timestamp_ms: i64) -> Self {
        Self::new(timestamp_ms, DEFAULT_WIDTH, DEFAULT_HEIGHT, Detection::NoFace)
    }

    /// Zero-area frame from a stream that has not loaded yet
    #[must_use]
    pub const fn loading(timestamp_ms: i64) -> Self {
        Self::new(timestamp_ms, 0, 0, Detection::NoFace)
    }
}

impl VideoFrame for TraceFrame {
    fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

/// Serialized form of a trace entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraceEntry {
    /// Timestamp; defaults to the previous frame plus the frame interval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pose: Option<AngularPose>,
    /// Row-major 3x3 rotation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix: Option<[f64; 9]>,
    /// Column-major 4x4 affine transform
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix4: Option<[f64; 16]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<String>,
    /// Emit this entry this many times
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<u32>,
}

impl TraceEntry {
    fn detection(&self) -> Result<Detection> {
        let given = [
            self.pose.is_some(),
            self.matrix.is_some(),
            self.matrix4.is_some(),
            self.fault.is_some(),
        ]
        .iter()
        .filter(|given| **given)
        .count();
        if given > 1 {
            return Err(Error::InvalidInput(
                "Trace entry must set at most one of pose, matrix, matrix4, fault".to_string(),
            ));
        }

        let detection = if let Some(pose) = self.pose {
            Detection::Transform(RotationTransform::from_yaw_pitch(pose.yaw, pose.pitch))
        } else if let Some(values) = self.matrix {
            Detection::Transform(RotationTransform::from_row_major(values))
        } else if let Some(values) = self.matrix4 {
            Detection::Transform(RotationTransform::from_column_major_4x4(values))
        } else if let Some(message) = &self.fault {
            Detection::Fault(message.clone())
        } else {
            Detection::NoFace
        };
        Ok(detection)
    }
}

/// A recorded session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseTrace {
    /// Overrides the configured frame interval for entries without `t`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_interval_ms: Option<i64>,
    pub frames: Vec<TraceEntry>,
}

impl PoseTrace {
    /// Load a trace from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading pose trace from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a trace from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid trace.
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Expand repeats and fill in timestamps.
    ///
    /// # Errors
    ///
    /// Returns an error for entries with conflicting detections, a
    /// non-positive interval, or timestamps that go backwards.
    pub fn expand(&self, default_interval_ms: i64) -> Result<Vec<TraceFrame>> {
        let interval = self.frame_interval_ms.unwrap_or(default_interval_ms);
        if interval <= 0 {
            return Err(Error::InvalidInput(format!(
                "Frame interval must be greater than 0, got {interval}"
            )));
        }

        let mut frames = Vec::new();
        let mut previous: Option<i64> = None;

        for (index, entry) in self.frames.iter().enumerate() {
            let detection = entry.detection()?;
            let width = entry.width.unwrap_or(DEFAULT_WIDTH);
            let height = entry.height.unwrap_or(DEFAULT_HEIGHT);

            for repetition in 0..entry.repeat.unwrap_or(1) {
                let timestamp = match (entry.t, previous) {
                    (Some(t), _) if repetition == 0 => t,
                    (_, Some(prev)) => prev + interval,
                    (_, None) => 0,
                };
                if let Some(prev) = previous {
                    if timestamp < prev {
                        return Err(Error::InvalidInput(format!(
                            "Trace entry {index} goes back in time: {timestamp} ms after {prev} ms"
                        )));
                    }
                }

                frames.push(TraceFrame::new(timestamp, width, height, detection.clone()));
                previous = Some(timestamp);
            }
        }

        debug!("Expanded {} trace entries into {} frames", self.frames.len(), frames.len());
        Ok(frames)
    }
}

/// Frame source replaying an expanded trace
#[derive(Debug, Clone, Default)]
pub struct TraceSource {
    frames: VecDeque<TraceFrame>,
}

impl TraceSource {
    #[must_use]
    pub fn new(frames: Vec<TraceFrame>) -> Self {
        Self { frames: frames.into() }
    }

    /// # Errors
    ///
    /// Returns an error if the trace cannot be expanded.
    pub fn from_trace(trace: &PoseTrace) -> Result<Self> {
        Ok(Self::new(trace.expand(DEFAULT_FRAME_INTERVAL_MS)?))
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for TraceSource {
    type Frame = TraceFrame;

    fn next_frame(&mut self) -> Option<TraceFrame> {
        self.frames.pop_front()
    }
}

/// Perception model answering with what the trace recorded
#[derive(Debug, Default)]
pub struct RecordedPerception {
    detections: u64,
}

impl RecordedPerception {
    #[must_use]
    pub const fn new() -> Self {
        Self { detections: 0 }
    }

    /// Detection calls served so far
    #[must_use]
    pub const fn detections(&self) -> u64 {
        self.detections
    }
}

impl PerceptionModel for RecordedPerception {
    type Frame = TraceFrame;

    fn detect(&mut self, frame: &TraceFrame) -> Result<Option<RotationTransform>> {
        self.detections += 1;
        match &frame.detection {
            Detection::NoFace => Ok(None),
            Detection::Transform(transform) => Ok(Some(*transform)),
            Detection::Fault(message) => Err(Error::TransientFrame(message.clone())),
        }
    }

    fn close(&mut self) {
        debug!("Recorded perception closed after {} detections", self.detections);
    }
}
