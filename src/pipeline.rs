//! Per-session processing chain from rotation transform to action event.

use crate::{
    config::TrackingConfig,
    filters::{ExponentialSmoother, PoseFilter, SmootherState},
    gesture::{ActionEvent, DebouncerState, GestureDebouncer},
    orientation::{AngularPose, RotationTransform},
    zones::{Zone, ZoneClassifier},
    Result,
};

/// Result of one processed frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameResult {
    /// Smoothed pose after clamping
    pub pose: AngularPose,
    pub zone: Zone,
    pub action: Option<ActionEvent>,
}

/// Extractor, smoother, classifier and debouncer for a single session.
///
/// Owns the smoother and debouncer state exclusively; a new session needs a
/// new pipeline.
#[derive(Debug, Clone)]
pub struct ZonePipeline {
    smoother: ExponentialSmoother,
    classifier: ZoneClassifier,
    debouncer: GestureDebouncer,
    clamp_deg: f64,
}

impl ZonePipeline {
    /// Build a pipeline from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is out of range.
    pub fn new(config: &TrackingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            smoother: ExponentialSmoother::new(config.alpha)?,
            classifier: ZoneClassifier::new(
                config.center_yaw_deg,
                config.center_pitch_deg,
                config.deadband_deg,
            )?,
            debouncer: GestureDebouncer::new(config.trigger_zone, config.debounce_millis, config.debounce_mode)?,
            clamp_deg: config.clamp_deg,
        })
    }

    /// Run one detected transform through every stage.
    ///
    /// State is only touched after extraction succeeded, so a rejected
    /// transform leaves both smoother and debouncer exactly as they were.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform is not finite.
    pub fn process(&mut self, transform: &RotationTransform, now_ms: i64) -> Result<FrameResult> {
        let raw = transform.to_angular_pose()?;

        let pose = self.smoother.apply(raw).clamped(self.clamp_deg);
        let zone = self.classifier.classify(pose.yaw, pose.pitch);
        let action = self.debouncer.update(zone, now_ms);

        Ok(FrameResult { pose, zone, action })
    }

    #[must_use]
    pub const fn smoother_state(&self) -> SmootherState {
        self.smoother.state()
    }

    #[must_use]
    pub const fn debouncer_state(&self) -> DebouncerState {
        self.debouncer.state()
    }

    #[must_use]
    pub const fn classifier(&self) -> &ZoneClassifier {
        &self.classifier
    }

    /// Return smoother and debouncer to their session-start state
    pub fn reset(&mut self) {
        self.smoother.reset();
        self.debouncer.reset();
    }
}
