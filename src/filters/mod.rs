//! Signal filtering for smoothing head orientation estimates.
//!
//! Raw yaw/pitch from the perception model jitter frame to frame; a filter
//! runs between orientation extraction and zone classification so that the
//! zone signal does not flicker.

/// Exponential moving average smoother
pub mod exponential;

use crate::orientation::AngularPose;

/// Trait for stateful pose filters
pub trait PoseFilter: Send + Sync {
    /// Blend a new raw pose into the filter state and return the filtered pose
    fn apply(&mut self, pose: AngularPose) -> AngularPose;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

pub use exponential::{ExponentialSmoother, SmootherState};
