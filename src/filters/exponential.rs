use super::PoseFilter;
use crate::{
    constants::{ALPHA_MAX, ALPHA_MIN},
    orientation::AngularPose,
    Error, Result,
};

/// Running averages of an [`ExponentialSmoother`], unclamped
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SmootherState {
    pub ema_yaw: f64,
    pub ema_pitch: f64,
}

/// Single-pole exponential moving average applied to yaw and pitch.
///
/// Unlike a seeded filter the state starts at zero, so the first sample is
/// only blended in by `alpha`. Higher alpha tracks faster, lower alpha is
/// smoother and lags more.
#[derive(Debug, Clone)]
pub struct ExponentialSmoother {
    alpha: f64,
    state: SmootherState,
}

impl ExponentialSmoother {
    /// Create a smoother with the given factor
    ///
    /// # Errors
    ///
    /// Returns an error if alpha is not in `(0, 1]`.
    pub fn new(alpha: f64) -> Result<Self> {
        if !(alpha > ALPHA_MIN && alpha <= ALPHA_MAX) {
            return Err(Error::ConfigError(format!("Alpha must be in (0, 1], got {alpha}")));
        }
        Ok(Self {
            alpha,
            state: SmootherState::default(),
        })
    }

    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Current running averages
    #[must_use]
    pub const fn state(&self) -> SmootherState {
        self.state
    }

    fn blend(&self, sample: f64, previous: f64) -> f64 {
        self.alpha * sample + (1.0 - self.alpha) * previous
    }
}

impl PoseFilter for ExponentialSmoother {
    fn apply(&mut self, pose: AngularPose) -> AngularPose {
        // both axes are committed together
        self.state = SmootherState {
            ema_yaw: self.blend(pose.yaw, self.state.ema_yaw),
            ema_pitch: self.blend(pose.pitch, self.state.ema_pitch),
        };

        AngularPose::new(self.state.ema_yaw, self.state.ema_pitch)
    }

    fn reset(&mut self) {
        self.state = SmootherState::default();
    }

    fn name(&self) -> &str {
        "ExponentialSmoother"
    }
}
