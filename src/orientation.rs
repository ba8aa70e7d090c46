use crate::{Error, Result};
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// Head orientation in degrees.
///
/// Positive yaw means the viewer looks to their right (after mirror
/// correction), positive pitch means looking down.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AngularPose {
    /// Rotation about the vertical axis
    pub yaw: f64,
    /// Rotation about the horizontal axis
    pub pitch: f64,
}

impl AngularPose {
    #[must_use]
    pub const fn new(yaw: f64, pitch: f64) -> Self {
        Self { yaw, pitch }
    }

    /// Clamp both axes independently to `[-limit, limit]`
    #[must_use]
    pub fn clamped(self, limit: f64) -> Self {
        Self {
            yaw: self.yaw.clamp(-limit, limit),
            pitch: self.pitch.clamp(-limit, limit),
        }
    }
}

/// 3x3 rotation matrix, indexed `r[row][col]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationTransform {
    matrix: Matrix3<f64>,
}

impl RotationTransform {
    /// Zero rotation
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// Build from nine row-major entries
    #[must_use]
    pub fn from_row_major(values: [f64; 9]) -> Self {
        Self {
            matrix: Matrix3::from_row_slice(&values),
        }
    }

    /// Take the leading 3x3 block of a row-major 4x4 affine transform
    #[must_use]
    pub fn from_row_major_4x4(values: [f64; 16]) -> Self {
        Self {
            matrix: Matrix3::from_fn(|row, col| values[row * 4 + col]),
        }
    }

    /// Take the leading 3x3 block of a column-major 4x4 affine transform.
    ///
    /// This is the layout face landmarkers emit their facial transformation
    /// matrices in; element `values[8..11]` is the third column.
    #[must_use]
    pub fn from_column_major_4x4(values: [f64; 16]) -> Self {
        Self {
            matrix: Matrix3::from_fn(|row, col| values[col * 4 + row]),
        }
    }

    /// Rotation whose forward vector extracts back to the given angles
    #[must_use]
    pub fn from_yaw_pitch(yaw_deg: f64, pitch_deg: f64) -> Self {
        // R = Ry(-yaw) * Rx(pitch); third column is the forward vector
        let (sy, cy) = (-yaw_deg).to_radians().sin_cos();
        let (sp, cp) = pitch_deg.to_radians().sin_cos();
        Self::from_row_major([
            cy, sy * sp, sy * cp,
            0.0, cp, -sp,
            -sy, cy * sp, cy * cp,
        ])
    }

    /// Entry at `r[row][col]`
    #[must_use]
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.matrix[(row, col)]
    }

    /// Underlying matrix
    #[must_use]
    pub const fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Forward vector `(fx, fy, fz)`, the third column
    #[must_use]
    pub fn forward(&self) -> (f64, f64, f64) {
        (self.at(0, 2), self.at(1, 2), self.at(2, 2))
    }

    /// Extract raw yaw and pitch in degrees.
    ///
    /// The yaw sign is flipped because the camera feed is horizontally
    /// mirrored. No clamping or smoothing happens here. A forward vector with
    /// `fx = fz = 0` yields yaw 0 by the `atan2` convention.
    ///
    /// # Errors
    ///
    /// Returns an error if the forward vector contains non-finite entries.
    pub fn to_angular_pose(&self) -> Result<AngularPose> {
        let (fx, fy, fz) = self.forward();
        if !(fx.is_finite() && fy.is_finite() && fz.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "Non-finite forward vector ({fx}, {fy}, {fz})"
            )));
        }

        let yaw = -fx.atan2(fz);
        let pitch = (-fy).atan2(fx.hypot(fz));

        Ok(AngularPose {
            yaw: yaw.to_degrees(),
            pitch: pitch.to_degrees(),
        })
    }
}

impl Default for RotationTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Matrix3<f64>> for RotationTransform {
    fn from(matrix: Matrix3<f64>) -> Self {
        Self { matrix }
    }
}
