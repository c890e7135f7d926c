//! Hard-iron and soft-iron calibration.
//!
//! Raw counts are first corrected for a constant per-axis bias (hard iron),
//! then passed through a 3x3 linear map correcting scaling and skew (soft iron):
//!
//! ```text
//! f = raw - offset
//! c = M * f
//! ```
//!
//! The parameters are usually computed offline (ellipsoid fit) and hardcoded
//! in the application.

use crate::magnetometer::{Mag, MagF32};

const IDENTITY: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Calibration parameters.
/// The default (zero offsets, identity matrix) leaves readings untouched.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationParameters {
    /// Hard-iron offsets, in counts
    pub offsets: [f32; 3],
    /// Soft-iron matrix, row-major
    pub matrix: [[f32; 3]; 3],
}

impl Default for CalibrationParameters {
    fn default() -> Self {
        Self::new()
    }
}

impl CalibrationParameters {
    pub const fn new() -> Self {
        Self {
            offsets: [0.0; 3],
            matrix: IDENTITY,
        }
    }

    /// Change hard-iron offsets
    /// (consumes and returns `Self` to be callable in a "builder-like" pattern)
    pub const fn with_offsets(self, x: f32, y: f32, z: f32) -> Self {
        Self {
            offsets: [x, y, z],
            ..self
        }
    }

    /// Change the soft-iron matrix, given row by row
    /// (consumes and returns `Self` to be callable in a "builder-like" pattern)
    pub const fn with_matrix(self, matrix: [[f32; 3]; 3]) -> Self {
        Self { matrix, ..self }
    }

    /// Change the soft-iron matrix from nine row-major entries
    pub const fn with_matrix_entries(self, m: [f32; 9]) -> Self {
        self.with_matrix([[m[0], m[1], m[2]], [m[3], m[4], m[5]], [m[6], m[7], m[8]]])
    }

    /// Apply offset subtraction and the soft-iron map to a raw sample
    pub fn apply(&self, raw: &Mag) -> MagF32 {
        let raw = raw.to_f32();
        let f = [
            raw.x - self.offsets[0],
            raw.y - self.offsets[1],
            raw.z - self.offsets[2],
        ];
        let row = |r: &[f32; 3]| r[0] * f[0] + r[1] * f[1] + r[2] * f[2];
        MagF32::new(row(&self.matrix[0]), row(&self.matrix[1]), row(&self.matrix[2]))
    }
}
