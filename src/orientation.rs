//! Mounting orientation correction
//!
//! Calibrated readings are expressed in the sensor frame. To report them in the
//! board frame two steps are applied:
//! 1. An axis map picks, for each output slot, one calibrated axis and optionally
//!    flips its sign (codes ±1 = X, ±2 = Y, ±3 = Z)
//! 2. A right-angle rotation about the mapped +Z axis
//!
//! The axis map is deliberately not validated: mapping two slots to the same axis
//! or using a code outside ±1..±3 (which yields 0) is allowed.

use crate::magnetometer::MagF32;

/// Signed axis permutation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisMap {
    codes: [i8; 3],
}

impl Default for AxisMap {
    /// +X, +Y, +Z
    fn default() -> Self {
        Self::new(1, 2, 3)
    }
}

impl AxisMap {
    pub const fn new(x: i8, y: i8, z: i8) -> Self {
        Self { codes: [x, y, z] }
    }

    pub fn codes(&self) -> [i8; 3] {
        self.codes
    }

    fn pick(c: &MagF32, code: i8) -> f32 {
        let value = match code.unsigned_abs() {
            a @ 1..=3 => c.component(a as usize - 1),
            _ => 0.0,
        };
        if code < 0 {
            -value
        } else {
            value
        }
    }

    pub fn apply(&self, c: MagF32) -> MagF32 {
        MagF32::new(
            Self::pick(&c, self.codes[0]),
            Self::pick(&c, self.codes[1]),
            Self::pick(&c, self.codes[2]),
        )
    }
}

/// Rotation about +Z applied after the axis map.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Any angle other than 90, 180 or 270 maps to [`Rotation::Deg0`].
    pub const fn from_degrees(degrees: i32) -> Self {
        match degrees {
            90 => Self::Deg90,
            180 => Self::Deg180,
            270 => Self::Deg270,
            _ => Self::Deg0,
        }
    }

    pub const fn degrees(self) -> i32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    pub fn apply(self, m: MagF32) -> MagF32 {
        match self {
            Self::Deg0 => m,
            Self::Deg90 => MagF32::new(m.y, -m.x, m.z),
            Self::Deg180 => MagF32::new(-m.x, -m.y, m.z),
            Self::Deg270 => MagF32::new(-m.y, m.x, m.z),
        }
    }
}

impl From<i32> for Rotation {
    fn from(degrees: i32) -> Self {
        Self::from_degrees(degrees)
    }
}

/// Axis map followed by rotation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Orientation {
    pub axis_map: AxisMap,
    pub rotation: Rotation,
}

impl Orientation {
    pub const fn new(axis_map: AxisMap, rotation: Rotation) -> Self {
        Self { axis_map, rotation }
    }

    pub fn apply(&self, c: MagF32) -> OrientedReading {
        self.rotation.apply(self.axis_map.apply(c)).into()
    }
}

/// Field vector in the reporting frame.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "postcard-experimental", derive(postcard::experimental::max_size::MaxSize))]
pub struct OrientedReading {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl OrientedReading {
    /// Scalar field strength, the Euclidean norm of the three components.
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }
}

impl From<MagF32> for OrientedReading {
    fn from(m: MagF32) -> Self {
        Self {
            x: m.x,
            y: m.y,
            z: m.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CalibrationParameters;
    use crate::magnetometer::Mag;

    fn reading(x: f32, y: f32, z: f32) -> OrientedReading {
        OrientedReading { x, y, z }
    }

    #[test]
    fn default_orientation_is_identity() {
        let c = MagF32::new(1.5, -2.5, 3.25);
        assert_eq!(Orientation::default().apply(c), reading(1.5, -2.5, 3.25));
    }

    #[test]
    fn axis_map_selects_and_flips() {
        let c = MagF32::new(1.0, 2.0, 3.0);
        assert_eq!(AxisMap::new(-3, 1, -2).apply(c), MagF32::new(-3.0, 1.0, -2.0));
    }

    #[test]
    fn axis_map_allows_duplicates_and_unknown_codes() {
        let c = MagF32::new(1.0, 2.0, 3.0);
        assert_eq!(AxisMap::new(1, -1, 0).apply(c), MagF32::new(1.0, -1.0, 0.0));
        assert_eq!(AxisMap::new(4, -7, i8::MIN).apply(c), MagF32::new(0.0, -0.0, -0.0));
    }

    #[test]
    fn rotations_about_z() {
        let m = MagF32::new(1.0, 2.0, 3.0);
        assert_eq!(Rotation::Deg0.apply(m), m);
        assert_eq!(Rotation::Deg90.apply(m), MagF32::new(2.0, -1.0, 3.0));
        assert_eq!(Rotation::Deg180.apply(m), MagF32::new(-1.0, -2.0, 3.0));
        assert_eq!(Rotation::Deg270.apply(m), MagF32::new(-2.0, 1.0, 3.0));
    }

    #[test]
    fn four_quarter_turns_round_trip() {
        let start = MagF32::new(0.1, -7.25, 42.0);
        let mut m = start;
        for _ in 0..4 {
            m = Rotation::Deg90.apply(m);
        }
        assert!((m.x() - start.x()).abs() < 1e-6);
        assert!((m.y() - start.y()).abs() < 1e-6);
        assert!((m.z() - start.z()).abs() < 1e-6);
    }

    #[test]
    fn unknown_degrees_fall_back_to_identity() {
        assert_eq!(Rotation::from(45), Rotation::Deg0);
        assert_eq!(Rotation::from(-90), Rotation::Deg0);
        assert_eq!(Rotation::from(360), Rotation::Deg0);
        assert_eq!(Rotation::from(270), Rotation::Deg270);
        assert_eq!(Rotation::from_degrees(180).degrees(), 180);
    }

    #[test]
    fn magnitude_of_3_4_0_is_5() {
        assert!((reading(3.0, 4.0, 0.0).magnitude() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn identity_pipeline_scenario() {
        let c = CalibrationParameters::default().apply(&Mag::new(100, 200, 300));
        let out = Orientation::default().apply(c);
        assert_eq!(out, reading(100.0, 200.0, 300.0));
        assert!((out.magnitude() - 374.1657).abs() < 1e-3);
    }

    #[test]
    fn remap_then_rotate_scenario() {
        let c = CalibrationParameters::default().apply(&Mag::new(100, 200, 300));
        let map = AxisMap::new(-2, 1, 3);
        assert_eq!(map.apply(c), MagF32::new(-200.0, 100.0, 300.0));
        let out = Orientation::new(map, Rotation::Deg90).apply(c);
        assert_eq!(out, reading(100.0, 200.0, 300.0));
    }
}
