//! Magnetometer Data Processing
//!
//! The QMC5883P measures the magnetic field at a point in space along three axes:
//! - X
//! - Y
//! - Z
//!
//! Each axis is a signed 16 bit count. A handful of bit patterns never come out
//! of a working sensor and are treated as read failures, see [`Mag::is_plausible`].

use crate::config::Range;

/// Raw magnetometer readings vector, in sensor counts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "postcard-experimental", derive(postcard::experimental::max_size::MaxSize))]
pub struct Mag {
    pub(crate) x: i16,
    pub(crate) y: i16,
    pub(crate) z: i16,
}

impl Mag {
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Converts raw sensor bytes into magnetometer values.
    ///
    /// The data registers hold:
    /// - 2 bytes per axis in Little-endian byte order
    /// - Signed integers
    pub const fn from_bytes(data: [u8; 6]) -> Self {
        let x = [data[0], data[1]];
        let y = [data[2], data[3]];
        let z = [data[4], data[5]];
        Self {
            x: i16::from_le_bytes(x),
            y: i16::from_le_bytes(y),
            z: i16::from_le_bytes(z),
        }
    }

    pub fn x(&self) -> i16 {
        self.x
    }

    pub fn y(&self) -> i16 {
        self.y
    }

    pub fn z(&self) -> i16 {
        self.z
    }

    /// Check the sample against patterns a working sensor never produces.
    ///
    /// All three axes at zero is an unfilled register snapshot, and either
    /// saturation value on any axis is a glitched or stuck channel.
    pub const fn is_plausible(&self) -> bool {
        let all_zero = self.x == 0 && self.y == 0 && self.z == 0;
        let saturated = is_saturated(self.x) || is_saturated(self.y) || is_saturated(self.z);
        !(all_zero || saturated)
    }

    /// Field in gauss for the given range
    pub fn scaled(&self, range: Range) -> MagF32 {
        MagF32 {
            x: range.scale_value(self.x),
            y: range.scale_value(self.y),
            z: range.scale_value(self.z),
        }
    }

    pub fn to_f32(&self) -> MagF32 {
        MagF32::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

const fn is_saturated(value: i16) -> bool {
    value == i16::MAX || value == i16::MIN
}

/// Floating point field vector, used between the calibration and orientation stages.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MagF32 {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) z: f32,
}

impl MagF32 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn z(&self) -> f32 {
        self.z
    }

    pub(crate) fn component(&self, index: usize) -> f32 {
        match index {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            _ => 0.0,
        }
    }
}
