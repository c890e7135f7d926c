//! QMC5883P Operating Configuration
//!
//! Two control registers select how the sensor samples the field:
//! - CONTROL_1: downsampling, oversampling, output data rate and mode
//! - CONTROL_2: field range and set/reset (degaussing) behaviour
//!
//! [`Config::default()`] encodes the settings used by the polling driver:
//! continuous mode at 10 Hz, OSR2=3, OSR1=0, 8 G range with set/reset on.

use crate::registers::CONTROL2_SOFT_RESET;

/// Settle time after a soft reset
pub(crate) const RESET_DELAY_MS: u32 = 10;
/// Settle time after writing the axis/sign register
pub(crate) const AXIS_SIGN_DELAY_MS: u32 = 1;
/// Settle time after writing CONTROL_2
pub(crate) const CONTROL2_DELAY_MS: u32 = 2;
/// Settle time after selecting the operating mode
pub(crate) const MODE_DELAY_MS: u32 = 10;
/// Longest wait for the first data-ready flag during initialization
pub(crate) const DRDY_TIMEOUT_MS: u32 = 60;
/// Delay between two status register polls
pub(crate) const DRDY_POLL_MS: u32 = 4;

/// Oversampling ratio (OSR1, CONTROL_1 bits 5:4).
/// Higher ratios reduce noise at the cost of power.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum OverSampling {
    Osr8 = 0,
    Osr4 = 1,
    Osr2 = 2,
    Osr1 = 3,
}

/// Downsampling ratio (OSR2, CONTROL_1 bits 7:6).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum DownSampling {
    Dsr1 = 0,
    Dsr2 = 1,
    Dsr4 = 2,
    Dsr8 = 3,
}

/// Output data rate (CONTROL_1 bits 3:2), only meaningful in normal and continuous mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum OutputDataRate {
    Hz10 = 0,
    Hz50 = 1,
    Hz100 = 2,
    Hz200 = 3,
}

/// Operating mode (CONTROL_1 bits 1:0).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Mode {
    /// No measurements, lowest power
    Suspend = 0,
    /// Samples at the output data rate
    Normal = 1,
    /// One measurement, then back to suspend
    Single = 2,
    /// Samples at the output data rate with continuous set/reset
    Continuous = 3,
}

/// Full scale field range (CONTROL_2 bits 3:2).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Range {
    G30 = 0,
    G12 = 1,
    G8 = 2,
    G2 = 3,
}

impl Range {
    /// Sensitivity in LSB per gauss
    pub const fn scale(self) -> f32 {
        match self {
            Self::G30 => 1000.0,
            Self::G12 => 2500.0,
            Self::G8 => 3750.0,
            Self::G2 => 15000.0,
        }
    }

    pub fn scale_value(self, value: i16) -> f32 {
        (value as f32) / self.scale()
    }
}

/// Set/reset (degaussing) behaviour (CONTROL_2 bits 1:0).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum SetResetMode {
    SetAndResetOn = 0,
    SetOnly = 1,
    Off = 2,
}

/// Complete sampling configuration written during initialization.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Config {
    pub down_sampling: DownSampling,
    pub over_sampling: OverSampling,
    pub data_rate: OutputDataRate,
    pub mode: Mode,
    pub range: Range,
    pub set_reset: SetResetMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            down_sampling: DownSampling::Dsr8,
            over_sampling: OverSampling::Osr8,
            data_rate: OutputDataRate::Hz10,
            mode: Mode::Continuous,
            range: Range::G8,
            set_reset: SetResetMode::SetAndResetOn,
        }
    }
}

impl Config {
    /// Change the field range
    /// (consumes and returns `Self` to be callable in a "builder-like" pattern)
    pub fn with_range(self, range: Range) -> Self {
        Self { range, ..self }
    }

    /// Change the output data rate
    /// (consumes and returns `Self` to be callable in a "builder-like" pattern)
    pub fn with_data_rate(self, data_rate: OutputDataRate) -> Self {
        Self { data_rate, ..self }
    }

    /// Change the operating mode
    /// (consumes and returns `Self` to be callable in a "builder-like" pattern)
    pub fn with_mode(self, mode: Mode) -> Self {
        Self { mode, ..self }
    }

    /// Byte to write to CONTROL_1
    pub const fn control1(&self) -> u8 {
        (self.down_sampling as u8) << 6
            | (self.over_sampling as u8) << 4
            | (self.data_rate as u8) << 2
            | self.mode as u8
    }

    /// Byte to write to CONTROL_2 (never includes the soft reset bit)
    pub const fn control2(&self) -> u8 {
        ((self.range as u8) << 2 | self.set_reset as u8) & !CONTROL2_SOFT_RESET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_encodes_reference_values() {
        let config = Config::default();
        assert_eq!(config.control1(), 0xC3);
        assert_eq!(config.control2(), 0x08);
    }

    #[test]
    fn builder_changes_single_fields() {
        let config = Config::default()
            .with_range(Range::G2)
            .with_data_rate(OutputDataRate::Hz200)
            .with_mode(Mode::Normal);
        assert_eq!(config.control1(), 0b1100_1101);
        assert_eq!(config.control2(), 0b0000_1100);
    }

    #[test]
    fn range_scales_counts_to_gauss() {
        assert_eq!(Range::G8.scale_value(3750), 1.0);
        assert_eq!(Range::G30.scale_value(-500), -0.5);
    }
}
