//! QMC5883P Register Map
//!
//! The QMC5883P exposes a small register file:
//! - Identification: a chip id register
//! - Data registers: X, Y and Z field counts, low byte first
//! - Status register: data-ready and overflow flags
//! - Control registers: mode, output rate, oversampling, range and reset
//! - Axis/sign register: board-dependent axis polarity configuration
//!
//! The data registers auto-increment, so all six bytes are fetched with a
//! single burst read starting at [`Register::DataX_L`].

#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Register {
    /// Chip identification register (0x00), reads [`CHIP_ID`]
    ChipId = 0x00,

    // Field Data Registers
    /// Low byte of X-axis field
    DataX_L = 0x01,
    /// High byte of X-axis field
    DataX_H = 0x02,
    /// Low byte of Y-axis field
    DataY_L = 0x03,
    /// High byte of Y-axis field
    DataY_H = 0x04,
    /// Low byte of Z-axis field
    DataZ_L = 0x05,
    /// High byte of Z-axis field
    DataZ_H = 0x06,

    /// Status register (0x09)
    /// Bit 0 is DRDY, bit 1 is OVFL
    Status = 0x09,

    /// Control register 1 (0x0A)
    /// Oversampling, output data rate and operating mode
    Control1 = 0x0A,

    /// Control register 2 (0x0B)
    /// Soft reset, self test, field range and set/reset mode
    Control2 = 0x0B,

    /// Axis sign register (0x29)
    /// Polarity of the X, Y and Z channels, not present on every board revision
    AxisSign = 0x29,
}

/// Value of [`Register::ChipId`] on a genuine QMC5883P
pub const CHIP_ID: u8 = 0x80;

/// Data ready flag in [`Register::Status`]
pub const STATUS_DRDY: u8 = 1 << 0;

/// Soft reset bit in [`Register::Control2`]
pub const CONTROL2_SOFT_RESET: u8 = 1 << 7;

/// Axis/sign value used by the reference board design
pub const AXIS_SIGN_DEFAULT: u8 = 0x06;
