use core::fmt::{Debug, Formatter};
use embedded_hal::i2c::ErrorType;

/// Error for sensor operations.
///
/// Generic over the bus so the same type serves the blocking
/// and the async driver (both I2C traits share `ErrorType`).
pub enum Error<I>
where
    I: ErrorType,
{
    /// Error occurred during an I2C write operation
    WriteError(I::Error),
    /// Error occurred during an I2C write-read operation
    WriteReadError(I::Error),
    /// The data registers held an all-zero or saturated sample
    ImplausibleSample,
    /// Chip id register did not read as a QMC5883P
    WrongDevice,
}

impl<I> Debug for Error<I>
where
    I: ErrorType,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::result::Result<(), core::fmt::Error> {
        match self {
            Self::WriteReadError(e) => f.debug_tuple("WriteReadError").field(e).finish(),
            Self::WriteError(e) => f.debug_tuple("WriteError").field(e).finish(),
            Self::ImplausibleSample => f.write_str("ImplausibleSample"),
            Self::WrongDevice => f.write_str("WrongDevice"),
        }
    }
}
