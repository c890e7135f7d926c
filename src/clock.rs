//! Time source used by bounded waits.
//!
//! Sleeping goes through the `embedded-hal` `DelayNs` traits; measuring how long a
//! wait has lasted needs a monotonic millisecond counter on top of that.

/// Monotonic millisecond counter. Wrapping is fine, elapsed time is computed
/// with `wrapping_sub`.
pub trait Clock {
    fn now_ms(&mut self) -> u32;
}

impl<T: Clock + ?Sized> Clock for &mut T {
    fn now_ms(&mut self) -> u32 {
        T::now_ms(self)
    }
}

#[cfg(feature = "embassy-time")]
impl Clock for embassy_time::Delay {
    fn now_ms(&mut self) -> u32 {
        embassy_time::Instant::now().as_millis() as u32
    }
}

/// Milliseconds elapsed since `start`, tolerant of counter wrap-around
pub(crate) fn elapsed_ms(clock: &mut impl Clock, start: u32) -> u32 {
    clock.now_ms().wrapping_sub(start)
}
