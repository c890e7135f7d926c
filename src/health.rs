//! Device health tracking and re-initialization cadence.
//!
//! The sensor is either [`HealthState::Operational`], in which case every poll
//! reads it, or [`HealthState::Failing`], in which case polls only count up and
//! every [`RETRY_INTERVAL`]th poll asks for a fresh initialization.
//!
//! A run of [`MAX_BAD_READS`] consecutive failed reads moves an operational
//! sensor to failing. A successful re-initialization moves it back.

/// Consecutive failed reads tolerated before the sensor is considered failing
pub const MAX_BAD_READS: u8 = 5;

/// While failing, re-initialization is attempted every this many polls
pub const RETRY_INTERVAL: u32 = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum HealthState {
    Operational,
    Failing,
}

/// What the poller should do this cycle
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum PollAction {
    /// Read a sample
    Read,
    /// Run the initialization sequence again
    Reinitialize,
    /// Do nothing this cycle
    Wait,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Health {
    operational: bool,
    bad_reads: u8,
    retries: u32,
}

impl Default for Health {
    /// Not operational: nothing has been initialized yet
    fn default() -> Self {
        Self {
            operational: false,
            bad_reads: 0,
            retries: 0,
        }
    }
}

impl Health {
    pub fn state(&self) -> HealthState {
        if self.operational {
            HealthState::Operational
        } else {
            HealthState::Failing
        }
    }

    pub fn is_operational(&self) -> bool {
        self.operational
    }

    pub fn bad_reads(&self) -> u8 {
        self.bad_reads
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Record the outcome of an initialization attempt
    pub fn initialized(&mut self, ok: bool) {
        self.operational = ok;
        if ok {
            self.bad_reads = 0;
            self.retries = 0;
        }
    }

    /// Decide what this poll does. Advances the retry counter while failing.
    pub fn next_action(&mut self) -> PollAction {
        if self.operational {
            return PollAction::Read;
        }
        self.retries = self.retries.wrapping_add(1);
        if self.retries.is_multiple_of(RETRY_INTERVAL) {
            PollAction::Reinitialize
        } else {
            PollAction::Wait
        }
    }

    pub fn read_succeeded(&mut self) {
        self.bad_reads = 0;
    }

    /// Returns `true` when this failure moved the sensor to [`HealthState::Failing`].
    pub fn read_failed(&mut self) -> bool {
        self.bad_reads += 1;
        if self.bad_reads >= MAX_BAD_READS {
            self.bad_reads = 0;
            self.operational = false;
            self.retries = 0;
            true
        } else {
            false
        }
    }
}
