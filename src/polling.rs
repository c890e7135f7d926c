//! Fixed-cadence polling with calibration, orientation and fault recovery.
//!
//! The host calls [`Poller::setup`] once and [`Poller::update`] on every tick of
//! its own timer. Each successful update runs the whole pipeline:
//!
//! ```text
//! raw counts -> hard/soft iron calibration -> axis map -> rotation -> outputs
//! ```
//!
//! Failed reads are never retried within a tick and nothing is published for
//! them, so a stale value is never reported twice. After repeated failures the
//! sensor is left alone and only re-initialized every few ticks, see [`crate::health`].

use crate::{
    calibration::CalibrationParameters,
    clock::Clock,
    config::Config,
    health::{Health, PollAction},
    magnetometer::Mag,
    orientation::{Orientation, OrientedReading},
    sensor::Qmc5883p,
    sink::{Outputs, Sink},
};
use embedded_hal::{delay::DelayNs, i2c::I2c};
use log::{debug, warn};

pub struct Poller<I, S>
where
    I: I2c,
{
    sensor: Qmc5883p<I>,
    config: Config,
    calibration: CalibrationParameters,
    orientation: Orientation,
    health: Health,
    outputs: Outputs<S>,
}

impl<I, S> Poller<I, S>
where
    I: I2c,
    S: Sink,
{
    /// Uncalibrated, unrotated poller with the default sampling configuration.
    pub fn new(sensor: Qmc5883p<I>, outputs: Outputs<S>) -> Self {
        Self {
            sensor,
            config: Config::default(),
            calibration: CalibrationParameters::default(),
            orientation: Orientation::default(),
            health: Health::default(),
            outputs,
        }
    }

    /// (consumes and returns `Self` to be callable in a "builder-like" pattern)
    pub fn with_calibration(self, calibration: CalibrationParameters) -> Self {
        Self {
            calibration,
            ..self
        }
    }

    /// (consumes and returns `Self` to be callable in a "builder-like" pattern)
    pub fn with_orientation(self, orientation: Orientation) -> Self {
        Self {
            orientation,
            ..self
        }
    }

    /// (consumes and returns `Self` to be callable in a "builder-like" pattern)
    pub fn with_config(self, config: Config) -> Self {
        Self { config, ..self }
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn sensor_mut(&mut self) -> &mut Qmc5883p<I> {
        &mut self.sensor
    }

    pub fn outputs(&self) -> &Outputs<S> {
        &self.outputs
    }

    pub fn outputs_mut(&mut self) -> &mut Outputs<S> {
        &mut self.outputs
    }

    /// Returns the sensor driver and the output channels, consuming the poller.
    pub fn release(self) -> (Qmc5883p<I>, Outputs<S>) {
        (self.sensor, self.outputs)
    }

    /// Calibrate and orient a raw sample without touching the bus.
    pub fn transform(&self, raw: &Mag) -> OrientedReading {
        self.orientation.apply(self.calibration.apply(raw))
    }

    fn initialize<C>(&mut self, clock: &mut C) -> bool
    where
        C: DelayNs + Clock,
    {
        match self.sensor.initialize_with(clock, &self.config) {
            Ok(()) => true,
            Err(e) => {
                debug!("QMC5883P: init error {:?}", e);
                false
            }
        }
    }

    /// One-time initialization. The poller is operational afterwards unless the
    /// mode register could not be written.
    pub fn setup<C>(&mut self, clock: &mut C)
    where
        C: DelayNs + Clock,
    {
        let ok = self.initialize(clock);
        if !ok {
            warn!(
                "QMC5883P: init failed (addr={:#04x})",
                u8::from(self.sensor.address())
            );
        }
        self.health.initialized(ok);
    }

    /// One polling tick. Returns the reading published this tick, if any.
    pub fn update<C>(&mut self, clock: &mut C) -> Option<OrientedReading>
    where
        C: DelayNs + Clock,
    {
        match self.health.next_action() {
            PollAction::Wait => None,
            PollAction::Reinitialize => {
                warn!("QMC5883P: re-attempting init");
                let ok = self.initialize(clock);
                self.health.initialized(ok);
                None
            }
            PollAction::Read => match self.sensor.read_raw() {
                Ok(raw) => {
                    self.health.read_succeeded();
                    let reading = self.transform(&raw);
                    self.outputs.publish(&reading);
                    Some(reading)
                }
                Err(e) => {
                    debug!("QMC5883P: bad read {:?}", e);
                    if self.health.read_failed() {
                        warn!("QMC5883P: repeated bad reads, will reinit");
                    }
                    None
                }
            },
        }
    }
}
