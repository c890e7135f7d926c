//! QMC5883P Asynchronous Driver Implementation
//!
//! This module provides a non-blocking interface to the QMC5883P magnetometer.
//! Bus transactions and settle delays are awaited, so an executor can run other
//! tasks while the sensor resets or the data-ready flag is polled.
//!
//! This implementation mirrors the blocking version (sensor.rs) operation by
//! operation, including the best-effort initialization policy.

use crate::{
    address::Address,
    clock::{elapsed_ms, Clock},
    config::{
        Config, AXIS_SIGN_DELAY_MS, CONTROL2_DELAY_MS, DRDY_POLL_MS, DRDY_TIMEOUT_MS,
        MODE_DELAY_MS, RESET_DELAY_MS,
    },
    error::Error,
    magnetometer::Mag,
    registers::{Register, AXIS_SIGN_DEFAULT, CHIP_ID, CONTROL2_SOFT_RESET, STATUS_DRDY},
};

use embedded_hal_async::{delay::DelayNs, i2c::I2c};
use log::{debug, info, trace, warn};

/// QST QMC5883P Driver
pub struct Qmc5883p<I>
where
    I: I2c,
{
    i2c: I,
    address: u8,
}

impl<I> Qmc5883p<I>
where
    I: I2c,
{
    /// Construct a new i2c driver for the QMC5883P.
    /// No bus traffic happens until [`Self::initialize`] is awaited.
    pub fn new(i2c: I, address: Address) -> Self {
        Self {
            i2c,
            address: address.into(),
        }
    }

    /// Returns the underlying I2C peripheral, consuming this driver.
    pub fn release(self) -> I {
        self.i2c
    }

    pub fn i2c(&mut self) -> &mut I {
        &mut self.i2c
    }

    pub fn address(&self) -> Address {
        Address(self.address)
    }

    pub(crate) async fn read(&mut self, bytes: &[u8], response: &mut [u8]) -> Result<(), Error<I>> {
        self.i2c
            .write_read(self.address, bytes, response)
            .await
            .map_err(Error::WriteReadError)
    }

    pub(crate) async fn write(&mut self, bytes: &[u8]) -> Result<(), Error<I>> {
        self.i2c
            .write(self.address, bytes)
            .await
            .map_err(Error::WriteError)
    }

    pub(crate) async fn read_register(&mut self, reg: Register) -> Result<u8, Error<I>> {
        let mut buf = [0; 1];
        self.read(&[reg as u8], &mut buf).await?;
        Ok(buf[0])
    }

    pub(crate) async fn read_registers(
        &mut self,
        reg: Register,
        buf: &mut [u8],
    ) -> Result<(), Error<I>> {
        self.read(&[reg as u8], buf).await
    }

    pub(crate) async fn write_register(
        &mut self,
        reg: Register,
        value: u8,
    ) -> Result<(), Error<I>> {
        debug!("write_reg {:?}({:#04x}) = {:#04x}", reg, reg as u8, value);
        self.write(&[reg as u8, value]).await
    }

    async fn write_register_best_effort(&mut self, reg: Register, value: u8) {
        if let Err(e) = self.write_register(reg, value).await {
            debug!("write_reg {:?} ignored: {:?}", reg, e);
        }
    }

    pub async fn chip_id(&mut self) -> Result<u8, Error<I>> {
        self.read_register(Register::ChipId).await
    }

    /// Verify the chip id register reads as a QMC5883P
    pub async fn check_device(&mut self) -> Result<(), Error<I>> {
        if self.chip_id().await? == CHIP_ID {
            Ok(())
        } else {
            Err(Error::WrongDevice)
        }
    }

    /// Check the DRDY flag of the status register
    pub async fn data_ready(&mut self) -> Result<bool, Error<I>> {
        Ok(self.read_register(Register::Status).await? & STATUS_DRDY != 0)
    }

    /// Poll the DRDY flag until it is set or `timeout_ms` has elapsed on `clock`.
    ///
    /// Yields to the executor between polls. Returns `Ok(false)` on timeout.
    pub async fn wait_data_ready<C>(
        &mut self,
        clock: &mut C,
        timeout_ms: u32,
    ) -> Result<bool, Error<I>>
    where
        C: DelayNs + Clock,
    {
        let start = clock.now_ms();
        while elapsed_ms(clock, start) < timeout_ms {
            if self.data_ready().await? {
                return Ok(true);
            }
            clock.delay_ms(DRDY_POLL_MS).await;
        }
        Ok(false)
    }

    /// Burst read of the data registers.
    ///
    /// All-zero and saturated samples are reported as [`Error::ImplausibleSample`].
    pub async fn read_raw(&mut self) -> Result<Mag, Error<I>> {
        let mut data = [0; 6];
        self.read_registers(Register::DataX_L, &mut data).await?;
        let mag = Mag::from_bytes(data);
        if !mag.is_plausible() {
            return Err(Error::ImplausibleSample);
        }
        trace!("raw ({}, {}, {})", mag.x(), mag.y(), mag.z());
        Ok(mag)
    }

    /// Reset the device and start continuous sampling with the default [`Config`].
    pub async fn initialize<C>(&mut self, clock: &mut C) -> Result<(), Error<I>>
    where
        C: DelayNs + Clock,
    {
        self.initialize_with(clock, &Config::default()).await
    }

    /// Reset the device and start sampling with `config`.
    ///
    /// Only a failed CONTROL_1 write is an error. See the blocking
    /// [`crate::sensor::Qmc5883p::initialize_with`] for the full sequence.
    pub async fn initialize_with<C>(
        &mut self,
        clock: &mut C,
        config: &Config,
    ) -> Result<(), Error<I>>
    where
        C: DelayNs + Clock,
    {
        self.write_register_best_effort(Register::Control2, CONTROL2_SOFT_RESET)
            .await;
        clock.delay_ms(RESET_DELAY_MS).await;

        self.write_register_best_effort(Register::AxisSign, AXIS_SIGN_DEFAULT)
            .await;
        clock.delay_ms(AXIS_SIGN_DELAY_MS).await;

        self.write_register_best_effort(Register::Control2, config.control2())
            .await;
        clock.delay_ms(CONTROL2_DELAY_MS).await;

        self.write_register(Register::Control1, config.control1())
            .await?;
        clock.delay_ms(MODE_DELAY_MS).await;

        match self.wait_data_ready(clock, DRDY_TIMEOUT_MS).await {
            Ok(true) => {}
            Ok(false) => debug!("DRDY not set after {} ms", DRDY_TIMEOUT_MS),
            Err(e) => debug!("status read failed: {:?}", e),
        }

        match self.read_raw().await {
            Ok(mag) => info!(
                "QMC5883P: init OK, first sample ({}, {}, {})",
                mag.x(),
                mag.y(),
                mag.z()
            ),
            Err(e) => warn!("QMC5883P: first read failed ({:?}), will retry while polling", e),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Qmc5883p;
    use crate::{
        address::Address,
        error::Error,
        magnetometer::Mag,
        registers::Register,
        testing::{FakeBus, FakeClock},
    };
    use embassy_futures::block_on;

    #[test]
    fn read_raw_decodes_burst() {
        let mut qmc = Qmc5883p::new(FakeBus::with_sample(-1, 2, -3), Address::default());
        assert_eq!(block_on(qmc.read_raw()).unwrap(), Mag::new(-1, 2, -3));
    }

    #[test]
    fn read_raw_rejects_all_zero() {
        let mut qmc = Qmc5883p::new(FakeBus::with_sample(0, 0, 0), Address::default());
        assert!(matches!(block_on(qmc.read_raw()), Err(Error::ImplausibleSample)));
    }

    #[test]
    fn initialize_matches_blocking_sequence() {
        let mut qmc = Qmc5883p::new(FakeBus::with_sample(1, 2, 3), Address::default());
        let mut clock = FakeClock::default();
        block_on(qmc.initialize(&mut clock)).unwrap();
        assert_eq!(
            qmc.i2c().writes,
            [(0x0B, 0x80), (0x29, 0x06), (0x0B, 0x08), (0x0A, 0xC3)]
        );
        assert_eq!(clock.elapsed_ms(), 23);
    }

    #[test]
    fn initialize_fails_on_mode_write() {
        let mut bus = FakeBus::with_sample(1, 2, 3);
        bus.failing_writes = vec![Register::Control1 as u8];
        let mut qmc = Qmc5883p::new(bus, Address::default());
        let result = block_on(qmc.initialize(&mut FakeClock::default()));
        assert!(matches!(result, Err(Error::WriteError(_))));
    }

    #[test]
    fn initialize_tolerates_failing_status_read() {
        let mut bus = FakeBus::with_sample(1, 2, 3);
        bus.failing_reads = vec![Register::Status as u8];
        let mut qmc = Qmc5883p::new(bus, Address::default());
        assert!(block_on(qmc.initialize(&mut FakeClock::default())).is_ok());
        assert_eq!(qmc.i2c().status_reads, 1);
        assert_eq!(qmc.i2c().data_reads, 1);
    }

    #[test]
    fn data_ready_wait_times_out() {
        let mut bus = FakeBus::with_sample(1, 2, 3);
        bus.registers[Register::Status as usize] = 0;
        let mut qmc = Qmc5883p::new(bus, Address::default());
        let mut clock = FakeClock::default();
        assert!(!block_on(qmc.wait_data_ready(&mut clock, 60)).unwrap());
        assert_eq!(qmc.i2c().status_reads, 15);
    }
}
