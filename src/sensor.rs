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
use embedded_hal::{delay::DelayNs, i2c::I2c};
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
    /// No bus traffic happens until [`Self::initialize`] is called.
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

    pub(crate) fn read(&mut self, bytes: &[u8], response: &mut [u8]) -> Result<(), Error<I>> {
        self.i2c
            .write_read(self.address, bytes, response)
            .map_err(Error::WriteReadError)
    }

    pub(crate) fn write(&mut self, bytes: &[u8]) -> Result<(), Error<I>> {
        self.i2c
            .write(self.address, bytes)
            .map_err(Error::WriteError)
    }

    pub(crate) fn read_register(&mut self, reg: Register) -> Result<u8, Error<I>> {
        let mut buf = [0; 1];
        self.read(&[reg as u8], &mut buf)?;
        Ok(buf[0])
    }

    pub(crate) fn read_registers(
        &mut self,
        reg: Register,
        buf: &mut [u8],
    ) -> Result<(), Error<I>> {
        self.read(&[reg as u8], buf)
    }

    pub(crate) fn write_register(&mut self, reg: Register, value: u8) -> Result<(), Error<I>> {
        debug!("write_reg {:?}({:#04x}) = {:#04x}", reg, reg as u8, value);
        self.write(&[reg as u8, value])
    }

    /// Write whose failure is logged and otherwise ignored.
    /// Not every board revision acknowledges every configuration register.
    fn write_register_best_effort(&mut self, reg: Register, value: u8) {
        if let Err(e) = self.write_register(reg, value) {
            debug!("write_reg {:?} ignored: {:?}", reg, e);
        }
    }

    pub fn chip_id(&mut self) -> Result<u8, Error<I>> {
        self.read_register(Register::ChipId)
    }

    /// Verify the chip id register reads as a QMC5883P
    pub fn check_device(&mut self) -> Result<(), Error<I>> {
        if self.chip_id()? == CHIP_ID {
            Ok(())
        } else {
            Err(Error::WrongDevice)
        }
    }

    /// Check the DRDY flag of the status register
    pub fn data_ready(&mut self) -> Result<bool, Error<I>> {
        Ok(self.read_register(Register::Status)? & STATUS_DRDY != 0)
    }

    /// Poll the DRDY flag until it is set or `timeout_ms` has elapsed on `clock`.
    ///
    /// Returns `Ok(false)` on timeout. A failing status read ends the wait early.
    pub fn wait_data_ready<C>(&mut self, clock: &mut C, timeout_ms: u32) -> Result<bool, Error<I>>
    where
        C: DelayNs + Clock,
    {
        let start = clock.now_ms();
        while elapsed_ms(clock, start) < timeout_ms {
            if self.data_ready()? {
                return Ok(true);
            }
            clock.delay_ms(DRDY_POLL_MS);
        }
        Ok(false)
    }

    /// Burst read of the data registers.
    ///
    /// All-zero and saturated samples are reported as [`Error::ImplausibleSample`].
    pub fn read_raw(&mut self) -> Result<Mag, Error<I>> {
        let mut data = [0; 6];
        self.read_registers(Register::DataX_L, &mut data)?;
        let mag = Mag::from_bytes(data);
        if !mag.is_plausible() {
            return Err(Error::ImplausibleSample);
        }
        trace!("raw ({}, {}, {})", mag.x(), mag.y(), mag.z());
        Ok(mag)
    }

    /// Reset the device and start continuous sampling with the default [`Config`].
    pub fn initialize<C>(&mut self, clock: &mut C) -> Result<(), Error<I>>
    where
        C: DelayNs + Clock,
    {
        self.initialize_with(clock, &Config::default())
    }

    /// Reset the device and start sampling with `config`.
    ///
    /// Only a failed CONTROL_1 write is an error: the other configuration writes
    /// and the data-ready wait are best effort. A first sample that cannot be read
    /// is logged but still counts as a successful initialization, the device may
    /// just be slow to produce it.
    pub fn initialize_with<C>(&mut self, clock: &mut C, config: &Config) -> Result<(), Error<I>>
    where
        C: DelayNs + Clock,
    {
        self.write_register_best_effort(Register::Control2, CONTROL2_SOFT_RESET);
        clock.delay_ms(RESET_DELAY_MS);

        self.write_register_best_effort(Register::AxisSign, AXIS_SIGN_DEFAULT);
        clock.delay_ms(AXIS_SIGN_DELAY_MS);

        // some boards read CONTROL_2 back as 0x00 afterwards
        self.write_register_best_effort(Register::Control2, config.control2());
        clock.delay_ms(CONTROL2_DELAY_MS);

        self.write_register(Register::Control1, config.control1())?;
        clock.delay_ms(MODE_DELAY_MS);

        match self.wait_data_ready(clock, DRDY_TIMEOUT_MS) {
            Ok(true) => {}
            Ok(false) => debug!("DRDY not set after {} ms", DRDY_TIMEOUT_MS),
            Err(e) => debug!("status read failed: {:?}", e),
        }

        match self.read_raw() {
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
