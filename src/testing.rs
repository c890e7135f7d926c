//! Test doubles: an in-memory QMC5883P register file behind both I2C traits,
//! a clock that only moves when slept on, and a recording sink.

use std::collections::VecDeque;
use std::vec::Vec;

use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

use crate::address::Address;
use crate::clock::Clock;
use crate::registers::{Register, CHIP_ID, STATUS_DRDY};
use crate::sink::Sink;

pub struct FakeBus {
    pub address: u8,
    pub registers: [u8; 0x30],
    /// Consumed by data burst reads before falling back to `registers`,
    /// `None` makes that read fail on the bus.
    pub samples: VecDeque<Option<[u8; 6]>>,
    /// Every read fails when set
    pub fail_reads: bool,
    /// Writes to these registers fail
    pub failing_writes: Vec<u8>,
    /// Reads starting at these registers fail
    pub failing_reads: Vec<u8>,
    /// Successful register writes, in order
    pub writes: Vec<(u8, u8)>,
    pub data_reads: usize,
    pub status_reads: usize,
    pointer: u8,
}

impl FakeBus {
    pub fn with_sample(x: i16, y: i16, z: i16) -> Self {
        let mut bus = Self {
            address: Address::default().into(),
            registers: [0; 0x30],
            samples: VecDeque::new(),
            fail_reads: false,
            failing_writes: Vec::new(),
            failing_reads: Vec::new(),
            writes: Vec::new(),
            data_reads: 0,
            status_reads: 0,
            pointer: 0,
        };
        bus.registers[Register::ChipId as usize] = CHIP_ID;
        bus.registers[Register::Status as usize] = STATUS_DRDY;
        bus.set_sample(x, y, z);
        bus
    }

    pub fn set_sample(&mut self, x: i16, y: i16, z: i16) {
        let start = Register::DataX_L as usize;
        for (i, axis) in [x, y, z].iter().enumerate() {
            let bytes = axis.to_le_bytes();
            self.registers[start + 2 * i] = bytes[0];
            self.registers[start + 2 * i + 1] = bytes[1];
        }
    }

    /// Number of successful writes to `reg`
    pub fn writes_to(&self, reg: Register) -> usize {
        self.writes.iter().filter(|(r, _)| *r == reg as u8).count()
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), ErrorKind> {
        let Some((&reg, values)) = bytes.split_first() else {
            return Ok(());
        };
        self.pointer = reg;
        if values.is_empty() {
            return Ok(());
        }
        if self.failing_writes.contains(&reg) {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
        }
        for (i, value) in values.iter().enumerate() {
            self.registers[reg as usize + i] = *value;
            self.writes.push((reg + i as u8, *value));
        }
        Ok(())
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), ErrorKind> {
        if self.fail_reads {
            return Err(ErrorKind::Bus);
        }
        let start = self.pointer as usize;
        if self.pointer == Register::Status as u8 {
            self.status_reads += 1;
        }
        if self.pointer == Register::DataX_L as u8 && buf.len() == 6 {
            self.data_reads += 1;
        }
        if self.failing_reads.contains(&self.pointer) {
            return Err(ErrorKind::Bus);
        }
        if self.pointer == Register::DataX_L as u8 && buf.len() == 6 {
            if let Some(sample) = self.samples.pop_front() {
                let data = sample.ok_or(ErrorKind::Bus)?;
                buf.copy_from_slice(&data);
                return Ok(());
            }
        }
        buf.copy_from_slice(&self.registers[start..start + buf.len()]);
        Ok(())
    }

    fn run(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
        if address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for operation in operations {
            match operation {
                Operation::Write(bytes) => self.write_bytes(bytes)?,
                Operation::Read(buf) => self.read_bytes(buf)?,
            }
        }
        Ok(())
    }
}

impl ErrorType for FakeBus {
    type Error = ErrorKind;
}

impl embedded_hal::i2c::I2c for FakeBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.run(address, operations)
    }
}

impl embedded_hal_async::i2c::I2c for FakeBus {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.run(address, operations)
    }
}

/// Time advances only through delays.
#[derive(Default)]
pub struct FakeClock {
    now_ns: u64,
}

impl FakeClock {
    pub fn elapsed_ms(&self) -> u64 {
        self.now_ns / 1_000_000
    }
}

impl Clock for FakeClock {
    fn now_ms(&mut self) -> u32 {
        self.elapsed_ms() as u32
    }
}

impl embedded_hal::delay::DelayNs for FakeClock {
    fn delay_ns(&mut self, ns: u32) {
        self.now_ns += ns as u64;
    }
}

impl embedded_hal_async::delay::DelayNs for FakeClock {
    async fn delay_ns(&mut self, ns: u32) {
        self.now_ns += ns as u64;
    }
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub values: Vec<f32>,
}

impl Sink for Recorder {
    fn publish(&mut self, value: f32) {
        self.values.push(value);
    }
}
