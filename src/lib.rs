//! Polling driver for the QST QMC5883P 3-axis magnetometer.
//!
//! [`sensor`] and [`sensor_async`] talk to the device, [`polling`] and
//! [`polling_async`] turn raw samples into calibrated, oriented readings at the
//! host's cadence and recover from a misbehaving sensor.

#![cfg_attr(not(test), no_std)]

pub mod address;
pub mod calibration;
pub mod clock;
pub mod config;
pub mod error;
pub mod health;
pub mod magnetometer;
pub mod orientation;
pub mod polling;
pub mod polling_async;
pub mod registers;
pub mod sensor;
pub mod sensor_async;
pub mod sink;

#[cfg(test)]
mod testing;
