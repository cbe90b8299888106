use std::{fmt, thread, time};

use i2cdev::core::I2CDevice;
use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError};

use crate::interface::Interface;

/// Failure of a Linux I2C transfer.
#[derive(Debug)]
pub enum LinuxInterfaceError {
    I2c(LinuxI2CError),
    /// The kernel returned fewer bytes than requested.
    ShortRead { expected: usize, received: usize },
}

impl fmt::Display for LinuxInterfaceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LinuxInterfaceError::I2c(e) => write!(f, "{}", e),
            LinuxInterfaceError::ShortRead { expected, received } => {
                write!(f, "short read: expected {} bytes, got {}", expected, received)
            }
        }
    }
}

impl std::error::Error for LinuxInterfaceError {}

impl From<LinuxI2CError> for LinuxInterfaceError {
    fn from(e: LinuxI2CError) -> Self {
        LinuxInterfaceError::I2c(e)
    }
}

/// [`Interface`] over a `/dev/i2c-*` character device.
pub struct LinuxI2cInterface {
    device: LinuxI2CDevice,
}

impl LinuxI2cInterface {
    pub fn new(path: &str, address: u16) -> Result<LinuxI2cInterface, LinuxInterfaceError> {
        let device = LinuxI2CDevice::new(path, address)?;
        Ok(LinuxI2cInterface { device })
    }

    pub fn from_device(device: LinuxI2CDevice) -> LinuxI2cInterface {
        LinuxI2cInterface { device }
    }

    pub fn release(self) -> LinuxI2CDevice {
        self.device
    }
}

impl Interface for LinuxI2cInterface {
    type Error = LinuxInterfaceError;

    fn read(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        // SMBus block reads top out at 32 bytes, the longest burst here is 25.
        let values = self
            .device
            .smbus_read_i2c_block_data(register, buffer.len() as u8)?;
        if values.len() < buffer.len() {
            return Err(LinuxInterfaceError::ShortRead {
                expected: buffer.len(),
                received: values.len(),
            });
        }
        buffer.copy_from_slice(&values[..buffer.len()]);
        Ok(())
    }

    fn write(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.device.smbus_write_byte_data(register, value)?;
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(time::Duration::from_millis(ms as u64));
    }
}
