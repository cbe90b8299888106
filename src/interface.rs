//! Bus access used by the driver.
//!
//! The driver talks to the chip only through [`Interface`]. Calls are
//! blocking and issued one after another; nothing in the driver locks. If a
//! bus is shared between threads, hold a lock around every driver call that
//! touches it.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use embedded_hal::spi::{Operation, SpiDevice};

/// Register-level transport to one sensor.
pub trait Interface {
    type Error;

    /// Burst-reads `buffer.len()` bytes starting at `register`.
    fn read(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), Self::Error>;

    /// Writes one byte to `register`.
    fn write(&mut self, register: u8, value: u8) -> Result<(), Self::Error>;

    /// Blocks for at least `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

impl<T: Interface + ?Sized> Interface for &mut T {
    type Error = T::Error;

    fn read(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read(register, buffer)
    }

    fn write(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        (**self).write(register, value)
    }

    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }
}

/// [`Interface`] over an `embedded-hal` I2C bus.
pub struct I2cInterface<I2C, D> {
    i2c: I2C,
    address: u8,
    delay: D,
}

impl<I2C, D> I2cInterface<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// `address` is 0x76 or 0x77 depending on the SDO pin.
    pub fn new(i2c: I2C, address: u8, delay: D) -> Self {
        I2cInterface { i2c, address, delay }
    }

    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

impl<I2C, D> Interface for I2cInterface<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Error = I2C::Error;

    fn read(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, &[register], buffer)
    }

    fn write(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.address, &[register, value])
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms)
    }
}

/// [`Interface`] over an `embedded-hal` SPI device (4-wire or 3-wire).
///
/// Chip select is handled by the `SpiDevice`. Bit 7 of the address byte is
/// the read flag: set for reads, cleared for writes.
pub struct SpiInterface<SPI, D> {
    spi: SPI,
    delay: D,
}

impl<SPI, D> SpiInterface<SPI, D>
where
    SPI: SpiDevice,
    D: DelayNs,
{
    pub fn new(spi: SPI, delay: D) -> Self {
        SpiInterface { spi, delay }
    }

    pub fn release(self) -> (SPI, D) {
        (self.spi, self.delay)
    }
}

impl<SPI, D> Interface for SpiInterface<SPI, D>
where
    SPI: SpiDevice,
    D: DelayNs,
{
    type Error = SPI::Error;

    fn read(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.spi
            .transaction(&mut [Operation::Write(&[register | 0x80]), Operation::Read(buffer)])
    }

    fn write(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.spi.write(&[register & 0x7F, value])
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms)
    }
}
