//! # bme280-driver
//!
//! Driver for the Bosch BME280 temperature, pressure and humidity sensor.
//! The chip is reached through the [`Interface`] trait, which comes with
//! implementations for `embedded-hal` I2C and SPI and, on Linux, for
//! `/dev/i2c-*` devices.
//!
//! Results come as fixed-point values (`Temperature` in 0.01 °C, `Pressure`
//! in 0.01 or 0.0001 hPa, `Humidity` in 0.001 %RH) or, with the `_f`
//! variants, as `f32`.
//!
//! # Examples
//! ```no_run
//! use bme280_driver::linux::LinuxI2cInterface;
//! use bme280_driver::*;
//!
//! let iface = LinuxI2cInterface::new("/dev/i2c-1", I2C_ADDRESS_SDO_LOW as u16).unwrap();
//! let mut bme280 = Bme280::new(iface);
//! bme280.init().unwrap();
//! bme280
//!     .configure_all(&Config {
//!         oversampling_t: Oversampling::X2,
//!         oversampling_p: Oversampling::X2,
//!         oversampling_h: Oversampling::X4,
//!         mode: Mode::Normal,
//!         standby: StandbyTime::Ms500,
//!         filter: Filter::X2,
//!         spi3w_enabled: false,
//!     })
//!     .unwrap();
//! let m = bme280.read_last_all().unwrap();
//! let (deg, hundredths) = m.temperature.split();
//! println!("{}.{:02} degC", deg, hundredths);
//! ```

mod bme280;
pub mod calibration;
pub mod codec;
pub mod compensation;
pub mod error;
pub mod interface;
#[cfg(target_os = "linux")]
pub mod linux;
pub mod registers;
pub mod settings;
mod utils;

pub use bme280::{Bme280, State};
pub use calibration::CalibrationCoefficients;
pub use compensation::{Humidity, Measurement, MeasurementF, Pressure, Temperature};
pub use error::{Error, ParamError};
pub use interface::{I2cInterface, Interface, SpiInterface};
pub use registers::{I2C_ADDRESS_SDO_HIGH, I2C_ADDRESS_SDO_LOW};
pub use settings::{Config, Filter, Mode, Oversampling, PressureCompensation, StandbyTime};
