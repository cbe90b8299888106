use log::{debug, trace, warn};

use crate::calibration::CalibrationCoefficients;
use crate::codec::*;
use crate::compensation::*;
use crate::error::{Error, Result};
use crate::interface::Interface;
use crate::registers::*;
use crate::settings::*;

/// Polls of the status register after the expected conversion time.
const BUSY_POLL_LIMIT: u32 = 10;

/// Driver state as last seen by this instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    Sleep,
    Forced,
    Normal,
}

impl From<Mode> for State {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Sleep => State::Sleep,
            Mode::Forced => State::Forced,
            Mode::Normal => State::Normal,
        }
    }
}

/// A single BME280 behind an [`Interface`].
///
/// Nothing touches the bus before [`init`](Bme280::init). Settings other
/// than the mode can only be changed in sleep mode, and `read_last_*` only
/// works in normal mode. A measurement in forced mode is taken with the
/// `read_forced_*` family, which starts from sleep mode.
pub struct Bme280<I> {
    interface: I,
    calibration: Option<CalibrationCoefficients>,
    state: State,
    t_fine: i32,
    pressure_compensation: PressureCompensation,
}

impl<I, E> Bme280<I>
where
    I: Interface<Error = E>,
{
    /// Wraps `interface`, using the 64-bit pressure formula.
    pub fn new(interface: I) -> Bme280<I> {
        Bme280::with_pressure_compensation(interface, PressureCompensation::default())
    }

    /// Wraps `interface`, running the given pressure formula.
    pub fn with_pressure_compensation(
        interface: I,
        pressure_compensation: PressureCompensation,
    ) -> Bme280<I> {
        Bme280 {
            interface,
            calibration: None,
            state: State::Uninitialized,
            t_fine: 0,
            pressure_compensation,
        }
    }

    /// Gives the interface back.
    pub fn release(self) -> I {
        self.interface
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state != State::Uninitialized
    }

    pub fn calibration(&self) -> Option<&CalibrationCoefficients> {
        self.calibration.as_ref()
    }

    pub fn pressure_compensation(&self) -> PressureCompensation {
        self.pressure_compensation
    }

    /// Resets the chip, checks its ID and loads the calibration data.
    ///
    /// On success the sensor is asleep with all registers at their reset
    /// values. On failure the driver stays uninitialized.
    pub fn init(&mut self) -> Result<(), E> {
        self.state = State::Uninitialized;
        self.calibration = None;

        self.soft_reset()?;

        let id = self.read_reg(CHIP_ID)?;
        if id != EXPECTED_CHIP_ID {
            warn!(
                "unexpected chip id 0x{:02X}, expected 0x{:02X}",
                id,
                EXPECTED_CHIP_ID
            );
            return Err(Error::Id(id));
        }

        let calibration = self.read_calibration()?;
        trace!("calibration: {:?}", calibration);

        self.calibration = Some(calibration);
        self.state = State::Sleep;
        debug!("bme280 initialized");
        Ok(())
    }

    /// Power-on resets the chip. All settings return to their defaults.
    pub fn reset(&mut self) -> Result<(), E> {
        self.ensure_initialized()?;
        self.soft_reset()?;
        self.state = State::Sleep;
        Ok(())
    }

    /// Writes every setting at once.
    ///
    /// The registers are written in the order ctrl_hum, config, ctrl_meas.
    /// If a write fails the earlier ones stay applied.
    pub fn configure_all(&mut self, config: &Config) -> Result<(), E> {
        self.ensure_sleep()?;

        let regs = encode_config(config);
        debug!(
            "configure: ctrl_hum=0x{:02X} config=0x{:02X} ctrl_meas=0x{:02X}",
            regs.ctrl_hum, regs.config, regs.ctrl_meas
        );
        self.write_reg(CTRL_HUM, regs.ctrl_hum)?;
        self.write_reg(CONFIG, regs.config)?;
        self.write_reg(CTRL_MEAS, regs.ctrl_meas)?;

        self.state = config.mode.into();
        Ok(())
    }

    /// Switches the power mode. Allowed from any mode.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), E> {
        self.ensure_initialized()?;
        self.update_reg(CTRL_MEAS, |reg| with_mode(reg, mode))?;
        self.state = mode.into();
        Ok(())
    }

    /// Reads the mode from the chip and updates the cached state.
    ///
    /// A forced measurement that has finished reads back as sleep.
    pub fn get_mode(&mut self) -> Result<Mode, E> {
        self.ensure_initialized()?;
        let mode = decode_mode(self.read_reg(CTRL_MEAS)?);
        self.state = mode.into();
        Ok(mode)
    }

    pub fn set_temperature_oversampling(&mut self, osrs: Oversampling) -> Result<(), E> {
        self.ensure_sleep()?;
        self.update_reg(CTRL_MEAS, |reg| with_osrs_t(reg, osrs))?;
        Ok(())
    }

    pub fn get_temperature_oversampling(&mut self) -> Result<Oversampling, E> {
        self.ensure_initialized()?;
        Ok(decode_osrs_t(self.read_reg(CTRL_MEAS)?))
    }

    pub fn set_pressure_oversampling(&mut self, osrs: Oversampling) -> Result<(), E> {
        self.ensure_sleep()?;
        self.update_reg(CTRL_MEAS, |reg| with_osrs_p(reg, osrs))?;
        Ok(())
    }

    pub fn get_pressure_oversampling(&mut self) -> Result<Oversampling, E> {
        self.ensure_initialized()?;
        Ok(decode_osrs_p(self.read_reg(CTRL_MEAS)?))
    }

    /// Changes humidity oversampling.
    ///
    /// The chip only applies ctrl_hum after a write to ctrl_meas, so that
    /// register is written back unchanged afterwards.
    pub fn set_humidity_oversampling(&mut self, osrs: Oversampling) -> Result<(), E> {
        self.ensure_sleep()?;
        if self.update_reg(CTRL_HUM, |reg| encode_ctrl_hum(reg, osrs))? {
            let ctrl_meas = self.read_reg(CTRL_MEAS)?;
            self.write_reg(CTRL_MEAS, ctrl_meas)?;
        }
        Ok(())
    }

    pub fn get_humidity_oversampling(&mut self) -> Result<Oversampling, E> {
        self.ensure_initialized()?;
        Ok(decode_osrs_h(self.read_reg(CTRL_HUM)?))
    }

    pub fn set_standby_time(&mut self, standby: StandbyTime) -> Result<(), E> {
        self.ensure_sleep()?;
        self.update_reg(CONFIG, |reg| with_standby(reg, standby))?;
        Ok(())
    }

    pub fn get_standby_time(&mut self) -> Result<StandbyTime, E> {
        self.ensure_initialized()?;
        Ok(decode_standby(self.read_reg(CONFIG)?))
    }

    pub fn set_filter(&mut self, filter: Filter) -> Result<(), E> {
        self.ensure_sleep()?;
        self.update_reg(CONFIG, |reg| with_filter(reg, filter))?;
        Ok(())
    }

    pub fn get_filter(&mut self) -> Result<Filter, E> {
        self.ensure_initialized()?;
        Ok(decode_filter(self.read_reg(CONFIG)?))
    }

    pub fn enable_3wire_spi(&mut self) -> Result<(), E> {
        self.ensure_sleep()?;
        self.update_reg(CONFIG, |reg| with_spi3w(reg, true))?;
        Ok(())
    }

    pub fn disable_3wire_spi(&mut self) -> Result<(), E> {
        self.ensure_sleep()?;
        self.update_reg(CONFIG, |reg| with_spi3w(reg, false))?;
        Ok(())
    }

    pub fn is_3wire_spi_enabled(&mut self) -> Result<bool, E> {
        self.ensure_initialized()?;
        Ok(decode_spi3w(self.read_reg(CONFIG)?))
    }

    /// Latest temperature of a sensor running in normal mode.
    pub fn read_last_temperature(&mut self) -> Result<Temperature, E> {
        self.ensure_normal()?;
        self.measure_temperature()
    }

    pub fn read_last_temperature_f(&mut self) -> Result<f32, E> {
        Ok(self.read_last_temperature()?.as_celsius())
    }

    /// Latest pressure of a sensor running in normal mode.
    pub fn read_last_pressure(&mut self) -> Result<Pressure, E> {
        self.ensure_normal()?;
        self.measure_pressure()
    }

    pub fn read_last_pressure_f(&mut self) -> Result<f32, E> {
        Ok(self.read_last_pressure()?.as_hpa())
    }

    /// Latest humidity of a sensor running in normal mode.
    pub fn read_last_humidity(&mut self) -> Result<Humidity, E> {
        self.ensure_normal()?;
        self.measure_humidity()
    }

    pub fn read_last_humidity_f(&mut self) -> Result<f32, E> {
        Ok(self.read_last_humidity()?.as_percent())
    }

    /// Latest sample of all three channels of a sensor in normal mode.
    pub fn read_last_all(&mut self) -> Result<Measurement, E> {
        self.ensure_normal()?;
        self.measure_all()
    }

    pub fn read_last_all_f(&mut self) -> Result<MeasurementF, E> {
        Ok(self.read_last_all()?.into())
    }

    /// Runs one forced measurement and returns its temperature.
    pub fn read_forced_temperature(&mut self) -> Result<Temperature, E> {
        self.ensure_sleep()?;
        self.force_measurement()?;
        self.measure_temperature()
    }

    pub fn read_forced_temperature_f(&mut self) -> Result<f32, E> {
        Ok(self.read_forced_temperature()?.as_celsius())
    }

    pub fn read_forced_pressure(&mut self) -> Result<Pressure, E> {
        self.ensure_sleep()?;
        self.force_measurement()?;
        self.measure_pressure()
    }

    pub fn read_forced_pressure_f(&mut self) -> Result<f32, E> {
        Ok(self.read_forced_pressure()?.as_hpa())
    }

    pub fn read_forced_humidity(&mut self) -> Result<Humidity, E> {
        self.ensure_sleep()?;
        self.force_measurement()?;
        self.measure_humidity()
    }

    pub fn read_forced_humidity_f(&mut self) -> Result<f32, E> {
        Ok(self.read_forced_humidity()?.as_percent())
    }

    pub fn read_forced_all(&mut self) -> Result<Measurement, E> {
        self.ensure_sleep()?;
        self.force_measurement()?;
        self.measure_all()
    }

    pub fn read_forced_all_f(&mut self) -> Result<MeasurementF, E> {
        Ok(self.read_forced_all()?.into())
    }

    fn ensure_initialized(&self) -> Result<(), E> {
        match self.state {
            State::Uninitialized => Err(Error::NotInitialized),
            _ => Ok(()),
        }
    }

    fn ensure_sleep(&self) -> Result<(), E> {
        self.ensure_initialized()?;
        match self.state {
            State::Sleep => Ok(()),
            _ => Err(Error::Condition),
        }
    }

    fn ensure_normal(&self) -> Result<(), E> {
        self.ensure_initialized()?;
        match self.state {
            State::Normal => Ok(()),
            _ => Err(Error::Condition),
        }
    }

    fn coefficients(&self) -> Result<CalibrationCoefficients, E> {
        self.calibration.ok_or(Error::NotInitialized)
    }

    fn soft_reset(&mut self) -> Result<(), E> {
        debug!("soft reset");
        self.write_reg(RESET, SOFT_RESET_COMMAND)?;
        self.interface.delay_ms(STARTUP_DELAY_MS);
        Ok(())
    }

    fn read_calibration(&mut self) -> Result<CalibrationCoefficients, E> {
        let mut block1 = [0u8; CALIB_BLOCK_1_LEN];
        let mut block2 = [0u8; CALIB_BLOCK_2_LEN];
        self.read_regs(CALIB_BLOCK_1, &mut block1)?;
        self.read_regs(CALIB_BLOCK_2, &mut block2)?;
        Ok(CalibrationCoefficients::parse(&block1, &block2))
    }

    fn read_reg(&mut self, register: u8) -> Result<u8, E> {
        let mut buffer = [0u8; 1];
        self.read_regs(register, &mut buffer)?;
        Ok(buffer[0])
    }

    fn read_regs(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), E> {
        self.interface.read(register, buffer).map_err(Error::Interface)
    }

    fn write_reg(&mut self, register: u8, value: u8) -> Result<(), E> {
        debug!("write 0x{:02X} <- 0x{:02X}", register, value);
        self.interface.write(register, value).map_err(Error::Interface)
    }

    /// Read-modify-write of one register. The write is skipped when `update`
    /// leaves the value unchanged. Returns whether a write happened.
    fn update_reg<F>(&mut self, register: u8, update: F) -> Result<bool, E>
    where
        F: FnOnce(u8) -> u8,
    {
        let current = self.read_reg(register)?;
        let updated = update(current);
        if updated == current {
            debug!("0x{:02X} already 0x{:02X}, not writing", register, current);
            return Ok(false);
        }
        self.write_reg(register, updated)?;
        Ok(true)
    }

    /// Starts a forced cycle and waits until the chip is back to sleep.
    fn force_measurement(&mut self) -> Result<(), E> {
        let ctrl_hum = self.read_reg(CTRL_HUM)?;
        let ctrl_meas = self.read_reg(CTRL_MEAS)?;
        self.write_reg(CTRL_MEAS, with_mode(ctrl_meas, Mode::Forced))?;
        self.state = State::Forced;

        let wait = max_measurement_time_ms(
            decode_osrs_t(ctrl_meas),
            decode_osrs_p(ctrl_meas),
            decode_osrs_h(ctrl_hum),
        );
        self.interface.delay_ms(wait);

        for _ in 0..BUSY_POLL_LIMIT {
            if self.read_reg(STATUS)? & STATUS_MEASURING == 0 {
                self.state = State::Sleep;
                return Ok(());
            }
            self.interface.delay_ms(1);
        }
        warn!(
            "forced measurement still running after {} ms",
            wait + BUSY_POLL_LIMIT
        );
        Err(Error::Timeout)
    }

    fn compensate_t(&mut self, adc_t: u32, calib: &CalibrationCoefficients) -> Temperature {
        let (t_fine, temperature) = compensate_temperature(adc_t, calib);
        self.t_fine = t_fine;
        Temperature(temperature)
    }

    fn compensate_p(&self, adc_p: u32, calib: &CalibrationCoefficients) -> Pressure {
        compensate_pressure(self.pressure_compensation, adc_p, self.t_fine, calib)
    }

    fn compensate_h(&self, adc_h: u16, calib: &CalibrationCoefficients) -> Humidity {
        Humidity::from_q22_10(compensate_humidity(adc_h, self.t_fine, calib))
    }

    fn measure_temperature(&mut self) -> Result<Temperature, E> {
        let calib = self.coefficients()?;
        let mut buffer = [0u8; TEMP_LEN];
        self.read_regs(TEMP_MSB, &mut buffer)?;
        let adc_t = decode_adc20(&buffer);
        trace!("adc_t={}", adc_t);
        Ok(self.compensate_t(adc_t, &calib))
    }

    fn measure_pressure(&mut self) -> Result<Pressure, E> {
        let calib = self.coefficients()?;
        let mut buffer = [0u8; PRESS_LEN + TEMP_LEN];
        self.read_regs(PRESS_MSB, &mut buffer)?;
        let adc_p = decode_adc20(&[buffer[0], buffer[1], buffer[2]]);
        let adc_t = decode_adc20(&[buffer[3], buffer[4], buffer[5]]);
        trace!("adc_p={} adc_t={}", adc_p, adc_t);
        self.compensate_t(adc_t, &calib);
        Ok(self.compensate_p(adc_p, &calib))
    }

    fn measure_humidity(&mut self) -> Result<Humidity, E> {
        let calib = self.coefficients()?;
        let mut buffer = [0u8; TEMP_LEN + HUM_LEN];
        self.read_regs(TEMP_MSB, &mut buffer)?;
        let adc_t = decode_adc20(&[buffer[0], buffer[1], buffer[2]]);
        let adc_h = decode_adc16(&[buffer[3], buffer[4]]);
        trace!("adc_t={} adc_h={}", adc_t, adc_h);
        self.compensate_t(adc_t, &calib);
        Ok(self.compensate_h(adc_h, &calib))
    }

    fn measure_all(&mut self) -> Result<Measurement, E> {
        let calib = self.coefficients()?;
        let mut buffer = [0u8; PRESS_LEN + TEMP_LEN + HUM_LEN];
        self.read_regs(PRESS_MSB, &mut buffer)?;
        let raw = decode_raw(&buffer);
        trace!("raw sample: {:?}", raw);

        let temperature = self.compensate_t(raw.temperature, &calib);
        Ok(Measurement {
            temperature,
            pressure: self.compensate_p(raw.pressure, &calib),
            humidity: self.compensate_h(raw.humidity, &calib),
        })
    }
}
