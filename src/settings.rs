use std::fmt;

use crate::error::ParamError;

/// Oversampling of one measurement channel.
///
/// Higher rates average more ADC samples per measurement, trading
/// conversion time and current for lower noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Oversampling {
    /// Channel is not measured.
    Skipped = 0,
    #[default]
    X1 = 1,
    X2 = 2,
    X4 = 3,
    X8 = 4,
    X16 = 5,
}

impl Oversampling {
    /// Decodes a 3-bit register field. Codes above 5 mean 16x on the chip.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Oversampling::Skipped,
            1 => Oversampling::X1,
            2 => Oversampling::X2,
            3 => Oversampling::X4,
            4 => Oversampling::X8,
            _ => Oversampling::X16,
        }
    }

    /// Maps a sample count (0, 1, 2, 4, 8 or 16) to a setting.
    pub fn from_factor(factor: u8) -> Result<Self, ParamError> {
        match factor {
            0 => Ok(Oversampling::Skipped),
            1 => Ok(Oversampling::X1),
            2 => Ok(Oversampling::X2),
            4 => Ok(Oversampling::X4),
            8 => Ok(Oversampling::X8),
            16 => Ok(Oversampling::X16),
            _ => Err(ParamError),
        }
    }

    /// Number of ADC samples taken, 0 when skipped.
    pub fn factor(self) -> u8 {
        match self {
            Oversampling::Skipped => 0,
            Oversampling::X1 => 1,
            Oversampling::X2 => 2,
            Oversampling::X4 => 4,
            Oversampling::X8 => 8,
            Oversampling::X16 => 16,
        }
    }
}

impl TryFrom<u8> for Oversampling {
    type Error = ParamError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > Oversampling::X16 as u8 {
            return Err(ParamError);
        }
        Ok(Oversampling::from_bits(value))
    }
}

/// Power mode of the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Mode {
    /// No measurements, lowest power. Registers are accessible.
    #[default]
    Sleep = 0b00,
    /// One measurement cycle, then back to sleep.
    Forced = 0b01,
    /// Continuous measurement cycles separated by the standby time.
    Normal = 0b11,
}

impl Mode {
    /// Decodes the 2-bit mode field. Both `01` and `10` mean forced.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0b00 => Mode::Sleep,
            0b11 => Mode::Normal,
            _ => Mode::Forced,
        }
    }
}

impl TryFrom<u8> for Mode {
    type Error = ParamError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0b00 => Ok(Mode::Sleep),
            0b01 => Ok(Mode::Forced),
            0b11 => Ok(Mode::Normal),
            _ => Err(ParamError),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Mode::Sleep => write!(f, "sleep"),
            Mode::Forced => write!(f, "forced"),
            Mode::Normal => write!(f, "normal"),
        }
    }
}

/// Inactive time between two measurements in normal mode.
///
/// The register codes are not ordered by duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum StandbyTime {
    #[default]
    Ms0_5 = 0,
    Ms62_5 = 1,
    Ms125 = 2,
    Ms250 = 3,
    Ms500 = 4,
    Ms1000 = 5,
    Ms10 = 6,
    Ms20 = 7,
}

impl StandbyTime {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => StandbyTime::Ms0_5,
            1 => StandbyTime::Ms62_5,
            2 => StandbyTime::Ms125,
            3 => StandbyTime::Ms250,
            4 => StandbyTime::Ms500,
            5 => StandbyTime::Ms1000,
            6 => StandbyTime::Ms10,
            _ => StandbyTime::Ms20,
        }
    }

    /// Picks the setting whose duration is exactly `ms` milliseconds.
    /// Any other duration is a `ParamError`, nothing is rounded.
    pub fn from_millis(ms: f32) -> Result<Self, ParamError> {
        // every valid duration is a whole number of tenths
        let tenths = ms * 10.0;
        if tenths.fract() != 0.0 {
            return Err(ParamError);
        }
        match tenths as u32 {
            5 => Ok(StandbyTime::Ms0_5),
            100 => Ok(StandbyTime::Ms10),
            200 => Ok(StandbyTime::Ms20),
            625 => Ok(StandbyTime::Ms62_5),
            1250 => Ok(StandbyTime::Ms125),
            2500 => Ok(StandbyTime::Ms250),
            5000 => Ok(StandbyTime::Ms500),
            10000 => Ok(StandbyTime::Ms1000),
            _ => Err(ParamError),
        }
    }

    /// Duration of the setting in milliseconds.
    pub fn as_millis(self) -> f32 {
        match self {
            StandbyTime::Ms0_5 => 0.5,
            StandbyTime::Ms62_5 => 62.5,
            StandbyTime::Ms125 => 125.0,
            StandbyTime::Ms250 => 250.0,
            StandbyTime::Ms500 => 500.0,
            StandbyTime::Ms1000 => 1000.0,
            StandbyTime::Ms10 => 10.0,
            StandbyTime::Ms20 => 20.0,
        }
    }
}

impl TryFrom<u8> for StandbyTime {
    type Error = ParamError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > StandbyTime::Ms20 as u8 {
            return Err(ParamError);
        }
        Ok(StandbyTime::from_bits(value))
    }
}

/// IIR filter coefficient applied to temperature and pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Filter {
    #[default]
    Off = 0,
    X2 = 1,
    X4 = 2,
    X8 = 3,
    X16 = 4,
}

impl Filter {
    /// Decodes the 3-bit filter field. Codes above 4 mean 16 on the chip.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Filter::Off,
            1 => Filter::X2,
            2 => Filter::X4,
            3 => Filter::X8,
            _ => Filter::X16,
        }
    }

    /// Maps a filter coefficient (0 for off, 2, 4, 8 or 16) to a setting.
    pub fn from_coefficient(coefficient: u8) -> Result<Self, ParamError> {
        match coefficient {
            0 => Ok(Filter::Off),
            2 => Ok(Filter::X2),
            4 => Ok(Filter::X4),
            8 => Ok(Filter::X8),
            16 => Ok(Filter::X16),
            _ => Err(ParamError),
        }
    }
}

impl TryFrom<u8> for Filter {
    type Error = ParamError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > Filter::X16 as u8 {
            return Err(ParamError);
        }
        Ok(Filter::from_bits(value))
    }
}

/// Which fixed-point pressure formula the driver runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PressureCompensation {
    /// 32-bit integer arithmetic, result in Pa.
    Fixed32,
    /// 64-bit intermediates, result in Q24.8 Pa.
    #[default]
    Fixed64,
}

/// Every setting of the sensor at once, as written by
/// [`Bme280::configure_all`](crate::Bme280::configure_all).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    pub oversampling_t: Oversampling,
    pub oversampling_p: Oversampling,
    pub oversampling_h: Oversampling,
    pub mode: Mode,
    pub standby: StandbyTime,
    pub filter: Filter,
    pub spi3w_enabled: bool,
}

/// Worst-case duration of one measurement cycle in ms, rounded up.
///
/// Datasheet appendix B: `1.25 + 2.3·T + (2.3·P + 0.575) + (2.3·H + 0.575)`,
/// where a skipped channel adds nothing.
pub fn max_measurement_time_ms(
    osrs_t: Oversampling,
    osrs_p: Oversampling,
    osrs_h: Oversampling,
) -> u32 {
    let channel = |osrs: Oversampling, overhead: u32| match osrs.factor() as u32 {
        0 => 0,
        n => 2300 * n + overhead,
    };
    let us = 1250 + channel(osrs_t, 0) + channel(osrs_p, 575) + channel(osrs_h, 575);
    (us + 999) / 1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measurement_time_follows_oversampling() {
        let skip = Oversampling::Skipped;
        assert_eq!(max_measurement_time_ms(skip, skip, skip), 2);
        assert_eq!(
            max_measurement_time_ms(Oversampling::X1, Oversampling::X1, Oversampling::X1),
            10
        );
        assert_eq!(
            max_measurement_time_ms(Oversampling::X16, Oversampling::X16, Oversampling::X16),
            113
        );
    }

    #[test]
    fn oversampling_decodes_reserved_codes_as_x16() {
        assert_eq!(Oversampling::from_bits(6), Oversampling::X16);
        assert_eq!(Oversampling::from_bits(7), Oversampling::X16);
        assert_eq!(Oversampling::try_from(6), Err(ParamError));
        assert_eq!(Oversampling::try_from(3), Ok(Oversampling::X4));
    }

    #[test]
    fn oversampling_factor_round_trips() {
        for factor in [0u8, 1, 2, 4, 8, 16] {
            let osrs = Oversampling::from_factor(factor).unwrap();
            assert_eq!(osrs.factor(), factor);
        }
        assert_eq!(Oversampling::from_factor(3), Err(ParamError));
    }

    #[test]
    fn mode_treats_both_forced_codes_alike() {
        assert_eq!(Mode::from_bits(0b01), Mode::Forced);
        assert_eq!(Mode::from_bits(0b10), Mode::Forced);
        assert_eq!(Mode::try_from(0b10), Err(ParamError));
        assert_eq!(Mode::try_from(0b11), Ok(Mode::Normal));
    }

    #[test]
    fn standby_codes_follow_the_register_table() {
        assert_eq!(StandbyTime::from_millis(0.5), Ok(StandbyTime::Ms0_5));
        assert_eq!(StandbyTime::from_millis(62.5), Ok(StandbyTime::Ms62_5));
        assert_eq!(StandbyTime::from_millis(500.0), Ok(StandbyTime::Ms500));
        assert_eq!(StandbyTime::from_millis(10.0), Ok(StandbyTime::Ms10));
        assert_eq!(StandbyTime::from_millis(42.0), Err(ParamError));
        assert_eq!(StandbyTime::from_millis(0.59), Err(ParamError));
        assert_eq!(StandbyTime::from_millis(10.09), Err(ParamError));
        assert_eq!(StandbyTime::from_millis(f32::NAN), Err(ParamError));
        assert_eq!(StandbyTime::Ms10 as u8, 6);
        assert_eq!(StandbyTime::Ms20 as u8, 7);
        assert_eq!(StandbyTime::from_bits(4).as_millis(), 500.0);
    }

    #[test]
    fn filter_rejects_unknown_coefficients() {
        assert_eq!(Filter::from_coefficient(2), Ok(Filter::X2));
        assert_eq!(Filter::from_coefficient(3), Err(ParamError));
        assert_eq!(Filter::from_bits(5), Filter::X16);
        assert_eq!(Filter::try_from(5), Err(ParamError));
    }

    #[test]
    fn default_config_is_sleeping_with_single_sampling() {
        let config = Config::default();
        assert_eq!(config.mode, Mode::Sleep);
        assert_eq!(config.oversampling_t, Oversampling::X1);
        assert_eq!(config.filter, Filter::Off);
        assert!(!config.spi3w_enabled);
    }
}
