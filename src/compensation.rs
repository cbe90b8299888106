//! Fixed-point compensation of raw ADC codes.
//!
//! The formulas are the integer reference code from the BME280 datasheet,
//! section 4.2.3 and 8.1/8.2. Intermediate overflow wraps exactly like the
//! 32/64-bit C reference, so every step uses wrapping arithmetic.
//!
//! Units of the results:
//!
//! | Type | Integer unit | Float unit |
//! |---|---|---|
//! | [`Temperature`] | 0.01 °C | °C |
//! | [`Pressure`], `Fixed32` | 0.01 hPa (Pa) | hPa |
//! | [`Pressure`], `Fixed64` | 0.0001 hPa | hPa |
//! | [`Humidity`] | 0.001 %RH | %RH |

use crate::calibration::CalibrationCoefficients;
use crate::settings::PressureCompensation;

/// Returns `(t_fine, temperature)`.
///
/// `temperature` is in hundredths of a degree Celsius. `t_fine` must be fed
/// to the pressure and humidity formulas of the same sample.
pub fn compensate_temperature(adc_t: u32, calib: &CalibrationCoefficients) -> (i32, i32) {
    let adc_t = adc_t as i32;
    let t1 = calib.dig_t1 as i32;
    let t2 = calib.dig_t2 as i32;
    let t3 = calib.dig_t3 as i32;

    let var1 = ((adc_t >> 3) - (t1 << 1)).wrapping_mul(t2) >> 11;
    let delta = (adc_t >> 4) - t1;
    let var2 = (delta.wrapping_mul(delta) >> 12).wrapping_mul(t3) >> 14;

    let t_fine = var1.wrapping_add(var2);
    let temperature = t_fine.wrapping_mul(5).wrapping_add(128) >> 8;
    (t_fine, temperature)
}

/// Pressure in Pa using only 32-bit arithmetic.
///
/// Returns 0 when the calibration makes the divisor vanish.
pub fn compensate_pressure_32(adc_p: u32, t_fine: i32, calib: &CalibrationCoefficients) -> u32 {
    let p1 = calib.dig_p1 as i32;
    let p2 = calib.dig_p2 as i32;
    let p3 = calib.dig_p3 as i32;
    let p4 = calib.dig_p4 as i32;
    let p5 = calib.dig_p5 as i32;
    let p6 = calib.dig_p6 as i32;
    let p7 = calib.dig_p7 as i32;
    let p8 = calib.dig_p8 as i32;
    let p9 = calib.dig_p9 as i32;

    let mut var1 = (t_fine >> 1) - 64000;
    let quarter_sq = (var1 >> 2).wrapping_mul(var1 >> 2);
    let mut var2 = (quarter_sq >> 11).wrapping_mul(p6);
    var2 = var2.wrapping_add(var1.wrapping_mul(p5) << 1);
    var2 = (var2 >> 2).wrapping_add(p4 << 16);
    let p3_term = p3.wrapping_mul(quarter_sq >> 13) >> 3;
    var1 = p3_term.wrapping_add(p2.wrapping_mul(var1) >> 1) >> 18;
    var1 = (32768i32.wrapping_add(var1)).wrapping_mul(p1) >> 15;

    if var1 == 0 {
        return 0;
    }

    let mut p = 1_048_576u32
        .wrapping_sub(adc_p)
        .wrapping_sub((var2 >> 12) as u32)
        .wrapping_mul(3125);
    if p < 0x8000_0000 {
        p = (p << 1) / var1 as u32;
    } else {
        p = (p / var1 as u32).wrapping_mul(2);
    }

    let var1 = p9.wrapping_mul(((p >> 3).wrapping_mul(p >> 3) >> 13) as i32) >> 12;
    let var2 = ((p >> 2) as i32).wrapping_mul(p8) >> 13;
    (p as i32).wrapping_add(var1.wrapping_add(var2).wrapping_add(p7) >> 4) as u32
}

/// Pressure in Pa as unsigned Q24.8 using 64-bit intermediates.
///
/// Returns 0 when the calibration makes the divisor vanish.
pub fn compensate_pressure_64(adc_p: u32, t_fine: i32, calib: &CalibrationCoefficients) -> u32 {
    let p1 = calib.dig_p1 as i64;
    let p2 = calib.dig_p2 as i64;
    let p3 = calib.dig_p3 as i64;
    let p4 = calib.dig_p4 as i64;
    let p5 = calib.dig_p5 as i64;
    let p6 = calib.dig_p6 as i64;
    let p7 = calib.dig_p7 as i64;
    let p8 = calib.dig_p8 as i64;
    let p9 = calib.dig_p9 as i64;

    let mut var1 = t_fine as i64 - 128_000;
    let mut var2 = var1.wrapping_mul(var1).wrapping_mul(p6);
    var2 = var2.wrapping_add(var1.wrapping_mul(p5) << 17);
    var2 = var2.wrapping_add(p4 << 35);
    var1 = (var1.wrapping_mul(var1).wrapping_mul(p3) >> 8)
        .wrapping_add(var1.wrapping_mul(p2) << 12);
    var1 = (1i64 << 47).wrapping_add(var1).wrapping_mul(p1) >> 33;

    if var1 == 0 {
        return 0;
    }

    let mut p = 1_048_576 - adc_p as i64;
    p = (p << 31).wrapping_sub(var2).wrapping_mul(3125).wrapping_div(var1);
    let var1 = p9.wrapping_mul(p >> 13).wrapping_mul(p >> 13) >> 25;
    let var2 = p8.wrapping_mul(p) >> 19;
    p = (p.wrapping_add(var1).wrapping_add(var2) >> 8).wrapping_add(p7 << 4);
    p as u32
}

/// Relative humidity as unsigned Q22.10 percent.
///
/// The intermediate is clamped to `[0, 419430400]`, i.e. 0 to 100 %RH.
pub fn compensate_humidity(adc_h: u16, t_fine: i32, calib: &CalibrationCoefficients) -> u32 {
    let adc_h = adc_h as i32;
    let h1 = calib.dig_h1 as i32;
    let h2 = calib.dig_h2 as i32;
    let h3 = calib.dig_h3 as i32;
    let h4 = calib.dig_h4 as i32;
    let h5 = calib.dig_h5 as i32;
    let h6 = calib.dig_h6 as i32;

    let x = t_fine.wrapping_sub(76_800);

    let offset = (adc_h << 14)
        .wrapping_sub(h4 << 20)
        .wrapping_sub(h5.wrapping_mul(x))
        .wrapping_add(16_384)
        >> 15;
    let quadratic =
        (x.wrapping_mul(h6) >> 10).wrapping_mul((x.wrapping_mul(h3) >> 11).wrapping_add(32_768));
    let scale = ((quadratic >> 10).wrapping_add(2_097_152))
        .wrapping_mul(h2)
        .wrapping_add(8_192)
        >> 14;

    let mut v = offset.wrapping_mul(scale);
    v = v.wrapping_sub(((v >> 15).wrapping_mul(v >> 15) >> 7).wrapping_mul(h1) >> 4);
    let v = v.clamp(0, 419_430_400);
    (v >> 12) as u32
}

/// Temperature in hundredths of a degree Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Temperature(pub i32);

impl Temperature {
    /// Splits into whole degrees and hundredths, both carrying the sign.
    ///
    /// ```rust
    /// use bme280_driver::Temperature;
    /// assert_eq!(Temperature(2508).split(), (25, 8));
    /// assert_eq!(Temperature(-525).split(), (-5, -25));
    /// ```
    pub fn split(&self) -> (i32, i32) {
        (self.0 / 100, self.0 % 100)
    }

    /// Degrees Celsius.
    pub fn as_celsius(&self) -> f32 {
        self.0 as f32 / 100.0
    }
}

/// Atmospheric pressure, scaled according to the formula that produced it.
///
/// * `Fixed32`: `value` is Pa, i.e. hundredths of hPa.
/// * `Fixed64`: `value` is ten-thousandths of hPa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pressure {
    value: u32,
    compensation: PressureCompensation,
}

impl Pressure {
    /// Wraps the result of [`compensate_pressure_32`].
    pub fn from_pascal(pa: u32) -> Self {
        Pressure {
            value: pa,
            compensation: PressureCompensation::Fixed32,
        }
    }

    /// Wraps the Q24.8 result of [`compensate_pressure_64`].
    pub fn from_q24_8(q24_8: u32) -> Self {
        Pressure {
            value: ((q24_8 as u64 * 100) >> 8) as u32,
            compensation: PressureCompensation::Fixed64,
        }
    }

    /// Raw fixed-point value, in the unit given by [`compensation`](Pressure::compensation).
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Formula the value came from, which also fixes its scale.
    pub fn compensation(&self) -> PressureCompensation {
        self.compensation
    }

    /// Splits into whole hPa and the fraction: hundredths for `Fixed32`,
    /// thousandths for `Fixed64`.
    ///
    /// ```rust
    /// use bme280_driver::Pressure;
    /// assert_eq!(Pressure::from_pascal(101325).split(), (1013, 25));
    /// ```
    pub fn split(&self) -> (u32, u32) {
        match self.compensation {
            PressureCompensation::Fixed32 => (self.value / 100, self.value % 100),
            PressureCompensation::Fixed64 => (self.value / 10_000, (self.value % 10_000) / 10),
        }
    }

    /// Hectopascal.
    pub fn as_hpa(&self) -> f32 {
        match self.compensation {
            PressureCompensation::Fixed32 => self.value as f32 / 100.0,
            PressureCompensation::Fixed64 => self.value as f32 / 10_000.0,
        }
    }
}

/// Relative humidity in thousandths of a percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Humidity(pub u32);

impl Humidity {
    /// Wraps the Q22.10 result of [`compensate_humidity`].
    pub fn from_q22_10(q22_10: u32) -> Self {
        Humidity(((q22_10 as u64 * 1000) >> 10) as u32)
    }

    /// ```rust
    /// use bme280_driver::Humidity;
    /// assert_eq!(Humidity(54997).split(), (54, 997));
    /// ```
    pub fn split(&self) -> (u32, u32) {
        (self.0 / 1000, self.0 % 1000)
    }

    /// Percent relative humidity.
    pub fn as_percent(&self) -> f32 {
        self.0 as f32 / 1000.0
    }
}

/// One compensated sample in fixed-point units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub temperature: Temperature,
    pub pressure: Pressure,
    pub humidity: Humidity,
}

/// One compensated sample in °C, hPa and %RH.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeasurementF {
    pub temperature: f32,
    pub pressure: f32,
    pub humidity: f32,
}

impl From<Measurement> for MeasurementF {
    fn from(m: Measurement) -> Self {
        MeasurementF {
            temperature: m.temperature.as_celsius(),
            pressure: m.pressure.as_hpa(),
            humidity: m.humidity.as_percent(),
        }
    }
}

/// Runs the pressure formula selected by `compensation`.
pub fn compensate_pressure(
    compensation: PressureCompensation,
    adc_p: u32,
    t_fine: i32,
    calib: &CalibrationCoefficients,
) -> Pressure {
    match compensation {
        PressureCompensation::Fixed32 => {
            Pressure::from_pascal(compensate_pressure_32(adc_p, t_fine, calib))
        }
        PressureCompensation::Fixed64 => {
            Pressure::from_q24_8(compensate_pressure_64(adc_p, t_fine, calib))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::tests::datasheet_calibration;

    const ADC_T: u32 = 519888;
    const ADC_P: u32 = 415148;

    #[test]
    fn temperature_matches_datasheet_example() {
        let (t_fine, t) = compensate_temperature(ADC_T, &datasheet_calibration());
        assert_eq!(t_fine, 128422);
        assert_eq!(t, 2508);
        assert_eq!(Temperature(t).split(), (25, 8));
    }

    #[test]
    fn pressure_32_bit_reference_value() {
        let calib = datasheet_calibration();
        let (t_fine, _) = compensate_temperature(ADC_T, &calib);
        assert_eq!(compensate_pressure_32(ADC_P, t_fine, &calib), 100656);
    }

    #[test]
    fn pressure_64_bit_reference_value() {
        let calib = datasheet_calibration();
        let (t_fine, _) = compensate_temperature(ADC_T, &calib);
        let q = compensate_pressure_64(ADC_P, t_fine, &calib);
        assert_eq!(q, 25767233);

        let pressure = Pressure::from_q24_8(q);
        assert_eq!(pressure.value(), 10065325);
        assert_eq!(pressure.split(), (1006, 532));
    }

    #[test]
    fn humidity_reference_values() {
        let calib = datasheet_calibration();
        let (t_fine, _) = compensate_temperature(ADC_T, &calib);

        let q = compensate_humidity(30000, t_fine, &calib);
        assert_eq!(q, 56317);
        assert_eq!(Humidity::from_q22_10(q), Humidity(54997));

        let q = compensate_humidity(25000, t_fine, &calib);
        assert_eq!(q, 27726);
        assert_eq!(Humidity::from_q22_10(q).split(), (27, 76));
    }

    #[test]
    fn humidity_conversion_does_not_overflow() {
        assert_eq!(Humidity::from_q22_10(5_000_000), Humidity(4_882_812));
        assert_eq!(Humidity::from_q22_10(u32::MAX), Humidity(4_194_303_999));
        assert_eq!(Humidity::from_q22_10(102_400), Humidity(100_000));
    }

    #[test]
    fn humidity_is_clamped_to_full_scale() {
        let calib = datasheet_calibration();
        let (t_fine, _) = compensate_temperature(ADC_T, &calib);
        assert_eq!(compensate_humidity(0, t_fine, &calib), 0);
        assert_eq!(
            compensate_humidity(u16::MAX, t_fine, &calib),
            419_430_400 >> 12
        );
    }

    #[test]
    fn zero_divisor_yields_zero_pressure() {
        let calib = CalibrationCoefficients {
            dig_p1: 0,
            ..datasheet_calibration()
        };
        let (t_fine, _) = compensate_temperature(ADC_T, &calib);
        assert_eq!(compensate_pressure_32(ADC_P, t_fine, &calib), 0);
        assert_eq!(compensate_pressure_64(ADC_P, t_fine, &calib), 0);

        let zeroed = CalibrationCoefficients::default();
        assert_eq!(compensate_pressure_32(ADC_P, 0, &zeroed), 0);
        assert_eq!(compensate_pressure_64(ADC_P, 0, &zeroed), 0);
    }

    #[test]
    fn fixed32_pressure_splits_in_hundredths() {
        let pressure = Pressure::from_pascal(100656);
        assert_eq!(pressure.split(), (1006, 56));
        assert!((pressure.as_hpa() - 1006.56).abs() < 0.001);
    }

    #[test]
    fn float_conversion_uses_same_scale() {
        let m = Measurement {
            temperature: Temperature(2508),
            pressure: Pressure::from_q24_8(25767233),
            humidity: Humidity(54997),
        };
        let f = MeasurementF::from(m);
        assert!((f.temperature - 25.08).abs() < 0.001);
        assert!((f.pressure - 1006.5325).abs() < 0.001);
        assert!((f.humidity - 54.997).abs() < 0.001);
    }
}
