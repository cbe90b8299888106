//! Packing of settings into the control registers and unpacking of the
//! raw ADC registers.

use crate::registers::*;
use crate::settings::{Config, Filter, Mode, Oversampling, StandbyTime};
use crate::utils::{cat_u16, cat_u20, get_bits, set_bits};

/// Register bytes for ctrl_hum, ctrl_meas and config, in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigRegisters {
    pub ctrl_hum: u8,
    pub ctrl_meas: u8,
    pub config: u8,
}

pub fn encode_config(config: &Config) -> ConfigRegisters {
    ConfigRegisters {
        ctrl_hum: encode_ctrl_hum(0, config.oversampling_h),
        ctrl_meas: encode_ctrl_meas(config.oversampling_t, config.oversampling_p, config.mode),
        config: encode_config_reg(config.standby, config.filter, config.spi3w_enabled),
    }
}

pub fn decode_config(regs: ConfigRegisters) -> Config {
    Config {
        oversampling_t: decode_osrs_t(regs.ctrl_meas),
        oversampling_p: decode_osrs_p(regs.ctrl_meas),
        oversampling_h: decode_osrs_h(regs.ctrl_hum),
        mode: decode_mode(regs.ctrl_meas),
        standby: decode_standby(regs.config),
        filter: decode_filter(regs.config),
        spi3w_enabled: decode_spi3w(regs.config),
    }
}

/// Updates the humidity oversampling of `ctrl_hum`, keeping the reserved bits.
pub fn encode_ctrl_hum(ctrl_hum: u8, osrs_h: Oversampling) -> u8 {
    set_bits(ctrl_hum, OSRS_H_MASK, OSRS_H_POS, osrs_h as u8)
}

pub fn encode_ctrl_meas(osrs_t: Oversampling, osrs_p: Oversampling, mode: Mode) -> u8 {
    let reg = set_bits(0, OSRS_T_MASK, OSRS_T_POS, osrs_t as u8);
    let reg = set_bits(reg, OSRS_P_MASK, OSRS_P_POS, osrs_p as u8);
    set_bits(reg, MODE_MASK, MODE_POS, mode as u8)
}

pub fn encode_config_reg(standby: StandbyTime, filter: Filter, spi3w_enabled: bool) -> u8 {
    let reg = set_bits(0, T_SB_MASK, T_SB_POS, standby as u8);
    let reg = set_bits(reg, FILTER_MASK, FILTER_POS, filter as u8);
    set_bits(reg, SPI3W_EN_MASK, SPI3W_EN_POS, spi3w_enabled as u8)
}

pub fn with_osrs_t(ctrl_meas: u8, osrs_t: Oversampling) -> u8 {
    set_bits(ctrl_meas, OSRS_T_MASK, OSRS_T_POS, osrs_t as u8)
}

pub fn with_osrs_p(ctrl_meas: u8, osrs_p: Oversampling) -> u8 {
    set_bits(ctrl_meas, OSRS_P_MASK, OSRS_P_POS, osrs_p as u8)
}

pub fn with_mode(ctrl_meas: u8, mode: Mode) -> u8 {
    set_bits(ctrl_meas, MODE_MASK, MODE_POS, mode as u8)
}

pub fn with_standby(config: u8, standby: StandbyTime) -> u8 {
    set_bits(config, T_SB_MASK, T_SB_POS, standby as u8)
}

pub fn with_filter(config: u8, filter: Filter) -> u8 {
    set_bits(config, FILTER_MASK, FILTER_POS, filter as u8)
}

pub fn with_spi3w(config: u8, enabled: bool) -> u8 {
    set_bits(config, SPI3W_EN_MASK, SPI3W_EN_POS, enabled as u8)
}

pub fn decode_osrs_h(ctrl_hum: u8) -> Oversampling {
    Oversampling::from_bits(get_bits(ctrl_hum, OSRS_H_MASK, OSRS_H_POS))
}

pub fn decode_osrs_t(ctrl_meas: u8) -> Oversampling {
    Oversampling::from_bits(get_bits(ctrl_meas, OSRS_T_MASK, OSRS_T_POS))
}

pub fn decode_osrs_p(ctrl_meas: u8) -> Oversampling {
    Oversampling::from_bits(get_bits(ctrl_meas, OSRS_P_MASK, OSRS_P_POS))
}

pub fn decode_mode(ctrl_meas: u8) -> Mode {
    Mode::from_bits(get_bits(ctrl_meas, MODE_MASK, MODE_POS))
}

pub fn decode_standby(config: u8) -> StandbyTime {
    StandbyTime::from_bits(get_bits(config, T_SB_MASK, T_SB_POS))
}

pub fn decode_filter(config: u8) -> Filter {
    Filter::from_bits(get_bits(config, FILTER_MASK, FILTER_POS))
}

pub fn decode_spi3w(config: u8) -> bool {
    get_bits(config, SPI3W_EN_MASK, SPI3W_EN_POS) != 0
}

/// Uncompensated ADC codes of one measurement cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawSample {
    pub pressure: u32,
    pub temperature: u32,
    pub humidity: u16,
}

/// Decodes a 20-bit pressure or temperature code from its 3 data registers.
pub fn decode_adc20(bytes: &[u8; 3]) -> u32 {
    cat_u20(bytes[0], bytes[1], bytes[2])
}

/// Decodes the 16-bit humidity code from its 2 data registers.
pub fn decode_adc16(bytes: &[u8; 2]) -> u16 {
    cat_u16(bytes[0], bytes[1])
}

/// Decodes the full 8-byte burst starting at the pressure msb register.
pub fn decode_raw(bytes: &[u8; 8]) -> RawSample {
    RawSample {
        pressure: cat_u20(bytes[0], bytes[1], bytes[2]),
        temperature: cat_u20(bytes[3], bytes[4], bytes[5]),
        humidity: cat_u16(bytes[6], bytes[7]),
    }
}
