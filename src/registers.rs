//! Register map of the BME280.

pub const CHIP_ID: u8 = 0xD0;
pub const RESET: u8 = 0xE0;
pub const CALIB_BLOCK_1: u8 = 0x88;
pub const CALIB_BLOCK_2: u8 = 0xE1;
pub const CTRL_HUM: u8 = 0xF2;
pub const STATUS: u8 = 0xF3;
pub const CTRL_MEAS: u8 = 0xF4;
pub const CONFIG: u8 = 0xF5;
pub const PRESS_MSB: u8 = 0xF7;
pub const TEMP_MSB: u8 = 0xFA;
pub const HUM_MSB: u8 = 0xFD;

pub const CALIB_BLOCK_1_LEN: usize = 25;
pub const CALIB_BLOCK_2_LEN: usize = 7;

pub const PRESS_LEN: usize = 3;
pub const TEMP_LEN: usize = 3;
pub const HUM_LEN: usize = 2;

/// Value the chip reports at `CHIP_ID`.
pub const EXPECTED_CHIP_ID: u8 = 0x60;
/// Writing this to `RESET` triggers a power-on reset.
pub const SOFT_RESET_COMMAND: u8 = 0xB6;
/// Start-up time after a reset before the chip answers again.
pub const STARTUP_DELAY_MS: u32 = 2;

/// Set in `STATUS` while a conversion is running.
pub const STATUS_MEASURING: u8 = 0x08;

// ctrl_hum
pub const OSRS_H_MASK: u8 = 0x07;
pub const OSRS_H_POS: u8 = 0;

// ctrl_meas
pub const OSRS_T_MASK: u8 = 0xE0;
pub const OSRS_T_POS: u8 = 5;
pub const OSRS_P_MASK: u8 = 0x1C;
pub const OSRS_P_POS: u8 = 2;
pub const MODE_MASK: u8 = 0x03;
pub const MODE_POS: u8 = 0;

// config
pub const T_SB_MASK: u8 = 0xE0;
pub const T_SB_POS: u8 = 5;
pub const FILTER_MASK: u8 = 0x1C;
pub const FILTER_POS: u8 = 2;
pub const SPI3W_EN_MASK: u8 = 0x01;
pub const SPI3W_EN_POS: u8 = 0;

/// Default I2C address, SDO pin tied to GND.
pub const I2C_ADDRESS_SDO_LOW: u8 = 0x76;
/// Alternate I2C address, SDO pin tied to VDDIO.
pub const I2C_ADDRESS_SDO_HIGH: u8 = 0x77;
