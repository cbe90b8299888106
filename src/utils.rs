/// Joins two register bytes into an unsigned short.
pub fn cat_u16(msb: u8, lsb: u8) -> u16 {
    ((msb as u16) << 8) | lsb as u16
}

/// Joins two register bytes into a signed short.
pub fn cat_i16(msb: u8, lsb: u8) -> i16 {
    cat_u16(msb, lsb) as i16
}

/// Rebuilds a 20-bit ADC value from its msb, lsb and xlsb registers.
///
/// Only the upper nibble of `xlsb` carries data.
pub fn cat_u20(msb: u8, lsb: u8, xlsb: u8) -> u32 {
    ((msb as u32) << 12) | ((lsb as u32) << 4) | ((xlsb as u32) >> 4)
}

/// Replaces the bits selected by `mask` in `reg` with `value << pos`.
pub fn set_bits(reg: u8, mask: u8, pos: u8, value: u8) -> u8 {
    (reg & !mask) | ((value << pos) & mask)
}

/// Extracts the field selected by `mask` from `reg`.
pub fn get_bits(reg: u8, mask: u8, pos: u8) -> u8 {
    (reg & mask) >> pos
}
