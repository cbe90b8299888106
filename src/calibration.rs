use crate::registers::{CALIB_BLOCK_1_LEN, CALIB_BLOCK_2_LEN};
use crate::utils::{cat_i16, cat_u16};

/// Factory trimming parameters of one sensor.
///
/// Read once by [`Bme280::init`](crate::Bme280::init) and never changed
/// afterwards. Every compensation formula needs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalibrationCoefficients {
    pub dig_t1: u16,
    pub dig_t2: i16,
    pub dig_t3: i16,

    pub dig_p1: u16,
    pub dig_p2: i16,
    pub dig_p3: i16,
    pub dig_p4: i16,
    pub dig_p5: i16,
    pub dig_p6: i16,
    pub dig_p7: i16,
    pub dig_p8: i16,
    pub dig_p9: i16,

    pub dig_h1: u8,
    pub dig_h2: i16,
    pub dig_h3: u8,
    pub dig_h4: i16,
    pub dig_h5: i16,
    pub dig_h6: i8,
}

impl CalibrationCoefficients {
    /// Decodes the two calibration bursts, 0x88..=0xA0 and 0xE1..=0xE7.
    ///
    /// Sixteen bit values are stored lsb first. `dig_h4` and `dig_h5` are
    /// 12-bit signed values sharing register 0xE5: `dig_h4` takes its low
    /// nibble, `dig_h5` its high nibble.
    pub fn parse(
        block1: &[u8; CALIB_BLOCK_1_LEN],
        block2: &[u8; CALIB_BLOCK_2_LEN],
    ) -> CalibrationCoefficients {
        let b = block1;
        let h = block2;

        CalibrationCoefficients {
            dig_t1: cat_u16(b[1], b[0]),
            dig_t2: cat_i16(b[3], b[2]),
            dig_t3: cat_i16(b[5], b[4]),

            dig_p1: cat_u16(b[7], b[6]),
            dig_p2: cat_i16(b[9], b[8]),
            dig_p3: cat_i16(b[11], b[10]),
            dig_p4: cat_i16(b[13], b[12]),
            dig_p5: cat_i16(b[15], b[14]),
            dig_p6: cat_i16(b[17], b[16]),
            dig_p7: cat_i16(b[19], b[18]),
            dig_p8: cat_i16(b[21], b[20]),
            dig_p9: cat_i16(b[23], b[22]),

            dig_h1: b[24],
            dig_h2: cat_i16(h[1], h[0]),
            dig_h3: h[2],
            dig_h4: ((h[3] as i8 as i16) << 4) | (h[4] & 0x0F) as i16,
            dig_h5: ((h[5] as i8 as i16) << 4) | (h[4] >> 4) as i16,
            dig_h6: h[6] as i8,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Trimming values used as the worked example in the datasheet, with a
    /// plausible humidity set added.
    pub(crate) const DATASHEET_BLOCK_1: [u8; 25] = [
        0x70, 0x6B, // T1 27504
        0x43, 0x67, // T2 26435
        0x18, 0xFC, // T3 -1000
        0x7D, 0x8E, // P1 36477
        0x43, 0xD6, // P2 -10685
        0xD0, 0x0B, // P3 3024
        0x27, 0x0B, // P4 2855
        0x8C, 0x00, // P5 140
        0xF9, 0xFF, // P6 -7
        0x8C, 0x3C, // P7 15500
        0xF8, 0xC6, // P8 -14600
        0x70, 0x17, // P9 6000
        0x4B, // H1 75
    ];
    pub(crate) const DATASHEET_BLOCK_2: [u8; 7] = [
        0x6A, 0x01, // H2 362
        0x00, // H3 0
        0x13, // H4 msb
        0x29, // H5 low nibble | H4 low nibble
        0x03, // H5 msb
        0x1E, // H6 30
    ];

    pub(crate) fn datasheet_calibration() -> CalibrationCoefficients {
        CalibrationCoefficients::parse(&DATASHEET_BLOCK_1, &DATASHEET_BLOCK_2)
    }

    #[test]
    fn parses_datasheet_example() {
        let calib = datasheet_calibration();
        assert_eq!(calib.dig_t1, 27504);
        assert_eq!(calib.dig_t2, 26435);
        assert_eq!(calib.dig_t3, -1000);
        assert_eq!(calib.dig_p1, 36477);
        assert_eq!(calib.dig_p2, -10685);
        assert_eq!(calib.dig_p3, 3024);
        assert_eq!(calib.dig_p4, 2855);
        assert_eq!(calib.dig_p5, 140);
        assert_eq!(calib.dig_p6, -7);
        assert_eq!(calib.dig_p7, 15500);
        assert_eq!(calib.dig_p8, -14600);
        assert_eq!(calib.dig_p9, 6000);
        assert_eq!(calib.dig_h1, 75);
        assert_eq!(calib.dig_h2, 362);
        assert_eq!(calib.dig_h3, 0);
        assert_eq!(calib.dig_h4, 313);
        assert_eq!(calib.dig_h5, 50);
        assert_eq!(calib.dig_h6, 30);
    }

    #[test]
    fn every_byte_lands_in_its_coefficient() {
        let mut block1 = [0u8; 25];
        for (i, byte) in block1.iter_mut().enumerate() {
            *byte = i as u8 + 1;
        }
        let block2 = [0xA1, 0xB2, 0xC3, 0x12, 0x5A, 0x34, 0x81];
        let calib = CalibrationCoefficients::parse(&block1, &block2);

        assert_eq!(calib.dig_t1, 0x0201);
        assert_eq!(calib.dig_t2, 0x0403);
        assert_eq!(calib.dig_t3, 0x0605);
        assert_eq!(calib.dig_p1, 0x0807);
        assert_eq!(calib.dig_p2, 0x0A09);
        assert_eq!(calib.dig_p3, 0x0C0B);
        assert_eq!(calib.dig_p4, 0x0E0D);
        assert_eq!(calib.dig_p5, 0x100F);
        assert_eq!(calib.dig_p6, 0x1211);
        assert_eq!(calib.dig_p7, 0x1413);
        assert_eq!(calib.dig_p8, 0x1615);
        assert_eq!(calib.dig_p9, 0x1817);
        assert_eq!(calib.dig_h1, 0x19);
        assert_eq!(calib.dig_h2, 0xB2A1u16 as i16);
        assert_eq!(calib.dig_h3, 0xC3);
        assert_eq!(calib.dig_h4, 0x12A);
        assert_eq!(calib.dig_h5, 0x345);
        assert_eq!(calib.dig_h6, -127);
    }

    #[test]
    fn nibble_packed_humidity_values_are_sign_extended() {
        let block1 = [0u8; 25];
        // H4 = 0xF5:0xA -> -166, H5 = 0x80:0x7 -> -2041
        let block2 = [0x00, 0x00, 0x00, 0xF5, 0x7A, 0x80, 0x00];
        let calib = CalibrationCoefficients::parse(&block1, &block2);
        assert_eq!(calib.dig_h4, -166);
        assert_eq!(calib.dig_h5, -2041);
    }
}
