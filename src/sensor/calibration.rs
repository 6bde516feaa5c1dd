//! Raw-to-temperature calibration strategies.
//!
//! Both strategies are pure integer functions of the averaged ADC value.

/// Affine calibration: `(raw - offset) * gain / divisor`.
///
/// Uses signed arithmetic, so readings below `offset` give negative
/// temperatures. Division truncates toward zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinearCalibration {
    /// Raw value corresponding to 0 degC
    pub offset: i32,
    /// Multiplier applied after removing the offset
    pub gain: i32,
    /// Divisor applied after the gain
    pub divisor: i32,
}

impl LinearCalibration {
    /// Internal temperature diode against the 1.5 V internal reference
    /// (12-bit conversion).
    pub const INTERNAL_REFERENCE: Self = Self {
        offset: 2692,
        gain: 423,
        divisor: 4096,
    };

    /// Create a new calibration with custom parameters.
    pub const fn new(offset: i32, gain: i32, divisor: i32) -> Self {
        Self {
            offset,
            gain,
            divisor,
        }
    }

    /// Convert an averaged raw value to whole degrees Celsius.
    pub fn to_celsius(&self, raw: u32) -> i16 {
        if self.divisor == 0 {
            return 0;
        }
        let raw = raw.min(i32::MAX as u32) as i32;
        let scaled = (raw as i64 - self.offset as i64) * self.gain as i64 / self.divisor as i64;
        scaled.clamp(i16::MIN as i64, i16::MAX as i64) as i16
    }
}

/// Monotonic lookup table mapping raw values to temperatures.
///
/// `table[i]` is the raw value at `min + i` degC, ordered from coldest
/// (largest raw value) to warmest.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LookupTable {
    /// Raw values, strictly decreasing
    pub table: &'static [u16],
    /// Temperature of the first entry
    pub min: i16,
    /// Temperature reported when no entry is exceeded
    pub max: i16,
}

impl LookupTable {
    /// 10 kOhm NTC divider read at 10 bits, -40..79 degC.
    pub const NTC_10K: Self = Self {
        table: &NTC_10K_TABLE,
        min: -40,
        max: 79,
    };

    /// Create a new lookup table.
    pub const fn new(table: &'static [u16], min: i16, max: i16) -> Self {
        Self { table, min, max }
    }

    /// Convert a raw value to whole degrees Celsius.
    ///
    /// Scans from coldest to warmest; the first entry the raw value exceeds
    /// wins. Above the first entry the minimum is returned, below every entry
    /// the maximum.
    pub fn to_celsius(&self, raw: u32) -> i16 {
        match self.table.first() {
            Some(&coldest) if raw > coldest as u32 => return self.min,
            None => return self.max,
            _ => {}
        }

        self.table
            .iter()
            .position(|&entry| raw > entry as u32)
            .map(|index| self.min.saturating_add(index as i16))
            .unwrap_or(self.max)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LookupTable {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "LookupTable({=usize} entries, {=i16}..{=i16})",
            self.table.len(),
            self.min,
            self.max
        )
    }
}

/// Raw 10-bit readings of the NTC divider, one entry per degree from -40 degC.
pub const NTC_10K_TABLE: [u16; 120] = [
    0x3E9, 0x3E7, 0x3E5, 0x3E4, 0x3E2, 0x3DF, 0x3DD, 0x3DB, 0x3D8, 0x3D6, 0x3D3,
    0x3D0, 0x3CD, 0x3C9, 0x3C6, 0x3C2, 0x3BE, 0x3BA, 0x3B6, 0x3B2, 0x3AD, 0x3A8,
    0x3A3, 0x39D, 0x398, 0x392, 0x38C, 0x385, 0x37F, 0x378, 0x371, 0x36A, 0x362,
    0x35A, 0x352, 0x34A, 0x341, 0x338, 0x32F, 0x326, 0x31C, 0x312, 0x308, 0x2FE,
    0x2F4, 0x2E9, 0x2DE, 0x2D3, 0x2C8, 0x2BD, 0x2B1, 0x2A6, 0x29A, 0x28F, 0x283,
    0x277, 0x26B, 0x25F, 0x253, 0x247, 0x23B, 0x22F, 0x223, 0x217, 0x20B, 0x1FF,
    0x1F3, 0x1E8, 0x1DC, 0x1D1, 0x1C5, 0x1BA, 0x1AF, 0x1A4, 0x199, 0x18F, 0x184,
    0x17A, 0x170, 0x166, 0x15C, 0x153, 0x14A, 0x140, 0x137, 0x12F, 0x126, 0x11E,
    0x116, 0x10E, 0x106, 0x0FE, 0x0F7, 0x0F0, 0x0E9, 0x0E2, 0x0DB, 0x0D5, 0x0CF,
    0x0C9, 0x0C3, 0x0BD, 0x0B7, 0x0B2, 0x0AD, 0x0A8, 0x0A3, 0x09E, 0x099, 0x095,
    0x090, 0x08C, 0x088, 0x084, 0x080, 0x07C, 0x079, 0x075, 0x072, 0x06E,
];
