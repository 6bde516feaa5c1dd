//! Temperature acquisition.
//!
//! An `AnalogSource` performs one oversampled conversion sequence. The
//! `OversampledSensor` waits for it, averages the sub-samples and maps the
//! result to whole degrees Celsius with the configured `SensorStrategy`.
//!
//! See [`TemperatureSensor`] for the contract the tick service relies on.

use core::convert::Infallible;

pub mod calibration;

pub use calibration::{LinearCalibration, LookupTable, NTC_10K_TABLE};

/// Sub-samples taken per conversion sequence.
pub const OVERSAMPLE: usize = 8;

/// Platform ADC capability.
///
/// Test doubles can report `WouldBlock` for a number of polls to simulate the
/// conversion time without real timing.
pub trait AnalogSource {
    /// Start one conversion sequence of [`OVERSAMPLE`] sub-samples.
    fn start_sequence(&mut self);

    /// Poll for the finished sequence.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` while the conversion is running.
    fn read_sequence(&mut self) -> nb::Result<[u16; OVERSAMPLE], Infallible>;
}

/// Source of calibrated temperature readings.
pub trait TemperatureSensor {
    /// Take one reading in whole degrees Celsius.
    ///
    /// Blocks for the duration of the conversion. Must be deterministic and
    /// free of side effects other than the conversion itself.
    fn read_temperature(&mut self) -> i16;
}

/// Mapping from the averaged raw value to a temperature.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorStrategy {
    /// Affine transform against a reference
    Linear(LinearCalibration),
    /// Search in a precomputed raw-to-temperature table
    Lookup(LookupTable),
}

impl SensorStrategy {
    /// Convert an averaged raw value to whole degrees Celsius.
    pub fn to_celsius(&self, raw: u32) -> i16 {
        match self {
            SensorStrategy::Linear(cal) => cal.to_celsius(raw),
            SensorStrategy::Lookup(lut) => lut.to_celsius(raw),
        }
    }
}

/// Oversampling sensor front end.
///
/// The sub-samples of one sequence are summed and shifted right by
/// `shift`. A shift of 3 averages eight 12-bit samples; a shift of 5
/// additionally scales them down to 10 bits.
#[derive(Debug)]
pub struct OversampledSensor<A: AnalogSource> {
    adc: A,
    strategy: SensorStrategy,
    shift: u8,
    last_raw: Option<u32>,
}

impl<A: AnalogSource> OversampledSensor<A> {
    /// Create a sensor with a custom strategy and averaging shift.
    pub const fn new(adc: A, strategy: SensorStrategy, shift: u8) -> Self {
        Self {
            adc,
            strategy,
            shift,
            last_raw: None,
        }
    }

    /// Internal temperature diode with the internal-reference calibration.
    pub const fn internal_diode(adc: A) -> Self {
        Self::new(
            adc,
            SensorStrategy::Linear(LinearCalibration::INTERNAL_REFERENCE),
            3,
        )
    }

    /// External NTC divider with the 10 kOhm lookup table.
    pub const fn external_ntc(adc: A) -> Self {
        Self::new(adc, SensorStrategy::Lookup(LookupTable::NTC_10K), 5)
    }

    /// Active conversion strategy.
    pub fn strategy(&self) -> SensorStrategy {
        self.strategy
    }

    /// Averaged raw value of the last reading (for diagnostics).
    pub fn last_raw(&self) -> Option<u32> {
        self.last_raw
    }

    /// Access the underlying ADC.
    pub fn adc_mut(&mut self) -> &mut A {
        &mut self.adc
    }

    /// Run one conversion sequence and return the averaged raw value.
    pub fn read_raw(&mut self) -> u32 {
        self.adc.start_sequence();
        let samples = nb::block!(self.adc.read_sequence()).unwrap_or_else(|e| match e {});
        let sum: u32 = samples.iter().map(|&s| s as u32).sum();
        let raw = sum >> self.shift;
        self.last_raw = Some(raw);
        raw
    }
}

impl<A: AnalogSource> TemperatureSensor for OversampledSensor<A> {
    fn read_temperature(&mut self) -> i16 {
        let raw = self.read_raw();
        self.strategy.to_celsius(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ADC that needs `busy_polls` polls before each sequence completes.
    struct SlowAdc {
        value: u16,
        busy_polls: u32,
        remaining: u32,
        started: u32,
    }

    impl SlowAdc {
        fn new(value: u16, busy_polls: u32) -> Self {
            Self {
                value,
                busy_polls,
                remaining: 0,
                started: 0,
            }
        }
    }

    impl AnalogSource for SlowAdc {
        fn start_sequence(&mut self) {
            self.started += 1;
            self.remaining = self.busy_polls;
        }

        fn read_sequence(&mut self) -> nb::Result<[u16; OVERSAMPLE], Infallible> {
            if self.remaining > 0 {
                self.remaining -= 1;
                return Err(nb::Error::WouldBlock);
            }
            Ok([self.value; OVERSAMPLE])
        }
    }

    #[test]
    fn test_internal_diode_averages_eight_samples() {
        let mut sensor = OversampledSensor::internal_diode(SlowAdc::new(2934, 5));
        assert_eq!(sensor.read_temperature(), 24);
        assert_eq!(sensor.last_raw(), Some(2934));
        assert_eq!(sensor.adc_mut().started, 1);
    }

    #[test]
    fn test_external_ntc_scales_to_ten_bits() {
        // Eight 12-bit samples of 4 * raw10 sum to 32 * raw10
        let raw10 = NTC_10K_TABLE[60] + 1;
        let mut sensor = OversampledSensor::external_ntc(SlowAdc::new(raw10 * 4, 2));
        assert_eq!(sensor.read_temperature(), 20);
        assert_eq!(sensor.last_raw(), Some(raw10 as u32));
    }

    #[test]
    fn test_each_reading_starts_a_new_sequence() {
        let mut sensor = OversampledSensor::internal_diode(SlowAdc::new(2692, 0));
        sensor.read_temperature();
        sensor.read_temperature();
        assert_eq!(sensor.adc_mut().started, 2);
    }

    #[test]
    fn test_strategy_dispatch() {
        let linear = SensorStrategy::Linear(LinearCalibration::new(100, 1, 2));
        assert_eq!(linear.to_celsius(110), 5);

        let lookup = SensorStrategy::Lookup(LookupTable::NTC_10K);
        assert_eq!(lookup.to_celsius(0x3FF), -40);
    }
}
