//! Shared test helpers to reduce duplication across integration tests.

#![allow(dead_code)]

#[allow(clippy::duplicate_mod)]
#[path = "fixtures/mod.rs"]
pub mod fixtures;

use fixtures::{MockAdc, MockPage, MockPlatform, MockTransport, ScriptedSensor};
use serial_thermo::response::PageTemplate;
use serial_thermo::sensor::OversampledSensor;
use serial_thermo::{Clock, Device, PowerState, Scheduler};

/// Device with scripted readings.
pub type TestDevice = Device<ScriptedSensor>;

/// Device with the NTC front end on a mock ADC.
pub type NtcDevice = Device<OversampledSensor<MockAdc>>;

/// Scheduler over a test device.
pub type TestScheduler<'d, P = MockPage> =
    Scheduler<'d, ScriptedSensor, MockTransport, P, MockPlatform>;

// ============================================================================
// Device Creation Helpers
// ============================================================================

/// Create a device at 00:00:00 replaying `readings`.
pub fn create_test_device(readings: &[i16]) -> TestDevice {
    Device::new(ScriptedSensor::new(readings))
}

/// Create a device at `clock` replaying `readings`.
pub fn create_device_at(clock: Clock, readings: &[i16]) -> TestDevice {
    Device::with_clock(ScriptedSensor::new(readings), clock)
}

/// Create an NTC device at `clock` whose conversions read `celsius` in order.
pub fn create_ntc_device(clock: Clock, celsius: &[i16]) -> NtcDevice {
    let samples: Vec<u16> = celsius.iter().map(|&c| fixtures::ntc_sample_for(c)).collect();
    Device::with_clock(OversampledSensor::external_ntc(MockAdc::with_values(&samples)), clock)
}

/// Create a started scheduler with the mock page.
pub fn create_test_scheduler(device: &TestDevice) -> TestScheduler<'_> {
    create_scheduler_with_page(device, MockPage)
}

/// Create a started scheduler with `page`.
pub fn create_scheduler_with_page<P: PageTemplate>(
    device: &TestDevice,
    page: P,
) -> TestScheduler<'_, P> {
    let mut scheduler = Scheduler::new(device, MockTransport::new(), page, MockPlatform::new());
    scheduler.start();
    scheduler
}

// ============================================================================
// Interrupt Simulation Helpers
// ============================================================================

/// Deliver bytes through the receive interrupt. Returns true if any woke the scheduler.
pub fn deliver<S, C>(device: &Device<S, C>, bytes: &[u8]) -> bool
where
    S: serial_thermo::TemperatureSensor,
    C: serial_thermo::DeviceConfig,
{
    let mut woke = false;
    for &b in bytes {
        woke |= device.on_byte_received(b);
    }
    woke
}

/// Fire `n` tick interrupts.
pub fn tick_n<S, C>(device: &Device<S, C>, n: u32)
where
    S: serial_thermo::TemperatureSensor,
    C: serial_thermo::DeviceConfig,
{
    for _ in 0..n {
        device.on_tick();
    }
}

/// Poll until one dispatch cycle completed and return the captured reply.
pub fn dispatch_reply<P: PageTemplate>(scheduler: &mut TestScheduler<'_, P>) -> String {
    scheduler.transport_mut().clear_output();
    assert_eq!(scheduler.poll(), Ok(PowerState::Dispatch));
    scheduler.transport_mut().output()
}

// ============================================================================
// Reply Parsing Helpers
// ============================================================================

/// Split a reply into its header block and body at the first blank line.
pub fn split_reply(reply: &str) -> (&str, &str) {
    reply
        .split_once("\r\n\r\n")
        .expect("reply has no blank separator line")
}

/// Data series rows, trailing comma removed.
///
/// Column header rows such as `['Index', ...]` are skipped: a data row label
/// starts with a digit or the blank sign slot.
pub fn series_rows(body: &str) -> Vec<&str> {
    body.split("\r\n")
        .filter(|line| {
            line.starts_with("[new Date(")
                || line
                    .strip_prefix("['")
                    .and_then(|rest| rest.bytes().next())
                    .is_some_and(|b| b == b' ' || b.is_ascii_digit())
        })
        .map(|line| line.strip_suffix(',').unwrap_or(line))
        .collect()
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert that output contains all expected strings.
pub fn assert_contains_all(output: &str, expected: &[&str]) {
    for exp in expected {
        assert!(
            output.contains(exp),
            "Expected '{}' in output, got: {}",
            exp,
            output
        );
    }
}

/// Assert that output does NOT contain any of the strings.
pub fn assert_contains_none(output: &str, forbidden: &[&str]) {
    for forbid in forbidden {
        assert!(
            !output.contains(forbid),
            "Did not expect '{}' in output, got: {}",
            forbid,
            output
        );
    }
}
