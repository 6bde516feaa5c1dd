//! Test fixtures and utilities for serial-thermo testing.
//!
//! Provides:
//! - `MockTransport`: Transport with busy polls and output capture
//! - `MockAdc`: AnalogSource replaying scripted conversions
//! - `ScriptedSensor`: TemperatureSensor replaying scripted readings
//! - `MockPlatform`: Platform counting sleeps and recording the actuator
//! - `MockPage`: Small page template for cycle-heavy tests
//! - Request lines that fill exactly one receive window

#![allow(dead_code)]

use serial_thermo::response::{Fragment, PageTemplate, SeriesStyle};
use serial_thermo::sensor::{AnalogSource, NTC_10K_TABLE, OVERSAMPLE, TemperatureSensor};
use serial_thermo::{PendingWork, Platform, Transport};
use std::collections::VecDeque;
use std::convert::Infallible;

// ============================================================================
// Request lines (15 bytes = one receive window)
// ============================================================================

/// Browser request switching the actuator on.
pub const REQUEST_ON: &[u8] = b"GET /?3=EIN HTT";

/// Browser request switching the actuator off.
pub const REQUEST_OFF: &[u8] = b"GET /?3=AUS HTT";

/// Browser request without a command.
pub const REQUEST_PLAIN: &[u8] = b"GET / HTTP/1.1\r";

/// Window without the request marker.
pub const NOISE: &[u8] = b"Host: thermo\r\n\r";

// ============================================================================
// MockTransport - Test Transport Implementation
// ============================================================================

/// Transport error raised by `MockTransport::fail_after()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFault;

/// Mock serial transmitter.
///
/// Each byte is accepted only after `busy_polls` polls returned
/// `WouldBlock`, simulating the transmit register without real timing.
#[derive(Debug, Default)]
pub struct MockTransport {
    output: Vec<u8>,
    busy_polls: usize,
    remaining: usize,
    polls: usize,
    fail_after: Option<usize>,
}

impl MockTransport {
    /// Create a transport that accepts every byte immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that is busy for `polls` polls per byte.
    pub fn with_busy_polls(polls: usize) -> Self {
        Self {
            busy_polls: polls,
            remaining: polls,
            ..Self::default()
        }
    }

    /// Fail every write once `bytes` bytes have been accepted.
    pub fn fail_after(bytes: usize) -> Self {
        Self {
            fail_after: Some(bytes),
            ..Self::default()
        }
    }

    /// Captured output as string.
    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    /// Captured output as bytes.
    pub fn output_bytes(&self) -> &[u8] {
        &self.output
    }

    /// Clear output buffer.
    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    /// Total `write_byte` polls seen.
    pub fn polls(&self) -> usize {
        self.polls
    }

    /// Stop failing writes.
    pub fn repair(&mut self) {
        self.fail_after = None;
    }
}

impl Transport for MockTransport {
    type Error = LineFault;

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        self.polls += 1;
        if self.fail_after.is_some_and(|limit| self.output.len() >= limit) {
            return Err(nb::Error::Other(LineFault));
        }
        if self.remaining > 0 {
            self.remaining -= 1;
            return Err(nb::Error::WouldBlock);
        }
        self.remaining = self.busy_polls;
        self.output.push(byte);
        Ok(())
    }
}

// ============================================================================
// MockAdc - Scripted Conversions
// ============================================================================

/// Mock ADC replaying one 12-bit value per conversion sequence.
///
/// When the script runs out the last value repeats.
#[derive(Debug, Default)]
pub struct MockAdc {
    script: VecDeque<u16>,
    current: u16,
    busy_polls: u32,
    remaining: u32,
    sequences: usize,
}

impl MockAdc {
    /// Replay `values`, one per sequence.
    pub fn with_values(values: &[u16]) -> Self {
        Self {
            script: values.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Replay `values`, each conversion staying busy for `polls` polls.
    pub fn with_busy_polls(values: &[u16], polls: u32) -> Self {
        Self {
            busy_polls: polls,
            ..Self::with_values(values)
        }
    }

    /// Append values to the script.
    pub fn extend(&mut self, values: &[u16]) {
        self.script.extend(values.iter().copied());
    }

    /// Conversion sequences started so far.
    pub fn sequences(&self) -> usize {
        self.sequences
    }
}

impl AnalogSource for MockAdc {
    fn start_sequence(&mut self) {
        self.sequences += 1;
        self.remaining = self.busy_polls;
        if let Some(next) = self.script.pop_front() {
            self.current = next;
        }
    }

    fn read_sequence(&mut self) -> nb::Result<[u16; OVERSAMPLE], Infallible> {
        if self.remaining > 0 {
            self.remaining -= 1;
            return Err(nb::Error::WouldBlock);
        }
        Ok([self.current; OVERSAMPLE])
    }
}

/// 12-bit ADC sample that the NTC front end maps to `celsius`.
///
/// The NTC path sums eight samples and shifts by 5, so the 10-bit table
/// value is scaled by 4. One count above the table entry selects it.
pub fn ntc_sample_for(celsius: i16) -> u16 {
    let index = (celsius + 40) as usize;
    (NTC_10K_TABLE[index] + 1) * 4
}

// ============================================================================
// ScriptedSensor - Scripted Readings
// ============================================================================

/// Sensor replaying readings; repeats the last one when exhausted.
#[derive(Debug, Default)]
pub struct ScriptedSensor {
    script: VecDeque<i16>,
    last: i16,
    reads: usize,
}

impl ScriptedSensor {
    /// Replay `readings` in order.
    pub fn new(readings: &[i16]) -> Self {
        Self {
            script: readings.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Readings taken so far.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl TemperatureSensor for ScriptedSensor {
    fn read_temperature(&mut self) -> i16 {
        self.reads += 1;
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.last
    }
}

// ============================================================================
// MockPlatform
// ============================================================================

/// Platform recording every call.
///
/// Sleeps only when the pending register is empty at the time of the call,
/// as a platform masking interrupts around its wait does.
#[derive(Debug, Default)]
pub struct MockPlatform {
    pub init_calls: usize,
    pub sleeps: usize,
    pub sleeps_skipped: usize,
    pub actuator: Option<bool>,
    pub actuator_writes: usize,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Platform for MockPlatform {
    fn init(&mut self) {
        self.init_calls += 1;
    }

    fn sleep_until_interrupt(&mut self, pending: &PendingWork) {
        if pending.is_empty() {
            self.sleeps += 1;
        } else {
            self.sleeps_skipped += 1;
        }
    }

    fn set_actuator(&mut self, on: bool) {
        self.actuator = Some(on);
        self.actuator_writes += 1;
    }
}

// ============================================================================
// MockPage
// ============================================================================

/// Compact page: `<` CRLF, the series, then `>|T|H:M:S|state`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockPage;

const MOCK_PAGE: &[Fragment] = &[
    Fragment::Text("<\r\n"),
    Fragment::Series,
    Fragment::Text(">|"),
    Fragment::Temperature,
    Fragment::Text("|"),
    Fragment::Time,
    Fragment::Text("|"),
    Fragment::Actuator,
];

impl PageTemplate for MockPage {
    fn series_style(&self) -> SeriesStyle {
        SeriesStyle::Index
    }

    fn fragments(&self) -> &[Fragment] {
        MOCK_PAGE
    }

    fn actuator_text(&self, on: bool) -> &str {
        if on { "ON" } else { "OFF" }
    }
}
