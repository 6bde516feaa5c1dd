//! Configuration traits and implementations for request matching and field widths.
//!
//! The `DeviceConfig` trait allows compile-time configuration of the request
//! marker, the actuator command position and the digit widths used when
//! rendering numbers, without runtime overhead. Buffer sizes are const
//! generics with the defaults below.

/// Default receive window size in bytes.
pub const RX_WINDOW_SIZE: usize = 15;

/// Default number of samples kept in the history ring buffer (one hour).
pub const HISTORY_CAPACITY: usize = 60;

/// Device configuration trait defining request matching and number rendering.
///
/// All values are const (zero runtime cost).
pub trait DeviceConfig {
    /// Byte sequence that identifies an inbound request (default: `GET`)
    const REQUEST_MARKER: &'static [u8];

    /// Offset of the actuator command byte from the start of the marker (default: 8)
    const COMMAND_OFFSET: usize;

    /// Command byte that switches the actuator on (default: `'E'`)
    const ACTUATOR_ON: u8;

    /// Command byte that switches the actuator off (default: `'A'`)
    const ACTUATOR_OFF: u8;

    /// Digits before the decimal point for temperature fields (default: 2)
    const TEMPERATURE_DIGITS: u8;

    /// Digits for clock fields and series indices (default: 1)
    const TIME_DIGITS: u8;

    /// Digits for the calendar year (default: 3)
    const YEAR_DIGITS: u8;
}

/// Default configuration matching a browser request line.
///
/// `GET /?3=EIN` puts the command byte 8 bytes after the marker:
/// - REQUEST_MARKER: `GET`
/// - COMMAND_OFFSET: 8
/// - ACTUATOR_ON / ACTUATOR_OFF: `'E'` / `'A'`
/// - TEMPERATURE_DIGITS: 2
/// - TIME_DIGITS: 1
/// - YEAR_DIGITS: 3
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DefaultConfig;

impl DeviceConfig for DefaultConfig {
    const REQUEST_MARKER: &'static [u8] = b"GET";
    const COMMAND_OFFSET: usize = 8;
    const ACTUATOR_ON: u8 = b'E';
    const ACTUATOR_OFF: u8 = b'A';
    const TEMPERATURE_DIGITS: u8 = 2;
    const TIME_DIGITS: u8 = 1;
    const YEAR_DIGITS: u8 = 3;
}

/// Compact configuration for bridges forwarding a shortened request line.
///
/// Accepts `GET E` / `GET A`, with the command 4 bytes after the marker.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CompactConfig;

impl DeviceConfig for CompactConfig {
    const REQUEST_MARKER: &'static [u8] = b"GET";
    const COMMAND_OFFSET: usize = 4;
    const ACTUATOR_ON: u8 = b'E';
    const ACTUATOR_OFF: u8 = b'A';
    const TEMPERATURE_DIGITS: u8 = 2;
    const TIME_DIGITS: u8 = 1;
    const YEAR_DIGITS: u8 = 3;
}
