//! Error types for device operations.
//!
//! Dropped receive input is counted in [`DropStats`](crate::device::DropStats)
//! rather than reported as an error. `DeviceError` covers the checked
//! formatter and configuration problems caught before the device starts.

use core::fmt;

/// Device error type.
///
/// None of these conditions halt the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// Value did not fit the requested field width
    FieldTruncated {
        /// Digits before the decimal point
        int_digits: u8,
        /// Digits after the decimal point
        frac_digits: u8,
    },

    /// Requested field does not fit the output buffer
    FieldTooWide {
        /// Digits before the decimal point
        int_digits: u8,
        /// Digits after the decimal point
        frac_digits: u8,
    },

    /// Configuration rejected before start-up
    InvalidConfig(heapless::String<64>),
}

impl DeviceError {
    /// Build an `InvalidConfig` error, truncating the message to fit.
    pub fn invalid_config(msg: &str) -> Self {
        let mut text = heapless::String::new();
        for ch in msg.chars() {
            if text.push(ch).is_err() {
                break;
            }
        }
        DeviceError::InvalidConfig(text)
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::FieldTruncated {
                int_digits,
                frac_digits,
            } => {
                if *frac_digits == 0 {
                    write!(f, "Value exceeds {} digits", int_digits)
                } else {
                    write!(f, "Value exceeds {}.{} digits", int_digits, frac_digits)
                }
            }
            DeviceError::FieldTooWide {
                int_digits,
                frac_digits,
            } => write!(
                f,
                "Field {}.{} exceeds the output buffer",
                int_digits, frac_digits
            ),
            DeviceError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DeviceError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            DeviceError::FieldTruncated {
                int_digits,
                frac_digits,
            } => defmt::write!(f, "FieldTruncated({=u8}.{=u8})", *int_digits, *frac_digits),
            DeviceError::FieldTooWide {
                int_digits,
                frac_digits,
            } => defmt::write!(f, "FieldTooWide({=u8}.{=u8})", *int_digits, *frac_digits),
            DeviceError::InvalidConfig(msg) => defmt::write!(f, "InvalidConfig({=str})", msg.as_str()),
        }
    }
}
