//! Fixed-width decimal formatting for signed integers.
//!
//! Renders a value into a right-aligned field of `int_digits + frac_digits + 1`
//! visible characters followed by a NUL terminator, so the encoded field is
//! always `int_digits + frac_digits + 2` bytes long.
//!
//! Field layout:
//! - Without a fraction, the extra character is the sign slot in front of
//!   `int_digits` digit positions.
//! - With a fraction, the extra character is the decimal point written
//!   `int_digits` positions from the left. The sign then shares the integer
//!   positions, and at least one digit is kept in front of the point.
//!
//! The formatter performs no range validation. Digits that do not fit are
//! dropped from the most significant end (the sign goes first). Use
//! [`try_format()`] to detect that.
//!
//! [`format()`] renders into a [`FixedField`] of [`FIELD_CAPACITY`] bytes.
//! Wider fields go through [`format_into()`] with a caller-supplied buffer.

use crate::error::DeviceError;

/// Encoded length of a [`FixedField`], terminator included.
pub const FIELD_CAPACITY: usize = 32;

/// Placeholder written in front of positive values.
pub const DEFAULT_POSITIVE_SIGN: u8 = b' ';

/// Sign character written for an exact zero.
const ZERO_SIGN: u8 = b'0';

/// Field geometry: digits before and after the decimal point.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FormatSpec {
    /// Digits before the decimal point
    pub int_digits: u8,
    /// Digits after the decimal point (0 = no decimal point)
    pub frac_digits: u8,
}

impl FormatSpec {
    /// Create a new field geometry.
    pub const fn new(int_digits: u8, frac_digits: u8) -> Self {
        Self {
            int_digits,
            frac_digits,
        }
    }

    /// Integer-only field with `int_digits` digit positions.
    pub const fn integer(int_digits: u8) -> Self {
        Self::new(int_digits, 0)
    }

    /// Number of visible characters.
    pub const fn width(&self) -> usize {
        self.int_digits as usize + self.frac_digits as usize + 1
    }

    /// Encoded length: visible characters plus the NUL terminator.
    pub const fn encoded_len(&self) -> usize {
        self.width() + 1
    }

    /// Whether the field fits a [`FixedField`].
    pub const fn fits_fixed_field(&self) -> bool {
        self.encoded_len() <= FIELD_CAPACITY
    }
}

/// Formatted field with its NUL terminator.
#[derive(Clone, PartialEq, Eq)]
pub struct FixedField {
    buf: [u8; FIELD_CAPACITY],
    width: usize,
}

impl FixedField {
    /// Visible characters.
    pub fn as_str(&self) -> &str {
        // Only ASCII is ever written into the buffer
        core::str::from_utf8(self.as_bytes()).unwrap_or("")
    }

    /// Visible characters as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.width]
    }

    /// Visible characters followed by the NUL terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buf[..=self.width]
    }

    /// Number of visible characters.
    pub fn len(&self) -> usize {
        self.width
    }

    /// True for a zero-width field (spec wider than [`FIELD_CAPACITY`]).
    pub fn is_empty(&self) -> bool {
        self.width == 0
    }
}

impl core::fmt::Debug for FixedField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("FixedField").field(&self.as_str()).finish()
    }
}

impl core::fmt::Display for FixedField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format `value` with `int_digits` digits before and `frac_digits` after the point.
///
/// Positive values are padded with spaces, zero is rendered with `'0'` in
/// every position (sign slot included).
///
/// A spec whose encoded length exceeds [`FIELD_CAPACITY`] yields an empty
/// field; [`try_format()`] reports it as `FieldTooWide`.
///
/// # Examples
///
/// ```rust
/// use serial_thermo::format::format;
///
/// assert_eq!(format(23, 2, 0).as_str(), " 23");
/// assert_eq!(format(-5, 2, 0).as_str(), " -5");
/// assert_eq!(format(215, 2, 1).as_str(), "21.5");
/// assert_eq!(format(0, 2, 0).as_str(), "000");
/// ```
pub fn format(value: i32, int_digits: u8, frac_digits: u8) -> FixedField {
    format_with_sign(
        value,
        FormatSpec::new(int_digits, frac_digits),
        DEFAULT_POSITIVE_SIGN,
    )
}

/// Format `value` per `spec`, writing `positive_sign` in front of positive values.
pub fn format_with_sign(value: i32, spec: FormatSpec, positive_sign: u8) -> FixedField {
    fixed_field(value, spec, positive_sign).0
}

/// Render `value` into `buf` and return the encoded length (terminator included).
///
/// Writes exactly `spec.encoded_len()` bytes for any spec. Fails with
/// `DeviceError::FieldTooWide` if `buf` is shorter than that. Truncation of
/// the value itself stays silent, as with [`format()`].
pub fn format_into(
    buf: &mut [u8],
    value: i32,
    spec: FormatSpec,
    positive_sign: u8,
) -> Result<usize, DeviceError> {
    let len = spec.encoded_len();
    let field = buf.get_mut(..len).ok_or(DeviceError::FieldTooWide {
        int_digits: spec.int_digits,
        frac_digits: spec.frac_digits,
    })?;
    render(field, value, spec, positive_sign);
    Ok(len)
}

/// Checked variant of [`format()`].
///
/// Returns `DeviceError::FieldTruncated` when any digit or the minus sign
/// would be dropped.
pub fn try_format(value: i32, int_digits: u8, frac_digits: u8) -> Result<FixedField, DeviceError> {
    let spec = FormatSpec::new(int_digits, frac_digits);
    if !spec.fits_fixed_field() {
        return Err(DeviceError::FieldTooWide {
            int_digits,
            frac_digits,
        });
    }
    match fixed_field(value, spec, DEFAULT_POSITIVE_SIGN) {
        (field, true) => Ok(field),
        (_, false) => Err(DeviceError::FieldTruncated {
            int_digits,
            frac_digits,
        }),
    }
}

/// Render into a `FixedField`. Returns the field and whether the value fit.
fn fixed_field(value: i32, spec: FormatSpec, positive_sign: u8) -> (FixedField, bool) {
    let mut buf = [0u8; FIELD_CAPACITY];
    if !spec.fits_fixed_field() {
        return (FixedField { buf, width: 0 }, false);
    }
    let fits = render(&mut buf[..spec.encoded_len()], value, spec, positive_sign);
    (
        FixedField {
            buf,
            width: spec.width(),
        },
        fits,
    )
}

/// Render right-to-left into `buf`, which is exactly `spec.encoded_len()` long.
///
/// Returns whether every digit and the sign fit.
fn render(buf: &mut [u8], value: i32, spec: FormatSpec, positive_sign: u8) -> bool {
    let width = spec.width();
    buf.fill(b' ');
    buf[width] = 0;

    let point = if spec.frac_digits > 0 {
        Some(spec.int_digits as usize)
    } else {
        None
    };

    if value == 0 {
        for (i, slot) in buf[..width].iter_mut().enumerate() {
            *slot = if Some(i) == point { b'.' } else { b'0' };
        }
        if point.is_none() {
            buf[0] = ZERO_SIGN;
        }
        return true;
    }

    let sign = if value < 0 { b'-' } else { positive_sign };
    let mut magnitude = value.unsigned_abs();

    // Positions at or right of this index always receive a digit, so a
    // fraction is rendered as "0.x" rather than ".x"
    let min_digit_pos = point.map(|p| p.saturating_sub(1));

    let mut pos = width;
    while pos > 0 {
        let i = pos - 1;
        let forced = min_digit_pos.is_some_and(|m| i >= m);
        if magnitude == 0 && !forced {
            break;
        }
        if Some(i) == point {
            buf[i] = b'.';
        } else {
            buf[i] = b'0' + (magnitude % 10) as u8;
            magnitude /= 10;
        }
        pos = i;
    }

    let mut fits = magnitude == 0;
    if pos > 0 {
        buf[pos - 1] = sign;
    } else if value < 0 {
        fits = false;
    }

    fits
}
