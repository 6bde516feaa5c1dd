//! Response generation.
//!
//! `ResponseGenerator` writes one complete reply through a [`Transport`]:
//! status line, headers, a blank separator, then a page body assembled from
//! the fragments of a [`PageTemplate`]. Literal fragments are sent verbatim;
//! field fragments are rendered through the fixed-width formatter with the
//! digit widths of the `DeviceConfig`.
//!
//! The transport has no outbound queue, so `generate()` returns only after
//! the last byte has been accepted.

use core::marker::PhantomData;

use crate::config::{DefaultConfig, DeviceConfig};
use crate::device::{CalendarDate, Clock, Snapshot};
use crate::format::format;
use crate::io::{CRLF, Transport};

pub mod templates;

pub use templates::{LineChartPage, TimelinePage};

/// Status line sent first in every reply.
pub const STATUS_LINE: &str = "HTTP/1.1 200 OK";

/// Header lines following the status line.
pub const HEADERS: [&str; 2] = ["Connection: Close", "Content-Type: text/html"];

/// Row layout of the history data series.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SeriesStyle {
    /// `['H:I',T]` rows labelled by hour and slot index
    Index,
    /// `[new Date(Y,M,D,H,I),T]` rows with a JavaScript month (0-11)
    DateTime,
}

/// One piece of a page body.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Literal text, sent verbatim
    Text(&'static str),
    /// The full history series, one row per slot
    Series,
    /// Current temperature
    Temperature,
    /// Clock as `H:M:S`
    Time,
    /// Text for the current actuator state
    Actuator,
}

/// Page body renderer.
///
/// The generator walks `fragments()` in order and fills in the fields.
pub trait PageTemplate {
    /// Row layout for [`Fragment::Series`].
    fn series_style(&self) -> SeriesStyle;

    /// Body fragments in output order.
    fn fragments(&self) -> &[Fragment];

    /// Text emitted for [`Fragment::Actuator`].
    fn actuator_text(&self, on: bool) -> &str;
}

/// Values a page is rendered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView<'a> {
    /// Clock at snapshot time
    pub clock: Clock,
    /// History slots in storage order
    pub samples: &'a [i16],
    /// Fresh temperature reading
    pub temperature: i16,
    /// Actuator state
    pub actuator_on: bool,
}

impl<'a> PageView<'a> {
    /// Build a view over a device snapshot.
    pub fn from_snapshot(snapshot: &'a Snapshot, temperature: i16, actuator_on: bool) -> Self {
        Self {
            clock: snapshot.clock,
            samples: &snapshot.samples,
            temperature,
            actuator_on,
        }
    }
}

/// Writes replies for configuration `C`.
#[derive(Debug)]
pub struct ResponseGenerator<C: DeviceConfig = DefaultConfig> {
    _config: PhantomData<C>,
}

impl<C: DeviceConfig> ResponseGenerator<C> {
    /// Write the status line, headers, blank line and page body.
    pub fn generate<T, P>(io: &mut T, page: &P, view: &PageView<'_>) -> Result<(), T::Error>
    where
        T: Transport,
        P: PageTemplate + ?Sized,
    {
        Self::write_head(io)?;

        for fragment in page.fragments() {
            match *fragment {
                Fragment::Text(text) => io.write_str(text)?,
                Fragment::Series => Self::write_series(io, page.series_style(), view)?,
                Fragment::Temperature => {
                    Self::write_number(io, view.temperature as i32, C::TEMPERATURE_DIGITS)?
                }
                Fragment::Time => Self::write_time(io, &view.clock)?,
                Fragment::Actuator => io.write_str(page.actuator_text(view.actuator_on))?,
            }
        }
        Ok(())
    }

    /// Status line, headers and the blank separator.
    pub fn write_head<T: Transport>(io: &mut T) -> Result<(), T::Error> {
        io.write_line(STATUS_LINE)?;
        for header in HEADERS {
            io.write_line(header)?;
        }
        io.write_str(CRLF)
    }

    /// One row per history slot; rows are comma separated and CR/LF terminated.
    ///
    /// `DateTime` rows fall back to the `Index` layout when the clock carries
    /// no calendar date.
    pub fn write_series<T: Transport>(
        io: &mut T,
        style: SeriesStyle,
        view: &PageView<'_>,
    ) -> Result<(), T::Error> {
        let last = view.samples.len().saturating_sub(1);
        for (index, &sample) in view.samples.iter().enumerate() {
            match (style, view.clock.date) {
                (SeriesStyle::DateTime, Some(date)) => {
                    Self::write_datetime_row(io, &date, view.clock.hour, index, sample)?
                }
                _ => Self::write_index_row(io, view.clock.hour, index, sample)?,
            }
            if index != last {
                io.write_str(",")?;
            }
            io.write_str(CRLF)?;
        }
        Ok(())
    }

    fn write_index_row<T: Transport>(
        io: &mut T,
        hour: u8,
        index: usize,
        sample: i16,
    ) -> Result<(), T::Error> {
        io.write_str("['")?;
        Self::write_number(io, hour as i32, C::TIME_DIGITS)?;
        io.write_str(":")?;
        Self::write_number(io, index as i32, C::TIME_DIGITS)?;
        io.write_str("',")?;
        Self::write_sample(io, sample)?;
        io.write_str("]")
    }

    fn write_datetime_row<T: Transport>(
        io: &mut T,
        date: &CalendarDate,
        hour: u8,
        index: usize,
        sample: i16,
    ) -> Result<(), T::Error> {
        io.write_str("[new Date(")?;
        Self::write_number(io, date.year as i32, C::YEAR_DIGITS)?;
        io.write_str(",")?;
        // JavaScript months count from zero
        Self::write_number(io, date.month as i32 - 1, C::TIME_DIGITS)?;
        io.write_str(",")?;
        Self::write_number(io, date.day as i32, C::TIME_DIGITS)?;
        io.write_str(",")?;
        Self::write_number(io, hour as i32, C::TIME_DIGITS)?;
        io.write_str(",")?;
        Self::write_number(io, index as i32, C::TIME_DIGITS)?;
        io.write_str("),")?;
        Self::write_sample(io, sample)?;
        io.write_str("]")
    }

    // Empty history slots read as zero and are sent as a bare "0"
    fn write_sample<T: Transport>(io: &mut T, sample: i16) -> Result<(), T::Error> {
        if sample == 0 {
            io.write_str("0")
        } else {
            Self::write_number(io, sample as i32, C::TEMPERATURE_DIGITS)
        }
    }

    fn write_time<T: Transport>(io: &mut T, clock: &Clock) -> Result<(), T::Error> {
        Self::write_number(io, clock.hour as i32, C::TIME_DIGITS)?;
        io.write_str(":")?;
        Self::write_number(io, clock.minute as i32, C::TIME_DIGITS)?;
        io.write_str(":")?;
        Self::write_number(io, clock.second as i32, C::TIME_DIGITS)
    }

    fn write_number<T: Transport>(io: &mut T, value: i32, digits: u8) -> Result<(), T::Error> {
        io.write_bytes(format(value, digits, 0).as_bytes_with_nul())
    }
}
