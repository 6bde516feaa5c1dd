//! Wall clock advanced by the periodic tick.

/// Calendar date carried by the clock (networked page variant).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalendarDate {
    /// Full year, e.g. 2013
    pub year: u16,
    /// Month, 1-12
    pub month: u8,
    /// Day of month, 1-31
    pub day: u8,
}

impl CalendarDate {
    /// Create a date. Out-of-range month or day values are clamped.
    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        let month = if month < 1 {
            1
        } else if month > 12 {
            12
        } else {
            month
        };
        let max_day = days_in_month(year, month);
        let day = if day < 1 {
            1
        } else if day > max_day {
            max_day
        } else {
            day
        };
        Self { year, month, day }
    }

    /// Advance by one day, rolling over months and years.
    pub fn advance(&mut self) {
        if self.day < days_in_month(self.year, self.month) {
            self.day += 1;
            return;
        }
        self.day = 1;
        if self.month < 12 {
            self.month += 1;
        } else {
            self.month = 1;
            self.year = self.year.wrapping_add(1);
        }
    }
}

const fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

const fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Largest counter that rolled over on a tick.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rollover {
    /// Only the second advanced
    None,
    /// Seconds wrapped, minute advanced
    Minute,
    /// Minutes wrapped, hour advanced
    Hour,
    /// Hours wrapped to midnight
    Day,
}

/// Time of day with an optional calendar date.
///
/// `second` and `minute` stay in 0..=59 and `hour` in 0..=23.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Clock {
    /// Hour, 0-23
    pub hour: u8,
    /// Minute, 0-59
    pub minute: u8,
    /// Second, 0-59
    pub second: u8,
    /// Calendar date, if the page shows one
    pub date: Option<CalendarDate>,
}

impl Clock {
    /// 00:00:00 without a date.
    pub const MIDNIGHT: Self = Self::new(0, 0, 0);

    /// Create a clock. Out-of-range fields are wrapped into range.
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour: hour % 24,
            minute: minute % 60,
            second: second % 60,
            date: None,
        }
    }

    /// Attach a calendar date.
    pub const fn with_date(mut self, date: CalendarDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Advance by one second.
    ///
    /// Returns the largest counter that rolled over.
    pub fn tick(&mut self) -> Rollover {
        self.second += 1;
        if self.second < 60 {
            return Rollover::None;
        }

        self.second = 0;
        self.minute += 1;
        if self.minute < 60 {
            return Rollover::Minute;
        }

        self.minute = 0;
        self.hour += 1;
        if self.hour < 24 {
            return Rollover::Hour;
        }

        self.hour = 0;
        if let Some(date) = self.date.as_mut() {
            date.advance();
        }
        Rollover::Day
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::MIDNIGHT
    }
}
