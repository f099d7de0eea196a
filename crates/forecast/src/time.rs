use std::error;
use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate, NaiveDateTime};

use utility::serde::date_time::WIRE_FORMAT;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeFormatError {
    /// No `:` between hour and minute.
    MissingSeparator(String),
    /// Hour or minute part is not a number.
    InvalidNumber(String),
    /// The 12-hour form needs an AM/PM token after the time.
    MissingMeridian(String),
    /// Parsed fine but does not denote a time of day.
    OutOfRange(String),
}

impl error::Error for TimeFormatError {}

impl fmt::Display for TimeFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TimeFormatError::MissingSeparator(input) => {
                write!(f, "'{}' has no ':' between hour and minute", input)
            }
            TimeFormatError::InvalidNumber(input) => {
                write!(f, "'{}' contains a non-numeric hour or minute", input)
            }
            TimeFormatError::MissingMeridian(input) => {
                write!(f, "'{}' needs an AM or PM token", input)
            }
            TimeFormatError::OutOfRange(input) => {
                write!(f, "'{}' is not a time of day", input)
            }
        }
    }
}

/// The user-chosen pickup time. Both accepted input forms (`HH:MM` and
/// `HH:MM AM/PM`) normalize to the same 24-hour representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour <= 23 && minute <= 59 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Combines the time with a calendar date. The prediction service only
    /// ever sees today's date; there is no way to request another day.
    pub fn on_date(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_hms_opt(self.hour as u32, self.minute as u32, 0)
            .expect("TimeOfDay is validated on construction")
    }

    /// Request timestamp in the service's wire format for the given date.
    pub fn request_timestamp(&self, date: NaiveDate) -> String {
        self.on_date(date).format(WIRE_FORMAT).to_string()
    }

    /// Request timestamp for today, in the caller's local timezone.
    pub fn request_timestamp_today(&self) -> String {
        self.request_timestamp(Local::now().date_naive())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeFormatError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let lowered = trimmed.to_lowercase();

        let (time_part, meridian) =
            if lowered.contains("am") || lowered.contains("pm") {
                let mut parts = trimmed.split_whitespace();
                let time = parts.next().unwrap_or_default();
                let token = parts
                    .next()
                    .ok_or_else(|| {
                        TimeFormatError::MissingMeridian(input.to_owned())
                    })?
                    .to_lowercase();
                if token != "am" && token != "pm" {
                    return Err(TimeFormatError::MissingMeridian(input.to_owned()));
                }
                (time, Some(token))
            } else {
                (trimmed, None)
            };

        let (hour_part, minute_part) = time_part
            .split_once(':')
            .ok_or_else(|| TimeFormatError::MissingSeparator(input.to_owned()))?;
        // tolerate a trailing seconds part, only hour and minute count
        let minute_part = minute_part.split(':').next().unwrap_or(minute_part);

        let mut hour: u32 = hour_part
            .parse()
            .map_err(|_| TimeFormatError::InvalidNumber(input.to_owned()))?;
        let minute: u32 = minute_part
            .parse()
            .map_err(|_| TimeFormatError::InvalidNumber(input.to_owned()))?;

        match meridian.as_deref() {
            Some("pm") if hour != 12 => hour += 12,
            Some("am") if hour == 12 => hour = 0,
            _ => {}
        }

        TimeOfDay::new(
            u8::try_from(hour)
                .map_err(|_| TimeFormatError::OutOfRange(input.to_owned()))?,
            u8::try_from(minute)
                .map_err(|_| TimeFormatError::OutOfRange(input.to_owned()))?,
        )
        .ok_or_else(|| TimeFormatError::OutOfRange(input.to_owned()))
    }
}
