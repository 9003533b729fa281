//! Day-granularity helpers shared by the policy and the expander.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::error::ValidationError;

/// Anything that can be reduced to a calendar day, dropping time of day.
pub trait CalendarDay {
    fn calendar_day(&self) -> NaiveDate;
}

impl CalendarDay for NaiveDate {
    fn calendar_day(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDay for NaiveDateTime {
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> CalendarDay for DateTime<Tz> {
    fn calendar_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

impl<T: CalendarDay + ?Sized> CalendarDay for &T {
    fn calendar_day(&self) -> NaiveDate {
        (**self).calendar_day()
    }
}

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// # Errors
/// Returns [`ValidationError::InvalidDate`] for anything else, including
/// non-padded fields and impossible dates such as `2024-02-30`.
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let invalid = || ValidationError::InvalidDate {
        input: input.to_string(),
    };
    if input.len() != 10 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| invalid())
}

/// Parse a strict zero-padded `HH:MM` clock time.
///
/// # Errors
/// Returns [`ValidationError::InvalidTime`] on malformed input.
pub fn parse_clock(input: &str) -> Result<NaiveTime, ValidationError> {
    let invalid = || ValidationError::InvalidTime {
        input: input.to_string(),
    };
    if input.len() != 5 {
        return Err(invalid());
    }
    NaiveTime::parse_from_str(input, "%H:%M").map_err(|_| invalid())
}

/// Render a clock time as `HH:MM`.
pub fn format_clock(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Serde adapter storing [`NaiveTime`] as zero-padded `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_clock(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_clock(&raw).map_err(D::Error::custom)
    }
}
