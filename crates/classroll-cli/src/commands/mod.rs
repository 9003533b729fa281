pub mod calendar;
pub mod config;
pub mod schedule;

use chrono::{NaiveDate, NaiveDateTime};
use classroll_core::{ScheduledSession, TabularRow};

/// Accepts `YYYY-MM-DDTHH:MM` or `YYYY-MM-DD HH:MM`.
pub fn parse_datetime(input: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M"))
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Tab-separated table with a header line.
pub fn print_table(sessions: &[ScheduledSession]) {
    println!("{}", TabularRow::HEADERS.join("\t"));
    for session in sessions {
        println!("{}", TabularRow::from_session(session).to_record().join("\t"));
    }
}
