//! Upcoming holiday / exam listing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ExamKind, ExamPeriod, Holiday, HolidayKind};

/// Source of an upcoming calendar event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "source", content = "type", rename_all = "lowercase")]
pub enum CalendarEventKind {
    Holiday(HolidayKind),
    Exam(ExamKind),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    /// Holiday date, or the first day of an exam period.
    pub date: NaiveDate,
    /// Last day of an exam period; `None` for holidays.
    pub end_date: Option<NaiveDate>,
    pub kind: CalendarEventKind,
}

impl From<&Holiday> for CalendarEvent {
    fn from(holiday: &Holiday) -> Self {
        Self {
            id: holiday.id.clone(),
            title: holiday.name.clone(),
            date: holiday.date,
            end_date: None,
            kind: CalendarEventKind::Holiday(holiday.kind),
        }
    }
}

impl From<&ExamPeriod> for CalendarEvent {
    fn from(exam: &ExamPeriod) -> Self {
        Self {
            id: exam.id.clone(),
            title: exam.name.clone(),
            date: exam.start_date,
            end_date: Some(exam.end_date),
            kind: CalendarEventKind::Exam(exam.kind),
        }
    }
}

/// The next `count` holidays and exam periods on or after `today`.
///
/// Holidays come before exam periods in the merged input, and the sort is
/// stable, so same-day events keep that order. Recomputed on every call.
pub fn upcoming_events(
    holidays: &[Holiday],
    exam_periods: &[ExamPeriod],
    today: NaiveDate,
    count: usize,
) -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = holidays
        .iter()
        .map(CalendarEvent::from)
        .chain(exam_periods.iter().map(CalendarEvent::from))
        .filter(|event| event.date >= today)
        .collect();
    events.sort_by_key(|event| event.date);
    events.truncate(count);
    events
}
