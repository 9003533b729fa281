//! Academic calendar: holidays, exam periods, semester bounds and the
//! restriction rules evaluated against them.

pub mod day;
pub mod events;
pub mod policy;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub use day::{format_clock, parse_clock, parse_date, CalendarDay};
pub use events::{upcoming_events, CalendarEvent, CalendarEventKind};
pub use policy::{
    exam_period_on, holiday_on, is_exam_period, is_holiday, is_valid_teaching_date,
    is_within_semester, CalendarPolicy,
};

/// Origin of a holiday.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HolidayKind {
    National,
    Religious,
    #[default]
    Other,
}

/// A single non-teaching day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Holiday {
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default, rename = "type")]
    pub kind: HolidayKind,
}

impl Holiday {
    pub fn new(id: impl Into<String>, name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            date,
            kind: HolidayKind::default(),
        }
    }

    pub fn with_kind(mut self, kind: HolidayKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Kind of exam period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExamKind {
    Midterm,
    Final,
    #[default]
    Other,
}

/// Closed date interval during which regular sessions are disallowed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExamPeriod {
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    /// Inclusive.
    pub end_date: NaiveDate,
    #[serde(default, rename = "type")]
    pub kind: ExamKind,
}

impl ExamPeriod {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_date,
            end_date,
            kind: ExamKind::default(),
        }
    }

    pub fn with_kind(mut self, kind: ExamKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// # Errors
    /// Returns [`ValidationError::InvalidExamPeriod`] when the period ends before it starts.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end_date < self.start_date {
            return Err(ValidationError::InvalidExamPeriod {
                id: self.id.clone(),
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }
}

/// The academic period; dates outside it are never teaching days.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SemesterBounds {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl SemesterBounds {
    /// # Errors
    /// Returns [`ValidationError::InvalidSemester`] when `end_date < start_date`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, ValidationError> {
        let bounds = Self {
            start_date,
            end_date,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// # Errors
    /// Returns [`ValidationError::InvalidSemester`] when `end_date < start_date`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end_date < self.start_date {
            return Err(ValidationError::InvalidSemester {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// How to answer "within semester?" when no bounds are configured.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingBounds {
    /// Every date counts as inside the semester.
    #[default]
    Allow,
    /// No date counts as inside the semester.
    Deny,
}

/// Classification of a calendar day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DateStatusKind {
    Holiday,
    Exam,
    NonAcademic,
    Normal,
}

/// Result of [`CalendarPolicy::date_status`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateStatus {
    #[serde(rename = "type")]
    pub kind: DateStatusKind,
    pub message: Option<String>,
}

impl DateStatus {
    pub fn normal() -> Self {
        Self {
            kind: DateStatusKind::Normal,
            message: None,
        }
    }

    fn with_message(kind: DateStatusKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
        }
    }
}

/// Kind of live attendance session being started.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    #[default]
    Regular,
    /// Exempt from exam-period and slot day/time checks.
    Makeup,
}

/// Outcome of [`CalendarPolicy::can_start_session`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StartDecision {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl StartDecision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

/// Outcome of [`CalendarPolicy::is_valid_teaching_date`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeachingDateCheck {
    pub valid: bool,
    pub reason: Option<String>,
}

impl From<StartDecision> for TeachingDateCheck {
    fn from(decision: StartDecision) -> Self {
        Self {
            valid: decision.allowed,
            reason: decision.reason,
        }
    }
}
