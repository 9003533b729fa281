//! Calendar restriction rules.
//!
//! The free functions take the raw holiday/exam slices so callers holding
//! plain data can use them directly. [`CalendarPolicy`] bundles the same data
//! with the missing-bounds setting and adds the composite checks.
//!
//! Every check runs at day granularity and takes "now"/"today" as a
//! parameter; nothing here reads the system clock.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use tracing::debug;

use super::day::{format_clock, CalendarDay};
use super::events::{upcoming_events, CalendarEvent};
use super::{
    DateStatus, DateStatusKind, ExamPeriod, Holiday, MissingBounds, SemesterBounds, SessionKind,
    StartDecision, TeachingDateCheck,
};
use crate::error::ValidationError;
use crate::schedule::{Weekday, WeeklySlot};

const EXAM_LABEL: &str = "Exam period";
const NON_ACADEMIC_LABEL: &str = "Outside the academic semester";

/// First holiday (in input order) falling on `date`'s calendar day.
pub fn holiday_on<D: CalendarDay>(date: D, holidays: &[Holiday]) -> Option<&Holiday> {
    let day = date.calendar_day();
    holidays.iter().find(|h| h.date == day)
}

pub fn is_holiday<D: CalendarDay>(date: D, holidays: &[Holiday]) -> bool {
    holiday_on(date, holidays).is_some()
}

/// First exam period (in input order) whose inclusive range covers `date`.
pub fn exam_period_on<D: CalendarDay>(date: D, exam_periods: &[ExamPeriod]) -> Option<&ExamPeriod> {
    let day = date.calendar_day();
    exam_periods.iter().find(|e| e.contains(day))
}

pub fn is_exam_period<D: CalendarDay>(date: D, exam_periods: &[ExamPeriod]) -> bool {
    exam_period_on(date, exam_periods).is_some()
}

/// Whether `date` lies inside the semester; `missing` decides when no bounds exist.
pub fn is_within_semester<D: CalendarDay>(
    date: D,
    bounds: Option<&SemesterBounds>,
    missing: MissingBounds,
) -> bool {
    match bounds {
        Some(bounds) => bounds.contains(date.calendar_day()),
        None => {
            debug!(?missing, "no semester bounds configured");
            missing == MissingBounds::Allow
        }
    }
}

/// Validate a hypothetical scheduling choice: holiday, exam period, semester,
/// then weekday, first failure wins.
pub fn is_valid_teaching_date<D: CalendarDay>(
    date: D,
    weekday: Weekday,
    holidays: &[Holiday],
    exam_periods: &[ExamPeriod],
    bounds: Option<&SemesterBounds>,
    missing: MissingBounds,
) -> TeachingDateCheck {
    let day = date.calendar_day();
    if let Some(holiday) = holiday_on(day, holidays) {
        return StartDecision::deny(holiday_reason(holiday)).into();
    }
    if let Some(exam) = exam_period_on(day, exam_periods) {
        return StartDecision::deny(exam_reason(exam)).into();
    }
    if !is_within_semester(day, bounds, missing) {
        return StartDecision::deny(NON_ACADEMIC_LABEL).into();
    }
    if Weekday::from_chrono(day.weekday()) != Some(weekday) {
        return StartDecision::deny(format!("{day} is not a {weekday}")).into();
    }
    StartDecision::allow().into()
}

fn holiday_reason(holiday: &Holiday) -> String {
    format!("Holiday: {}", holiday.name)
}

fn exam_reason(exam: &ExamPeriod) -> String {
    format!("{EXAM_LABEL}: {}", exam.name)
}

/// Holidays, exam periods and semester bounds for one academic term.
#[derive(Debug, Clone, Default)]
pub struct CalendarPolicy {
    holidays: Vec<Holiday>,
    exam_periods: Vec<ExamPeriod>,
    semester: Option<SemesterBounds>,
    missing_bounds: MissingBounds,
}

impl CalendarPolicy {
    /// Build a policy, validating every exam period and the semester bounds.
    ///
    /// # Errors
    /// Returns the first [`ValidationError`] found.
    pub fn new(
        holidays: Vec<Holiday>,
        exam_periods: Vec<ExamPeriod>,
        semester: Option<SemesterBounds>,
    ) -> Result<Self, ValidationError> {
        for exam in &exam_periods {
            exam.validate()?;
        }
        if let Some(bounds) = &semester {
            bounds.validate()?;
        }
        Ok(Self {
            holidays,
            exam_periods,
            semester,
            missing_bounds: MissingBounds::default(),
        })
    }

    pub fn with_missing_bounds(mut self, missing: MissingBounds) -> Self {
        self.missing_bounds = missing;
        self
    }

    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    pub fn exam_periods(&self) -> &[ExamPeriod] {
        &self.exam_periods
    }

    pub fn semester(&self) -> Option<&SemesterBounds> {
        self.semester.as_ref()
    }

    pub fn missing_bounds(&self) -> MissingBounds {
        self.missing_bounds
    }

    // -- administrative edits -------------------------------------------------

    /// # Errors
    /// Rejects a holiday whose id is already present.
    pub fn add_holiday(&mut self, holiday: Holiday) -> Result<(), ValidationError> {
        if self.holidays.iter().any(|h| h.id == holiday.id) {
            return Err(duplicate_id("holiday", &holiday.id));
        }
        self.holidays.push(holiday);
        Ok(())
    }

    /// Replace the holiday carrying the same id.
    ///
    /// # Errors
    /// Returns [`ValidationError::UnknownId`] if no such holiday exists.
    pub fn update_holiday(&mut self, holiday: Holiday) -> Result<(), ValidationError> {
        let slot = self
            .holidays
            .iter_mut()
            .find(|h| h.id == holiday.id)
            .ok_or_else(|| unknown_id("holiday", &holiday.id))?;
        *slot = holiday;
        Ok(())
    }

    /// # Errors
    /// Returns [`ValidationError::UnknownId`] if no such holiday exists.
    pub fn remove_holiday(&mut self, id: &str) -> Result<Holiday, ValidationError> {
        let index = self
            .holidays
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| unknown_id("holiday", id))?;
        Ok(self.holidays.remove(index))
    }

    /// # Errors
    /// Rejects an inverted range or a duplicate id.
    pub fn add_exam_period(&mut self, exam: ExamPeriod) -> Result<(), ValidationError> {
        exam.validate()?;
        if self.exam_periods.iter().any(|e| e.id == exam.id) {
            return Err(duplicate_id("exam period", &exam.id));
        }
        self.exam_periods.push(exam);
        Ok(())
    }

    /// # Errors
    /// Rejects an inverted range or an unknown id.
    pub fn update_exam_period(&mut self, exam: ExamPeriod) -> Result<(), ValidationError> {
        exam.validate()?;
        let slot = self
            .exam_periods
            .iter_mut()
            .find(|e| e.id == exam.id)
            .ok_or_else(|| unknown_id("exam period", &exam.id))?;
        *slot = exam;
        Ok(())
    }

    /// # Errors
    /// Returns [`ValidationError::UnknownId`] if no such exam period exists.
    pub fn remove_exam_period(&mut self, id: &str) -> Result<ExamPeriod, ValidationError> {
        let index = self
            .exam_periods
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| unknown_id("exam period", id))?;
        Ok(self.exam_periods.remove(index))
    }

    /// # Errors
    /// Returns [`ValidationError::InvalidSemester`] for an inverted range.
    pub fn set_semester(&mut self, semester: Option<SemesterBounds>) -> Result<(), ValidationError> {
        if let Some(bounds) = &semester {
            bounds.validate()?;
        }
        self.semester = semester;
        Ok(())
    }

    // -- queries --------------------------------------------------------------

    pub fn is_holiday<D: CalendarDay>(&self, date: D) -> bool {
        is_holiday(date, &self.holidays)
    }

    pub fn is_exam_period<D: CalendarDay>(&self, date: D) -> bool {
        is_exam_period(date, &self.exam_periods)
    }

    pub fn is_within_semester<D: CalendarDay>(&self, date: D) -> bool {
        is_within_semester(date, self.semester.as_ref(), self.missing_bounds)
    }

    /// Whether the expander may place a session on `date`.
    pub fn is_blocked<D: CalendarDay>(&self, date: D) -> bool {
        let day = date.calendar_day();
        self.is_holiday(day) || self.is_exam_period(day)
    }

    /// Classify `date`: holiday, then exam period, then outside semester,
    /// else normal. Only the first match is reported.
    pub fn date_status<D: CalendarDay>(&self, date: D) -> DateStatus {
        let day = date.calendar_day();
        if let Some(holiday) = holiday_on(day, &self.holidays) {
            return DateStatus::with_message(DateStatusKind::Holiday, holiday.name.clone());
        }
        if self.is_exam_period(day) {
            return DateStatus::with_message(DateStatusKind::Exam, EXAM_LABEL);
        }
        if !self.is_within_semester(day) {
            return DateStatus::with_message(DateStatusKind::NonAcademic, NON_ACADEMIC_LABEL);
        }
        DateStatus::normal()
    }

    /// Decide whether a live attendance session may start at `now`.
    ///
    /// Holidays and the semester bounds apply to every session. Exam periods
    /// and the slot's day/time window apply to regular sessions only.
    pub fn can_start_session(
        &self,
        now: NaiveDateTime,
        slot: Option<&WeeklySlot>,
        kind: SessionKind,
    ) -> StartDecision {
        let today = now.date();
        if let Some(holiday) = holiday_on(today, &self.holidays) {
            return StartDecision::deny(holiday_reason(holiday));
        }
        if kind == SessionKind::Regular {
            if let Some(exam) = exam_period_on(today, &self.exam_periods) {
                return StartDecision::deny(exam_reason(exam));
            }
        }
        if !self.is_within_semester(today) {
            return StartDecision::deny(NON_ACADEMIC_LABEL);
        }
        if kind == SessionKind::Makeup {
            return StartDecision::allow();
        }
        if let Some(slot) = slot {
            if Weekday::from_chrono(today.weekday()) != Some(slot.day) {
                return StartDecision::deny(format!(
                    "Not a class day: {} meets on {}",
                    slot.code, slot.day
                ));
            }
            // Minute resolution, so 11:00:45 still counts as 11:00.
            let clock = now
                .time()
                .with_second(0)
                .and_then(|t| t.with_nanosecond(0))
                .unwrap_or_else(|| now.time());
            if clock < slot.start_time || clock > slot.end_time {
                return StartDecision::deny(format!(
                    "Not class time: {} runs {}-{}",
                    slot.code,
                    format_clock(slot.start_time),
                    format_clock(slot.end_time)
                ));
            }
        }
        StartDecision::allow()
    }

    pub fn is_valid_teaching_date<D: CalendarDay>(&self, date: D, weekday: Weekday) -> TeachingDateCheck {
        is_valid_teaching_date(
            date,
            weekday,
            &self.holidays,
            &self.exam_periods,
            self.semester.as_ref(),
            self.missing_bounds,
        )
    }

    pub fn upcoming_events(&self, today: NaiveDate, count: usize) -> Vec<CalendarEvent> {
        upcoming_events(&self.holidays, &self.exam_periods, today, count)
    }
}

fn unknown_id(kind: &'static str, id: &str) -> ValidationError {
    ValidationError::UnknownId {
        kind,
        id: id.to_string(),
    }
}

fn duplicate_id(kind: &str, id: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: format!("{kind}.id"),
        message: format!("duplicate id '{id}'"),
    }
}
