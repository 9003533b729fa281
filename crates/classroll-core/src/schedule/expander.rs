//! Semester expansion of a weekly schedule.
//!
//! Every slot is walked week by week from the first matching weekday on or
//! after the range start; dates the calendar blocks (holidays, exam periods)
//! are dropped and the rest become [`ScheduledSession`]s ordered by date and
//! start time.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ScheduledSession, Weekday, WeeklySchedule, WeeklySlot};
use crate::calendar::{CalendarPolicy, ExamPeriod, Holiday};
use crate::error::ValidationError;

/// Totals over a weekly schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleSummary {
    pub total_courses: usize,
    /// Weekly teaching hours, minute resolution.
    pub total_hours: f64,
    pub courses_by_day: BTreeMap<Weekday, usize>,
}

/// Expands weekly schedules against a calendar policy.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleExpander<'a> {
    policy: &'a CalendarPolicy,
}

impl<'a> ScheduleExpander<'a> {
    pub fn new(policy: &'a CalendarPolicy) -> Self {
        Self { policy }
    }

    /// Enumerate every teaching occurrence of `schedule` in
    /// `[semester_start, semester_end]`.
    ///
    /// An empty schedule or an inverted range yields an empty list.
    ///
    /// # Errors
    /// The schedule is validated up front; an invalid slot fails the whole
    /// call before anything is enumerated.
    pub fn expand(
        &self,
        schedule: &WeeklySchedule,
        semester_start: NaiveDate,
        semester_end: NaiveDate,
    ) -> Result<Vec<ScheduledSession>, ValidationError> {
        schedule.validate()?;
        if schedule.is_empty() || semester_end < semester_start {
            return Ok(Vec::new());
        }

        let mut sessions = Vec::new();
        for slot in schedule.slots() {
            self.expand_slot(slot, semester_start, semester_end, &mut sessions);
        }
        sessions.sort_by_key(|s| (s.date, s.start_time));

        info!(
            slots = schedule.len(),
            sessions = sessions.len(),
            %semester_start,
            %semester_end,
            "expanded weekly schedule"
        );
        Ok(sessions)
    }

    /// Expand over the policy's own semester bounds; empty when none are set.
    ///
    /// # Errors
    /// See [`ScheduleExpander::expand`].
    pub fn expand_semester(&self, schedule: &WeeklySchedule) -> Result<Vec<ScheduledSession>, ValidationError> {
        match self.policy.semester() {
            Some(bounds) => self.expand(schedule, bounds.start_date, bounds.end_date),
            None => {
                schedule.validate()?;
                Ok(Vec::new())
            }
        }
    }

    fn expand_slot(
        &self,
        slot: &WeeklySlot,
        start: NaiveDate,
        end: NaiveDate,
        out: &mut Vec<ScheduledSession>,
    ) {
        let mut next = first_on_or_after(start, slot.day);
        while let Some(date) = next.filter(|d| *d <= end) {
            if self.policy.is_blocked(date) {
                debug!(code = %slot.code, %date, "skipping blocked date");
            } else {
                out.push(ScheduledSession::from_slot(slot, date));
            }
            // None past the last representable date.
            next = date.checked_add_signed(Duration::days(7));
        }
    }

    /// Slot count, weekly hours and per-day counts.
    pub fn summarize(schedule: &WeeklySchedule) -> ScheduleSummary {
        let minutes: i64 = schedule.slots().map(WeeklySlot::duration_minutes).sum();
        let courses_by_day = schedule
            .days()
            .map(|day| (day, schedule.slots_on(day).count()))
            .collect();
        ScheduleSummary {
            total_courses: schedule.len(),
            total_hours: minutes as f64 / 60.0,
            courses_by_day,
        }
    }
}

/// Expand with plain holiday/exam data instead of a prepared policy.
///
/// # Errors
/// Rejects inverted exam periods and invalid slots.
pub fn expand_schedule(
    schedule: &WeeklySchedule,
    semester_start: NaiveDate,
    semester_end: NaiveDate,
    holidays: &[Holiday],
    exam_periods: &[ExamPeriod],
) -> Result<Vec<ScheduledSession>, ValidationError> {
    let policy = CalendarPolicy::new(holidays.to_vec(), exam_periods.to_vec(), None)?;
    ScheduleExpander::new(&policy).expand(schedule, semester_start, semester_end)
}

fn first_on_or_after(date: NaiveDate, day: Weekday) -> Option<NaiveDate> {
    let from = date.weekday().num_days_from_monday();
    let to = day.to_chrono().num_days_from_monday();
    let ahead = (to + 7 - from) % 7;
    date.checked_add_signed(Duration::days(i64::from(ahead)))
}
