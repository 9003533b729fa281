//! Weekly course schedule and the concrete sessions derived from it.

pub mod expander;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::calendar::day::{format_clock, hhmm};
use crate::error::{SessionTransitionError, ValidationError};

pub use expander::{expand_schedule, ScheduleExpander, ScheduleSummary};

/// Namespace for deterministic session ids.
const SESSION_NAMESPACE: Uuid = Uuid::from_u128(0x6c1a_27e4_93b5_4f0d_a8e2_5d7c_19f3_b640);

/// Teaching day of the week. Weekends never host regular classes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// `None` for Saturday and Sunday.
    pub fn from_chrono(day: chrono::Weekday) -> Option<Self> {
        match day {
            chrono::Weekday::Mon => Some(Weekday::Monday),
            chrono::Weekday::Tue => Some(Weekday::Tuesday),
            chrono::Weekday::Wed => Some(Weekday::Wednesday),
            chrono::Weekday::Thu => Some(Weekday::Thursday),
            chrono::Weekday::Fri => Some(Weekday::Friday),
            chrono::Weekday::Sat | chrono::Weekday::Sun => None,
        }
    }

    pub fn to_chrono(self) -> chrono::Weekday {
        match self {
            Weekday::Monday => chrono::Weekday::Mon,
            Weekday::Tuesday => chrono::Weekday::Tue,
            Weekday::Wednesday => chrono::Weekday::Wed,
            Weekday::Thursday => chrono::Weekday::Thu,
            Weekday::Friday => chrono::Weekday::Fri,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
        }
    }

    /// Turkish day name used in exported tables.
    pub fn display_name(self) -> &'static str {
        match self {
            Weekday::Monday => "Pazartesi",
            Weekday::Tuesday => "Salı",
            Weekday::Wednesday => "Çarşamba",
            Weekday::Thursday => "Perşembe",
            Weekday::Friday => "Cuma",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|d| d.as_str() == lower || d.as_str()[..3] == lower)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "day".into(),
                message: format!("'{s}' is not a weekday (monday..friday)"),
            })
    }
}

/// One recurring class meeting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklySlot {
    pub course_id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub classroom: String,
    pub day: Weekday,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

impl WeeklySlot {
    pub fn new(
        course_id: impl Into<String>,
        code: impl Into<String>,
        name: impl Into<String>,
        day: Weekday,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            course_id: course_id.into(),
            code: code.into(),
            name: name.into(),
            section: String::new(),
            classroom: String::new(),
            day,
            start_time,
            end_time,
        }
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    pub fn with_classroom(mut self, classroom: impl Into<String>) -> Self {
        self.classroom = classroom.into();
        self
    }

    /// Key under which the slot is filed within its weekday.
    pub fn start_key(&self) -> String {
        format_clock(self.start_time)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    /// # Errors
    /// Returns [`ValidationError::InvalidTimeRange`] unless `end_time > start_time`.
    /// Slots crossing midnight are rejected by the same rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end_time <= self.start_time {
            return Err(ValidationError::InvalidTimeRange {
                start: self.start_time,
                end: self.end_time,
            });
        }
        Ok(())
    }

    /// Half-open `[start, end)` overlap on the same weekday.
    pub fn overlaps(&self, other: &WeeklySlot) -> bool {
        self.day == other.day && self.start_time < other.end_time && other.start_time < self.end_time
    }
}

/// Two slots on the same weekday whose times overlap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotConflict {
    pub day: Weekday,
    pub first: WeeklySlot,
    pub second: WeeklySlot,
}

/// Weekday → start-time key → slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct WeeklySchedule {
    days: BTreeMap<Weekday, BTreeMap<String, WeeklySlot>>,
}

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// File a slot under its weekday and start time, returning any slot it replaced.
    pub fn insert(&mut self, slot: WeeklySlot) -> Option<WeeklySlot> {
        self.days
            .entry(slot.day)
            .or_default()
            .insert(slot.start_key(), slot)
    }

    /// File a slot, refusing to replace one already filed at the same day and start time.
    ///
    /// # Errors
    /// Returns [`ValidationError::DuplicateSlot`] naming both course codes.
    pub fn try_insert(&mut self, slot: WeeklySlot) -> Result<(), ValidationError> {
        let key = slot.start_key();
        let slots = self.days.entry(slot.day).or_default();
        if let Some(existing) = slots.get(&key) {
            return Err(ValidationError::DuplicateSlot {
                day: slot.day,
                start: key,
                existing: existing.code.clone(),
                incoming: slot.code,
            });
        }
        slots.insert(key, slot);
        Ok(())
    }

    /// Build a schedule from a flat slot list with [`WeeklySchedule::try_insert`].
    ///
    /// # Errors
    /// Fails on the first slot sharing a day and start time with an earlier one.
    pub fn from_slots<I: IntoIterator<Item = WeeklySlot>>(slots: I) -> Result<Self, ValidationError> {
        let mut schedule = Self::new();
        for slot in slots {
            schedule.try_insert(slot)?;
        }
        Ok(schedule)
    }

    pub fn remove(&mut self, day: Weekday, start_key: &str) -> Option<WeeklySlot> {
        let slots = self.days.get_mut(&day)?;
        let removed = slots.remove(start_key);
        if slots.is_empty() {
            self.days.remove(&day);
        }
        removed
    }

    pub fn get(&self, day: Weekday, start_key: &str) -> Option<&WeeklySlot> {
        self.days.get(&day)?.get(start_key)
    }

    /// Weekdays present in the schedule, in week order.
    pub fn days(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.days.keys().copied()
    }

    pub fn slots_on(&self, day: Weekday) -> impl Iterator<Item = &WeeklySlot> {
        self.days.get(&day).into_iter().flat_map(|slots| slots.values())
    }

    /// All slots, ordered by weekday then start key.
    pub fn slots(&self) -> impl Iterator<Item = &WeeklySlot> {
        self.days.values().flat_map(|slots| slots.values())
    }

    pub fn len(&self) -> usize {
        self.days.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check every slot's time range and that it is filed under its own
    /// weekday and start time.
    ///
    /// # Errors
    /// Returns the first offending slot's [`ValidationError`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (day, slots) in &self.days {
            for (key, slot) in slots {
                slot.validate()?;
                if slot.day != *day {
                    return Err(ValidationError::MisplacedSlot {
                        code: slot.code.clone(),
                        expected: slot.day,
                        found: *day,
                    });
                }
                if *key != slot.start_key() {
                    return Err(ValidationError::MiskeyedSlot {
                        code: slot.code.clone(),
                        key: key.clone(),
                        start: slot.start_key(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Every overlapping pair per weekday, earlier start first.
    ///
    /// Back-to-back slots (`a.end == b.start`) do not conflict.
    pub fn conflicts(&self) -> Vec<SlotConflict> {
        let mut conflicts = Vec::new();
        for (day, slots) in &self.days {
            let mut ordered: Vec<&WeeklySlot> = slots.values().collect();
            ordered.sort_by_key(|s| (s.start_time, s.end_time));
            for (i, first) in ordered.iter().enumerate() {
                for second in &ordered[i + 1..] {
                    if second.start_time >= first.end_time {
                        break;
                    }
                    conflicts.push(SlotConflict {
                        day: *day,
                        first: (*first).clone(),
                        second: (*second).clone(),
                    });
                }
            }
        }
        debug!(count = conflicts.len(), "weekly schedule conflict scan");
        conflicts
    }
}

/// Later slots replace earlier ones at the same day and start time; use
/// [`WeeklySchedule::from_slots`] to reject such input instead.
impl FromIterator<WeeklySlot> for WeeklySchedule {
    fn from_iter<I: IntoIterator<Item = WeeklySlot>>(iter: I) -> Self {
        let mut schedule = WeeklySchedule::new();
        for slot in iter {
            schedule.insert(slot);
        }
        schedule
    }
}

/// Session lifecycle.
///
///   SCHEDULED ──> COMPLETED
///       │
///       └──────> CANCELED
///
/// The expander only emits `Scheduled`; the other states are applied by
/// whoever tracks attendance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Scheduled,
    Completed,
    Canceled,
}

impl SessionStatus {
    pub fn can_transition_to(&self, to: &SessionStatus) -> bool {
        matches!(
            (self, to),
            (SessionStatus::Scheduled, SessionStatus::Completed)
                | (SessionStatus::Scheduled, SessionStatus::Canceled)
        )
    }

    pub fn valid_transitions(&self) -> &[SessionStatus] {
        match self {
            SessionStatus::Scheduled => &[SessionStatus::Completed, SessionStatus::Canceled],
            SessionStatus::Completed | SessionStatus::Canceled => &[],
        }
    }
}

/// One dated occurrence of a weekly slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduledSession {
    pub id: String,
    pub course_id: String,
    pub code: String,
    pub name: String,
    pub section: String,
    pub classroom: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub status: SessionStatus,
}

impl ScheduledSession {
    /// Instantiate `slot` on `date`. The id depends only on course, section,
    /// date and start time, so re-expanding yields the same ids.
    pub fn from_slot(slot: &WeeklySlot, date: NaiveDate) -> Self {
        let seed = format!(
            "{}|{}|{}|{}",
            slot.course_id,
            slot.section,
            date,
            slot.start_key()
        );
        Self {
            id: Uuid::new_v5(&SESSION_NAMESPACE, seed.as_bytes()).to_string(),
            course_id: slot.course_id.clone(),
            code: slot.code.clone(),
            name: slot.name.clone(),
            section: slot.section.clone(),
            classroom: slot.classroom.clone(),
            date,
            start_time: slot.start_time,
            end_time: slot.end_time,
            status: SessionStatus::Scheduled,
        }
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.date.and_time(self.end_time)
    }

    /// # Errors
    /// Returns [`SessionTransitionError`] for anything but
    /// scheduled → completed / canceled.
    pub fn transition_to(&mut self, status: SessionStatus) -> Result<(), SessionTransitionError> {
        if !self.status.can_transition_to(&status) {
            return Err(SessionTransitionError {
                from: self.status,
                to: status,
            });
        }
        self.status = status;
        Ok(())
    }
}
