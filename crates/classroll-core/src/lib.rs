//! # classroll Core Library
//!
//! This library provides the rule engine behind classroll's attendance
//! tooling: which calendar dates are teaching days for a weekly class slot,
//! and whether a live attendance session may be started at a given moment.
//! The CLI is a thin consumer of the same API; the engine itself performs
//! no I/O and never reads the system clock.
//!
//! ## Architecture
//!
//! - **Calendar**: holidays, exam periods and semester bounds, with the
//!   restriction checks evaluated against them
//! - **Schedule**: weekly slots, conflict detection and semester expansion
//!   into dated sessions
//! - **Export**: tabular rows and an iCalendar feed of expanded sessions
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`CalendarPolicy`]: point-in-time calendar decisions
//! - [`ScheduleExpander`]: weekly schedule → dated sessions
//! - [`CalendarFeed`]: iCalendar export
//! - [`Config`]: Application configuration management

pub mod calendar;
pub mod error;
pub mod export;
pub mod schedule;
pub mod storage;

pub use calendar::{
    CalendarDay, CalendarEvent, CalendarPolicy, DateStatus, DateStatusKind, ExamKind, ExamPeriod,
    Holiday, HolidayKind, MissingBounds, SemesterBounds, SessionKind, StartDecision,
    TeachingDateCheck,
};
pub use error::{ConfigError, CoreError, SessionTransitionError, ValidationError};
pub use export::{to_calendar_feed, to_tabular, CalendarFeed, TabularRow};
pub use schedule::{
    ScheduleExpander, ScheduleSummary, ScheduledSession, SessionStatus, SlotConflict, Weekday,
    WeeklySchedule, WeeklySlot,
};
pub use storage::Config;
