//! Export encodings for expanded sessions.
//!
//! - [`tabular`]: row-oriented records for spreadsheet and CSV writers
//! - [`ical`]: an iCalendar feed for calendar applications

pub mod ical;
pub mod tabular;

pub use ical::{to_calendar_feed, CalendarFeed};
pub use tabular::{to_tabular, TabularRow};
