use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::calendar::format_clock;
use crate::schedule::{ScheduledSession, Weekday};

/// One exported session, columns in display order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TabularRow {
    /// `DD.MM.YYYY`
    pub date: String,
    pub weekday: String,
    pub start_time: String,
    pub end_time: String,
    pub code: String,
    pub name: String,
    pub section: String,
    pub classroom: String,
}

impl TabularRow {
    pub const HEADERS: [&'static str; 8] = [
        "Tarih",
        "Gün",
        "Başlangıç",
        "Bitiş",
        "Ders Kodu",
        "Ders Adı",
        "Şube",
        "Derslik",
    ];

    pub fn from_session(session: &ScheduledSession) -> Self {
        let weekday = Weekday::from_chrono(session.date.weekday())
            .map(Weekday::display_name)
            .unwrap_or_default();
        Self {
            date: session.date.format("%d.%m.%Y").to_string(),
            weekday: weekday.to_string(),
            start_time: format_clock(session.start_time),
            end_time: format_clock(session.end_time),
            code: session.code.clone(),
            name: session.name.clone(),
            section: session.section.clone(),
            classroom: session.classroom.clone(),
        }
    }

    pub fn to_record(&self) -> [String; 8] {
        [
            self.date.clone(),
            self.weekday.clone(),
            self.start_time.clone(),
            self.end_time.clone(),
            self.code.clone(),
            self.name.clone(),
            self.section.clone(),
            self.classroom.clone(),
        ]
    }
}

/// Rows in the same order as `sessions`.
pub fn to_tabular(sessions: &[ScheduledSession]) -> Vec<TabularRow> {
    sessions.iter().map(TabularRow::from_session).collect()
}
