//! iCalendar (RFC 5545) feed of scheduled sessions.
//!
//! Write-only. Session times are naive local wall-clock values and are
//! emitted with a `Z` suffix without any timezone conversion; the header
//! line `X-CLASSROLL-TIME-BASIS:naive-local` records this for consumers.

use chrono::NaiveDateTime;

use crate::schedule::{ScheduledSession, SessionStatus};

/// Maximum content line length in octets, excluding CRLF.
const MAX_LINE_OCTETS: usize = 75;
const PRODID: &str = "-//classroll//Semester Schedule//TR";
const UID_DOMAIN: &str = "classroll";

/// Builder for a VCALENDAR document.
#[derive(Debug, Clone)]
pub struct CalendarFeed {
    name: String,
    stamp: Option<NaiveDateTime>,
}

impl CalendarFeed {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stamp: None,
        }
    }

    /// Emit `DTSTAMP` on every event using the given generation time.
    pub fn with_stamp(mut self, stamp: NaiveDateTime) -> Self {
        self.stamp = Some(stamp);
        self
    }

    pub fn render(&self, sessions: &[ScheduledSession]) -> String {
        let mut out = String::new();
        push_line(&mut out, "BEGIN:VCALENDAR");
        push_line(&mut out, "VERSION:2.0");
        push_line(&mut out, &format!("PRODID:{PRODID}"));
        push_line(&mut out, "CALSCALE:GREGORIAN");
        push_line(&mut out, "METHOD:PUBLISH");
        push_line(&mut out, &format!("X-WR-CALNAME:{}", escape_text(&self.name)));
        push_line(&mut out, "X-CLASSROLL-TIME-BASIS:naive-local");

        for session in sessions {
            self.push_event(&mut out, session);
        }

        push_line(&mut out, "END:VCALENDAR");
        out
    }

    fn push_event(&self, out: &mut String, session: &ScheduledSession) {
        push_line(out, "BEGIN:VEVENT");
        push_line(out, &format!("UID:{}@{UID_DOMAIN}", session.id));
        if let Some(stamp) = self.stamp {
            push_line(out, &format!("DTSTAMP:{}", utc_stamp(stamp)));
        }
        push_line(out, &format!("DTSTART:{}", utc_stamp(session.starts_at())));
        push_line(out, &format!("DTEND:{}", utc_stamp(session.ends_at())));
        push_line(
            out,
            &format!("SUMMARY:{}", escape_text(&format!("{} - {}", session.code, session.name))),
        );
        push_line(out, &format!("LOCATION:{}", escape_text(&session.classroom)));
        push_line(out, &format!("DESCRIPTION:{}", escape_text(&session.section)));
        let status = match session.status {
            SessionStatus::Canceled => "CANCELLED",
            SessionStatus::Scheduled | SessionStatus::Completed => "CONFIRMED",
        };
        push_line(out, &format!("STATUS:{status}"));
        push_line(out, "END:VEVENT");
    }
}

/// Render `sessions` as a VCALENDAR document without `DTSTAMP`s.
pub fn to_calendar_feed(sessions: &[ScheduledSession], feed_name: &str) -> String {
    CalendarFeed::new(feed_name).render(sessions)
}

fn utc_stamp(at: NaiveDateTime) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escapes backslash, comma, semicolon and newlines in a TEXT value.
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            ',' => result.push_str("\\,"),
            ';' => result.push_str("\\;"),
            '\n' => result.push_str("\\n"),
            '\r' => {}
            _ => result.push(c),
        }
    }
    result
}

/// Append `line` folded at 75 octets, continuation lines prefixed by a space.
/// Never splits a UTF-8 sequence.
fn push_line(out: &mut String, line: &str) {
    let mut rest = line;
    let mut limit = MAX_LINE_OCTETS;
    loop {
        if rest.len() <= limit {
            out.push_str(rest);
            out.push_str("\r\n");
            return;
        }
        let mut cut = limit;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        out.push_str(&rest[..cut]);
        out.push_str("\r\n ");
        rest = &rest[cut..];
        // The leading space counts towards the continuation line.
        limit = MAX_LINE_OCTETS - 1;
    }
}
