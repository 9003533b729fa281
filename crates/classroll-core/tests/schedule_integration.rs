//! Integration tests for semester expansion and its exports.

use chrono::{NaiveDate, NaiveTime};
use classroll_core::calendar::parse_date;
use classroll_core::schedule::expand_schedule;
use classroll_core::{
    to_calendar_feed, to_tabular, CalendarFeed, CalendarPolicy, ExamPeriod, Holiday,
    ScheduleExpander, SemesterBounds, SessionStatus, ValidationError, Weekday, WeeklySchedule,
    WeeklySlot,
};
use indoc::formatdoc;

fn day(s: &str) -> NaiveDate {
    parse_date(s).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn bil101() -> WeeklySlot {
    WeeklySlot::new("c-bil101", "BIL101", "Programlamaya Giriş", Weekday::Monday, time(9, 0), time(11, 0))
        .with_section("1")
        .with_classroom("D-201")
}

fn monday_only() -> WeeklySchedule {
    [bil101()].into_iter().collect()
}

#[test]
fn three_mondays_without_restrictions() {
    let sessions = expand_schedule(&monday_only(), day("2024-09-16"), day("2024-09-30"), &[], &[]).unwrap();

    let dates: Vec<_> = sessions.iter().map(|s| s.date).collect();
    assert_eq!(dates, [day("2024-09-16"), day("2024-09-23"), day("2024-09-30")]);
    for session in &sessions {
        assert_eq!(session.start_time, time(9, 0));
        assert_eq!(session.end_time, time(11, 0));
        assert_eq!(session.code, "BIL101");
        assert_eq!(session.status, SessionStatus::Scheduled);
    }
}

#[test]
fn holiday_monday_is_skipped() {
    let holidays = [Holiday::new("h1", "Test Holiday", day("2024-09-23"))];
    let sessions = expand_schedule(&monday_only(), day("2024-09-16"), day("2024-09-30"), &holidays, &[]).unwrap();

    let dates: Vec<_> = sessions.iter().map(|s| s.date).collect();
    assert_eq!(dates, [day("2024-09-16"), day("2024-09-30")]);
}

#[test]
fn same_start_slot_is_not_silently_dropped() {
    let fiz = WeeklySlot::new("c-fiz", "FIZ101", "Fizik I", Weekday::Monday, time(9, 0), time(11, 0));
    let kim = WeeklySlot::new("c-kim", "KIM101", "Kimya I", Weekday::Monday, time(9, 0), time(10, 0));

    let err = WeeklySchedule::from_slots([fiz, kim]).unwrap_err();
    assert!(matches!(err, ValidationError::DuplicateSlot { .. }));
    let message = err.to_string();
    assert!(message.contains("FIZ101") && message.contains("KIM101"));
}

#[test]
fn empty_schedule_expands_to_nothing() {
    let sessions = expand_schedule(&WeeklySchedule::new(), day("2024-09-16"), day("2025-01-10"), &[], &[]).unwrap();
    assert!(sessions.is_empty());
}

#[test]
fn full_fall_semester() {
    let policy = CalendarPolicy::new(
        vec![Holiday::new("h-29ekim", "Cumhuriyet Bayramı", day("2024-10-29"))],
        vec![ExamPeriod::new("e-mid", "Ara Sınavlar", day("2024-11-11"), day("2024-11-15"))],
        Some(SemesterBounds::new(day("2024-09-16"), day("2024-12-27")).unwrap()),
    )
    .unwrap();
    let schedule: WeeklySchedule = [
        bil101(),
        WeeklySlot::new("c-mat101", "MAT101", "Analiz I", Weekday::Tuesday, time(13, 0), time(15, 0)),
    ]
    .into_iter()
    .collect();

    let sessions = ScheduleExpander::new(&policy).expand_semester(&schedule).unwrap();

    // 15 Mondays and 15 Tuesdays; one exam week removes one of each, the
    // Republic Day Tuesday removes another.
    assert_eq!(sessions.iter().filter(|s| s.code == "BIL101").count(), 14);
    assert_eq!(sessions.iter().filter(|s| s.code == "MAT101").count(), 13);
    assert!(sessions.iter().all(|s| s.date != day("2024-10-29")));
    assert!(sessions.windows(2).all(|w| (w[0].date, w[0].start_time) <= (w[1].date, w[1].start_time)));
}

#[test]
fn tabular_export_matches_session_order() {
    let sessions = expand_schedule(&monday_only(), day("2024-09-16"), day("2024-09-23"), &[], &[]).unwrap();
    let rows = to_tabular(&sessions);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "16.09.2024");
    assert_eq!(rows[1].date, "23.09.2024");
    assert_eq!(rows[0].weekday, "Pazartesi");
    assert_eq!(rows[0].classroom, "D-201");
}

#[test]
fn calendar_feed_layout() {
    let sessions = expand_schedule(&monday_only(), day("2024-09-16"), day("2024-09-16"), &[], &[]).unwrap();
    let stamp = day("2024-09-01").and_time(time(12, 0));
    let feed = CalendarFeed::new("Güz 2024").with_stamp(stamp).render(&sessions);

    let expected = formatdoc! {"
            BEGIN:VCALENDAR
            VERSION:2.0
            PRODID:-//classroll//Semester Schedule//TR
            CALSCALE:GREGORIAN
            METHOD:PUBLISH
            X-WR-CALNAME:Güz 2024
            X-CLASSROLL-TIME-BASIS:naive-local
            BEGIN:VEVENT
            UID:{id}@classroll
            DTSTAMP:20240901T120000Z
            DTSTART:20240916T090000Z
            DTEND:20240916T110000Z
            SUMMARY:BIL101 - Programlamaya Giriş
            LOCATION:D-201
            DESCRIPTION:1
            STATUS:CONFIRMED
            END:VEVENT
            END:VCALENDAR
        ",
        id = sessions[0].id,
    };
    assert_eq!(feed, expected.replace('\n', "\r\n"));
}

#[test]
fn empty_feed_still_has_envelope() {
    let feed = to_calendar_feed(&[], "Boş");
    assert!(feed.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(feed.ends_with("END:VCALENDAR\r\n"));
    assert!(!feed.contains("BEGIN:VEVENT"));
}
