use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use classroll_core::calendar::format_clock;
use classroll_core::{SessionKind, Weekday};

use super::{now, today};
use crate::plan::Context;

pub fn status(ctx: &Context, date: NaiveDate) -> Result<(), Box<dyn std::error::Error>> {
    let policy = ctx.plan()?.policy(&ctx.config()?)?;
    println!("{}", serde_json::to_string_pretty(&policy.date_status(date))?);
    Ok(())
}

pub fn check(ctx: &Context, date: NaiveDate, weekday: Weekday) -> Result<(), Box<dyn std::error::Error>> {
    let policy = ctx.plan()?.policy(&ctx.config()?)?;
    let check = policy.is_valid_teaching_date(date, weekday);
    println!("{}", serde_json::to_string_pretty(&check)?);
    Ok(())
}

pub fn can_start(
    ctx: &Context,
    at: Option<NaiveDateTime>,
    slot_at: Option<(Weekday, NaiveTime)>,
    makeup: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let plan = ctx.plan()?;
    let policy = plan.policy(&ctx.config()?)?;
    let schedule = plan.weekly_schedule()?;

    let slot = match slot_at {
        Some((day, start)) => {
            let key = format_clock(start);
            let slot = schedule
                .get(day, &key)
                .ok_or_else(|| format!("no slot on {day} at {key}"))?;
            Some(slot)
        }
        None => None,
    };
    let kind = if makeup {
        SessionKind::Makeup
    } else {
        SessionKind::Regular
    };

    let decision = policy.can_start_session(at.unwrap_or_else(now), slot, kind);
    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}

pub fn upcoming(
    ctx: &Context,
    count: Option<usize>,
    from: Option<NaiveDate>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ctx.config()?;
    let policy = ctx.plan()?.policy(&config)?;
    let count = count.unwrap_or(config.upcoming.default_count);
    let events = policy.upcoming_events(from.unwrap_or_else(today), count);
    println!("{}", serde_json::to_string_pretty(&events)?);
    Ok(())
}
