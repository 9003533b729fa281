use chrono::NaiveDate;
use clap::ValueEnum;
use classroll_core::calendar::{format_clock, parse_date};
use classroll_core::{CalendarFeed, CalendarPolicy, ScheduleExpander, ScheduledSession};

use super::{now, print_table};
use crate::plan::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Tab-separated rows
    Table,
    /// iCalendar feed
    Ics,
}

/// Date range options shared by `expand` and `export`.
#[derive(Debug, Clone, clap::Args)]
pub struct RangeArgs {
    /// First date (YYYY-MM-DD); defaults to the semester start
    #[arg(long, value_parser = parse_date)]
    pub from: Option<NaiveDate>,
    /// Last date (YYYY-MM-DD); defaults to the semester end
    #[arg(long, value_parser = parse_date)]
    pub to: Option<NaiveDate>,
}

impl RangeArgs {
    fn resolve(&self, policy: &CalendarPolicy) -> Result<(NaiveDate, NaiveDate), Box<dyn std::error::Error>> {
        let semester = policy.semester();
        let from = self
            .from
            .or(semester.map(|s| s.start_date))
            .ok_or("no start date; pass --from or set the plan's semester")?;
        let to = self
            .to
            .or(semester.map(|s| s.end_date))
            .ok_or("no end date; pass --to or set the plan's semester")?;
        Ok((from, to))
    }
}

fn expand_plan(ctx: &Context, range: &RangeArgs) -> Result<Vec<ScheduledSession>, Box<dyn std::error::Error>> {
    let config = ctx.config()?;
    let plan = ctx.plan()?;
    let policy = plan.policy(&config)?;
    let (from, to) = range.resolve(&policy)?;
    let sessions = ScheduleExpander::new(&policy).expand(&plan.weekly_schedule()?, from, to)?;
    Ok(sessions)
}

pub fn expand(ctx: &Context, range: &RangeArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let sessions = expand_plan(ctx, range)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
    } else {
        print_table(&sessions);
    }
    Ok(())
}

pub fn summary(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let schedule = ctx.plan()?.weekly_schedule()?;
    schedule.validate()?;
    let summary = ScheduleExpander::summarize(&schedule);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

pub fn conflicts(ctx: &Context, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let schedule = ctx.plan()?.weekly_schedule()?;
    schedule.validate()?;
    let conflicts = schedule.conflicts();
    if json {
        println!("{}", serde_json::to_string_pretty(&conflicts)?);
        return Ok(());
    }
    if conflicts.is_empty() {
        println!("no conflicts");
    }
    for c in &conflicts {
        println!(
            "{}: {} {}-{} overlaps {} {}-{}",
            c.day.display_name(),
            c.first.code,
            format_clock(c.first.start_time),
            format_clock(c.first.end_time),
            c.second.code,
            format_clock(c.second.start_time),
            format_clock(c.second.end_time),
        );
    }
    Ok(())
}

pub fn export(
    ctx: &Context,
    format: ExportFormat,
    name: Option<String>,
    range: &RangeArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let sessions = expand_plan(ctx, range)?;
    match format {
        ExportFormat::Table => print_table(&sessions),
        ExportFormat::Ics => {
            let config = ctx.config()?;
            let mut feed = CalendarFeed::new(name.unwrap_or(config.export.feed_name));
            if config.export.stamp_events {
                feed = feed.with_stamp(now());
            }
            print!("{}", feed.render(&sessions));
        }
    }
    Ok(())
}
