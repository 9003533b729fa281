use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use classroll_core::calendar::{parse_clock, parse_date};
use classroll_core::Weekday;
use tracing_subscriber::EnvFilter;

mod commands;
mod plan;

use commands::schedule::{ExportFormat, RangeArgs};
use plan::Context;

#[derive(Parser)]
#[command(name = "classroll", version, about = "Semester schedule and class calendar tool")]
struct Cli {
    /// Plan file (JSON or TOML) with semester, holidays, exam periods and schedule
    #[arg(long, global = true)]
    plan: Option<PathBuf>,
    /// Config file; defaults to ~/.config/classroll/config.toml
    #[arg(long = "config", global = true)]
    config_file: Option<PathBuf>,
    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand the weekly schedule into dated sessions
    Expand {
        #[command(flatten)]
        range: RangeArgs,
        /// Print sessions as JSON
        #[arg(long)]
        json: bool,
    },
    /// Course count and weekly hours
    Summary,
    /// Overlapping slots on the same weekday
    Conflicts {
        #[arg(long)]
        json: bool,
    },
    /// Export expanded sessions
    Export {
        #[arg(long, value_enum, default_value = "table")]
        format: ExportFormat,
        /// Calendar name for iCalendar output
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Classify a date (holiday, exam, non-academic, normal)
    Status {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },
    /// Check whether a date is a teaching day for a weekday
    Check {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        weekday: Weekday,
    },
    /// Decide whether an attendance session may start
    CanStart {
        /// Moment to check (YYYY-MM-DDTHH:MM); defaults to now
        #[arg(long, value_parser = commands::parse_datetime)]
        at: Option<NaiveDateTime>,
        /// Weekday of the slot being started
        #[arg(long, requires = "start")]
        day: Option<Weekday>,
        /// Start time (HH:MM) of the slot being started
        #[arg(long, requires = "day", value_parser = parse_clock)]
        start: Option<NaiveTime>,
        /// Makeup session: exempt from exam periods and the slot window
        #[arg(long)]
        makeup: bool,
    },
    /// Upcoming holidays and exam periods
    Upcoming {
        /// Number of events; defaults to upcoming.default_count
        #[arg(long)]
        count: Option<usize>,
        /// Reference date; defaults to today
        #[arg(long, value_parser = parse_date)]
        today: Option<NaiveDate>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = Context {
        plan_path: cli.plan,
        config_path: cli.config_file,
    };
    let result = match cli.command {
        Commands::Expand { range, json } => commands::schedule::expand(&ctx, &range, json),
        Commands::Summary => commands::schedule::summary(&ctx),
        Commands::Conflicts { json } => commands::schedule::conflicts(&ctx, json),
        Commands::Export { format, name, range } => commands::schedule::export(&ctx, format, name, &range),
        Commands::Status { date } => commands::calendar::status(&ctx, date),
        Commands::Check { date, weekday } => commands::calendar::check(&ctx, date, weekday),
        Commands::CanStart {
            at,
            day,
            start,
            makeup,
        } => commands::calendar::can_start(&ctx, at, day.zip(start), makeup),
        Commands::Upcoming { count, today } => commands::calendar::upcoming(&ctx, count, today),
        Commands::Config { action } => commands::config::run(&ctx, action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
