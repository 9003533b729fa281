//! Plan documents and per-invocation context.
//!
//! A plan file holds everything the engine needs for one semester: its
//! bounds, the holiday and exam-period lists, and the weekly slots. JSON and
//! TOML are both accepted, chosen by file extension.

use std::error::Error;
use std::path::{Path, PathBuf};

use classroll_core::{
    CalendarPolicy, Config, ConfigError, ExamPeriod, Holiday, SemesterBounds, ValidationError,
    WeeklySchedule, WeeklySlot,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub semester: Option<SemesterBounds>,
    #[serde(default)]
    pub holidays: Vec<Holiday>,
    #[serde(default)]
    pub exam_periods: Vec<ExamPeriod>,
    /// Flat slot list; each slot is filed under its own weekday.
    #[serde(default)]
    pub schedule: Vec<WeeklySlot>,
}

impl Plan {
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read plan {}: {e}", path.display()))?;
        let plan: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };
        tracing::debug!(path = %path.display(), "plan loaded");
        Ok(plan)
    }

    /// Build the calendar policy, honouring the configured missing-bounds behaviour.
    pub fn policy(&self, config: &Config) -> Result<CalendarPolicy, Box<dyn Error>> {
        let policy = CalendarPolicy::new(
            self.holidays.clone(),
            self.exam_periods.clone(),
            self.semester,
        )?;
        Ok(policy.with_missing_bounds(config.missing_bounds()))
    }

    /// Two slots on the same weekday and start time are an error, not a replacement.
    pub fn weekly_schedule(&self) -> Result<WeeklySchedule, ValidationError> {
        WeeklySchedule::from_slots(self.schedule.iter().cloned())
    }
}

/// Global options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub plan_path: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
}

impl Context {
    pub fn plan(&self) -> Result<Plan, Box<dyn Error>> {
        let path = self
            .plan_path
            .as_deref()
            .ok_or("no plan file given; pass --plan <FILE>")?;
        Plan::load(path)
    }

    /// An explicit `--config` path that does not exist yet yields defaults.
    pub fn config(&self) -> Result<Config, ConfigError> {
        match &self.config_path {
            Some(path) if path.exists() => Config::load_from(path),
            Some(_) => Ok(Config::default()),
            None => Config::load(),
        }
    }

    pub fn save_config(&self, config: &Config) -> Result<(), ConfigError> {
        match &self.config_path {
            Some(path) => config.save_to(path),
            None => config.save(),
        }
    }
}
