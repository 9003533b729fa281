//! Core error types for classroll-core.
//!
//! This module defines the error hierarchy using thiserror. Empty results
//! (an empty schedule, an inverted range, a semester without teaching days)
//! are never errors; only malformed input and file-system failures are.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::schedule::{SessionStatus, Weekday};

/// Core error type for classroll-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Input rejected at a data-entry boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Unparseable calendar date
    #[error("Invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDate { input: String },

    /// Unparseable clock time
    #[error("Invalid time '{input}': expected zero-padded HH:MM")]
    InvalidTime { input: String },

    /// Slot whose end does not come after its start (including midnight crossings)
    #[error("Invalid time range: end_time ({end}) must be greater than start_time ({start})")]
    InvalidTimeRange { start: NaiveTime, end: NaiveTime },

    /// Exam period ending before it starts
    #[error("Invalid exam period '{id}': end_date ({end}) is before start_date ({start})")]
    InvalidExamPeriod {
        id: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// Semester ending before it starts
    #[error("Invalid semester: end_date ({end}) is before start_date ({start})")]
    InvalidSemester { start: NaiveDate, end: NaiveDate },

    /// Slot filed under a weekday other than its own
    #[error("Slot '{code}' is stored under {found} but scheduled on {expected}")]
    MisplacedSlot {
        code: String,
        expected: Weekday,
        found: Weekday,
    },

    /// Slot filed under a start-time key other than its own start time
    #[error("Slot '{code}' is stored under '{key}' but starts at {start}")]
    MiskeyedSlot {
        code: String,
        key: String,
        start: String,
    },

    /// Two slots on the same weekday with the same start time
    #[error("Slots '{existing}' and '{incoming}' both start on {day} at {start}")]
    DuplicateSlot {
        day: Weekday,
        start: String,
        existing: String,
        incoming: String,
    },

    /// Update or removal of a record that does not exist
    #[error("Unknown {kind} id: {id}")]
    UnknownId { kind: &'static str, id: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Rejected status change on a scheduled session.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid status transition: {from:?} → {to:?}")]
pub struct SessionTransitionError {
    pub from: SessionStatus,
    pub to: SessionStatus,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
