//! Severity levels and the shared, live severity threshold.
//!
//! # Responsibilities
//! - Define the five severities, including the custom trace level
//! - Provide the one severity-to-name mapping used everywhere
//! - Hold the process-wide threshold shared by both streams
//!
//! # Design Decisions
//! - Numeric values follow the structured logging convention (info = 0,
//!   four apart) with trace well below debug
//! - The threshold is an atomic so sinks can hold it by reference and observe
//!   changes without being rebuilt

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI8, Ordering};

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Severity of a log record.
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Level {
    /// Opt-in diagnostics, more verbose than debug.
    Trace = -10,
    Debug = -4,
    #[default]
    Info = 0,
    Warn = 4,
    Error = 8,
}

impl Level {
    /// All levels from most to least verbose.
    pub const ALL: [Level; 5] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
    ];

    /// Raw numeric value of the level.
    pub const fn as_i8(self) -> i8 {
        self as i8
    }

    /// Map a raw numeric value back to a level.
    pub fn from_i8(raw: i8) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_i8() == raw)
    }

    /// Canonical upper-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            _ => Err(ConfigError::InvalidSeverity(s.to_string())),
        }
    }
}

impl TryFrom<String> for Level {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, ConfigError> {
        value.parse()
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.as_str().to_string()
    }
}

/// A severity threshold that can be shared and changed at runtime.
#[derive(Debug)]
pub struct LevelVar {
    raw: AtomicI8,
}

impl LevelVar {
    pub fn new(level: Level) -> Self {
        Self {
            raw: AtomicI8::new(level.as_i8()),
        }
    }

    /// Current threshold.
    pub fn level(&self) -> Level {
        // Only valid levels are ever stored.
        Level::from_i8(self.raw.load(Ordering::Acquire)).unwrap_or_default()
    }

    pub fn set(&self, level: Level) {
        self.raw.store(level.as_i8(), Ordering::Release);
    }

    /// Returns true if a record at `level` passes the threshold.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level()
    }
}

impl Default for LevelVar {
    fn default() -> Self {
        Self::new(Level::Info)
    }
}
