//! Command-line flags for configuring a [`Logger`].
//!
//! Flatten [`LogArgs`] into an application's own `clap` parser:
//!
//! ```rust,no_run
//! use clap::Parser;
//! use logswitch::{cli::LogArgs, Logger};
//!
//! #[derive(Parser)]
//! struct Cli {
//!     #[command(flatten)]
//!     log: LogArgs,
//! }
//!
//! let cli = Cli::parse();
//! let logger = Logger::new();
//! cli.log.apply(&logger).unwrap();
//! ```

use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{ArgAction, Args};

use crate::config::{load_and_apply, LoadError, SettingChange, StreamId};
use crate::dispatch::Logger;
use crate::level::Level;
use crate::sink::Format;

/// A list of trace identifiers given as one comma-separated argument.
///
/// Parsing another list with [`extend_from_str`](Self::extend_from_str)
/// appends to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceIds(Vec<String>);

impl TraceIds {
    /// Append the identifiers in a comma-separated list. Blank entries are skipped.
    pub fn extend_from_str(&mut self, list: &str) {
        self.0.extend(
            list.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_owned),
        );
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl FromStr for TraceIds {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ids = TraceIds::default();
        ids.extend_from_str(s);
        Ok(ids)
    }
}

impl fmt::Display for TraceIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(" "))
    }
}

impl Extend<TraceIds> for TraceIds {
    fn extend<I: IntoIterator<Item = TraceIds>>(&mut self, iter: I) {
        for ids in iter {
            self.0.extend(ids.0);
        }
    }
}

/// Logging flags shared by binaries built on this crate.
#[derive(Debug, Clone, Default, Args)]
pub struct LogArgs {
    /// Minimum severity: trace, debug, info, warn or error
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub level: Option<Level>,

    /// Comma-separated trace identifiers; may be repeated
    #[arg(long = "trace-ids", value_name = "IDS", action = ArgAction::Append)]
    pub trace_ids: Vec<TraceIds>,

    /// Record format for both streams: text or json
    #[arg(long = "log-format", value_name = "FORMAT")]
    pub format: Option<Format>,

    /// Leave timestamps out of records on both streams
    #[arg(long = "omit-time")]
    pub omit_time: bool,

    /// TOML logging configuration file, applied before the other flags
    #[arg(long = "log-config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl LogArgs {
    /// Every identifier from every `--trace-ids` flag, in order.
    pub fn all_trace_ids(&self) -> TraceIds {
        let mut all = TraceIds::default();
        all.extend(self.trace_ids.iter().cloned());
        all
    }

    /// Apply the config file (if any), then the flag overrides.
    pub fn apply(&self, logger: &Logger) -> Result<(), LoadError> {
        if let Some(path) = &self.config {
            load_and_apply(path, logger)?;
        }

        if let Some(level) = self.level {
            logger.set_level(level);
        }

        let ids = self.all_trace_ids();
        if !ids.is_empty() {
            logger.register_trace_ids(ids.iter());
        }

        let mut changes = Vec::new();
        if let Some(format) = self.format {
            changes.extend(StreamId::ALL.map(|stream| SettingChange::format(stream, format)));
        }
        if self.omit_time {
            changes.extend(StreamId::ALL.map(|stream| SettingChange::omit_time(stream, true)));
        }
        logger.apply_settings(changes)?;

        Ok(())
    }
}
