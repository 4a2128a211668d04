//! Log records and their attributes.

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

use chrono::{DateTime, Local};
use serde_json::Value;

/// A key/value pair attached to a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: Cow<'static, str>,
    pub value: Value,
}

impl Attr {
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Build a slice of [`Attr`]s in call order.
///
/// ```
/// use logswitch::{attrs, Logger};
///
/// let logger = Logger::new();
/// logger.info("started", attrs!["pid" => 123, "mode" => "demo"]);
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        &[] as &[$crate::Attr]
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        &[$($crate::Attr::new($key, $value)),+]
    };
}

/// Source location of the call that produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Source {
    pub file: &'static str,
    pub line: u32,
}

impl Source {
    /// Location of the caller, propagated through `#[track_caller]` frames.
    #[track_caller]
    pub fn caller() -> Self {
        Location::caller().into()
    }
}

impl From<&'static Location<'static>> for Source {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A single log event ready to be handed to a sink.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    pub time: DateTime<Local>,
    pub level: crate::Level,
    pub message: &'a str,
    pub source: Option<Source>,
    pub attrs: &'a [Attr],
}

impl<'a> Record<'a> {
    /// Create a record stamped with the current time.
    pub fn new(level: crate::Level, message: &'a str, attrs: &'a [Attr]) -> Self {
        Self {
            time: Local::now(),
            level,
            message,
            source: None,
            attrs,
        }
    }

    pub fn with_source(mut self, source: Option<Source>) -> Self {
        self.source = source;
        self
    }
}
