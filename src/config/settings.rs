//! Stream identifiers, settings and setting changes.
//!
//! # Design Decisions
//! - `SettingChange` carries a typed payload per key, so typed batches can
//!   never fail validation
//! - `RawSettingChange` is the untyped form for external input (config files,
//!   command lines); it is converted one change at a time inside the batch

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::error::ConfigError;
use crate::config::validation;
use crate::sink::{Destination, Format};

/// One of the two log streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamId {
    /// debug, info, warn and error records.
    Normal,
    /// Trace records.
    Trace,
}

impl StreamId {
    pub const ALL: [StreamId; 2] = [StreamId::Normal, StreamId::Trace];

    pub const fn as_str(self) -> &'static str {
        match self {
            StreamId::Normal => "normal",
            StreamId::Trace => "trace",
        }
    }

    pub const fn is_trace(self) -> bool {
        matches!(self, StreamId::Trace)
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for StreamId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(StreamId::Normal),
            "trace" => Ok(StreamId::Trace),
            _ => Err(ConfigError::UnknownStream(s.to_string())),
        }
    }
}

/// Name of a configurable setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Destination,
    Format,
    OmitTime,
}

impl SettingKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            SettingKey::Destination => "destination",
            SettingKey::Format => "format",
            SettingKey::OmitTime => "omit_time",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "destination" => Ok(SettingKey::Destination),
            "format" => Ok(SettingKey::Format),
            "omit_time" => Ok(SettingKey::OmitTime),
            _ => Err(ConfigError::UnknownSetting(s.to_string())),
        }
    }
}

/// A setting with its typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
    Destination(Destination),
    Format(Format),
    OmitTime(bool),
}

impl Setting {
    pub fn key(&self) -> SettingKey {
        match self {
            Setting::Destination(_) => SettingKey::Destination,
            Setting::Format(_) => SettingKey::Format,
            Setting::OmitTime(_) => SettingKey::OmitTime,
        }
    }
}

/// A validated change to one stream's settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingChange {
    pub stream: StreamId,
    pub setting: Setting,
}

impl SettingChange {
    pub fn new(stream: StreamId, setting: Setting) -> Self {
        Self { stream, setting }
    }

    pub fn destination(stream: StreamId, destination: Destination) -> Self {
        Self::new(stream, Setting::Destination(destination))
    }

    pub fn format(stream: StreamId, format: Format) -> Self {
        Self::new(stream, Setting::Format(format))
    }

    pub fn omit_time(stream: StreamId, omit: bool) -> Self {
        Self::new(stream, Setting::OmitTime(omit))
    }
}

/// An unvalidated change, as read from external input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSettingChange {
    pub stream: String,
    pub key: String,
    pub value: Value,
}

impl RawSettingChange {
    pub fn new(stream: impl Into<String>, key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            stream: stream.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Conversion into a validated [`SettingChange`].
pub trait IntoSettingChange {
    fn into_setting_change(self) -> Result<SettingChange, ConfigError>;
}

impl IntoSettingChange for SettingChange {
    fn into_setting_change(self) -> Result<SettingChange, ConfigError> {
        Ok(self)
    }
}

impl IntoSettingChange for &SettingChange {
    fn into_setting_change(self) -> Result<SettingChange, ConfigError> {
        Ok(self.clone())
    }
}

impl IntoSettingChange for RawSettingChange {
    fn into_setting_change(self) -> Result<SettingChange, ConfigError> {
        validation::parse_change(&self)
    }
}

impl IntoSettingChange for &RawSettingChange {
    fn into_setting_change(self) -> Result<SettingChange, ConfigError> {
        validation::parse_change(self)
    }
}

/// Snapshot of one stream's settings.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamSettings {
    pub destination: Destination,
    pub format: Format,
    pub omit_time: bool,
}

impl StreamSettings {
    /// Text format with timestamps, writing to `destination`.
    pub fn new(destination: Destination) -> Self {
        Self {
            destination,
            format: Format::Text,
            omit_time: false,
        }
    }
}
