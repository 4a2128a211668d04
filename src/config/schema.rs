//! Configuration file schema.
//!
//! All types derive Serde traits for deserialization from TOML files. Every
//! field is optional; missing stream settings fall back to the stream's
//! defaults, so a file always describes the complete logging setup.

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::config::settings::{RawSettingChange, SettingKey, StreamId};
use crate::dispatch::Logger;
use crate::level::Level;
use crate::sink::Format;

/// Root logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Severity threshold (trace, debug, info, warn, error).
    pub level: String,

    /// Identifiers to enable for filtered tracing. Appended to any already
    /// registered.
    pub trace_ids: Vec<String>,

    /// Settings for the normal stream.
    pub normal: StreamConfig,

    /// Settings for the trace stream.
    pub trace: StreamConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::Info.as_str().to_ascii_lowercase(),
            trace_ids: Vec::new(),
            normal: StreamConfig::default(),
            trace: StreamConfig::default(),
        }
    }
}

/// Settings for one stream.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StreamConfig {
    /// `stdout`, `stderr` or a file path.
    pub destination: Option<String>,

    /// `text` or `json`.
    pub format: Option<String>,

    /// Leave timestamps out of records.
    pub omit_time: Option<bool>,
}

/// Destination used when a stream does not name one.
pub fn default_destination(stream: StreamId) -> &'static str {
    match stream {
        StreamId::Normal => "stdout",
        StreamId::Trace => "stderr",
    }
}

impl StreamConfig {
    fn to_changes(&self, stream: StreamId) -> [RawSettingChange; 3] {
        let name = stream.as_str();
        [
            RawSettingChange::new(
                name,
                SettingKey::Destination.as_str(),
                self.destination
                    .as_deref()
                    .unwrap_or(default_destination(stream)),
            ),
            RawSettingChange::new(
                name,
                SettingKey::Format.as_str(),
                self.format.as_deref().unwrap_or(Format::Text.as_str()),
            ),
            RawSettingChange::new(
                name,
                SettingKey::OmitTime.as_str(),
                self.omit_time.unwrap_or(false),
            ),
        ]
    }
}

impl LoggingConfig {
    pub fn stream(&self, stream: StreamId) -> &StreamConfig {
        match stream {
            StreamId::Normal => &self.normal,
            StreamId::Trace => &self.trace,
        }
    }

    /// The stream settings of this file as one ordered batch.
    pub fn to_changes(&self) -> Vec<RawSettingChange> {
        StreamId::ALL
            .into_iter()
            .flat_map(|stream| self.stream(stream).to_changes(stream))
            .collect()
    }

    /// Apply the threshold, trace identifiers and stream settings.
    ///
    /// An invalid level is rejected before anything changes. Stream settings
    /// follow the batch rules: a failing change stops the batch and earlier
    /// changes stay applied.
    pub fn apply_to(&self, logger: &Logger) -> Result<(), ConfigError> {
        let level: Level = self.level.parse()?;
        logger.set_level(level);
        logger.register_trace_ids(&self.trace_ids);
        logger.apply_settings(self.to_changes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_file_uses_defaults() {
        let config: LoggingConfig = toml::from_str("").unwrap();
        assert_eq!(config.level, "info");
        assert!(config.trace_ids.is_empty());

        let changes = config.to_changes();
        assert_eq!(changes.len(), 6);
        assert_eq!(changes[0], RawSettingChange::new("normal", "destination", "stdout"));
        assert_eq!(changes[3], RawSettingChange::new("trace", "destination", "stderr"));
        assert_eq!(changes[4], RawSettingChange::new("trace", "format", "text"));
        assert_eq!(changes[5], RawSettingChange::new("trace", "omit_time", false));
    }

    #[test]
    fn test_full_file() {
        let config: LoggingConfig = toml::from_str(
            r#"
            level = "trace"
            trace_ids = ["Checkout", "db"]

            [normal]
            format = "json"

            [trace]
            destination = "stdout"
            omit_time = true
            "#,
        )
        .unwrap();

        assert_eq!(config.level, "trace");
        assert_eq!(config.trace_ids, vec!["Checkout", "db"]);
        assert_eq!(config.normal.format.as_deref(), Some("json"));
        assert_eq!(config.normal.destination, None);
        assert_eq!(config.trace.destination.as_deref(), Some("stdout"));
        assert_eq!(config.trace.omit_time, Some(true));

        let changes = config.to_changes();
        assert_eq!(changes[1], RawSettingChange::new("normal", "format", "json"));
        assert_eq!(changes[5], RawSettingChange::new("trace", "omit_time", true));
    }

    #[test]
    fn test_wrong_type_rejected_by_parser() {
        let result: Result<LoggingConfig, _> = toml::from_str("[trace]\nomit_time = \"yes\"\n");
        assert!(result.is_err());
    }
}
