//! Configuration validation.
//!
//! # Responsibilities
//! - Convert untyped setting changes into typed ones
//! - Check stream names, setting keys and value types
//! - Semantic checks over a whole config file before it is accepted
//!
//! # Design Decisions
//! - Checks run in a fixed order: stream, then key, then value
//! - `validate_config` returns all errors, not just the first
//! - `validate_config` is pure: it never opens destination files

use serde_json::Value;

use crate::config::error::ConfigError;
use crate::config::schema::LoggingConfig;
use crate::config::settings::{RawSettingChange, Setting, SettingChange, SettingKey, StreamId};
use crate::level::Level;
use crate::sink::{Destination, Format};

/// Where a destination string points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationSpec<'a> {
    Stdout,
    Stderr,
    File(&'a str),
}

/// Convert and validate one untyped change. File destinations are opened.
pub fn parse_change(raw: &RawSettingChange) -> Result<SettingChange, ConfigError> {
    let stream: StreamId = raw.stream.parse()?;
    let key: SettingKey = raw.key.parse()?;
    let setting = match key {
        SettingKey::Destination => Setting::Destination(parse_destination(&raw.value)?),
        SettingKey::Format => Setting::Format(parse_format(&raw.value)?),
        SettingKey::OmitTime => Setting::OmitTime(parse_omit_time(&raw.value)?),
    };
    Ok(SettingChange::new(stream, setting))
}

/// Validate one untyped change without side effects.
pub fn check_change(raw: &RawSettingChange) -> Result<(), ConfigError> {
    raw.stream.parse::<StreamId>()?;
    match raw.key.parse::<SettingKey>()? {
        SettingKey::Destination => destination_spec(&raw.value).map(|_| ()),
        SettingKey::Format => parse_format(&raw.value).map(|_| ()),
        SettingKey::OmitTime => parse_omit_time(&raw.value).map(|_| ()),
    }
}

/// Validate a whole config file.
pub fn validate_config(config: &LoggingConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.level.parse::<Level>() {
        errors.push(e);
    }

    if config.trace_ids.iter().any(|id| id.trim().is_empty()) {
        errors.push(ConfigError::invalid_value(
            "trace_ids",
            "identifiers must not be empty",
        ));
    }

    errors.extend(
        config
            .to_changes()
            .iter()
            .filter_map(|change| check_change(change).err()),
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Interpret a destination value: `stdout`, `stderr` or a file path.
pub fn destination_spec(value: &Value) -> Result<DestinationSpec<'_>, ConfigError> {
    let Some(spec) = value.as_str() else {
        return Err(ConfigError::invalid_value(
            SettingKey::Destination.as_str(),
            format!("expected a string, got {value}"),
        ));
    };
    let trimmed = spec.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::invalid_value(
            SettingKey::Destination.as_str(),
            "destination must not be empty",
        ));
    }
    if trimmed.eq_ignore_ascii_case("stdout") {
        Ok(DestinationSpec::Stdout)
    } else if trimmed.eq_ignore_ascii_case("stderr") {
        Ok(DestinationSpec::Stderr)
    } else {
        Ok(DestinationSpec::File(trimmed))
    }
}

fn parse_destination(value: &Value) -> Result<Destination, ConfigError> {
    match destination_spec(value)? {
        DestinationSpec::Stdout => Ok(Destination::Stdout),
        DestinationSpec::Stderr => Ok(Destination::Stderr),
        DestinationSpec::File(path) => Destination::file(path).map_err(|e| {
            ConfigError::invalid_value(
                SettingKey::Destination.as_str(),
                format!("cannot open {path}: {e}"),
            )
        }),
    }
}

fn parse_format(value: &Value) -> Result<Format, ConfigError> {
    match value.as_str() {
        Some(s) => s.parse(),
        None => Err(ConfigError::invalid_value(
            SettingKey::Format.as_str(),
            format!("expected \"text\" or \"json\", got {value}"),
        )),
    }
}

fn parse_omit_time(value: &Value) -> Result<bool, ConfigError> {
    value.as_bool().ok_or_else(|| {
        ConfigError::invalid_value(
            SettingKey::OmitTime.as_str(),
            format!("expected a boolean, got {value}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_stream_checked_first() {
        let raw = RawSettingChange::new("audit", "colour", 1);
        assert_eq!(
            parse_change(&raw),
            Err(ConfigError::UnknownStream("audit".into()))
        );
    }

    #[test]
    fn test_unknown_key() {
        let raw = RawSettingChange::new("normal", "colour", "red");
        assert_eq!(
            parse_change(&raw),
            Err(ConfigError::UnknownSetting("colour".into()))
        );
    }

    #[test]
    fn test_wrong_value_types() {
        for raw in [
            RawSettingChange::new("normal", "destination", 7),
            RawSettingChange::new("normal", "destination", ""),
            RawSettingChange::new("normal", "format", "any"),
            RawSettingChange::new("normal", "format", true),
            RawSettingChange::new("trace", "omit_time", "any"),
        ] {
            assert!(
                matches!(parse_change(&raw), Err(ConfigError::InvalidValue { .. })),
                "{raw:?}"
            );
        }
    }

    #[test]
    fn test_valid_changes() {
        assert_eq!(
            parse_change(&RawSettingChange::new("Normal", "format", "JSON")).unwrap(),
            SettingChange::format(StreamId::Normal, Format::Json)
        );
        assert_eq!(
            parse_change(&RawSettingChange::new("trace", "destination", "STDOUT")).unwrap(),
            SettingChange::destination(StreamId::Trace, Destination::Stdout)
        );
        assert_eq!(
            parse_change(&RawSettingChange::new("trace", "omit_time", false)).unwrap(),
            SettingChange::omit_time(StreamId::Trace, false)
        );
    }

    #[test]
    fn test_file_destination_opened() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.log");
        let raw = RawSettingChange::new("trace", "destination", path.to_string_lossy().into_owned());

        let change = parse_change(&raw).unwrap();
        assert!(matches!(change.setting, Setting::Destination(Destination::Writer(_))));
        assert!(path.exists());
    }

    #[test]
    fn test_unopenable_file_is_invalid_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("trace.log");
        let raw = RawSettingChange::new("trace", "destination", path.to_string_lossy().into_owned());

        assert!(matches!(parse_change(&raw), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_check_change_does_not_open_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("later.log");
        let raw = RawSettingChange::new("normal", "destination", path.to_string_lossy().into_owned());

        assert!(check_change(&raw).is_ok());
        assert!(!path.exists());
    }

    #[test]
    fn test_validate_config_collects_all_errors() {
        let mut config = LoggingConfig::default();
        config.level = "loud".into();
        config.trace_ids = vec!["db".into(), " ".into()];
        config.normal.format = Some("xml".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ConfigError::InvalidSeverity("loud".into())));
    }

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&LoggingConfig::default()).is_ok());
    }
}
