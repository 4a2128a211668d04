//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::error::ConfigError;
use crate::config::schema::LoggingConfig;
use crate::config::validation::validate_config;
use crate::dispatch::Logger;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ConfigError>),

    #[error("Apply failed: {0}")]
    Apply(#[from] ConfigError),
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<LoggingConfig, LoadError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<LoggingConfig, LoadError> {
    let config: LoggingConfig = toml::from_str(content)?;

    validate_config(&config).map_err(LoadError::Validation)?;

    Ok(config)
}

/// Load a TOML file and apply it to `logger`.
///
/// Nothing is applied unless the whole file validates.
pub fn load_and_apply(path: &Path, logger: &Logger) -> Result<(), LoadError> {
    let config = load_config(path)?;
    config.apply_to(logger)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn test_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "level = ").unwrap();
        assert!(matches!(load_config(file.path()), Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_validation_error_lists_every_problem() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "level = \"loud\"\n[trace]\nformat = \"xml\"").unwrap();

        let err = load_config(file.path()).unwrap_err();
        match &err {
            LoadError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("loud"));
    }

    #[test]
    fn test_load_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "level = \"debug\"\n[normal]\nformat = \"json\"").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.level, "debug");
        assert_eq!(config.normal.format.as_deref(), Some("json"));
    }
}
