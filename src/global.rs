//! Process-wide default logger.
//!
//! The default is built on first use with normal records going to stdout and
//! trace records to stderr. [`install`] replaces it, but only before anything
//! has touched it.

use std::sync::OnceLock;

use crate::config::{ConfigError, IntoSettingChange};
use crate::dispatch::Logger;
use crate::level::Level;
use crate::sink::Attr;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// The process-wide logger.
pub fn global() -> &'static Logger {
    GLOBAL.get_or_init(Logger::new)
}

/// Make `logger` the process-wide logger.
///
/// Returns it back if the default was already initialised.
pub fn install(logger: Logger) -> Result<(), Logger> {
    GLOBAL.set(logger)
}

/// Apply a batch of setting changes to the process-wide logger.
pub fn configure<I>(changes: I) -> Result<(), ConfigError>
where
    I: IntoIterator,
    I::Item: IntoSettingChange,
{
    global().apply_settings(changes)
}

pub fn set_level(level: Level) {
    global().set_level(level);
}

pub fn level() -> Level {
    global().level()
}

pub fn set_trace_ids<I, S>(ids: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    global().register_trace_ids(ids);
}

pub fn debug(message: &str, attrs: &[Attr]) {
    global().debug(message, attrs);
}

pub fn info(message: &str, attrs: &[Attr]) {
    global().info(message, attrs);
}

pub fn warn(message: &str, attrs: &[Attr]) {
    global().warn(message, attrs);
}

pub fn error(message: &str, attrs: &[Attr]) {
    global().error(message, attrs);
}

#[track_caller]
pub fn trace(message: &str, attrs: &[Attr]) {
    global().emit_trace(message, attrs);
}

#[track_caller]
pub fn trace_id(id: &str, message: &str, attrs: &[Attr]) {
    global().emit_trace_for_id(id, message, attrs);
}
