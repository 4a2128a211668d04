//! Dispatch engine.
//!
//! # Data Flow
//! ```text
//! apply_settings(batch)
//!     → ConfigStore (ordered, validated)
//!     → sinks.rs rebuilds a stream's sink on destination/format change
//!     → ActiveSinks publishes it
//!
//! emit / trace / trace_for_id
//!     → threshold and identifier gates
//!     → current sink of the stream
//!     → destination
//! ```
//!
//! # Design Decisions
//! - A `Logger` is an explicit context: tests and embedders own their own
//!   instance; `crate::global` holds the process-wide default
//! - Emission never rebuilds sinks and never returns errors

mod emit;
pub mod sinks;

use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::{ConfigError, ConfigStore, IntoSettingChange, SettingChange, StreamId, StreamSettings};
use crate::level::Level;
use crate::sink::{Destination, Format, Sink};

pub use sinks::{build_sink, ActiveSinks};

/// The logging context: configuration store plus the two active sinks.
#[derive(Debug)]
pub struct Logger {
    store: ConfigStore,
    sinks: ActiveSinks,
    write_failures: AtomicU64,
}

impl Logger {
    /// Normal records to stdout, trace records to stderr.
    pub fn new() -> Self {
        Self::with_destinations(Destination::Stdout, Destination::Stderr)
    }

    /// Default settings with the given destinations.
    pub fn with_destinations(normal: Destination, trace: Destination) -> Self {
        let store = ConfigStore::new(normal, trace);
        let sinks = ActiveSinks::new(
            Self::initial_sink(&store, StreamId::Normal),
            Self::initial_sink(&store, StreamId::Trace),
        );
        Self {
            store,
            sinks,
            write_failures: AtomicU64::new(0),
        }
    }

    fn initial_sink(store: &ConfigStore, stream: StreamId) -> Sink {
        let settings = store.settings(stream);
        build_sink(store, stream, settings.destination, settings.format)
    }

    /// Apply an ordered batch of setting changes.
    ///
    /// Accepts typed [`SettingChange`]s or untyped
    /// [`RawSettingChange`](crate::config::RawSettingChange)s. Changed sinks
    /// are rebuilt before this returns. The first invalid change stops the
    /// batch; changes before it stay applied.
    pub fn apply_settings<I>(&self, changes: I) -> Result<(), ConfigError>
    where
        I: IntoIterator,
        I::Item: IntoSettingChange,
    {
        self.store.apply_settings(changes, |stream, settings| {
            let sink = build_sink(&self.store, stream, settings.destination.clone(), settings.format);
            self.sinks.install(stream, sink);
        })
    }

    /// Build a sink for `stream` without installing it.
    pub fn build_sink(&self, stream: StreamId, destination: Destination, format: Format) -> Sink {
        build_sink(&self.store, stream, destination, format)
    }

    pub fn settings(&self, stream: StreamId) -> StreamSettings {
        self.store.settings(stream)
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn level(&self) -> Level {
        self.store.level()
    }

    /// Change the shared threshold; takes effect for the next emit on both streams.
    pub fn set_level(&self, level: Level) {
        self.store.set_level(level);
    }

    /// Parse a severity name and set it. An unknown name leaves the
    /// threshold unchanged.
    pub fn set_level_str(&self, level: &str) -> Result<(), ConfigError> {
        self.set_level(level.parse()?);
        Ok(())
    }

    /// Register identifiers for filtered tracing. Case is ignored.
    pub fn register_trace_ids<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.store.register_trace_ids(ids);
    }

    /// Registered identifiers, in no particular order.
    pub fn trace_ids(&self) -> Vec<String> {
        self.store.list_trace_ids()
    }

    /// Number of records that could not be written to their destination.
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    /// Set the format of both streams from a name (`text` or `json`, any case).
    #[deprecated(note = "use `apply_settings` with per-stream format changes")]
    pub fn set_format(&self, format: &str) -> Result<(), ConfigError> {
        let format: Format = format.parse()?;
        self.apply_settings(
            StreamId::ALL.map(|stream| SettingChange::format(stream, format)),
        )
    }

    /// Send normal records to `destination`.
    #[deprecated(note = "use `apply_settings` with a destination change")]
    pub fn redirect_normal(&self, destination: Destination) -> Result<(), ConfigError> {
        self.apply_settings([SettingChange::destination(StreamId::Normal, destination)])
    }

    /// Send trace records to `destination`.
    #[deprecated(note = "use `apply_settings` with a destination change")]
    pub fn redirect_trace(&self, destination: Destination) -> Result<(), ConfigError> {
        self.apply_settings([SettingChange::destination(StreamId::Trace, destination)])
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}
