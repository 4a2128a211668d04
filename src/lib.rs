//! Runtime-configurable two-stream logging.
//!
//! A [`Logger`] writes **normal** records (debug to error) and **trace**
//! records (an opt-in level below debug) to independently configured sinks.
//! Destination, format and timestamp suppression can be changed per stream
//! while the process runs; one severity threshold governs both streams.
//!
//! ```
//! use logswitch::{attrs, Format, Level, Logger, SettingChange, StreamId};
//!
//! let logger = Logger::new();
//! logger.info("started", attrs!["pid" => 123]);
//!
//! logger
//!     .apply_settings([SettingChange::format(StreamId::Normal, Format::Json)])
//!     .unwrap();
//! logger.set_level(Level::Trace);
//! logger.register_trace_ids(["checkout"]);
//! logger.trace_id("checkout", "cart loaded", attrs!["items" => 3]);
//! ```

// Core
pub mod config;
pub mod dispatch;
pub mod level;
pub mod sink;
pub mod trace_ids;

// Surfaces
pub mod cli;
pub mod global;
pub mod observability;

pub use config::{
    ConfigError, ConfigWatcher, LoadError, LoggingConfig, RawSettingChange, Setting,
    SettingChange, StreamId, StreamSettings,
};
pub use dispatch::Logger;
pub use global::global;
pub use level::{Level, LevelVar};
pub use observability::{init_tracing, BridgeLayer};
pub use sink::{Attr, Destination, Format, Record, Sink, Source};
pub use trace_ids::TraceIdSet;
