//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! typed SettingChange ─────────────┐
//!                                  ▼
//! RawSettingChange → validation.rs → store.rs (ordered batch)
//!                                  → dispatcher rebuilds changed sinks
//!
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, all errors)
//!     → schema.rs (level, trace ids, one raw batch)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads and validates
//!     → applied to the running logger
//! ```
//!
//! # Design Decisions
//! - Typed changes cannot fail; raw changes are validated one at a time
//!   inside the batch so partial application behaves the same for both
//! - Config files are validated as a whole before any of it is applied

pub mod error;
pub mod loader;
pub mod schema;
pub mod settings;
pub mod store;
pub mod validation;
pub mod watcher;

pub use error::ConfigError;
pub use loader::{load_and_apply, load_config, parse_config, LoadError};
pub use schema::{LoggingConfig, StreamConfig};
pub use settings::{
    IntoSettingChange, RawSettingChange, Setting, SettingChange, SettingKey, StreamId,
    StreamSettings,
};
pub use store::ConfigStore;
pub use watcher::ConfigWatcher;
