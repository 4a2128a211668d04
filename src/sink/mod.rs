//! Record handlers.
//!
//! # Data Flow
//! ```text
//! Record
//!     → Sink::enabled (live threshold)
//!     → built-in attrs (time, level, source, msg)
//!     → rewrite.rs (level name, timestamp suppression)
//!     → encode.rs (text or JSON)
//!     → destination.rs (one locked write per record)
//! ```
//!
//! # Design Decisions
//! - A sink is immutable once built; structural changes build a new one
//! - The threshold and the omit-time flag are bound by reference

pub mod destination;
pub mod encode;
pub mod record;
pub mod rewrite;

use std::io;
use std::sync::Arc;

use crate::level::{Level, LevelVar};

pub use destination::Destination;
pub use encode::Format;
pub use record::{Attr, Record, Source};
pub use rewrite::AttrRewriter;

use rewrite::{LEVEL_KEY, MESSAGE_KEY, SOURCE_KEY, TIME_KEY};

/// Options bound into a sink at construction time.
#[derive(Debug, Clone)]
pub struct SinkOptions {
    /// Shared minimum severity.
    pub level: Arc<LevelVar>,
    /// Rewrite hook applied to built-in attributes.
    pub rewriter: AttrRewriter,
    /// Include the source location of the emitting call.
    pub add_source: bool,
}

/// A constructed handler that filters, rewrites and serializes records.
#[derive(Debug)]
pub struct Sink {
    destination: Destination,
    format: Format,
    options: SinkOptions,
}

impl Sink {
    pub fn new(destination: Destination, format: Format, options: SinkOptions) -> Self {
        Self {
            destination,
            format,
            options,
        }
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn add_source(&self) -> bool {
        self.options.add_source
    }

    /// Returns true if a record at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        self.options.level.enabled(level)
    }

    /// Serialize and write one record.
    pub fn handle(&self, record: &Record<'_>) -> io::Result<()> {
        let buf = self.render(record)?;
        self.destination.write_record(&buf)
    }

    /// Serialize a record without writing it.
    pub fn render(&self, record: &Record<'_>) -> io::Result<Vec<u8>> {
        let builtins = self.builtin_attrs(record);
        let mut buf = Vec::with_capacity(128);
        self.format
            .encode(builtins.iter().chain(record.attrs.iter()), &mut buf)?;
        Ok(buf)
    }

    fn builtin_attrs(&self, record: &Record<'_>) -> Vec<Attr> {
        let mut attrs = Vec::with_capacity(4);
        attrs.push(Attr::new(TIME_KEY, self.format.timestamp(&record.time)));
        attrs.push(Attr::new(LEVEL_KEY, i64::from(record.level.as_i8())));
        if self.options.add_source {
            if let Some(source) = record.source {
                attrs.push(Attr::new(SOURCE_KEY, self.format.source_value(source)));
            }
        }
        attrs.push(Attr::new(MESSAGE_KEY, record.message));
        attrs
            .into_iter()
            .filter_map(|attr| self.options.rewriter.rewrite(attr))
            .collect()
    }
}
