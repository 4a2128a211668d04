//! Bridge from the `tracing` ecosystem into a [`Logger`].
//!
//! Events recorded with the standard `tracing` macros are re-emitted on the
//! logger's streams:
//!
//! - `ERROR`, `WARN`, `INFO` and `DEBUG` go to the normal stream and are
//!   filtered by the shared threshold
//! - `TRACE` goes to the trace stream, only while the threshold is exactly
//!   trace, with the event's file and line as the record source
//!
//! The `message` field becomes the record message; every other field
//! becomes an attribute, in the order the fields were declared.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use logswitch::{init_tracing, Logger};
//!
//! let logger = Arc::new(Logger::new());
//! init_tracing(Arc::clone(&logger)).unwrap();
//!
//! tracing::info!(port = 8080, "listening");
//! ```

use std::fmt;
use std::ops::Deref;

use serde_json::Value;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use crate::dispatch::Logger;
use crate::level::Level;
use crate::sink::{Attr, Source};

/// A tracing layer that forwards events to a [`Logger`].
pub struct BridgeLayer<L> {
    logger: L,
}

impl<L> BridgeLayer<L>
where
    L: Deref<Target = Logger>,
{
    pub fn new(logger: L) -> Self {
        Self { logger }
    }

    fn map_level(level: &tracing::Level) -> Level {
        match *level {
            tracing::Level::ERROR => Level::Error,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::INFO => Level::Info,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::TRACE => Level::Trace,
        }
    }
}

impl<S, L> Layer<S> for BridgeLayer<L>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    L: Deref<Target = Logger> + Send + Sync + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Self::map_level(metadata.level());

        let is_trace = level == Level::Trace;
        let enabled = if is_trace {
            self.logger.trace_enabled()
        } else {
            self.logger.enabled(level)
        };
        if !enabled {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let message = visitor.message.unwrap_or_default();

        if is_trace {
            let source = metadata
                .file()
                .zip(metadata.line())
                .map(|(file, line)| Source { file, line });
            self.logger.emit_trace_at(source, &message, &visitor.attrs);
        } else {
            self.logger.emit_normal(level, &message, &visitor.attrs);
        }
    }
}

/// Collects the message and the remaining fields of an event.
#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    attrs: Vec<Attr>,
}

impl FieldVisitor {
    fn push(&mut self, field: &Field, value: Value) {
        self.attrs.push(Attr::new(field.name(), value));
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        if field.name() == "message" {
            self.message = Some(rendered);
        } else {
            self.push(field, Value::String(rendered));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        } else {
            self.push(field, Value::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, Value::from(value));
    }
}

/// Install a global subscriber that forwards every event to `logger`.
pub fn init_tracing<L>(logger: L) -> Result<(), TryInitError>
where
    L: Deref<Target = Logger> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(BridgeLayer::new(logger))
        .try_init()
}

/// Like [`init_tracing`], with an extra filter layer (for example an
/// `EnvFilter`) in front of the bridge.
pub fn init_tracing_with_filter<L, F>(logger: L, filter: F) -> Result<(), TryInitError>
where
    L: Deref<Target = Logger> + Send + Sync + 'static,
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(filter)
        .with(BridgeLayer::new(logger))
        .try_init()
}
