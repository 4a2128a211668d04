//! Sink construction and publication.
//!
//! # Design Decisions
//! - Each stream's active sink sits behind an `ArcSwap`; a rebuild publishes
//!   a fully built sink in one pointer swap, so readers never see a partial one
//! - A replaced sink is dropped once its last in-flight reader finishes; its
//!   destination is never closed

use std::sync::Arc;

use arc_swap::{ArcSwap, Guard};

use crate::config::{ConfigStore, StreamId};
use crate::sink::{AttrRewriter, Destination, Format, Sink, SinkOptions};

/// Build a sink for `stream` bound to the store's live threshold and the
/// stream's live omit-time flag. Trace sinks capture source locations.
pub fn build_sink(
    store: &ConfigStore,
    stream: StreamId,
    destination: Destination,
    format: Format,
) -> Sink {
    Sink::new(
        destination,
        format,
        SinkOptions {
            level: Arc::clone(store.threshold()),
            rewriter: AttrRewriter::new(Arc::clone(store.omit_time_flag(stream))),
            add_source: stream.is_trace(),
        },
    )
}

/// The active sink of each stream.
#[derive(Debug)]
pub struct ActiveSinks {
    normal: ArcSwap<Sink>,
    trace: ArcSwap<Sink>,
}

impl ActiveSinks {
    pub fn new(normal: Sink, trace: Sink) -> Self {
        Self {
            normal: ArcSwap::from_pointee(normal),
            trace: ArcSwap::from_pointee(trace),
        }
    }

    fn slot(&self, stream: StreamId) -> &ArcSwap<Sink> {
        match stream {
            StreamId::Normal => &self.normal,
            StreamId::Trace => &self.trace,
        }
    }

    /// Borrow the current sink for one emission.
    pub fn load(&self, stream: StreamId) -> Guard<Arc<Sink>> {
        self.slot(stream).load()
    }

    /// Publish a new sink, replacing the previous one.
    pub fn install(&self, stream: StreamId, sink: Sink) {
        self.slot(stream).store(Arc::new(sink));
    }
}
