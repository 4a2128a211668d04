//! The configuration store.
//!
//! # Responsibilities
//! - Hold the settings of both streams, the trace identifiers and the
//!   shared severity threshold
//! - Apply ordered batches of setting changes
//! - Report structural changes so the dispatcher can rebuild sinks
//!
//! # Design Decisions
//! - Batches are applied in order and stop at the first invalid change;
//!   earlier changes stay applied (no rollback)
//! - Destination and format are structural: changing either to a new value
//!   triggers a rebuild before the batch call returns
//! - The omit-time flag is behavioral: it lives in an atomic shared with the
//!   sink rewrite hooks, so flipping it never rebuilds anything
//! - Batches are serialized by one mutex; emitters never touch it

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::error::ConfigError;
use crate::config::settings::{IntoSettingChange, Setting, StreamId, StreamSettings};
use crate::level::{Level, LevelVar};
use crate::sink::{Destination, Format};
use crate::trace_ids::TraceIdSet;

/// Settings that require a new sink when they change.
#[derive(Debug)]
struct Structural {
    destination: Destination,
    format: Format,
}

#[derive(Debug)]
struct Streams {
    normal: Structural,
    trace: Structural,
}

impl Streams {
    fn get_mut(&mut self, stream: StreamId) -> &mut Structural {
        match stream {
            StreamId::Normal => &mut self.normal,
            StreamId::Trace => &mut self.trace,
        }
    }

    fn get(&self, stream: StreamId) -> &Structural {
        match stream {
            StreamId::Normal => &self.normal,
            StreamId::Trace => &self.trace,
        }
    }
}

/// Mutable logging configuration shared by both streams.
#[derive(Debug)]
pub struct ConfigStore {
    streams: Mutex<Streams>,
    normal_omit_time: Arc<AtomicBool>,
    trace_omit_time: Arc<AtomicBool>,
    trace_ids: TraceIdSet,
    threshold: Arc<LevelVar>,
}

impl ConfigStore {
    /// Create a store with the default settings and the given destinations.
    pub fn new(normal: Destination, trace: Destination) -> Self {
        Self {
            streams: Mutex::new(Streams {
                normal: Structural {
                    destination: normal,
                    format: Format::Text,
                },
                trace: Structural {
                    destination: trace,
                    format: Format::Text,
                },
            }),
            normal_omit_time: Arc::new(AtomicBool::new(false)),
            trace_omit_time: Arc::new(AtomicBool::new(false)),
            trace_ids: TraceIdSet::new(),
            threshold: Arc::new(LevelVar::new(Level::Info)),
        }
    }

    /// Apply `changes` in order.
    ///
    /// `rebuild` runs once for every destination or format change that
    /// differs from the current value, with the already-updated settings.
    /// The first invalid change stops the batch and is returned; changes
    /// before it remain in effect.
    pub fn apply_settings<I, F>(&self, changes: I, mut rebuild: F) -> Result<(), ConfigError>
    where
        I: IntoIterator,
        I::Item: IntoSettingChange,
        F: FnMut(StreamId, &StreamSettings),
    {
        let mut streams = self.lock_streams();
        for change in changes {
            let change = change.into_setting_change()?;
            let stream = change.stream;
            let slot = streams.get_mut(stream);

            let structural = match change.setting {
                Setting::Destination(destination) => {
                    let changed = slot.destination != destination;
                    slot.destination = destination;
                    changed
                }
                Setting::Format(format) => {
                    let changed = slot.format != format;
                    slot.format = format;
                    changed
                }
                Setting::OmitTime(omit) => {
                    self.omit_time_flag(stream).store(omit, Ordering::Release);
                    false
                }
            };

            if structural {
                let settings = self.snapshot(stream, slot);
                rebuild(stream, &settings);
            }
        }
        Ok(())
    }

    /// Current settings of one stream.
    pub fn settings(&self, stream: StreamId) -> StreamSettings {
        let streams = self.lock_streams();
        self.snapshot(stream, streams.get(stream))
    }

    /// The live omit-time flag of a stream, as read by its sink.
    pub fn omit_time_flag(&self, stream: StreamId) -> &Arc<AtomicBool> {
        match stream {
            StreamId::Normal => &self.normal_omit_time,
            StreamId::Trace => &self.trace_omit_time,
        }
    }

    /// The shared threshold, as bound into sinks.
    pub fn threshold(&self) -> &Arc<LevelVar> {
        &self.threshold
    }

    pub fn level(&self) -> Level {
        self.threshold.level()
    }

    pub fn set_level(&self, level: Level) {
        self.threshold.set(level);
    }

    pub fn trace_ids(&self) -> &TraceIdSet {
        &self.trace_ids
    }

    pub fn register_trace_ids<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.trace_ids.register(ids);
    }

    pub fn list_trace_ids(&self) -> Vec<String> {
        self.trace_ids.list()
    }

    fn snapshot(&self, stream: StreamId, slot: &Structural) -> StreamSettings {
        StreamSettings {
            destination: slot.destination.clone(),
            format: slot.format,
            omit_time: self.omit_time_flag(stream).load(Ordering::Acquire),
        }
    }

    fn lock_streams(&self) -> MutexGuard<'_, Streams> {
        // The guarded data is always left consistent, so a poisoned lock is safe to reuse.
        self.streams.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(Destination::Stdout, Destination::Stderr)
    }
}
