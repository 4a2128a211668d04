//! Shared utilities for integration tests.

use std::sync::{Arc, Mutex};

use logswitch::{Destination, Logger, SettingChange, StreamId};

/// In-memory destination and a handle to read back what was written.
pub struct Capture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl Capture {
    pub fn new() -> Self {
        Self {
            buf: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn destination(&self) -> Destination {
        Destination::shared(Arc::clone(&self.buf))
    }

    pub fn output(&self) -> String {
        String::from_utf8(self.buf.lock().unwrap().clone()).unwrap()
    }

    #[allow(dead_code)]
    pub fn lines(&self) -> Vec<String> {
        self.output().lines().map(str::to_owned).collect()
    }
}

/// A logger writing each stream to its own capture buffer.
#[allow(dead_code)]
pub fn capture_logger() -> (Logger, Capture, Capture) {
    let normal = Capture::new();
    let trace = Capture::new();
    let logger = Logger::with_destinations(normal.destination(), trace.destination());
    (logger, normal, trace)
}

/// Like [`capture_logger`], with timestamps omitted on both streams.
#[allow(dead_code)]
pub fn untimed_logger() -> (Logger, Capture, Capture) {
    let (logger, normal, trace) = capture_logger();
    logger
        .apply_settings([
            SettingChange::omit_time(StreamId::Normal, true),
            SettingChange::omit_time(StreamId::Trace, true),
        ])
        .unwrap();
    (logger, normal, trace)
}
