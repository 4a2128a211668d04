//! Metrics emitted by the logger.
//!
//! # Metrics
//! - `logswitch_write_failures_total` (counter): records dropped because the
//!   destination write failed, labelled by `stream`
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; without an installed recorder the
//!   calls are no-ops
//! - Counted per stream, never per destination

use crate::config::StreamId;

pub const WRITE_FAILURES_TOTAL: &str = "logswitch_write_failures_total";

/// Count one record lost to a failed write on `stream`.
pub fn record_write_failure(stream: StreamId) {
    ::metrics::counter!(WRITE_FAILURES_TOTAL, "stream" => stream.as_str()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use crate::sink::Destination;
    use crate::Logger;
    use ::metrics::{
        Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
    };
    use std::io::{self, Write};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};

    /// Keeps every registered counter, keyed by name and `stream` label.
    #[derive(Default)]
    struct CountingRecorder {
        counters: Mutex<Vec<(String, String, Arc<AtomicU64>)>>,
    }

    impl CountingRecorder {
        fn count(&self, name: &str, stream: &str) -> u64 {
            self.counters
                .lock()
                .unwrap()
                .iter()
                .filter(|(n, s, _)| n == name && s == stream)
                .map(|(_, _, value)| value.load(Ordering::Relaxed))
                .sum()
        }
    }

    impl Recorder for CountingRecorder {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
            let stream = key
                .labels()
                .find(|label| label.key() == "stream")
                .map(|label| label.value().to_string())
                .unwrap_or_default();
            let name = key.name().to_string();

            let mut counters = self.counters.lock().unwrap();
            let value = match counters.iter().find(|(n, s, _)| *n == name && *s == stream) {
                Some((_, _, value)) => Arc::clone(value),
                None => {
                    let value = Arc::new(AtomicU64::new(0));
                    counters.push((name, stream, Arc::clone(&value)));
                    value
                }
            };
            Counter::from_arc(value)
        }

        fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
            Gauge::noop()
        }

        fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failures_counted_per_stream() {
        let recorder = CountingRecorder::default();
        let logger = Logger::with_destinations(
            Destination::writer(BrokenWriter),
            Destination::writer(BrokenWriter),
        );

        ::metrics::with_local_recorder(&recorder, || {
            logger.info("lost", &[]);
            logger.error("lost", &[]);
            logger.debug("filtered", &[]);
            logger.set_level(Level::Trace);
            logger.trace("lost", &[]);
        });

        assert_eq!(recorder.count(WRITE_FAILURES_TOTAL, "normal"), 2);
        assert_eq!(recorder.count(WRITE_FAILURES_TOTAL, "trace"), 1);
        assert_eq!(logger.write_failures(), 3);
    }

    #[test]
    fn test_record_without_recorder_is_noop() {
        record_write_failure(StreamId::Normal);
    }
}
