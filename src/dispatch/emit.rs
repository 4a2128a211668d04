//! Emission paths of the two streams.

use std::sync::atomic::Ordering;

use crate::config::StreamId;
use crate::level::Level;
use crate::observability::metrics;
use crate::sink::{Attr, Record, Source};

use super::Logger;

impl Logger {
    /// True if a normal record at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        self.sinks.load(StreamId::Normal).enabled(level)
    }

    /// Emit a record on the normal stream.
    pub fn emit_normal(&self, level: Level, message: &str, attrs: &[Attr]) {
        let sink = self.sinks.load(StreamId::Normal);
        if !sink.enabled(level) {
            return;
        }
        let record = Record::new(level, message, attrs);
        if sink.handle(&record).is_err() {
            self.record_write_failure(StreamId::Normal);
        }
    }

    pub fn debug(&self, message: &str, attrs: &[Attr]) {
        self.emit_normal(Level::Debug, message, attrs);
    }

    pub fn info(&self, message: &str, attrs: &[Attr]) {
        self.emit_normal(Level::Info, message, attrs);
    }

    pub fn warn(&self, message: &str, attrs: &[Attr]) {
        self.emit_normal(Level::Warn, message, attrs);
    }

    pub fn error(&self, message: &str, attrs: &[Attr]) {
        self.emit_normal(Level::Error, message, attrs);
    }

    /// True only while the threshold is exactly [`Level::Trace`].
    pub fn trace_enabled(&self) -> bool {
        self.level() == Level::Trace
    }

    /// True if a trace for `id` would currently be emitted.
    pub fn trace_id_enabled(&self, id: &str) -> bool {
        self.trace_enabled() && self.store.trace_ids().is_enabled(id)
    }

    /// Emit a record on the trace stream, tagged with the caller's location.
    ///
    /// Does nothing unless the threshold is exactly [`Level::Trace`].
    #[track_caller]
    pub fn emit_trace(&self, message: &str, attrs: &[Attr]) {
        if !self.trace_enabled() {
            return;
        }
        self.dispatch_trace(Source::caller(), message, attrs);
    }

    /// Like [`emit_trace`](Self::emit_trace), but only when `id` (any case)
    /// or `"all"` is registered.
    #[track_caller]
    pub fn emit_trace_for_id(&self, id: &str, message: &str, attrs: &[Attr]) {
        if !self.trace_id_enabled(id) {
            return;
        }
        self.dispatch_trace(Source::caller(), message, attrs);
    }

    /// Emit a trace record with an explicit source location.
    ///
    /// Used by bridges whose events carry their own location.
    pub fn emit_trace_at(&self, source: Option<Source>, message: &str, attrs: &[Attr]) {
        if !self.trace_enabled() {
            return;
        }
        let record = Record::new(Level::Trace, message, attrs).with_source(source);
        self.write_trace(&record);
    }

    #[track_caller]
    pub fn trace(&self, message: &str, attrs: &[Attr]) {
        self.emit_trace(message, attrs);
    }

    #[track_caller]
    pub fn trace_id(&self, id: &str, message: &str, attrs: &[Attr]) {
        self.emit_trace_for_id(id, message, attrs);
    }

    fn dispatch_trace(&self, source: Source, message: &str, attrs: &[Attr]) {
        let record = Record::new(Level::Trace, message, attrs).with_source(Some(source));
        self.write_trace(&record);
    }

    fn write_trace(&self, record: &Record<'_>) {
        let sink = self.sinks.load(StreamId::Trace);
        if sink.handle(record).is_err() {
            self.record_write_failure(StreamId::Trace);
        }
    }

    fn record_write_failure(&self, stream: StreamId) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
        metrics::record_write_failure(stream);
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{SettingChange, StreamId};
    use crate::level::Level;
    use crate::sink::{Destination, Format};
    use crate::{attrs, Logger};
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture() -> (Logger, Arc<Mutex<Vec<u8>>>, Arc<Mutex<Vec<u8>>>) {
        let normal = Arc::new(Mutex::new(Vec::new()));
        let trace = Arc::new(Mutex::new(Vec::new()));
        let logger = Logger::with_destinations(
            Destination::shared(normal.clone()),
            Destination::shared(trace.clone()),
        );
        logger
            .apply_settings([
                SettingChange::omit_time(StreamId::Normal, true),
                SettingChange::omit_time(StreamId::Trace, true),
            ])
            .unwrap();
        (logger, normal, trace)
    }

    fn lines(buf: &Arc<Mutex<Vec<u8>>>) -> Vec<String> {
        String::from_utf8(buf.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn test_normal_threshold_filters() {
        let (logger, normal, trace) = capture();
        logger.debug("hidden", &[]);
        logger.info("shown", attrs!["n" => 1]);
        logger.error("bad", &[]);

        assert_eq!(lines(&normal), vec!["level=INFO msg=shown n=1", "level=ERROR msg=bad"]);
        assert!(lines(&trace).is_empty());
    }

    #[test]
    fn test_trace_requires_exact_trace_threshold() {
        let (logger, _, trace) = capture();
        logger.register_trace_ids(["all"]);

        logger.set_level(Level::Debug);
        logger.trace("no", &[]);
        logger.trace_id("db", "no", &[]);
        assert!(lines(&trace).is_empty());

        logger.set_level(Level::Trace);
        logger.trace("yes", &[]);
        logger.trace_id("db", "yes", &[]);
        assert_eq!(lines(&trace).len(), 2);
    }

    #[test]
    fn test_trace_records_carry_call_site() {
        let (logger, _, trace) = capture();
        logger.set_level(Level::Trace);

        let line = line!() + 1;
        logger.trace("here", &[]);

        let expected = format!("level=TRACE source={}:{} msg=here", file!(), line);
        assert_eq!(lines(&trace), vec![expected]);
    }

    #[test]
    fn test_trace_for_id_gate() {
        let (logger, _, trace) = capture();
        logger.set_level(Level::Trace);
        logger.register_trace_ids(["Cache"]);

        logger.trace_id("CACHE", "hit", &[]);
        logger.trace_id("db", "miss", &[]);

        let out = lines(&trace);
        assert_eq!(out.len(), 1);
        assert!(out[0].ends_with("msg=hit"));
        assert!(!logger.trace_id_enabled("db"));
    }

    #[test]
    fn test_trace_at_uses_given_source() {
        let (logger, _, trace) = capture();
        logger
            .apply_settings([SettingChange::format(StreamId::Trace, Format::Json)])
            .unwrap();
        logger.set_level(Level::Trace);

        let source = crate::Source { file: "bridge.rs", line: 9 };
        logger.emit_trace_at(Some(source), "bridged", &[]);
        logger.emit_trace_at(None, "bare", &[]);

        assert_eq!(
            lines(&trace),
            vec![
                r#"{"level":"TRACE","source":{"file":"bridge.rs","line":9},"msg":"bridged"}"#,
                r#"{"level":"TRACE","msg":"bare"}"#,
            ]
        );
    }

    #[test]
    fn test_write_failures_are_counted() {
        let logger = Logger::with_destinations(Destination::writer(BrokenWriter), Destination::Stderr);
        logger.info("lost", &[]);
        logger.warn("lost", &[]);
        logger.debug("filtered", &[]);
        assert_eq!(logger.write_failures(), 2);
    }
}
