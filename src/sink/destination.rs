//! Output destinations for serialized records.
//!
//! # Design Decisions
//! - Anything implementing `Write + Send` can be a destination
//! - Destinations are owned by the caller; replacing one never closes it
//! - Equality is identity: two handles are equal when they point at the
//!   same writer (standard streams compare by kind)

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// A writable sink for serialized records.
#[derive(Clone)]
pub enum Destination {
    Stdout,
    Stderr,
    /// A caller-supplied writer shared behind a lock.
    Writer(Arc<Mutex<dyn Write + Send>>),
}

impl Destination {
    /// Wrap an owned writer.
    pub fn writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self::Writer(Arc::new(Mutex::new(writer)))
    }

    /// Use a writer the caller keeps a handle to, e.g. an in-memory buffer.
    pub fn shared<W: Write + Send + 'static>(writer: Arc<Mutex<W>>) -> Self {
        Self::Writer(writer)
    }

    /// Open `path` for appending, creating it if needed.
    pub fn file(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self::writer(file))
    }

    /// Returns true if both handles refer to the same underlying writer.
    pub fn same_as(&self, other: &Destination) -> bool {
        match (self, other) {
            (Self::Stdout, Self::Stdout) | (Self::Stderr, Self::Stderr) => true,
            (Self::Writer(a), Self::Writer(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            _ => false,
        }
    }

    /// Write one serialized record in a single locked call.
    pub fn write_record(&self, buf: &[u8]) -> io::Result<()> {
        match self {
            Self::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(buf)?;
                out.flush()
            }
            Self::Stderr => {
                let mut out = io::stderr().lock();
                out.write_all(buf)?;
                out.flush()
            }
            Self::Writer(writer) => {
                let mut writer = writer
                    .lock()
                    .map_err(|_| io::Error::other("destination lock poisoned"))?;
                writer.write_all(buf)?;
                writer.flush()
            }
        }
    }
}

impl PartialEq for Destination {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("Stdout"),
            Self::Stderr => f.write_str("Stderr"),
            Self::Writer(writer) => write!(f, "Writer({:p})", Arc::as_ptr(writer)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_equality() {
        let buf = Arc::new(Mutex::new(Vec::<u8>::new()));
        let a = Destination::shared(buf.clone());
        let b = Destination::shared(buf);
        let c = Destination::writer(Vec::<u8>::new());

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(Destination::Stdout, Destination::Stdout);
        assert_ne!(Destination::Stdout, Destination::Stderr);
        assert_ne!(Destination::Stderr, a);
    }

    #[test]
    fn test_write_record_reaches_shared_buffer() {
        let buf = Arc::new(Mutex::new(Vec::<u8>::new()));
        let dest = Destination::shared(buf.clone());

        dest.write_record(b"one\n").unwrap();
        dest.write_record(b"two\n").unwrap();

        assert_eq!(buf.lock().unwrap().as_slice(), b"one\ntwo\n");
    }

    #[test]
    fn test_file_destination_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");

        Destination::file(&path).unwrap().write_record(b"first\n").unwrap();
        Destination::file(&path).unwrap().write_record(b"second\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_errors_are_reported() {
        let dest = Destination::writer(BrokenWriter);
        let err = dest.write_record(b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
