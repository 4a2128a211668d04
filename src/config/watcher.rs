//! Configuration file watcher for hot reload.
//!
//! # Design Decisions
//! - A rewrite shows up as several events (truncate, then write), so the
//!   file is re-read after a short settle delay and only applied once two
//!   reads agree
//! - Empty content is never applied: mid-rewrite it is indistinguishable
//!   from a truncated file, and as a config it would reset every setting
//! - Content identical to the last applied version is skipped; the contents
//!   present when the watcher starts count as applied

use std::fs;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::loader::{parse_config, LoadError};
use crate::dispatch::Logger;

const DEFAULT_SETTLE: Duration = Duration::from_millis(50);
const MAX_SETTLE_ROUNDS: usize = 20;

/// A watcher that re-applies the logging configuration file when it changes.
///
/// Works with any shared handle to a [`Logger`], such as `Arc<Logger>` or
/// the `&'static Logger` returned by [`crate::global`].
pub struct ConfigWatcher<L> {
    path: PathBuf,
    logger: L,
    settle: Duration,
}

impl<L> ConfigWatcher<L>
where
    L: Deref<Target = Logger> + Send + 'static,
{
    pub fn new(path: &Path, logger: L) -> Self {
        Self {
            path: path.to_path_buf(),
            logger,
            settle: DEFAULT_SETTLE,
        }
    }

    /// How long the file must stay unchanged before a reload is applied.
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for reloads to continue. A file
    /// that fails to load or validate leaves the current configuration as is.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self {
            path,
            logger,
            settle,
        } = self;
        let watched = path.clone();
        let last_applied = fs::read_to_string(&path).ok();
        let mut reloader = Reloader {
            path,
            logger,
            settle,
            last_applied,
        };

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        reloader.on_change();
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&watched, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?watched, "Logging config watcher started");
        Ok(watcher)
    }
}

/// Reload state owned by the notify callback.
struct Reloader<L> {
    path: PathBuf,
    logger: L,
    settle: Duration,
    last_applied: Option<String>,
}

impl<L> Reloader<L>
where
    L: Deref<Target = Logger>,
{
    fn on_change(&mut self) {
        let Some(content) = self.settled_content() else {
            return;
        };
        if content.trim().is_empty() {
            tracing::debug!(path = ?self.path, "Logging config is empty, skipping reload");
            return;
        }
        if self.last_applied.as_deref() == Some(content.as_str()) {
            return;
        }

        tracing::info!(path = ?self.path, "Logging config change detected, reloading...");
        match apply(&content, &self.logger) {
            Ok(()) => {
                self.last_applied = Some(content);
                tracing::info!(path = ?self.path, "Logging config reloaded");
            }
            Err(e) => tracing::error!(
                "Failed to reload logging config: {}. Keeping current configuration.",
                e
            ),
        }
    }

    /// Read the file until two reads a settle interval apart agree.
    fn settled_content(&self) -> Option<String> {
        let mut previous = self.read()?;
        for _ in 0..MAX_SETTLE_ROUNDS {
            thread::sleep(self.settle);
            let current = self.read()?;
            if current == previous {
                return Some(current);
            }
            previous = current;
        }
        tracing::warn!(path = ?self.path, "Logging config kept changing, skipping reload");
        None
    }

    fn read(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::debug!(path = ?self.path, error = %e, "Logging config unreadable");
                None
            }
        }
    }
}

fn apply(content: &str, logger: &Logger) -> Result<(), LoadError> {
    parse_config(content)?.apply_to(logger)?;
    Ok(())
}
