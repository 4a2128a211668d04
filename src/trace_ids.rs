//! Registered identifiers for filtered tracing.
//!
//! # Design Decisions
//! - Identifiers are lower-cased on insertion and on lookup
//! - `"all"` is a wildcard that enables every identifier
//! - Backed by `DashSet`: lookups sit on the emission path, inserts are rare

use dashmap::DashSet;

/// Identifier that enables filtered tracing for every id.
pub const WILDCARD: &str = "all";

/// Thread-safe set of trace identifiers.
#[derive(Debug, Default)]
pub struct TraceIdSet {
    ids: DashSet<String>,
}

impl TraceIdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalise and insert each identifier. Existing ids are left alone.
    pub fn register<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for id in ids {
            self.ids.insert(normalize(id.as_ref()));
        }
    }

    /// Exact (case-insensitive) membership, ignoring the wildcard.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(&normalize(id))
    }

    /// Returns true if tracing is enabled for `id`, either directly or
    /// through the wildcard.
    pub fn is_enabled(&self, id: &str) -> bool {
        self.ids.contains(WILDCARD) || self.contains(id)
    }

    /// Current identifiers, in no particular order.
    pub fn list(&self) -> Vec<String> {
        self.ids.iter().map(|id| id.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

fn normalize(id: &str) -> String {
    id.to_lowercase()
}
