//! Attribute rewriting applied before serialization.
//!
//! # Responsibilities
//! - Replace the raw numeric level with its canonical name
//! - Drop the timestamp when the owning stream omits it
//!
//! # Design Decisions
//! - The omit flag is shared with the configuration store and read on every
//!   record, so toggling it never requires rebuilding a sink

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::level::Level;
use crate::sink::record::Attr;

pub const TIME_KEY: &str = "time";
pub const LEVEL_KEY: &str = "level";
pub const SOURCE_KEY: &str = "source";
pub const MESSAGE_KEY: &str = "msg";

/// The rewrite hook bound into every sink.
#[derive(Debug, Clone)]
pub struct AttrRewriter {
    omit_time: Arc<AtomicBool>,
}

impl AttrRewriter {
    pub fn new(omit_time: Arc<AtomicBool>) -> Self {
        Self { omit_time }
    }

    /// Run both passes over a built-in attribute. `None` drops it.
    pub fn rewrite(&self, attr: Attr) -> Option<Attr> {
        let attr = rename_level(attr);
        if attr.key == TIME_KEY && self.omit_time.load(Ordering::Acquire) {
            return None;
        }
        Some(attr)
    }
}

fn rename_level(attr: Attr) -> Attr {
    if attr.key != LEVEL_KEY {
        return attr;
    }
    let level = attr
        .value
        .as_i64()
        .and_then(|raw| i8::try_from(raw).ok())
        .and_then(Level::from_i8);
    match level {
        Some(level) => Attr::new(LEVEL_KEY, level.as_str()),
        None => attr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_level_renamed() {
        let rewriter = AttrRewriter::new(Arc::new(AtomicBool::new(false)));

        let attr = rewriter.rewrite(Attr::new(LEVEL_KEY, -10)).unwrap();
        assert_eq!(attr.value, Value::from("TRACE"));

        let attr = rewriter.rewrite(Attr::new(LEVEL_KEY, 4)).unwrap();
        assert_eq!(attr.value, Value::from("WARN"));
    }

    #[test]
    fn test_unknown_level_value_untouched() {
        let rewriter = AttrRewriter::new(Arc::new(AtomicBool::new(false)));
        let attr = rewriter.rewrite(Attr::new(LEVEL_KEY, -6)).unwrap();
        assert_eq!(attr.value, Value::from(-6));
    }

    #[test]
    fn test_time_dropped_while_flag_set() {
        let flag = Arc::new(AtomicBool::new(false));
        let rewriter = AttrRewriter::new(flag.clone());

        assert!(rewriter.rewrite(Attr::new(TIME_KEY, "t")).is_some());
        flag.store(true, Ordering::Release);
        assert!(rewriter.rewrite(Attr::new(TIME_KEY, "t")).is_none());
        assert!(rewriter.rewrite(Attr::new(MESSAGE_KEY, "m")).is_some());
    }
}
