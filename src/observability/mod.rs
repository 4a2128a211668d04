//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Logger write failures
//!     → metrics.rs (per-stream counter)
//!
//! tracing events (the crate's own and the host application's)
//!     → bridge.rs (Layer)
//!     → Logger normal stream (DEBUG..ERROR) or trace stream (TRACE)
//! ```
//!
//! # Design Decisions
//! - The core never logs about itself; peripheral components use `tracing`
//! - The bridge applies the same gates as direct calls

pub mod bridge;
pub mod metrics;

pub use bridge::{init_tracing, init_tracing_with_filter, BridgeLayer};
