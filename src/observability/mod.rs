//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Application events (startup, normalized failures):
//!     → logging.rs (Logger: structured JSON records, per-logger Dispatch)
//!     → sinks.rs (fmt layers: console, combined.log, error.log)
//!
//! Framework diagnostics (request spans, dispatch decisions):
//!     → tracing.rs (global tracing-subscriber, RUST_LOG filtered)
//!
//! Counters and latency:
//!     → metrics.rs (Prometheus scrape endpoint when enabled)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Every sink sees the same serialized record
//! - The `test` environment produces no output at all

pub mod logging;
pub mod metrics;
pub mod sinks;
pub mod tracing;

pub use logging::{metadata, Level, LogRecord, Logger, LoggerBuilder, Metadata};
pub use sinks::{MemorySink, Sink};
