//! Failure representation and the centralized error boundary.
//!
//! # Data Flow
//! ```text
//! handler returns Err(Failure)  ─┐
//! handler `?` on any Error      ─┼→ Failure → normalizer.rs → ErrorEnvelope response
//! handler panics (caught)       ─┤                          → one Logger record
//! no route matched              ─┘
//! ```
//!
//! # Design Decisions
//! - `Failure` is not an `IntoResponse`: the normalizer is the only place a
//!   failure becomes a response
//! - Internal detail (cause chain, panic text) is for logs only

pub mod envelope;
pub mod failure;
pub mod normalizer;

pub use envelope::{ErrorEntry, ErrorEnvelope};
pub use failure::{Failure, FailureKind, FieldLocation};
pub use normalizer::ErrorNormalizer;
