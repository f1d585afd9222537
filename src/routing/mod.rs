//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (route lookup, registration order)
//!     → matcher.rs (evaluate method + path condition)
//!     → handler.rs (run matched handler to completion)
//!     → unwind.rs (handler scope, panics caught and normalized)
//!     → Return: Response or Failure (NotFound / Handler / Panic)
//!
//! Route Registration (at startup):
//!     register(method, path, handler)...
//!     → Freeze as immutable Arc<Router>
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - Deterministic: same input always matches same route
//! - First match wins (registration order)

pub mod handler;
pub mod matcher;
pub mod router;
pub mod unwind;

pub use handler::{Handler, HandlerFuture, HandlerResult};
pub use matcher::{ExactPath, PathMatcher, RouteMatcher};
pub use router::{RouteEntry, Router};
