//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum accept loop, request-id + trace middleware)
//!     → request.rs (capture method, path, request id)
//!     → routing::Router::dispatch (handlers.rs)
//!     → Ok: handler response
//!     → Err: error::ErrorNormalizer → envelope response
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod server;

pub use request::{RequestInfo, X_REQUEST_ID};
pub use server::{build_app, AppState, HttpServer};
