//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment (PORT, APP_ENV, ...)
//!     → loader.rs (read raw values through a lookup function)
//!     → validation.rs (coercion & semantic checks)
//!     → Config (validated, immutable)
//!     → passed by reference / Arc to every subsystem
//! ```
//!
//! # Design Decisions
//! - Loaded exactly once, at startup, before anything else initializes
//! - Required variables have no defaults: a missing or malformed value is fatal
//! - Validation reports every problem, not just the first

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, load_from, ConfigError};
pub use schema::{Config, Environment};
pub use validation::ValidationError;
