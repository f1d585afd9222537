//! Minimal HTTP service core: configuration, structured logging, route
//! dispatch and a single error-normalization boundary.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::{Config, Environment};
pub use error::{ErrorEnvelope, ErrorNormalizer, Failure};
pub use http::HttpServer;
pub use lifecycle::{Service, Shutdown, StartupError};
pub use observability::Logger;
pub use routing::Router;
