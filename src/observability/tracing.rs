//! Framework diagnostics via `tracing`.
//!
//! Request spans from `tower_http::trace` and the dispatcher's debug events
//! land here. Records of the application [`Logger`](crate::observability::Logger)
//! go through the logger's own scoped dispatch and never reach this subscriber.
//! Output is off by default (`warn`) and opened up with `RUST_LOG`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Environment;

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Nothing is installed in the `test` environment.
///
/// Returns false if nothing was installed (test environment, or a subscriber
/// was already set).
pub fn init_tracing(environment: Environment) -> bool {
    if environment.is_test() {
        return false;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}
