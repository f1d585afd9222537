//! Auth service (v0.1)
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────────┐
//!                     │                     AUTH SERVICE                      │
//!                     │                                                       │
//!   Client Request    │  ┌──────────┐    ┌──────────┐    ┌──────────────┐     │
//!   ──────────────────┼─▶│  axum    │───▶│ dispatch │───▶│   routing    │     │
//!                     │  │ + req-id │    │ fallback │    │   Router     │     │
//!                     │  └──────────┘    └──────────┘    └──────┬───────┘     │
//!                     │                                         │             │
//!                     │                          Ok(response)   │ Err(Failure)│
//!                     │                        ┌────────────────┴──────┐      │
//!   Client Response   │                        ▼                       ▼      │
//!   ◀─────────────────┼──────────────── handler response      ErrorNormalizer │
//!                     │                                       (envelope + log)│
//!                     │                                                       │
//!                     │  ┌─────────────────────────────────────────────────┐  │
//!                     │  │  config   │  observability (Logger, sinks,     │  │
//!                     │  │  (env)    │  tracing, metrics)  │  lifecycle   │  │
//!                     │  └─────────────────────────────────────────────────┘  │
//!                     └──────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use auth_service::lifecycle::{self, signals, Shutdown};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    // Startup errors are logged where they happen.
    match lifecycle::run(shutdown).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
