//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Init logging & metrics → Register routes → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!
//! Panics (panic_hook.rs):
//!     Handler panic → silent (normalized by the dispatcher)
//!     Other panic   → Logger error record
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then observability, then listener
//! - Startup failure is the only failure allowed to end the process

pub mod panic_hook;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use panic_hook::install_panic_hook;
pub use shutdown::Shutdown;
pub use startup::{run, run_from, Service, StartupError};
