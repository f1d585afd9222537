//! OS signal handling.
//!
//! SIGINT (Ctrl+C) and, on Unix, SIGTERM both request a graceful shutdown.

use crate::lifecycle::shutdown::Shutdown;

/// Resolve once a termination signal arrives.
pub async fn wait_for_termination() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Spawn a task that triggers `shutdown` on the first termination signal.
pub fn spawn_signal_listener(shutdown: Shutdown) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        wait_for_termination().await;
        tracing::info!("Termination signal received");
        shutdown.trigger();
    })
}
