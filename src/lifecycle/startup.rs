//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging, diagnostics and metrics from it
//! - Route panics through the logger
//! - Register routes and build the HTTP server
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is logged and fatal
//! - Subsystems initialize in order, not concurrently
//! - The listener binds last (traffic only when ready)

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use metrics_exporter_prometheus::BuildError;
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::schema::{DEFAULT_SERVICE_NAME, ENVIRONMENT_VAR, SERVICE_NAME_VAR};
use crate::config::{self, Config, ConfigError};
use crate::http::handlers::register_routes;
use crate::http::HttpServer;
use crate::lifecycle::panic_hook::install_panic_hook;
use crate::lifecycle::shutdown::Shutdown;
use crate::observability::{self, metadata, Logger};
use crate::routing::Router;

/// Anything that stops the service from starting or keeps it from serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}

/// Composition root: config, logger and route table, ready to serve.
pub struct Service {
    config: Config,
    logger: Arc<Logger>,
    router: Router,
}

impl Service {
    /// Service with the built-in routes.
    pub fn new(config: Config, logger: Arc<Logger>) -> Self {
        let mut router = Router::new();
        register_routes(&mut router, &config);
        Self::with_router(config, logger, router)
    }

    /// Service with a caller-supplied route table.
    pub fn with_router(config: Config, logger: Arc<Logger>, router: Router) -> Self {
        for route in router.routes() {
            tracing::debug!(method = %route.method(), path = route.pattern(), "Route registered");
        }
        Self {
            config,
            logger,
            router,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    /// Bind the configured address. A failure is logged before it is returned.
    pub async fn bind(&self) -> Result<TcpListener, StartupError> {
        let address = self.config.bind_address();
        TcpListener::bind(address).await.map_err(|source| {
            let error = StartupError::Bind { address, source };
            self.logger.error_with(
                &error.to_string(),
                metadata(json!({ "address": address.to_string() })),
            );
            error
        })
    }

    /// Serve on an already bound listener until `shutdown` fires.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: Shutdown,
    ) -> Result<(), StartupError> {
        let logger = self.logger.clone();
        let server = HttpServer::new(self.router, self.logger);

        server.run(listener, shutdown).await.map_err(|e| {
            let error = StartupError::Serve(e);
            logger.error(&error.to_string());
            error
        })
    }

    /// Bind, then serve.
    pub async fn start(self, shutdown: Shutdown) -> Result<(), StartupError> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }
}

/// Boot from the process environment and serve until `shutdown` fires.
pub async fn run(shutdown: Shutdown) -> Result<(), StartupError> {
    run_from(config::loader::env_var, shutdown).await
}

/// Boot with an arbitrary variable lookup.
///
/// Order: config → diagnostics → logger and panic hook → metrics → routes → listener.
/// Each step's failure aborts the rest.
pub async fn run_from<F>(lookup: F, shutdown: Shutdown) -> Result<(), StartupError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = match config::load_from(&lookup) {
        Ok(config) => config,
        Err(e) => {
            report_config_error(&lookup, &e);
            return Err(e.into());
        }
    };

    observability::tracing::init_tracing(config.environment);
    let logger = Arc::new(Logger::from_config(&config));
    install_panic_hook(logger.clone());

    if let Some(addr) = config.metrics_address {
        if let Err(e) = observability::metrics::init_metrics(addr) {
            let error = StartupError::from(e);
            logger.error(&error.to_string());
            return Err(error);
        }
    }

    logger.info_with(
        "Configuration loaded",
        metadata(json!({
            "port": config.port,
            "environment": config.environment,
            "metricsEnabled": config.metrics_address.is_some(),
        })),
    );

    Service::new(config, logger).start(shutdown).await
}

/// Log a configuration failure through a console-only logger, since the
/// configured one cannot exist yet. Still silent when `APP_ENV=test`.
fn report_config_error<F>(lookup: &F, error: &ConfigError)
where
    F: Fn(&str) -> Option<String>,
{
    let environment = lookup(ENVIRONMENT_VAR).and_then(|value| value.parse().ok());
    let service_name = lookup(SERVICE_NAME_VAR).unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string());
    let logger = Logger::bootstrap(service_name, environment);

    let errors: Vec<String> = error.errors().iter().map(ToString::to_string).collect();
    logger.error_with(&error.to_string(), metadata(json!({ "errors": errors })));
}
