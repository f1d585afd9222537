//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum app with a single catch-all entry point
//! - Wire up middleware (request ID, tracing)
//! - Dispatch every request to the routing engine
//! - Send failures through the error boundary
//! - Serve until the shutdown signal fires

use std::io;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::error::ErrorNormalizer;
use crate::http::request::RequestInfo;
use crate::lifecycle::Shutdown;
use crate::observability::{metadata, metrics, Logger};
use crate::routing::Router as DispatchRouter;

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<DispatchRouter>,
    pub normalizer: ErrorNormalizer,
}

impl AppState {
    pub fn new(router: DispatchRouter, logger: Arc<Logger>) -> Self {
        Self {
            router: Arc::new(router),
            normalizer: ErrorNormalizer::new(logger),
        }
    }
}

/// HTTP server for the service.
pub struct HttpServer {
    app: Router,
    logger: Arc<Logger>,
}

impl HttpServer {
    /// Freeze `router` and build the app around it.
    pub fn new(router: DispatchRouter, logger: Arc<Logger>) -> Self {
        let app = build_app(AppState::new(router, logger.clone()));
        Self { app, logger }
    }

    /// The app as a tower service, for driving requests in-process.
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires. In-flight requests are drained before returning.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: Shutdown,
    ) -> Result<(), io::Error> {
        let addr = listener.local_addr()?;
        self.logger.info_with(
            "Server listening",
            metadata(json!({ "address": addr.to_string() })),
        );

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                shutdown.wait().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        self.logger.info("Server stopped");
        Ok(())
    }
}

/// Build the axum app. Every method and path lands in [`dispatch`].
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .fallback(dispatch)
        .with_state(state)
        .layer(PropagateRequestIdLayer::x_request_id())
        // Failures are logged by the ErrorNormalizer, not by the trace layer.
        .layer(TraceLayer::new_for_http().on_failure(()))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Single entry point for every request: exactly one response per request,
/// either the handler's or the normalizer's.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let started = Instant::now();
    let info = RequestInfo::from_request(&request);

    let response = match state.router.dispatch(request).await {
        Ok(response) => response,
        Err(failure) => state.normalizer.handle(failure, &info),
    };

    metrics::record_request(info.method.as_str(), response.status().as_u16(), started);
    response
}
