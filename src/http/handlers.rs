//! Built-in routes.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::config::{Config, Environment};
use crate::error::Failure;
use crate::routing::{Handler, HandlerResult, Router};

pub const WELCOME_MESSAGE: &str = "Welcome to auth service";

/// `GET /`
pub async fn welcome(_request: Request<Body>) -> HandlerResult {
    Ok((StatusCode::OK, WELCOME_MESSAGE).into_response())
}

/// `GET /error`: diagnostic route that always forwards a failure.
pub async fn test_error(_request: Request<Body>) -> HandlerResult {
    Err(Failure::new("This is a test error"))
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: String,
    pub environment: Environment,
    pub version: &'static str,
}

/// `GET /health`
pub fn health(config: &Config) -> impl Handler {
    let status = HealthStatus {
        status: "ok",
        service: config.service_name.clone(),
        environment: config.environment,
        version: env!("CARGO_PKG_VERSION"),
    };

    move |_request: Request<Body>| {
        let status = status.clone();
        async move { Ok::<_, Failure>(Json(status).into_response()) }
    }
}

/// Register every built-in route.
pub fn register_routes(router: &mut Router, config: &Config) {
    router
        .register(Method::GET, "/", welcome)
        .register(Method::GET, "/error", test_error)
        .register(Method::GET, "/health", health(config));
}
