//! The single exit point for failed requests.
//!
//! # Responsibilities
//! - Resolve the response status (explicit 4xx/5xx, else 500)
//! - Record the failure exactly once: `info` for unmatched routes, `error` otherwise
//! - Build the [`ErrorEnvelope`] body
//!
//! # Design Decisions
//! - Cause chain and panic text go to log metadata only
//! - Nothing here can fail: logging swallows its own errors

use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::error::envelope::ErrorEnvelope;
use crate::error::failure::{Failure, FailureKind};
use crate::http::request::RequestInfo;
use crate::observability::{metadata, metrics, Logger};

/// Converts failures into error responses and logs them.
#[derive(Debug, Clone)]
pub struct ErrorNormalizer {
    logger: Arc<Logger>,
}

impl ErrorNormalizer {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }

    /// Turn `failure` into the response for `request`. Called once per failed request.
    pub fn handle(&self, failure: Failure, request: &RequestInfo) -> Response {
        let status = failure.status();

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            error_type = failure.name(),
            "Normalizing failure"
        );

        let mut fields = metadata(json!({
            "type": failure.name(),
            "status": status.as_u16(),
            "method": request.method.as_str(),
            "path": request.path,
        }));
        if let Some(id) = &request.request_id {
            fields.insert("requestId".into(), Value::from(id.as_str()));
        }
        let causes = failure.cause_chain();
        if !causes.is_empty() {
            fields.insert("causes".into(), Value::from(causes));
        }
        if let Some(detail) = failure.detail() {
            fields.insert("detail".into(), Value::from(detail));
        }

        match failure.kind() {
            FailureKind::NotFound => self.logger.info_with(failure.message(), fields),
            FailureKind::Handler | FailureKind::Panic => {
                self.logger.error_with(failure.message(), fields)
            }
        }
        metrics::record_failure(failure.name());

        (status, Json(ErrorEnvelope::from(&failure))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::{Level, MemorySink};
    use axum::http::{header, Method, StatusCode};

    fn normalizer() -> (ErrorNormalizer, MemorySink) {
        let sink = MemorySink::new();
        let logger = Arc::new(Logger::builder("auth-service").sink(sink.clone()).build());
        (ErrorNormalizer::new(logger), sink)
    }

    fn request(path: &str) -> RequestInfo {
        RequestInfo {
            method: Method::GET,
            path: path.to_string(),
            request_id: Some("req-1".to_string()),
        }
    }

    async fn body_of(response: Response) -> ErrorEnvelope {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_handler_failure_defaults_to_500() {
        let (normalizer, sink) = normalizer();

        let response = normalizer.handle(Failure::new("This is a test error"), &request("/error"));

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let envelope = body_of(response).await;
        assert_eq!(envelope.errors[0].kind, "Error");
        assert_eq!(envelope.errors[0].msg, "This is a test error");

        assert_eq!(sink.count(Level::Error), 1);
        let record = &sink.records()[0];
        assert_eq!(record["message"], "This is a test error");
        assert_eq!(record["requestId"], "req-1");
        assert_eq!(record["status"], 500);
    }

    #[tokio::test]
    async fn test_explicit_status_is_used() {
        let (normalizer, sink) = normalizer();
        let failure = Failure::new("Invalid credentials").with_status(StatusCode::UNAUTHORIZED);

        let response = normalizer.handle(failure, &request("/login"));

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(sink.count(Level::Error), 1);
    }

    #[tokio::test]
    async fn test_not_found_logged_at_info() {
        let (normalizer, sink) = normalizer();

        let response = normalizer.handle(
            Failure::not_found(&Method::GET, "/unknown-path"),
            &request("/unknown-path"),
        );

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(response).await.errors[0].kind, "NotFoundError");
        assert_eq!(sink.count(Level::Error), 0);
        assert_eq!(sink.count(Level::Info), 1);
    }

    #[tokio::test]
    async fn test_internal_detail_only_in_log() {
        let (normalizer, sink) = normalizer();
        let payload: Box<dyn std::any::Any + Send> = Box::new("attempt to divide by zero");

        let response = normalizer.handle(Failure::from_panic(payload), &request("/boom"));

        let envelope = body_of(response).await;
        assert_eq!(envelope.errors[0].msg, "Internal server error");
        let record = &sink.records()[0];
        assert_eq!(record["detail"], "attempt to divide by zero");
    }
}
