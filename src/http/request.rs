//! Request metadata captured before dispatch.
//!
//! The request itself is moved into the handler, so whatever the error
//! boundary needs to describe it is copied out first.

use axum::http::{Method, Request};

pub const X_REQUEST_ID: &str = "x-request-id";

/// What the error boundary knows about a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInfo {
    pub method: Method,
    pub path: String,
    /// Set by the request-id middleware; absent if the layer is not installed.
    pub request_id: Option<String>,
}

impl RequestInfo {
    pub fn from_request<B>(request: &Request<B>) -> Self {
        Self {
            method: request.method().clone(),
            path: request.uri().path().to_string(),
            request_id: request
                .headers()
                .get(X_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_request() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("http://localhost:5501/login?next=%2F")
            .header(X_REQUEST_ID, "abc-123")
            .body(())
            .unwrap();

        let info = RequestInfo::from_request(&request);
        assert_eq!(info.method, Method::POST);
        assert_eq!(info.path, "/login");
        assert_eq!(info.request_id.as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_missing_request_id() {
        let request = Request::builder().uri("/").body(()).unwrap();
        assert_eq!(RequestInfo::from_request(&request).request_id, None);
    }
}
