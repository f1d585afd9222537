//! Route handler abstraction.

use std::future::Future;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use futures_util::future::BoxFuture;

use crate::error::Failure;

/// Outcome of a handler: a complete response, or a failure for the error boundary.
pub type HandlerResult = Result<Response, Failure>;

pub type HandlerFuture = BoxFuture<'static, HandlerResult>;

/// Something that can serve a matched request.
///
/// Implemented for every `Fn(Request<Body>) -> impl Future<Output = HandlerResult>`,
/// so plain `async fn`s and closures register directly.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, request: Request<Body>) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, request: Request<Body>) -> HandlerFuture {
        Box::pin(self(request))
    }
}
