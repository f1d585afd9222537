//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store registered routes in registration order
//! - Look up the first route matching method + path
//! - Run the handler to completion and report its outcome
//!
//! # Design Decisions
//! - Frozen after startup (shared via `Arc`, read without locks)
//! - First match wins
//! - Explicit `NotFound` failure rather than a silent default
//! - A panicking handler is caught here and becomes a `Failure`, so every
//!   failure path ends at the same error boundary
//! - Handlers are polled inside the handler scope (`unwind.rs`), which keeps
//!   the process panic hook quiet for panics caught here

use std::fmt;
use std::panic::AssertUnwindSafe;

use axum::body::Body;
use axum::http::{Method, Request};
use futures_util::FutureExt;

use crate::error::Failure;
use crate::routing::handler::{Handler, HandlerResult};
use crate::routing::matcher::{ExactPath, PathMatcher, RouteMatcher};
use crate::routing::unwind;

/// A registered route.
pub struct RouteEntry {
    matcher: RouteMatcher,
    handler: Box<dyn Handler>,
}

impl RouteEntry {
    pub fn method(&self) -> &Method {
        self.matcher.method()
    }

    pub fn pattern(&self) -> &str {
        self.matcher.pattern()
    }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

/// Ordered method + path dispatch table.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<RouteEntry>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for an exact method + path.
    pub fn register(&mut self, method: Method, path: impl Into<String>, handler: impl Handler) -> &mut Self {
        self.register_with(method, ExactPath::new(path), handler)
    }

    /// Register `handler` behind an arbitrary path matcher.
    pub fn register_with(
        &mut self,
        method: Method,
        path: impl PathMatcher + 'static,
        handler: impl Handler,
    ) -> &mut Self {
        self.routes.push(RouteEntry {
            matcher: RouteMatcher::new(method, path),
            handler: Box::new(handler),
        });
        self
    }

    /// Builder-style [`Router::register`].
    pub fn route(mut self, method: Method, path: impl Into<String>, handler: impl Handler) -> Self {
        self.register(method, path, handler);
        self
    }

    pub fn routes(&self) -> impl Iterator<Item = &RouteEntry> {
        self.routes.iter()
    }

    /// First route matching `method` and `path`, in registration order.
    pub fn lookup(&self, method: &Method, path: &str) -> Option<&RouteEntry> {
        self.routes
            .iter()
            .find(|entry| entry.matcher.matches(method, path))
    }

    /// Match `request` and run its handler to completion.
    ///
    /// Returns the handler's response, or a `Failure` for the error boundary:
    /// `NotFound` when nothing matched, the handler's own failure, or a
    /// `Panic` failure if the handler panicked.
    pub async fn dispatch(&self, request: Request<Body>) -> HandlerResult {
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        let Some(entry) = self.lookup(&method, &path) else {
            tracing::debug!(method = %method, path = %path, "No route matched");
            return Err(Failure::not_found(&method, &path));
        };

        tracing::debug!(method = %method, path = %path, route = entry.pattern(), "Route matched");

        match AssertUnwindSafe(unwind::scoped(entry.handler.call(request)))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(payload) => Err(Failure::from_panic(payload)),
        }
    }
}
