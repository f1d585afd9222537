//! Route matching logic.
//!
//! # Responsibilities
//! - Match the request method (exact)
//! - Match the request path (exact, case-sensitive)
//!
//! # Design Decisions
//! - Paths are opaque keys behind the `PathMatcher` trait, so parameterized
//!   or prefix matching can be added without touching the dispatcher
//! - No regex in the hot path

use axum::http::Method;

/// Trait for matching request paths.
pub trait PathMatcher: Send + Sync + std::fmt::Debug {
    /// Returns true if `path` matches this pattern.
    fn matches(&self, path: &str) -> bool;

    /// Pattern as registered, for logging.
    fn pattern(&self) -> &str;
}

/// Matches one path exactly.
#[derive(Debug, Clone)]
pub struct ExactPath {
    path: String,
}

impl ExactPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl PathMatcher for ExactPath {
    fn matches(&self, path: &str) -> bool {
        self.path == path
    }

    fn pattern(&self) -> &str {
        &self.path
    }
}

/// Method + path condition of one route.
#[derive(Debug)]
pub struct RouteMatcher {
    method: Method,
    path: Box<dyn PathMatcher>,
}

impl RouteMatcher {
    pub fn new(method: Method, path: impl PathMatcher + 'static) -> Self {
        Self {
            method,
            path: Box::new(path),
        }
    }

    pub fn matches(&self, method: &Method, path: &str) -> bool {
        self.method == *method && self.path.matches(path)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &str {
        self.path.pattern()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_path() {
        let matcher = ExactPath::new("/error");
        assert!(matcher.matches("/error"));
        assert!(!matcher.matches("/error/"));
        assert!(!matcher.matches("/ERROR")); // Case sensitive
        assert!(!matcher.matches("/"));
    }

    #[test]
    fn test_route_matcher_requires_both() {
        let matcher = RouteMatcher::new(Method::GET, ExactPath::new("/"));
        assert!(matcher.matches(&Method::GET, "/"));
        assert!(!matcher.matches(&Method::POST, "/"));
        assert!(!matcher.matches(&Method::GET, "/other"));
        assert_eq!(matcher.pattern(), "/");
    }
}
