//! The internal failure value produced by handlers and the dispatcher.

use std::any::Any;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use axum::http::{Method, StatusCode};

/// Where a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No registered route matched. Expected, not a bug.
    NotFound,
    /// Returned or propagated by a route handler.
    Handler,
    /// A handler panicked.
    Panic,
}

/// Field a failure refers to, for validation-style errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldLocation {
    pub path: String,
    pub location: String,
}

/// Error outcome of a single request.
///
/// Any `std::error::Error` converts into a `Failure` with `?`, taking its
/// category name from the error's type. Without an explicit status the
/// failure resolves to 500.
#[derive(Debug)]
pub struct Failure {
    kind: FailureKind,
    status: Option<StatusCode>,
    name: Cow<'static, str>,
    message: String,
    field: Option<FieldLocation>,
    detail: Option<String>,
    cause: Option<Box<dyn StdError + Send + Sync>>,
}

impl Failure {
    /// A generic handler failure of category `Error`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Handler,
            status: None,
            name: Cow::Borrowed("Error"),
            message: message.into(),
            field: None,
            detail: None,
            cause: None,
        }
    }

    /// Failure for a method + path with no registered route.
    pub fn not_found(method: &Method, path: &str) -> Self {
        Self {
            kind: FailureKind::NotFound,
            status: Some(StatusCode::NOT_FOUND),
            name: Cow::Borrowed("NotFoundError"),
            message: format!("No route for {} {}", method, path),
            field: None,
            detail: None,
            cause: None,
        }
    }

    /// Convert a caught panic payload. The panic text stays internal.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let detail = panic_text(payload.as_ref());

        Self {
            kind: FailureKind::Panic,
            status: None,
            name: Cow::Borrowed("InternalError"),
            message: "Internal server error".to_string(),
            field: None,
            detail: Some(detail),
            cause: None,
        }
    }

    /// Wrap an arbitrary error; same as `Failure::from(error)`.
    pub fn from_error<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            kind: FailureKind::Handler,
            status: None,
            name: Cow::Owned(short_type_name::<E>().to_string()),
            message: error.to_string(),
            field: None,
            detail: None,
            cause: Some(Box::new(error)),
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Override the category name reported as `type`.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    pub fn at_field(mut self, path: impl Into<String>, location: impl Into<String>) -> Self {
        self.field = Some(FieldLocation {
            path: path.into(),
            location: location.into(),
        });
        self
    }

    pub fn with_cause(mut self, cause: impl StdError + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Internal diagnostic text; logged, never sent to the caller.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field(&self) -> Option<&FieldLocation> {
        self.field.as_ref()
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn explicit_status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Response status: the explicit status if it is a 4xx/5xx code, else 500.
    pub fn status(&self) -> StatusCode {
        match self.status {
            Some(status) if status.is_client_error() || status.is_server_error() => status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Messages of the cause and its sources, outermost first.
    pub fn cause_chain(&self) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = self
            .cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static));
        while let Some(err) = current {
            chain.push(err.to_string());
            current = err.source();
        }
        chain
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

impl<E> From<E> for Failure
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Failure::from_error(error)
    }
}

/// Text of a panic payload: the message for `&str`/`String` payloads.
pub fn panic_text(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Last path segment of a type name, without generics.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
