//! Wire shape of every error response.
//!
//! ```text
//! { "errors": [ { "type": "...", "msg": "...", "path": "", "location": "" } ] }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::failure::Failure;

/// Body of every failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub errors: Vec<ErrorEntry>,
}

/// One reported error. `path` and `location` are empty unless the error
/// refers to a specific input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub msg: String,
    pub path: String,
    pub location: String,
}

impl From<&Failure> for ErrorEnvelope {
    fn from(failure: &Failure) -> Self {
        let (path, location) = failure
            .field()
            .map(|field| (field.path.clone(), field.location.clone()))
            .unwrap_or_default();

        Self {
            errors: vec![ErrorEntry {
                kind: failure.name().to_string(),
                msg: failure.message().to_string(),
                path,
                location,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_wire_format() {
        let envelope = ErrorEnvelope::from(&Failure::new("This is a test error"));
        assert_eq!(
            serde_json::to_string(&envelope).unwrap(),
            r#"{"errors":[{"type":"Error","msg":"This is a test error","path":"","location":""}]}"#
        );
    }

    #[test]
    fn test_field_specific_entry() {
        let failure = Failure::new("must be an email")
            .named("ValidationError")
            .with_status(StatusCode::UNPROCESSABLE_ENTITY)
            .at_field("email", "body");
        let envelope = ErrorEnvelope::from(&failure);
        assert_eq!(envelope.errors.len(), 1);
        assert_eq!(envelope.errors[0].path, "email");
        assert_eq!(envelope.errors[0].location, "body");
    }

    #[test]
    fn test_internal_detail_never_serialized() {
        let failure = Failure::new("Something broke")
            .with_detail("stack: frame 0 at src/db.rs:42")
            .with_cause(std::io::Error::new(std::io::ErrorKind::Other, "db password rejected"));
        let body = serde_json::to_string(&ErrorEnvelope::from(&failure)).unwrap();
        assert!(!body.contains("src/db.rs"));
        assert!(!body.contains("password"));
    }
}
