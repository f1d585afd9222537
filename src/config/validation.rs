//! Configuration validation.
//!
//! # Responsibilities
//! - Coerce raw strings into typed values
//! - Validate value ranges (port > 0, known environment names)
//! - Fill optional values with their defaults
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RawConfig → Result<Config, Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

use crate::config::schema::{
    Config, Environment, DEFAULT_LOG_DIR, DEFAULT_SERVICE_NAME, ENVIRONMENT_VAR, HOST_VAR,
    METRICS_ADDRESS_VAR, PORT_VAR,
};

/// Unvalidated values as read from the environment.
#[derive(Debug, Clone, Default)]
pub struct RawConfig {
    pub port: Option<String>,
    pub environment: Option<String>,
    pub host: Option<String>,
    pub service_name: Option<String>,
    pub log_dir: Option<String>,
    pub metrics_address: Option<String>,
}

/// A single configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{var} is not set")]
    Missing { var: &'static str },

    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ValidationError {
    fn invalid(var: &'static str, value: &str, reason: impl ToString) -> Self {
        ValidationError::Invalid {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Validate raw values and build the immutable [`Config`].
pub fn validate_config(raw: RawConfig) -> Result<Config, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let port = match raw.port.as_deref() {
        None => {
            errors.push(ValidationError::Missing { var: PORT_VAR });
            None
        }
        Some(value) => match value.trim().parse::<u16>() {
            Ok(0) => {
                errors.push(ValidationError::invalid(PORT_VAR, value, "must be a positive integer"));
                None
            }
            Ok(port) => Some(port),
            Err(_) => {
                errors.push(ValidationError::invalid(
                    PORT_VAR,
                    value,
                    "must be an integer between 1 and 65535",
                ));
                None
            }
        },
    };

    let environment = match raw.environment.as_deref() {
        None => {
            errors.push(ValidationError::Missing { var: ENVIRONMENT_VAR });
            None
        }
        Some(value) => match value.parse::<Environment>() {
            Ok(env) => Some(env),
            Err(e) => {
                errors.push(ValidationError::invalid(ENVIRONMENT_VAR, value, e));
                None
            }
        },
    };

    let host = match raw.host.as_deref() {
        None => None,
        Some(value) => match value.trim().parse::<IpAddr>() {
            Ok(ip) => Some(ip),
            Err(e) => {
                errors.push(ValidationError::invalid(HOST_VAR, value, e));
                None
            }
        },
    };

    let metrics_address = match raw.metrics_address.as_deref() {
        None => None,
        Some(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => Some(addr),
            Err(e) => {
                errors.push(ValidationError::invalid(METRICS_ADDRESS_VAR, value, e));
                None
            }
        },
    };

    match (port, environment) {
        (Some(port), Some(environment)) if errors.is_empty() => {
            let mut config = Config::new(port, environment);
            if let Some(host) = host {
                config.host = host;
            }
            config.service_name = raw
                .service_name
                .map(|name| name.trim().to_string())
                .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string());
            config.log_dir = PathBuf::from(raw.log_dir.as_deref().map_or(DEFAULT_LOG_DIR, str::trim));
            config.metrics_address = metrics_address;
            Ok(config)
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(port: &str, env: &str) -> RawConfig {
        RawConfig {
            port: Some(port.to_string()),
            environment: Some(env.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_config() {
        let config = validate_config(raw("5501", "production")).unwrap();
        assert_eq!(config.port, 5501);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn test_port_zero_rejected() {
        let errors = validate_config(raw("0", "test")).unwrap_err();
        assert!(matches!(errors[0], ValidationError::Invalid { var: "PORT", .. }));
    }

    #[test]
    fn test_port_out_of_range_rejected() {
        assert!(validate_config(raw("70000", "test")).is_err());
        assert!(validate_config(raw("-1", "test")).is_err());
        assert!(validate_config(raw("80.5", "test")).is_err());
    }

    #[test]
    fn test_unknown_environment_rejected() {
        let errors = validate_config(raw("5501", "staging")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().starts_with("APP_ENV=\"staging\" is invalid"));
    }

    #[test]
    fn test_optional_overrides() {
        let mut input = raw("8080", "development");
        input.host = Some("127.0.0.1".into());
        input.service_name = Some("gateway".into());
        input.log_dir = Some("/var/log/gateway".into());
        input.metrics_address = Some("127.0.0.1:9090".into());

        let config = validate_config(input).unwrap();
        assert_eq!(config.bind_address().to_string(), "127.0.0.1:8080");
        assert_eq!(config.service_name, "gateway");
        assert_eq!(config.log_dir, PathBuf::from("/var/log/gateway"));
        assert_eq!(config.metrics_address, Some("127.0.0.1:9090".parse().unwrap()));
    }

    #[test]
    fn test_bad_optional_value_rejected() {
        let mut input = raw("8080", "development");
        input.metrics_address = Some("nowhere".into());
        let errors = validate_config(input).unwrap_err();
        assert!(matches!(errors[0], ValidationError::Invalid { var: "METRICS_ADDRESS", .. }));
    }

    #[test]
    fn test_text_values_are_trimmed() {
        let mut input = raw(" 8080 ", " development ");
        input.service_name = Some(" gateway ".into());
        input.log_dir = Some(" logs/gateway ".into());

        let config = validate_config(input).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.service_name, "gateway");
        assert_eq!(config.log_dir, PathBuf::from("logs/gateway"));
    }
}
