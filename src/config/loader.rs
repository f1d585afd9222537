//! Configuration loading from the process environment.

use thiserror::Error;

use crate::config::schema::{
    Config, ENVIRONMENT_VAR, HOST_VAR, LOG_DIR_VAR, METRICS_ADDRESS_VAR, PORT_VAR,
    SERVICE_NAME_VAR,
};
use crate::config::validation::{validate_config, RawConfig, ValidationError};

/// Error type for configuration loading. Always fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

impl ConfigError {
    pub fn errors(&self) -> &[ValidationError] {
        match self {
            ConfigError::Validation(errors) => errors,
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from the process environment.
pub fn load() -> Result<Config, ConfigError> {
    load_from(env_var)
}

/// Read one process environment variable. Non-UTF-8 values are converted lossily
/// and then rejected by validation if they matter.
pub fn env_var(key: &str) -> Option<String> {
    std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
}

/// Load and validate configuration through an arbitrary variable lookup.
///
/// Blank values are treated the same as unset ones.
pub fn load_from<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    let raw = RawConfig {
        port: read(PORT_VAR),
        environment: read(ENVIRONMENT_VAR),
        host: read(HOST_VAR),
        service_name: read(SERVICE_NAME_VAR),
        log_dir: read(LOG_DIR_VAR),
        metrics_address: read(METRICS_ADDRESS_VAR),
    };

    validate_config(raw).map_err(ConfigError::Validation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_minimal() {
        let config = load_from(lookup(&[("PORT", "5501"), ("APP_ENV", "development")])).unwrap();
        assert_eq!(config.port, 5501);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.service_name, "auth-service");
    }

    #[test]
    fn test_missing_port_is_fatal() {
        let err = load_from(lookup(&[("APP_ENV", "test")])).unwrap_err();
        assert_eq!(err.errors(), &[ValidationError::Missing { var: "PORT" }]);
        assert!(err.to_string().contains("PORT is not set"));
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let err = load_from(lookup(&[("PORT", "  "), ("APP_ENV", "test")])).unwrap_err();
        assert_eq!(err.errors(), &[ValidationError::Missing { var: "PORT" }]);
    }

    #[test]
    fn test_reports_every_problem() {
        let err = load_from(lookup(&[("PORT", "abc"), ("HOST", "not-an-ip")])).unwrap_err();
        assert_eq!(err.errors().len(), 3);
    }
}
