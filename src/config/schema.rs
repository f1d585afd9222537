//! Configuration schema definitions.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Environment variable holding the listen port.
pub const PORT_VAR: &str = "PORT";
/// Environment variable holding the deployment environment name.
pub const ENVIRONMENT_VAR: &str = "APP_ENV";
pub const HOST_VAR: &str = "HOST";
pub const SERVICE_NAME_VAR: &str = "SERVICE_NAME";
pub const LOG_DIR_VAR: &str = "LOG_DIR";
pub const METRICS_ADDRESS_VAR: &str = "METRICS_ADDRESS";

pub const DEFAULT_SERVICE_NAME: &str = "auth-service";
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Deployment environment the process runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }

    pub fn is_test(&self) -> bool {
        matches!(self, Environment::Test)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when an environment name is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected one of development, test, production")]
pub struct UnknownEnvironment;

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "production" => Ok(Environment::Production),
            _ => Err(UnknownEnvironment),
        }
    }
}

/// Root configuration for the service.
///
/// Built once by [`crate::config::load`]; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    /// Bind host.
    pub host: IpAddr,

    /// Listen port (never 0).
    pub port: u16,

    pub environment: Environment,

    /// Name stamped on every log record.
    pub service_name: String,

    /// Directory holding `combined.log` and `error.log`.
    pub log_dir: PathBuf,

    /// Prometheus scrape address; metrics export is off when unset.
    pub metrics_address: Option<SocketAddr>,
}

impl Config {
    /// Minimal configuration with defaults for everything but port and environment.
    pub fn new(port: u16, environment: Environment) -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port,
            environment,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            metrics_address: None,
        }
    }

    /// Socket address the HTTP listener binds to.
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
