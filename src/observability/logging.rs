//! Structured logging.
//!
//! # Responsibilities
//! - Serialize each log call into one structured JSON record
//! - Hand the record to every sink whose minimum level it meets
//! - Stay silent in the `test` environment
//!
//! # Design Decisions
//! - The logger is an explicit value shared via `Arc`, not a global
//! - Each logger owns a `tracing::Dispatch`: a registry with one fmt layer
//!   per sink, each behind its own level filter
//! - Logging never fails: sink errors are swallowed, and the first failure of
//!   each sink is reported once to the other sinks

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::Dispatch;
use tracing_subscriber::layer::SubscriberExt;

use crate::config::{Config, Environment};
use crate::observability::sinks::{self, Sink, SinkHealth, SinkLayer};

pub const COMBINED_LOG_FILE: &str = "combined.log";
pub const ERROR_LOG_FILE: &str = "error.log";

const RECORD_TARGET: &str = "auth_service::record";

/// Keys owned by the record itself; metadata cannot override them.
const RESERVED_KEYS: [&str; 4] = ["level", "message", "timestamp", "serviceName"];

/// Free-form structured fields attached to a record.
pub type Metadata = serde_json::Map<String, Value>;

/// Log severity, totally ordered: `Info < Warn < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One serialized log entry. Lives only for the duration of a log call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord<'a> {
    pub level: Level,
    pub message: &'a str,
    pub timestamp: DateTime<Utc>,
    pub service_name: &'a str,
    #[serde(flatten)]
    pub metadata: Option<&'a Metadata>,
}

/// Leveled logger writing structured records to independent sinks.
pub struct Logger {
    service_name: String,
    dispatch: Option<Dispatch>,
    sinks: Vec<Arc<SinkHealth>>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("service_name", &self.service_name)
            .field("silent", &self.is_silent())
            .field(
                "sinks",
                &self.sinks.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Logger {
    pub fn builder(service_name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder {
            service_name: service_name.into(),
            environment: None,
            layers: Vec::new(),
            sinks: Vec::new(),
            unavailable: Vec::new(),
        }
    }

    /// Standard sink set for the configured environment: console and
    /// `combined.log` at `info`, `error.log` at `error`. No sinks at all in `test`.
    pub fn from_config(config: &Config) -> Self {
        let builder = Logger::builder(config.service_name.clone()).environment(config.environment);
        if config.environment.is_test() {
            return builder.build();
        }

        builder
            .console(Level::Info)
            .file_sink("combined", config.log_dir.join(COMBINED_LOG_FILE), Level::Info)
            .file_sink("error", config.log_dir.join(ERROR_LOG_FILE), Level::Error)
            .build()
    }

    /// Console-only logger used before configuration is available.
    pub fn bootstrap(service_name: impl Into<String>, environment: Option<Environment>) -> Self {
        let mut builder = Logger::builder(service_name);
        if let Some(env) = environment {
            builder = builder.environment(env);
        }
        builder.console(Level::Info).build()
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// True when no record will ever be written.
    pub fn is_silent(&self) -> bool {
        self.dispatch.is_none()
    }

    pub fn log(&self, level: Level, message: &str, metadata: Option<Metadata>) {
        let Some(dispatch) = &self.dispatch else {
            return;
        };

        let metadata = metadata.map(|mut fields| {
            fields.retain(|key, _| !RESERVED_KEYS.contains(&key.as_str()));
            fields
        });
        if let Some(line) = self.serialize(level, message, metadata.as_ref()) {
            emit(dispatch, level, &line);
        }

        for sink in &self.sinks {
            if let Some(error) = sink.take_failure() {
                self.report_sink_failure(dispatch, sink.name(), &error);
            }
        }
    }

    pub fn info(&self, message: &str) {
        self.log(Level::Info, message, None);
    }

    pub fn warn(&self, message: &str) {
        self.log(Level::Warn, message, None);
    }

    pub fn error(&self, message: &str) {
        self.log(Level::Error, message, None);
    }

    pub fn info_with(&self, message: &str, metadata: Metadata) {
        self.log(Level::Info, message, Some(metadata));
    }

    pub fn warn_with(&self, message: &str, metadata: Metadata) {
        self.log(Level::Warn, message, Some(metadata));
    }

    pub fn error_with(&self, message: &str, metadata: Metadata) {
        self.log(Level::Error, message, Some(metadata));
    }

    fn serialize(&self, level: Level, message: &str, metadata: Option<&Metadata>) -> Option<String> {
        let record = LogRecord {
            level,
            message,
            timestamp: Utc::now(),
            service_name: &self.service_name,
            metadata,
        };
        serde_json::to_string(&record).ok()
    }

    /// Tell the sinks that `sink` stopped accepting records. The broken sink
    /// gets the warning too; its write fails quietly, having already failed once.
    fn report_sink_failure(&self, dispatch: &Dispatch, sink: &str, error: &str) {
        let fields = metadata(json!({ "sink": sink, "error": error }));
        if let Some(line) = self.serialize(Level::Warn, "log sink write failed", Some(&fields)) {
            emit(dispatch, Level::Warn, &line);
        }
    }
}

fn emit(dispatch: &Dispatch, level: Level, line: &str) {
    tracing::dispatcher::with_default(dispatch, || match level {
        Level::Info => tracing::info!(target: RECORD_TARGET, record = line),
        Level::Warn => tracing::warn!(target: RECORD_TARGET, record = line),
        Level::Error => tracing::error!(target: RECORD_TARGET, record = line),
    });
}

/// Builder for [`Logger`].
pub struct LoggerBuilder {
    service_name: String,
    environment: Option<Environment>,
    layers: Vec<SinkLayer>,
    sinks: Vec<Arc<SinkHealth>>,
    unavailable: Vec<(String, String)>,
}

impl LoggerBuilder {
    /// The `test` environment silences every sink.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Add a caller-supplied sink at its own minimum level.
    pub fn sink(self, sink: impl Sink) -> Self {
        let name = sink.name().to_string();
        let min_level = sink.min_level();
        self.writer(&name, sink, min_level)
    }

    /// Add a standard output sink.
    pub fn console(self, min_level: Level) -> Self {
        self.writer("console", std::io::stdout, min_level)
    }

    /// Add an append-only file sink. A file that cannot be opened is skipped
    /// and reported through the remaining sinks once the logger is built.
    pub fn file_sink(mut self, name: &str, path: impl AsRef<Path>, min_level: Level) -> Self {
        match sinks::open_log_file(path.as_ref()) {
            Ok(file) => self.writer(name, file, min_level),
            Err(e) => {
                self.unavailable
                    .push((name.to_string(), format!("{}: {}", path.as_ref().display(), e)));
                self
            }
        }
    }

    fn writer<W>(mut self, name: &str, writer: W, min_level: Level) -> Self
    where
        W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
    {
        let health = SinkHealth::new(name);
        self.layers.push(sinks::sink_layer(writer, min_level, health.clone()));
        self.sinks.push(health);
        self
    }

    pub fn build(self) -> Logger {
        let silent = self.environment.is_some_and(|env| env.is_test()) || self.layers.is_empty();
        let dispatch =
            (!silent).then(|| Dispatch::new(tracing_subscriber::registry().with(self.layers)));

        let logger = Logger {
            service_name: self.service_name,
            dispatch,
            sinks: self.sinks,
        };

        for (sink, error) in self.unavailable {
            logger.warn_with(
                "log sink unavailable",
                metadata(json!({ "sink": sink, "error": error })),
            );
        }

        logger
    }
}

/// Convert a `json!({...})` object into [`Metadata`]. Non-objects yield an empty map.
pub fn metadata(value: Value) -> Metadata {
    match value {
        Value::Object(map) => map,
        _ => Metadata::new(),
    }
}
