//! Log output destinations.
//!
//! Each sink is a `tracing-subscriber` fmt layer: one writer, one
//! [`LevelFilter`], and [`RecordFormat`], which writes the already serialized
//! record as a single line. The [`Logger`](crate::observability::Logger)
//! stacks these layers on a registry of its own.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{Layer, Registry};

use crate::observability::logging::Level;

/// Event field carrying the serialized record.
const RECORD_FIELD: &str = "record";

pub(crate) type SinkLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// A caller-supplied log destination.
pub trait Sink: for<'w> MakeWriter<'w> + Send + Sync + 'static {
    /// Short identifier used when reporting this sink's failures.
    fn name(&self) -> &str;

    /// Records below this level are not written to this sink.
    fn min_level(&self) -> Level {
        Level::Info
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        match level {
            Level::Info => LevelFilter::INFO,
            Level::Warn => LevelFilter::WARN,
            Level::Error => LevelFilter::ERROR,
        }
    }
}

/// Write failures of one sink. Only the first one is surfaced.
#[derive(Debug)]
pub(crate) struct SinkHealth {
    name: String,
    failed: AtomicBool,
    pending: Mutex<Option<String>>,
}

impl SinkHealth {
    pub(crate) fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            failed: AtomicBool::new(false),
            pending: Mutex::new(None),
        })
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    fn fail(&self, error: io::Error) -> io::Error {
        if !self.failed.swap(true, Ordering::SeqCst) {
            if let Ok(mut pending) = self.pending.lock() {
                *pending = Some(error.to_string());
            }
        }
        error
    }

    /// The first failure, if it has not been taken yet.
    pub(crate) fn take_failure(&self) -> Option<String> {
        self.pending.lock().ok().and_then(|mut pending| pending.take())
    }
}

/// Build the layer for one sink.
pub(crate) fn sink_layer<W>(writer: W, min_level: Level, health: Arc<SinkHealth>) -> SinkLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .event_format(RecordFormat)
        .with_writer(TrackedWriter {
            inner: writer,
            health,
        })
        .log_internal_errors(false)
        .with_filter(LevelFilter::from(min_level))
        .boxed()
}

/// Writes the `record` field verbatim, newline terminated. Other events are dropped.
pub(crate) struct RecordFormat;

impl<S, N> FormatEvent<S, N> for RecordFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);
        match visitor.record {
            Some(record) => writeln!(writer, "{record}"),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
struct RecordVisitor {
    record: Option<String>,
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == RECORD_FIELD {
            self.record = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == RECORD_FIELD {
            self.record = Some(format!("{value:?}"));
        }
    }
}

/// Forwards to the inner writer and notes failures on the sink's health.
struct TrackedWriter<W> {
    inner: W,
    health: Arc<SinkHealth>,
}

impl<'a, W> MakeWriter<'a> for TrackedWriter<W>
where
    W: MakeWriter<'a>,
{
    type Writer = Tracked<'a, W::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        Tracked {
            inner: self.inner.make_writer(),
            health: &self.health,
        }
    }
}

struct Tracked<'a, W> {
    inner: W,
    health: &'a SinkHealth,
}

impl<W: io::Write> io::Write for Tracked<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf).map_err(|e| self.health.fail(e))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.inner.write_all(buf).map_err(|e| self.health.fail(e))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().map_err(|e| self.health.fail(e))
    }
}

/// Open (creating if needed) an append-only log file. Parent directories are created.
///
/// The returned handle is used as the sink's writer: the fmt layer hands each
/// record to it in one `write_all`, and `O_APPEND` keeps concurrent records whole.
pub fn open_log_file(path: impl AsRef<Path>) -> io::Result<Arc<File>> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Arc::new(file))
}

/// Keeps records in memory. Cloning shares the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    min_level: Option<Level>,
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_level(min_level: Level) -> Self {
        Self {
            min_level: Some(min_level),
            lines: Arc::default(),
        }
    }

    /// Raw captured lines, newline stripped.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Captured records parsed back into JSON values.
    pub fn records(&self) -> Vec<serde_json::Value> {
        self.lines()
            .iter()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    /// Number of captured records at exactly `level`.
    pub fn count(&self, level: Level) -> usize {
        self.records()
            .iter()
            .filter(|record| record["level"] == level.as_str())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }
}

impl Sink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn min_level(&self) -> Level {
        self.min_level.unwrap_or(Level::Info)
    }
}

impl<'a> MakeWriter<'a> for MemorySink {
    type Writer = MemoryWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        MemoryWriter { lines: &self.lines }
    }
}

pub struct MemoryWriter<'a> {
    lines: &'a Mutex<Vec<String>>,
}

impl io::Write for MemoryWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let mut lines = self
            .lines
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory sink poisoned"))?;
        lines.extend(text.lines().map(str::to_string));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_log_file_appends_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("combined.log");

        let file = open_log_file(&path).unwrap();
        (&*file).write_all(b"{\"n\":1}\n").unwrap();
        drop(file);

        let file = open_log_file(&path).unwrap();
        (&*file).write_all(b"{\"n\":2}\n").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\"n\":1}\n{\"n\":2}\n");
    }

    #[test]
    fn test_log_file_open_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a log file.
        assert!(open_log_file(dir.path()).is_err());
    }

    #[test]
    fn test_memory_sink_shares_buffer() {
        let sink = MemorySink::new();
        let clone = sink.clone();
        clone.make_writer().write_all(b"{\"level\":\"warn\"}\n").unwrap();
        assert_eq!(sink.lines(), vec!["{\"level\":\"warn\"}".to_string()]);
        assert_eq!(sink.count(Level::Warn), 1);
        assert_eq!(sink.count(Level::Error), 0);
    }

    #[test]
    fn test_first_failure_is_kept_once() {
        let health = SinkHealth::new("combined");
        health.fail(io::Error::new(io::ErrorKind::Other, "disk full"));
        health.fail(io::Error::new(io::ErrorKind::Other, "still full"));

        assert_eq!(health.take_failure().as_deref(), Some("disk full"));
        assert_eq!(health.take_failure(), None);
    }
}
