//! Progress log port
//!
//! The reconciler narrates each action ("UPLOADING: docs/plan.txt") through
//! this port so the same engine can drive a CLI, a test harness, or a
//! structured tracing pipeline. The [`ProgressLog`] facade owns the
//! timestamping; sinks receive the already-formatted line.

use std::sync::{Arc, Mutex};

/// Destination for progress lines
pub trait LogSink: Send + Sync {
    /// Emits one formatted progress line
    fn emit(&self, line: &str);
}

impl<T: LogSink + ?Sized> LogSink for Arc<T> {
    fn emit(&self, line: &str) {
        (**self).emit(line);
    }
}

/// Timestamping facade over a [`LogSink`]
///
/// Prefixes every message with the local wall-clock time, matching the
/// `[HH:MM:SS] message` shape the CLI prints.
pub struct ProgressLog {
    sink: Box<dyn LogSink>,
}

impl ProgressLog {
    /// Wraps a sink in the timestamping facade
    #[must_use]
    pub fn new(sink: Box<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Formats and emits one progress message
    pub fn log(&self, message: &str) {
        let stamp = chrono::Local::now().format("%H:%M:%S");
        self.sink.emit(&format!("[{stamp}] {message}"));
    }
}

/// Sink that forwards progress lines to the `tracing` pipeline
#[derive(Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, line: &str) {
        tracing::info!(target: "cloudmirror::progress", "{line}");
    }
}

/// Sink that prints progress lines to stdout
#[derive(Debug, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn emit(&self, line: &str) {
        println!("{line}");
    }
}

/// Sink that collects lines in memory, for assertions in tests
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Creates an empty in-memory sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all lines emitted so far
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl LogSink for MemorySink {
    fn emit(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}
