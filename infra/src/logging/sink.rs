//! Document sinks
//!
//! A `SinkConnector` opens a `LogSink` for a database/collection pair when the
//! appender starts; the sink then receives one document per log event.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use super::document::LogDocument;

/// Errors raised by sinks and connectors
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("log sink is closed")]
    Closed,

    #[error("failed to connect log sink: {0}")]
    Connect(String),

    #[error("failed to encode log document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write log document: {0}")]
    Io(#[from] std::io::Error),
}

/// Where documents go once connected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkTarget {
    pub database: String,
    pub collection: String,
}

/// Receives log documents one at a time
pub trait LogSink: Send + Sync {
    fn insert_one(&self, doc: LogDocument) -> Result<(), SinkError>;

    /// Release the underlying resources
    fn close(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Opens sinks for a target
pub trait SinkConnector: Send + Sync {
    fn connect(&self, target: &SinkTarget) -> Result<Arc<dyn LogSink>, SinkError>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-memory sink; clones share the same buffer
#[derive(Clone, Default)]
pub struct MemorySink {
    documents: Arc<Mutex<Vec<LogDocument>>>,
    targets: Arc<Mutex<Vec<SinkTarget>>>,
    closed: Arc<AtomicBool>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the documents received so far
    pub fn documents(&self) -> Vec<LogDocument> {
        lock(&self.documents).clone()
    }

    /// Targets this sink was connected to, in order
    pub fn targets(&self) -> Vec<SinkTarget> {
        lock(&self.targets).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.documents).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl LogSink for MemorySink {
    fn insert_one(&self, doc: LogDocument) -> Result<(), SinkError> {
        if self.is_closed() {
            return Err(SinkError::Closed);
        }
        lock(&self.documents).push(doc);
        Ok(())
    }

    fn close(&self) -> Result<(), SinkError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

impl SinkConnector for MemorySink {
    fn connect(&self, target: &SinkTarget) -> Result<Arc<dyn LogSink>, SinkError> {
        self.closed.store(false, Ordering::SeqCst);
        lock(&self.targets).push(target.clone());
        Ok(Arc::new(self.clone()))
    }
}

/// Appends documents as JSON lines to `<directory>/<database>.<collection>.jsonl`
pub struct JsonFileSink {
    path: PathBuf,
    writer: Mutex<Option<BufWriter<File>>>,
}

impl JsonFileSink {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: Mutex::new(Some(BufWriter::new(file))),
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl LogSink for JsonFileSink {
    fn insert_one(&self, doc: LogDocument) -> Result<(), SinkError> {
        let line = serde_json::to_string(&doc)?;
        let mut guard = lock(&self.writer);
        let writer = guard.as_mut().ok_or(SinkError::Closed)?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }

    fn close(&self) -> Result<(), SinkError> {
        if let Some(mut writer) = lock(&self.writer).take() {
            writer.flush()?;
        }
        Ok(())
    }
}

/// Connector producing `JsonFileSink`s under one directory
#[derive(Debug, Clone)]
pub struct JsonFileConnector {
    directory: PathBuf,
}

impl JsonFileConnector {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

/// A database or collection name usable as one file name component
fn checked_component<'a>(kind: &str, name: &'a str) -> Result<&'a str, SinkError> {
    if name.is_empty() || name.contains(|c: char| c == '/' || c == '\\') || name.contains("..") {
        return Err(SinkError::Connect(format!("invalid {} name '{}'", kind, name)));
    }
    Ok(name)
}

impl SinkConnector for JsonFileConnector {
    fn connect(&self, target: &SinkTarget) -> Result<Arc<dyn LogSink>, SinkError> {
        let database = checked_component("database", &target.database)?;
        let collection = checked_component("collection", &target.collection)?;
        fs::create_dir_all(&self.directory)
            .map_err(|e| SinkError::Connect(format!("{}: {}", self.directory.display(), e)))?;
        let path = self
            .directory
            .join(format!("{}.{}.jsonl", database, collection));
        Ok(Arc::new(JsonFileSink::open(path)?))
    }
}
