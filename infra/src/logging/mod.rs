//! Structured log documents
//!
//! - `document` - the persisted shape of a log event
//! - `sink` - destinations for documents
//! - `appender` - start/stop lifecycle and failure-tolerant writes
//! - `layer` - `tracing_subscriber` integration

mod appender;
mod document;
mod layer;
mod sink;

pub use appender::{
    database_name, AppenderError, AppenderSettings, DocumentAppender, Status, StatusLevel,
    STATUS_CAPACITY,
};
pub use document::{ExceptionInfo, LogDocument};
pub use layer::DocumentLayer;
pub use sink::{
    JsonFileConnector, JsonFileSink, LogSink, MemorySink, SinkConnector, SinkError, SinkTarget,
};
