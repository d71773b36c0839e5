//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the Artefact application.
//! It provides the structured log pipeline: log events become documents that
//! are written to a collection named by the configured sink URI.
//!
//! ## Architecture
//!
//! - **Logging**: `tracing_subscriber` layer, appender lifecycle and sinks

/// Logging module - structured log documents
pub mod logging;

pub use logging::{
    AppenderSettings, DocumentAppender, DocumentLayer, JsonFileConnector, LogDocument, LogSink,
    MemorySink, SinkConnector,
};
