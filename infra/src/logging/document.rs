//! Log document model

use std::collections::BTreeMap;
use std::error::Error;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One persisted log event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogDocument {
    /// Event time in milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Same instant, human readable (UTC)
    pub datetime: DateTime<Utc>,
    pub level: String,
    pub thread: String,
    /// Event target, usually the emitting module path
    pub logger: String,
    pub message: String,
    pub application: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<ExceptionInfo>,

    /// Fields of the spans enclosing the event
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mdc: BTreeMap<String, String>,
}

impl LogDocument {
    /// Create a document stamped with the given instant
    pub fn new(
        at: DateTime<Utc>,
        level: impl Into<String>,
        logger: impl Into<String>,
        message: impl Into<String>,
        application: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: at.timestamp_millis(),
            datetime: at,
            level: level.into(),
            thread: current_thread_name(),
            logger: logger.into(),
            message: message.into(),
            application: application.into(),
            exception: None,
            mdc: BTreeMap::new(),
        }
    }

    /// Create a document from an epoch-millisecond timestamp
    pub fn at_millis(
        millis: i64,
        level: impl Into<String>,
        logger: impl Into<String>,
        message: impl Into<String>,
        application: impl Into<String>,
    ) -> Self {
        let at = Utc
            .timestamp_millis_opt(millis)
            .single()
            .unwrap_or_else(Utc::now);
        Self::new(at, level, logger, message, application)
    }

    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }

    pub fn with_mdc(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.mdc.insert(key.into(), value.into());
        self
    }
}

/// Error attached to a log event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionInfo {
    /// Error kind: the leading identifier of its `Debug` form
    pub class: String,
    pub message: String,
    /// The error followed by its source chain, one per line
    pub stack_trace: String,
    /// Message of the innermost source, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl ExceptionInfo {
    /// Capture an error and its source chain
    pub fn from_error(error: &(dyn Error + 'static)) -> Self {
        let message = error.to_string();
        let mut stack_trace = message.clone();
        let mut cause = None;

        let mut source = error.source();
        while let Some(inner) = source {
            let text = inner.to_string();
            stack_trace.push_str("\ncaused by: ");
            stack_trace.push_str(&text);
            cause = Some(text);
            source = inner.source();
        }

        Self {
            class: error_kind(error),
            message,
            stack_trace,
            cause,
        }
    }
}

fn error_kind(error: &dyn Error) -> String {
    let debug = format!("{:?}", error);
    debug
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .next()
        .filter(|kind| !kind.is_empty())
        .unwrap_or("Error")
        .to_string()
}

pub(crate) fn current_thread_name() -> String {
    let thread = std::thread::current();
    match thread.name() {
        Some(name) => name.to_string(),
        None => format!("{:?}", thread.id()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[derive(Debug, thiserror::Error)]
    #[error("directory lookup failed")]
    struct LookupFailed {
        #[source]
        source: io::Error,
    }

    #[test]
    fn test_exception_captures_chain_and_root_cause() {
        let error = LookupFailed {
            source: io::Error::new(io::ErrorKind::TimedOut, "connection timed out"),
        };

        let info = ExceptionInfo::from_error(&error);

        assert_eq!(info.class, "LookupFailed");
        assert_eq!(info.message, "directory lookup failed");
        assert_eq!(
            info.stack_trace,
            "directory lookup failed\ncaused by: connection timed out"
        );
        assert_eq!(info.cause.as_deref(), Some("connection timed out"));
    }

    #[test]
    fn test_exception_without_source_has_no_cause() {
        let error = io::Error::new(io::ErrorKind::Other, "boom");
        let info = ExceptionInfo::from_error(&error);
        assert_eq!(info.stack_trace, "boom");
        assert!(info.cause.is_none());
    }

    #[test]
    fn test_empty_optional_parts_are_omitted() {
        let doc = LogDocument::at_millis(1_700_000_000_123, "INFO", "af_api", "ready", "artefact");
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["timestamp"], 1_700_000_000_123i64);
        assert_eq!(json["datetime"], "2023-11-14T22:13:20.123Z");
        assert!(json.get("exception").is_none());
        assert!(json.get("mdc").is_none());

        let doc = doc.with_mdc("request_id", "r-1");
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["mdc"]["request_id"], "r-1");
    }
}
