//! Document appender lifecycle
//!
//! The appender never propagates its own failures to the code that logs:
//! start-up problems and write errors are kept as status entries instead.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, RwLock};

use af_shared::config::LogSinkConfig;
use thiserror::Error;

use super::document::LogDocument;
use super::sink::{LogSink, SinkConnector, SinkError, SinkTarget};

/// Status entries kept per appender; older ones are dropped first
pub const STATUS_CAPACITY: usize = 150;

/// Reasons the appender refuses to start
#[derive(Debug, Error)]
pub enum AppenderError {
    #[error("log sink URI is not set")]
    MissingUri,

    #[error("log collection name is not set")]
    MissingCollection,

    #[error("log sink URI is malformed: {uri}")]
    InvalidUri { uri: String },

    #[error("log sink URI does not name a database")]
    MissingDatabase,

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Severity of a status entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

/// Lifecycle or write outcome recorded by the appender
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub level: StatusLevel,
    pub message: String,
}

/// Appender settings
#[derive(Debug, Clone, Default)]
pub struct AppenderSettings {
    pub uri: Option<String>,
    pub collection: Option<String>,
    pub application: String,
}

impl From<&LogSinkConfig> for AppenderSettings {
    fn from(config: &LogSinkConfig) -> Self {
        Self {
            uri: Some(config.uri.clone()),
            collection: Some(config.collection.clone()),
            application: config.application.clone(),
        }
    }
}

/// Extract the database name from a `scheme://[user@]host[:port]/database[?options]` URI
pub fn database_name(uri: &str) -> Result<String, AppenderError> {
    let (scheme, rest) = uri.split_once("://").ok_or_else(|| AppenderError::InvalidUri {
        uri: uri.to_string(),
    })?;
    if scheme.is_empty() || rest.is_empty() {
        return Err(AppenderError::InvalidUri {
            uri: uri.to_string(),
        });
    }

    let path = match rest.split_once('/') {
        Some((_, path)) => path,
        None => return Err(AppenderError::MissingDatabase),
    };
    let database = path.split('?').next().unwrap_or_default().trim();
    if database.is_empty() {
        return Err(AppenderError::MissingDatabase);
    }
    Ok(database.to_string())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Forwards log documents to a sink opened at start-up
pub struct DocumentAppender {
    settings: AppenderSettings,
    connector: Arc<dyn SinkConnector>,
    sink: RwLock<Option<Arc<dyn LogSink>>>,
    statuses: Mutex<VecDeque<Status>>,
}

impl DocumentAppender {
    pub fn new(settings: AppenderSettings, connector: Arc<dyn SinkConnector>) -> Self {
        Self {
            settings,
            connector,
            sink: RwLock::new(None),
            statuses: Mutex::new(VecDeque::with_capacity(STATUS_CAPACITY)),
        }
    }

    pub fn application(&self) -> &str {
        &self.settings.application
    }

    /// Validate the settings and open the sink
    ///
    /// Returns whether the appender is running afterwards. Calling it on a
    /// running appender is a no-op.
    pub fn start(&self) -> bool {
        if self.is_started() {
            return true;
        }
        match self.open() {
            Ok((sink, target)) => {
                *self.sink.write().unwrap_or_else(|p| p.into_inner()) = Some(sink);
                self.add_status(
                    StatusLevel::Info,
                    format!(
                        "document appender started; logging to database '{}', collection '{}'",
                        target.database, target.collection
                    ),
                );
                true
            }
            Err(e) => {
                self.add_status(StatusLevel::Error, e.to_string());
                false
            }
        }
    }

    fn open(&self) -> Result<(Arc<dyn LogSink>, SinkTarget), AppenderError> {
        let uri = non_blank(&self.settings.uri).ok_or(AppenderError::MissingUri)?;
        let collection =
            non_blank(&self.settings.collection).ok_or(AppenderError::MissingCollection)?;
        let target = SinkTarget {
            database: database_name(uri)?,
            collection: collection.to_string(),
        };
        let sink = self.connector.connect(&target)?;
        Ok((sink, target))
    }

    /// Close the sink; the appender ignores events until started again
    pub fn stop(&self) {
        let sink = self.sink.write().unwrap_or_else(|p| p.into_inner()).take();
        if let Some(sink) = sink {
            match sink.close() {
                Ok(()) => self.add_status(StatusLevel::Info, "document appender stopped"),
                Err(e) => self.add_status(
                    StatusLevel::Error,
                    format!("error closing log sink: {}", e),
                ),
            }
        }
    }

    pub fn is_started(&self) -> bool {
        self.sink
            .read()
            .map(|sink| sink.is_some())
            .unwrap_or_else(|p| p.into_inner().is_some())
    }

    /// Write one document; failures become status entries
    pub fn append(&self, doc: LogDocument) {
        let sink = match self.sink.read() {
            Ok(guard) => guard.clone(),
            Err(p) => p.into_inner().clone(),
        };
        let Some(sink) = sink else {
            return;
        };
        if let Err(e) = sink.insert_one(doc) {
            self.add_status(
                StatusLevel::Error,
                format!("failed to write log document: {}", e),
            );
        }
    }

    /// Most recent status entries, oldest first
    pub fn statuses(&self) -> Vec<Status> {
        self.statuses
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    fn add_status(&self, level: StatusLevel, message: impl Into<String>) {
        let mut statuses = self.statuses.lock().unwrap_or_else(|p| p.into_inner());
        if statuses.len() == STATUS_CAPACITY {
            statuses.pop_front();
        }
        statuses.push_back(Status {
            level,
            message: message.into(),
        });
    }
}

impl Drop for DocumentAppender {
    fn drop(&mut self) {
        self.stop();
    }
}
