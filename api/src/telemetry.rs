//! Tracing subscriber set-up
//!
//! Console output follows `LoggingConfig.format`; when a log sink is
//! configured, events are also written as documents through a
//! `DocumentLayer`. `log` records (actix, handlers) are bridged into tracing.

use std::sync::Arc;

use af_infra::logging::{
    AppenderSettings, DocumentAppender, DocumentLayer, JsonFileConnector, StatusLevel,
};
use af_shared::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Build the document appender for the configured sink, if any
///
/// A sink that fails to start is reported on stderr and skipped.
pub fn document_appender(config: &LoggingConfig) -> Option<Arc<DocumentAppender>> {
    let sink = config.sink.as_ref()?;
    let appender = Arc::new(DocumentAppender::new(
        AppenderSettings::from(sink),
        Arc::new(JsonFileConnector::new(&sink.directory)),
    ));
    if !appender.start() {
        for status in appender.statuses() {
            if status.level == StatusLevel::Error {
                eprintln!("log sink disabled: {}", status.message);
            }
        }
        return None;
    }
    Some(appender)
}

/// Install the global subscriber
///
/// Returns the running document appender so the caller can stop it on shutdown.
pub fn init(config: &LoggingConfig) -> anyhow::Result<Option<Arc<DocumentAppender>>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))?;

    let console = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().pretty().boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer().compact().boxed(),
    };

    let appender = document_appender(config);
    let documents = appender.clone().map(DocumentLayer::new);

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(documents)
        .try_init()?;

    Ok(appender)
}
