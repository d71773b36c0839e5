//! `tracing` layer turning events into log documents

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use super::appender::DocumentAppender;
use super::document::{ExceptionInfo, LogDocument};

/// Fields recorded on a span, kept in its extensions
#[derive(Debug, Default, Clone)]
struct SpanFields(BTreeMap<String, String>);

impl Visit for SpanFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: Vec<(String, String)>,
    exception: Option<ExceptionInfo>,
}

impl EventVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }

    /// The message followed by the remaining fields as `key=value`
    fn render(&self) -> String {
        let mut rendered = self.message.clone();
        for (key, value) in &self.fields {
            if !rendered.is_empty() {
                rendered.push(' ');
            }
            rendered.push_str(key);
            rendered.push('=');
            rendered.push_str(value);
        }
        rendered
    }
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        if self.exception.is_none() {
            self.exception = Some(ExceptionInfo::from_error(value));
        }
        self.push(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{:?}", value));
    }
}

/// Layer forwarding every event to a `DocumentAppender`
///
/// Span fields of the current scope become the document's `mdc`; an error
/// recorded as `&dyn Error` fills its `exception`.
///
/// ```no_run
/// use std::sync::Arc;
/// use af_infra::logging::{AppenderSettings, DocumentAppender, DocumentLayer, MemorySink};
/// use tracing_subscriber::layer::SubscriberExt;
///
/// let appender = Arc::new(DocumentAppender::new(
///     AppenderSettings {
///         uri: Some("mongodb://localhost:27017/app".into()),
///         collection: Some("application_logs".into()),
///         application: "artefact".into(),
///     },
///     Arc::new(MemorySink::new()),
/// ));
/// appender.start();
/// let subscriber = tracing_subscriber::registry().with(DocumentLayer::new(appender));
/// tracing::subscriber::set_global_default(subscriber).ok();
/// ```
#[derive(Clone)]
pub struct DocumentLayer {
    appender: Arc<DocumentAppender>,
}

impl DocumentLayer {
    pub fn new(appender: Arc<DocumentAppender>) -> Self {
        Self { appender }
    }

    pub fn appender(&self) -> &Arc<DocumentAppender> {
        &self.appender
    }
}

impl<S> Layer<S> for DocumentLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            let mut fields = SpanFields::default();
            attrs.record(&mut fields);
            span.extensions_mut().insert(fields);
        }
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            let mut extensions = span.extensions_mut();
            match extensions.get_mut::<SpanFields>() {
                Some(fields) => values.record(fields),
                None => {
                    let mut fields = SpanFields::default();
                    values.record(&mut fields);
                    extensions.insert(fields);
                }
            }
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        if !self.appender.is_started() {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let metadata = event.metadata();
        let mut doc = LogDocument::new(
            Utc::now(),
            metadata.level().to_string(),
            metadata.target(),
            visitor.render(),
            self.appender.application(),
        );
        doc.exception = visitor.exception;

        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                if let Some(fields) = span.extensions().get::<SpanFields>() {
                    doc.mdc
                        .extend(fields.0.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
            }
        }

        self.appender.append(doc);
    }
}
