//! Bridge from `tracing` events to a [`RecordSink`].
//!
//! Installing an [`EcsLayer`] routes ordinary `tracing::info!` (and friends)
//! through the ECS formatter. Events carry no request context, so their
//! `labels` object is empty.
//!
//! ```rust,ignore
//! use serene_log::{EcsConfig, EcsHandler, EcsLayer};
//! use tracing_subscriber::prelude::*;
//!
//! tracing_subscriber::registry()
//!     .with(EcsLayer::new(EcsHandler::new(EcsConfig::default())))
//!     .init();
//! ```

use crate::attr::Attribute;
use crate::record::{Record, Source};
use crate::sink::RecordSink;
use serene_core::Context;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer;
use tracing_subscriber::Layer;

/// Field holding the event message.
const MESSAGE_FIELD: &str = "message";

/// A `tracing_subscriber` layer writing events through a [`RecordSink`].
///
/// Event metadata names the file, line and module but not the enclosing
/// function, so `log.origin.function` is left empty.
#[derive(Clone)]
pub struct EcsLayer {
    sink: Arc<dyn RecordSink>,
}

impl EcsLayer {
    /// Creates a layer over `sink`.
    pub fn new<S: RecordSink>(sink: S) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// Creates a layer over a shared sink.
    #[must_use]
    pub fn from_arc(sink: Arc<dyn RecordSink>) -> Self {
        Self { sink }
    }
}

impl std::fmt::Debug for EcsLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcsLayer").finish_non_exhaustive()
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    attrs: Vec<Attribute>,
}

impl FieldVisitor {
    fn push(&mut self, field: &Field, attr: Attribute) {
        if field.name() == MESSAGE_FIELD {
            self.message = Some(match attr.value {
                crate::attr::Value::String(s) => s,
                other => serde_json::to_string(&other).unwrap_or_default(),
            });
        } else {
            self.attrs.push(attr);
        }
    }
}

impl Visit for FieldVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, Attribute::float(field.name(), value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, Attribute::int(field.name(), value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, Attribute::uint(field.name(), value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, Attribute::bool(field.name(), value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, Attribute::string(field.name(), value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        self.push(field, Attribute::string(field.name(), format!("{value:?}")));
    }
}

impl<S: Subscriber> Layer<S> for EcsLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: layer::Context<'_, S>) {
        let metadata = event.metadata();
        let level = *metadata.level();
        if !self.sink.enabled(level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let source = metadata
            .file()
            .map(|file| Source::new(file, metadata.line().unwrap_or_default(), ""));
        let mut record = Record::new(level, visitor.message.unwrap_or_default(), source);
        record.add_attrs(visitor.attrs);

        if let Err(e) = self.sink.handle(&Context::new(), record) {
            // tracing cannot report on itself from inside a layer
            eprintln!("serene-log: failed to write event: {e}");
        }
    }
}
