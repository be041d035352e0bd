//! Elastic Common Schema formatter.
//!
//! [`EcsHandler`] decorates every record with the ECS envelope (timestamp,
//! message, level, schema version, logger name, labels, origin) and the
//! request's ECS fields, then hands it to a [`JsonSink`] configured to drop
//! the sink's own built-in entries.
//!
//! ```text
//! {"@timestamp":"2024-05-01T12:30:00.000Z","message":"HTTP Request handled",
//!  "log.level":"INFO","ecs.version":"8.11.0","log.logger":"log/slog",
//!  "labels":{"tenant":"acme"},
//!  "log.origin":{"file.name":"src/http.rs","file.line":120,"function":"..."},
//!  "http.request.method":"GET"}
//! ```

use crate::attr::Attribute;
use crate::context::{ecs_attrs, label_attrs};
use crate::error::LogResult;
use crate::record::Record;
use crate::sink::{JsonSink, RecordSink, ReplaceAttr, LEVEL_KEY, MESSAGE_KEY, SOURCE_KEY, TIME_KEY};
use serene_core::Context;
use std::io::Write;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing::Level;

/// ECS schema version written on every record.
pub const ECS_VERSION: &str = "8.11.0";

/// Logger name written on every record.
pub const LOGGER_NAME: &str = "log/slog";

/// ECS field names.
pub mod keys {
    /// Record timestamp.
    pub const TIMESTAMP: &str = "@timestamp";
    /// Record message.
    pub const MESSAGE: &str = "message";
    /// Record severity.
    pub const LOG_LEVEL: &str = "log.level";
    /// Schema version.
    pub const ECS_VERSION: &str = "ecs.version";
    /// Logger name.
    pub const LOG_LOGGER: &str = "log.logger";
    /// Free-form labels object.
    pub const LABELS: &str = "labels";
    /// Call-site object.
    pub const LOG_ORIGIN: &str = "log.origin";
    /// Call-site file, inside `log.origin`.
    pub const FILE_NAME: &str = "file.name";
    /// Call-site line, inside `log.origin`.
    pub const FILE_LINE: &str = "file.line";
    /// Call-site function, inside `log.origin`.
    pub const FUNCTION: &str = "function";
    /// HTTP request method.
    pub const HTTP_REQUEST_METHOD: &str = "http.request.method";
}

/// Maps a level to the text written under `log.level`.
pub type LevelRenamer = Arc<dyn Fn(Level) -> String + Send + Sync>;

/// Drops the sink's built-in `time`, `msg`, `source` and `level` entries.
///
/// Only top-level attributes are affected; a `level` key nested in a group
/// is kept.
#[must_use]
pub fn default_replace_attr(groups: &[String], attr: Attribute) -> Option<Attribute> {
    let builtin = matches!(
        attr.key.as_str(),
        TIME_KEY | MESSAGE_KEY | SOURCE_KEY | LEVEL_KEY
    );
    if groups.is_empty() && builtin {
        None
    } else {
        Some(attr)
    }
}

/// Configuration for [`EcsHandler`].
///
/// # Example
///
/// ```
/// use serene_log::{EcsConfig, Level};
///
/// let config = EcsConfig::default()
///     .with_level(Level::INFO)
///     .with_level_renamer(|level| level.as_str().to_lowercase());
/// ```
///
/// [`LevelFilter::OFF`] discards every record:
///
/// ```
/// use serene_log::{EcsConfig, EcsHandler, Level, LevelFilter, RecordSink};
///
/// let silent = EcsHandler::new(EcsConfig::default().with_level_filter(LevelFilter::OFF));
/// assert!(!silent.enabled(Level::ERROR));
/// ```
#[derive(Clone)]
pub struct EcsConfig {
    /// Minimum level; less severe records are discarded.
    pub level: LevelFilter,
    /// Text written under `log.level`.
    pub level_renamer: LevelRenamer,
    /// Rewrite hook applied by the underlying sink.
    pub replace_attr: ReplaceAttr,
}

impl Default for EcsConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::DEBUG,
            level_renamer: Arc::new(|level: Level| level.as_str().to_string()),
            replace_attr: Arc::new(default_replace_attr),
        }
    }
}

impl EcsConfig {
    /// Sets the minimum level.
    #[must_use]
    pub const fn with_level(mut self, level: Level) -> Self {
        self.level = LevelFilter::from_level(level);
        self
    }

    /// Sets the threshold from a filter; `LevelFilter::OFF` disables output.
    #[must_use]
    pub const fn with_level_filter(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Sets the level renamer.
    #[must_use]
    pub fn with_level_renamer<F>(mut self, renamer: F) -> Self
    where
        F: Fn(Level) -> String + Send + Sync + 'static,
    {
        self.level_renamer = Arc::new(renamer);
        self
    }

    /// Replaces the rewrite hook.
    ///
    /// A custom hook takes over from [`default_replace_attr`]; call it from
    /// the custom hook to keep the built-in entries out of the output.
    #[must_use]
    pub fn with_replace_attr<F>(mut self, replace: F) -> Self
    where
        F: Fn(&[String], Attribute) -> Option<Attribute> + Send + Sync + 'static,
    {
        self.replace_attr = Arc::new(replace);
        self
    }
}

impl std::fmt::Debug for EcsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcsConfig")
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

/// Formats records as ECS JSON lines.
pub struct EcsHandler {
    inner: Arc<dyn RecordSink>,
    level: LevelFilter,
    level_renamer: LevelRenamer,
}

impl EcsHandler {
    /// Creates a handler that writes to standard output.
    #[must_use]
    pub fn new(config: EcsConfig) -> Self {
        Self::with_writer(config, std::io::stdout())
    }

    /// Creates a handler that writes to `writer`.
    pub fn with_writer<W: Write + Send + 'static>(config: EcsConfig, writer: W) -> Self {
        let sink = JsonSink::new(writer).with_replace_attr(config.replace_attr);
        Self {
            inner: Arc::new(sink),
            level: config.level,
            level_renamer: config.level_renamer,
        }
    }

    /// Creates a handler that delegates to an existing sink.
    ///
    /// No rewrite hook is installed: the sink is used as-is and is expected
    /// to drop its own built-in entries.
    #[must_use]
    pub fn with_sink(
        level: LevelFilter,
        level_renamer: LevelRenamer,
        sink: Arc<dyn RecordSink>,
    ) -> Self {
        Self {
            inner: sink,
            level,
            level_renamer,
        }
    }

    fn ecs_envelope(&self, ctx: &Context, record: &Record) -> Vec<Attribute> {
        let (file, line, function) = record.source.as_ref().map_or_else(
            || (String::new(), 0, String::new()),
            |source| (source.file.clone(), source.line, source.function.clone()),
        );

        let mut attrs = vec![
            Attribute::time(keys::TIMESTAMP, record.time),
            Attribute::string(keys::MESSAGE, record.message.clone()),
            Attribute::string(keys::LOG_LEVEL, (self.level_renamer)(record.level)),
            Attribute::string(keys::ECS_VERSION, ECS_VERSION),
            Attribute::string(keys::LOG_LOGGER, LOGGER_NAME),
            Attribute::group(keys::LABELS, label_attrs(ctx).to_vec()),
            Attribute::group(
                keys::LOG_ORIGIN,
                vec![
                    Attribute::string(keys::FILE_NAME, file),
                    Attribute::uint(keys::FILE_LINE, u64::from(line)),
                    Attribute::string(keys::FUNCTION, function),
                ],
            ),
        ];
        attrs.extend(ecs_attrs(ctx).iter().cloned());
        attrs
    }
}

impl RecordSink for EcsHandler {
    fn enabled(&self, level: Level) -> bool {
        level <= self.level && self.inner.enabled(level)
    }

    fn handle(&self, ctx: &Context, mut record: Record) -> LogResult<()> {
        let envelope = self.ecs_envelope(ctx, &record);
        record.add_attrs(envelope);
        self.inner.handle(ctx, record)
    }
}

impl std::fmt::Debug for EcsHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcsHandler")
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::add_label_attrs;
    use crate::record::Source;
    use chrono::{TimeZone, Utc};
    use parking_lot::Mutex;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn json(&self) -> serde_json::Value {
            serde_json::from_slice(&self.0.lock()).unwrap()
        }
    }

    fn record(level: Level) -> Record {
        Record::new(level, "boom", Some(Source::new("src/app.rs", 7, "app::main")))
            .with_time(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap())
    }

    #[test]
    fn test_default_replace_attr_is_top_level_only() {
        let level = Attribute::string("level", "x");
        assert!(default_replace_attr(&[], level.clone()).is_none());
        assert!(default_replace_attr(&["request".to_string()], level).is_some());
        assert!(default_replace_attr(&[], Attribute::string("user", "ada")).is_some());
    }

    #[test]
    fn test_envelope_fields() {
        let buffer = Buffer::default();
        let handler = EcsHandler::with_writer(EcsConfig::default(), buffer.clone());
        let ctx = add_label_attrs(&Context::new(), [Attribute::string("tenant", "acme")]);

        handler.handle(&ctx, record(Level::INFO)).unwrap();
        let json = buffer.json();

        assert_eq!(json["@timestamp"], "2024-05-01T12:30:00.000Z");
        assert_eq!(json["message"], "boom");
        assert_eq!(json["log.level"], "INFO");
        assert_eq!(json["ecs.version"], ECS_VERSION);
        assert_eq!(json["log.logger"], LOGGER_NAME);
        assert_eq!(json["labels"]["tenant"], "acme");
        assert_eq!(json["log.origin"]["file.name"], "src/app.rs");
        assert_eq!(json["log.origin"]["file.line"], 7);
        assert_eq!(json["log.origin"]["function"], "app::main");
        for builtin in ["time", "msg", "level", "source"] {
            assert!(json.get(builtin).is_none(), "{builtin} leaked");
        }
    }

    #[test]
    fn test_level_renamer() {
        let buffer = Buffer::default();
        let config = EcsConfig::default()
            .with_level_renamer(|level| format!("renamed_{}", level.as_str().to_lowercase()));
        let handler = EcsHandler::with_writer(config, buffer.clone());

        handler.handle(&Context::new(), record(Level::ERROR)).unwrap();
        assert_eq!(buffer.json()["log.level"], "renamed_error");
    }

    #[test]
    fn test_level_threshold() {
        let handler = EcsHandler::with_writer(EcsConfig::default(), Buffer::default());
        assert!(handler.enabled(Level::DEBUG));
        assert!(!handler.enabled(Level::TRACE));

        let strict = EcsHandler::with_writer(
            EcsConfig::default().with_level(Level::WARN),
            Buffer::default(),
        );
        assert!(strict.enabled(Level::ERROR));
        assert!(!strict.enabled(Level::INFO));
    }

    #[test]
    fn test_level_filter_off_disables_everything() {
        let off = EcsHandler::with_writer(
            EcsConfig::default().with_level_filter(LevelFilter::OFF),
            Buffer::default(),
        );
        assert!(!off.enabled(Level::ERROR));

        let trace = EcsHandler::with_writer(
            EcsConfig::default().with_level_filter(LevelFilter::TRACE),
            Buffer::default(),
        );
        assert!(trace.enabled(Level::TRACE));
    }

    #[test]
    fn test_with_sink_keeps_level_and_renamer() {
        let buffer = Buffer::default();
        let sink: Arc<dyn RecordSink> =
            Arc::new(JsonSink::new(buffer.clone()).with_replace_attr(Arc::new(default_replace_attr)));
        let renamer: LevelRenamer = Arc::new(|level: Level| level.as_str().to_lowercase());
        let handler = EcsHandler::with_sink(LevelFilter::INFO, renamer, sink);

        assert!(!handler.enabled(Level::DEBUG));
        handler.handle(&Context::new(), record(Level::WARN)).unwrap();
        let json = buffer.json();
        assert_eq!(json["log.level"], "warn");
        assert!(json.get("msg").is_none());
    }

    #[test]
    fn test_empty_labels_object() {
        let buffer = Buffer::default();
        let handler = EcsHandler::with_writer(EcsConfig::default(), buffer.clone());
        handler.handle(&Context::new(), record(Level::INFO)).unwrap();
        assert_eq!(buffer.json()["labels"], serde_json::json!({}));
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_error_is_propagated() {
        let handler = EcsHandler::with_writer(EcsConfig::default(), BrokenWriter);
        let err = handler.handle(&Context::new(), record(Level::INFO)).unwrap_err();
        assert!(matches!(err, crate::error::LogError::Io(_)));
    }
}
