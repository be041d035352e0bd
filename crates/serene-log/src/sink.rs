//! Record sinks.
//!
//! A [`RecordSink`] is the terminal stage of the logging pipeline: it
//! receives a finished [`Record`] together with the request [`Context`] and
//! writes it somewhere. [`JsonSink`] renders one JSON object per line.

use crate::attr::{AttrMap, Attribute, Value};
use crate::error::LogResult;
use crate::record::Record;
use parking_lot::Mutex;
use serene_core::Context;
use std::io::Write;
use std::sync::Arc;
use tracing::Level;

/// Built-in key for the record time.
pub const TIME_KEY: &str = "time";
/// Built-in key for the record level.
pub const LEVEL_KEY: &str = "level";
/// Built-in key for the record message.
pub const MESSAGE_KEY: &str = "msg";
/// Built-in key for the record call site.
pub const SOURCE_KEY: &str = "source";

/// Rewrites or drops an attribute before it is written.
///
/// The first argument is the path of enclosing group keys, empty for
/// top-level attributes. Returning `None` drops the attribute.
pub type ReplaceAttr = Arc<dyn Fn(&[String], Attribute) -> Option<Attribute> + Send + Sync>;

/// A destination for log records.
pub trait RecordSink: Send + Sync + 'static {
    /// Returns true if records at `level` would be written.
    fn enabled(&self, level: Level) -> bool;

    /// Writes one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be encoded or written.
    fn handle(&self, ctx: &Context, record: Record) -> LogResult<()>;
}

impl<S: RecordSink + ?Sized> RecordSink for Arc<S> {
    fn enabled(&self, level: Level) -> bool {
        (**self).enabled(level)
    }

    fn handle(&self, ctx: &Context, record: Record) -> LogResult<()> {
        (**self).handle(ctx, record)
    }
}

/// Writes records as newline-delimited JSON.
///
/// Each line starts with the built-in `time`, `level`, `msg` and (when
/// enabled) `source` entries, followed by the record attributes in order.
/// Every entry passes through the configured [`ReplaceAttr`] first.
///
/// # Example
///
/// ```
/// use serene_core::Context;
/// use serene_log::{JsonSink, Level, Record, RecordSink};
///
/// let sink = JsonSink::new(Vec::new());
/// sink.handle(&Context::new(), Record::new(Level::INFO, "ready", None)).unwrap();
/// ```
pub struct JsonSink<W> {
    writer: Mutex<W>,
    level: Level,
    add_source: bool,
    replace_attr: Option<ReplaceAttr>,
}

impl<W: Write + Send + 'static> JsonSink<W> {
    /// Creates a sink that writes every level, without source information.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            level: Level::TRACE,
            add_source: false,
            replace_attr: None,
        }
    }

    /// Sets the minimum level.
    #[must_use]
    pub const fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Enables or disables the built-in `source` entry.
    #[must_use]
    pub const fn with_source(mut self, add_source: bool) -> Self {
        self.add_source = add_source;
        self
    }

    /// Sets the attribute rewrite hook.
    #[must_use]
    pub fn with_replace_attr(mut self, replace_attr: ReplaceAttr) -> Self {
        self.replace_attr = Some(replace_attr);
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn builtin_attrs(&self, record: &Record) -> Vec<Attribute> {
        let mut attrs = vec![
            Attribute::time(TIME_KEY, record.time),
            Attribute::string(LEVEL_KEY, record.level.as_str()),
            Attribute::string(MESSAGE_KEY, record.message.clone()),
        ];
        if self.add_source {
            if let Some(source) = &record.source {
                attrs.push(Attribute::group(
                    SOURCE_KEY,
                    vec![
                        Attribute::string("function", source.function.clone()),
                        Attribute::string("file", source.file.clone()),
                        Attribute::uint("line", u64::from(source.line)),
                    ],
                ));
            }
        }
        attrs
    }

    fn replace(&self, groups: &mut Vec<String>, attr: Attribute) -> Option<Attribute> {
        let Some(replace_attr) = &self.replace_attr else {
            return Some(attr);
        };
        match attr.value {
            Value::Group(members) => {
                groups.push(attr.key.clone());
                let members = members
                    .into_iter()
                    .filter_map(|member| self.replace(groups, member))
                    .collect();
                groups.pop();
                Some(Attribute::group(attr.key, members))
            }
            _ => replace_attr(groups.as_slice(), attr),
        }
    }

    fn render(&self, record: Record) -> LogResult<Vec<u8>> {
        let mut groups: Vec<String> = Vec::new();
        let mut entries = Vec::with_capacity(record.attrs().len() + 4);
        for attr in self.builtin_attrs(&record) {
            // built-ins are replaced as a whole, groups included
            let replaced = match &self.replace_attr {
                Some(replace_attr) => replace_attr(&[], attr),
                None => Some(attr),
            };
            entries.extend(replaced);
        }
        for attr in record.attrs().iter().cloned() {
            entries.extend(self.replace(&mut groups, attr));
        }

        let mut line = serde_json::to_vec(&AttrMap(&entries))?;
        line.push(b'\n');
        Ok(line)
    }
}

impl<W: Write + Send + 'static> RecordSink for JsonSink<W> {
    fn enabled(&self, level: Level) -> bool {
        level <= self.level
    }

    fn handle(&self, _ctx: &Context, record: Record) -> LogResult<()> {
        let line = self.render(record)?;
        let mut writer = self.writer.lock();
        writer.write_all(&line)?;
        writer.flush()?;
        Ok(())
    }
}

impl<W> std::fmt::Debug for JsonSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonSink")
            .field("level", &self.level)
            .field("add_source", &self.add_source)
            .field("replace_attr", &self.replace_attr.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Source;
    use chrono::{TimeZone, Utc};
    use serde_json::Value as Json;

    fn render(sink: &JsonSink<Vec<u8>>, record: Record) -> Json {
        let line = sink.render(record).unwrap();
        assert_eq!(line.last(), Some(&b'\n'));
        serde_json::from_slice(&line).unwrap()
    }

    fn fixed_record() -> Record {
        Record::new(Level::WARN, "disk low", Some(Source::new("src/main.rs", 42, "app::run")))
            .with_time(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
    }

    #[test]
    fn test_builtin_entries() {
        let json = render(&JsonSink::new(Vec::new()), fixed_record());
        assert_eq!(json["time"], "2024-01-02T03:04:05.000Z");
        assert_eq!(json["level"], "WARN");
        assert_eq!(json["msg"], "disk low");
        assert!(json.get("source").is_none());
    }

    #[test]
    fn test_source_entry() {
        let json = render(&JsonSink::new(Vec::new()).with_source(true), fixed_record());
        assert_eq!(json["source"]["file"], "src/main.rs");
        assert_eq!(json["source"]["line"], 42);
        assert_eq!(json["source"]["function"], "app::run");
    }

    #[test]
    fn test_replace_drops_and_rewrites() {
        let replace: ReplaceAttr = Arc::new(|groups: &[String], attr: Attribute| match attr.key.as_str() {
            "msg" => None,
            "secret" if groups == ["user"] => Some(Attribute::string("secret", "***")),
            _ => Some(attr),
        });
        let sink = JsonSink::new(Vec::new()).with_replace_attr(replace);

        let mut record = fixed_record();
        record.add_attrs([Attribute::group(
            "user",
            vec![Attribute::string("name", "ada"), Attribute::string("secret", "hunter2")],
        )]);
        let json = render(&sink, record);

        assert!(json.get("msg").is_none());
        assert_eq!(json["user"]["name"], "ada");
        assert_eq!(json["user"]["secret"], "***");
    }

    #[test]
    fn test_level_filter() {
        let sink = JsonSink::new(Vec::new()).with_level(Level::INFO);
        assert!(sink.enabled(Level::ERROR));
        assert!(sink.enabled(Level::INFO));
        assert!(!sink.enabled(Level::DEBUG));
    }

    #[test]
    fn test_one_line_per_record() {
        let sink = JsonSink::new(Vec::new());
        let ctx = Context::new();
        sink.handle(&ctx, fixed_record()).unwrap();
        sink.handle(&ctx, fixed_record()).unwrap();

        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output.lines().count(), 2);
    }
}
