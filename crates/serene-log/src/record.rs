//! Log records and their call-site information.

use crate::attr::Attribute;
use chrono::{DateTime, Utc};
use std::panic::Location;
use tracing::Level;

/// Where a record was emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Source file path.
    pub file: String,
    /// Line number within `file`.
    pub line: u32,
    /// Enclosing function path, empty if unknown.
    pub function: String,
}

impl Source {
    /// Creates a source location.
    pub fn new(file: impl Into<String>, line: u32, function: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            function: function.into(),
        }
    }

    /// Captures the caller's file and line. The function is left empty.
    #[track_caller]
    #[must_use]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line(), String::new())
    }

    /// Sets the enclosing function path.
    #[must_use]
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = function.into();
        self
    }
}

/// A single log event.
#[derive(Debug, Clone)]
pub struct Record {
    /// When the event happened.
    pub time: DateTime<Utc>,
    /// Severity.
    pub level: Level,
    /// Human readable message.
    pub message: String,
    /// Call site, if captured.
    pub source: Option<Source>,
    attrs: Vec<Attribute>,
}

impl Record {
    /// Creates a record stamped with the current time.
    pub fn new(level: Level, message: impl Into<String>, source: Option<Source>) -> Self {
        Self {
            time: Utc::now(),
            level,
            message: message.into(),
            source,
            attrs: Vec::new(),
        }
    }

    /// Overrides the record time.
    #[must_use]
    pub const fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = time;
        self
    }

    /// Appends attributes after the existing ones.
    pub fn add_attrs<I: IntoIterator<Item = Attribute>>(&mut self, attrs: I) {
        self.attrs.extend(attrs);
    }

    /// Returns the attributes in insertion order.
    #[must_use]
    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }
}

#[doc(hidden)]
pub fn trim_function_path(raw: &'static str) -> &'static str {
    let mut name = raw.strip_suffix("::f").unwrap_or(raw);
    while let Some(stripped) = name.strip_suffix("::{{closure}}") {
        name = stripped;
    }
    name
}

/// Expands to the path of the enclosing function as a `&'static str`.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::record::trim_function_path(type_name_of(f))
    }};
}

/// Expands to a [`Source`] for the current file, line, and function.
#[macro_export]
macro_rules! source {
    () => {
        $crate::Source::new(file!(), line!(), $crate::function_name!())
    };
}
