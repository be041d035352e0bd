//! Logger front-end.
//!
//! [`Logger`] builds [`Record`]s and routes them to a [`RecordSink`]. The
//! `ecs_*!` macros add the calling function name to the record origin; the
//! plain methods capture only file and line.

use crate::attr::Attribute;
use crate::ecs::{EcsConfig, EcsHandler};
use crate::error::LogResult;
use crate::record::{Record, Source};
use crate::sink::RecordSink;
use parking_lot::RwLock;
use serene_core::Context;
use std::sync::Arc;
use tracing::Level;

static DEFAULT_LOGGER: RwLock<Option<Logger>> = parking_lot::const_rwlock(None);

/// A cheaply clonable handle to a record sink.
///
/// # Example
///
/// ```
/// use serene_core::Context;
/// use serene_log::{Attribute, EcsConfig, EcsHandler, Logger};
///
/// let logger = Logger::new(EcsHandler::with_writer(EcsConfig::default(), Vec::new()));
/// logger.info(&Context::new(), "started", [Attribute::uint("workers", 4)]);
/// ```
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn RecordSink>,
}

impl Logger {
    /// Creates a logger over `sink`.
    pub fn new<S: RecordSink>(sink: S) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// Creates a logger over a shared sink.
    #[must_use]
    pub fn from_arc(sink: Arc<dyn RecordSink>) -> Self {
        Self { sink }
    }

    /// Returns true if records at `level` would be written.
    #[must_use]
    pub fn enabled(&self, level: Level) -> bool {
        self.sink.enabled(level)
    }

    /// Emits one record.
    ///
    /// Disabled levels return `Ok(())` without building the record.
    ///
    /// # Errors
    ///
    /// Returns the sink's error if the record cannot be written.
    pub fn log<I>(
        &self,
        ctx: &Context,
        level: Level,
        message: impl Into<String>,
        attrs: I,
        source: Option<Source>,
    ) -> LogResult<()>
    where
        I: IntoIterator<Item = Attribute>,
    {
        if !self.enabled(level) {
            return Ok(());
        }
        let mut record = Record::new(level, message, source);
        record.add_attrs(attrs);
        self.sink.handle(ctx, record)
    }

    /// Emits a debug record.
    ///
    /// # Errors
    ///
    /// Returns the sink's error if the record cannot be written.
    #[track_caller]
    pub fn debug<I>(&self, ctx: &Context, message: impl Into<String>, attrs: I) -> LogResult<()>
    where
        I: IntoIterator<Item = Attribute>,
    {
        self.log(ctx, Level::DEBUG, message, attrs, Some(Source::caller()))
    }

    /// Emits an info record.
    ///
    /// # Errors
    ///
    /// Returns the sink's error if the record cannot be written.
    #[track_caller]
    pub fn info<I>(&self, ctx: &Context, message: impl Into<String>, attrs: I) -> LogResult<()>
    where
        I: IntoIterator<Item = Attribute>,
    {
        self.log(ctx, Level::INFO, message, attrs, Some(Source::caller()))
    }

    /// Emits a warning record.
    ///
    /// # Errors
    ///
    /// Returns the sink's error if the record cannot be written.
    #[track_caller]
    pub fn warn<I>(&self, ctx: &Context, message: impl Into<String>, attrs: I) -> LogResult<()>
    where
        I: IntoIterator<Item = Attribute>,
    {
        self.log(ctx, Level::WARN, message, attrs, Some(Source::caller()))
    }

    /// Emits an error record.
    ///
    /// # Errors
    ///
    /// Returns the sink's error if the record cannot be written.
    #[track_caller]
    pub fn error<I>(&self, ctx: &Context, message: impl Into<String>, attrs: I) -> LogResult<()>
    where
        I: IntoIterator<Item = Attribute>,
    {
        self.log(ctx, Level::ERROR, message, attrs, Some(Source::caller()))
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

/// Replaces the process-wide default logger.
pub fn set_default_logger(logger: Logger) {
    *DEFAULT_LOGGER.write() = Some(logger);
}

/// Returns the process-wide default logger.
///
/// Until [`set_default_logger`] is called this is an ECS handler with the
/// default configuration, writing to standard output.
#[must_use]
pub fn default_logger() -> Logger {
    if let Some(logger) = DEFAULT_LOGGER.read().as_ref() {
        return logger.clone();
    }
    DEFAULT_LOGGER
        .write()
        .get_or_insert_with(|| Logger::new(EcsHandler::new(EcsConfig::default())))
        .clone()
}

/// Emits a record at the given level through a [`Logger`].
///
/// ```
/// use serene_core::Context;
/// use serene_log::{ecs_log, EcsConfig, EcsHandler, Level, Logger};
///
/// let logger = Logger::new(EcsHandler::with_writer(EcsConfig::default(), Vec::new()));
/// let ctx = Context::new();
/// ecs_log!(logger, &ctx, Level::INFO, "order placed", "order.id" => "o-1", "items" => 3_i64)
///     .unwrap();
/// ```
#[macro_export]
macro_rules! ecs_log {
    ($logger:expr, $ctx:expr, $level:expr, $msg:expr $(, $key:literal => $value:expr)* $(,)?) => {
        $logger.log(
            $ctx,
            $level,
            $msg,
            ::std::vec![$($crate::Attribute::new($key, $value)),*],
            ::std::option::Option::Some($crate::source!()),
        )
    };
}

/// Emits a debug record; see [`ecs_log!`].
#[macro_export]
macro_rules! ecs_debug {
    ($logger:expr, $ctx:expr, $($rest:tt)+) => {
        $crate::ecs_log!($logger, $ctx, $crate::Level::DEBUG, $($rest)+)
    };
}

/// Emits an info record; see [`ecs_log!`].
#[macro_export]
macro_rules! ecs_info {
    ($logger:expr, $ctx:expr, $($rest:tt)+) => {
        $crate::ecs_log!($logger, $ctx, $crate::Level::INFO, $($rest)+)
    };
}

/// Emits a warning record; see [`ecs_log!`].
#[macro_export]
macro_rules! ecs_warn {
    ($logger:expr, $ctx:expr, $($rest:tt)+) => {
        $crate::ecs_log!($logger, $ctx, $crate::Level::WARN, $($rest)+)
    };
}

/// Emits an error record; see [`ecs_log!`].
#[macro_export]
macro_rules! ecs_error {
    ($logger:expr, $ctx:expr, $($rest:tt)+) => {
        $crate::ecs_log!($logger, $ctx, $crate::Level::ERROR, $($rest)+)
    };
}
