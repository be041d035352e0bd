//! Diagnostics setup for serene services.
//!
//! This crate wires the process-wide `tracing` subscriber:
//!
//! - **ECS** (default): `tracing` events rendered by [`serene_log::EcsLayer`],
//!   sharing one handler with serene's request logger
//! - **JSON**: `tracing-subscriber`'s JSON formatter
//! - **Pretty**: human-readable output for local development
//!
//! Configuration is a plain [`LogConfig`] value that can also be
//! deserialized from any serde format.
//!
//! # Example
//!
//! ```rust,ignore
//! use serene_telemetry::{init_logging, LogConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = if cfg!(debug_assertions) {
//!         LogConfig::development()
//!     } else {
//!         LogConfig::production()
//!     };
//!     init_logging(&config)?;
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/serene-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
