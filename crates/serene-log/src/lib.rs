//! # Serene Log
//!
//! Elastic Common Schema logging for serene services.
//!
//! This crate provides:
//!
//! - **Attribute stores**: request-scoped labels and ECS fields carried in the
//!   [`Context`](serene_core::Context)
//! - **Extractors**: functions pulling attributes out of inbound requests
//! - **HTTP middleware**: [`HttpAttributesMiddleware`] fills both stores and
//!   can log a per-request summary
//! - **ECS formatter**: [`EcsHandler`] writes one ECS JSON object per record
//! - **Tracing bridge**: [`EcsLayer`] routes `tracing` events through a sink
//!
//! ## Example
//!
//! ```
//! use serene_core::{handler_fn, Context, Request, Response, ResponseExt};
//! use serene_log::{
//!     extract_header_rename, label_attrs, EcsConfig, EcsHandler, HttpAttributesConfig,
//!     HttpAttributesMiddleware, Logger,
//! };
//! use serene_middleware::ChainBuilder;
//! use http::StatusCode;
//!
//! let logger = Logger::new(EcsHandler::new(EcsConfig::default()));
//!
//! let attributes = HttpAttributesMiddleware::new(
//!     HttpAttributesConfig::default()
//!         .log_request()
//!         .with_default_info()
//!         .label_extractor(extract_header_rename("X-Tenant", "tenant"))
//!         .logger(logger),
//! );
//!
//! let handler = handler_fn(|ctx: Context, _req: Request| async move {
//!     let tenants = label_attrs(&ctx).len();
//!     Response::text(StatusCode::OK, &format!("{tenants} label(s)"))
//! });
//!
//! let chain = ChainBuilder::new(handler).with(attributes).build();
//! ```

#![doc(html_root_url = "https://docs.rs/serene-log/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod attr;
mod context;
pub mod ecs;
mod error;
mod extract;
mod layer;
mod logger;
mod middleware;
#[doc(hidden)]
pub mod record;
pub mod sink;

pub use attr::{Attribute, Value};
pub use context::{
    add_label_attrs, ecs_attrs, has_ecs_store, has_label_store, label_attrs, AttributeStore,
};
pub use ecs::{default_replace_attr, EcsConfig, EcsHandler, LevelRenamer, ECS_VERSION, LOGGER_NAME};
pub use error::{LogError, LogResult};
pub use extract::{extract_header, extract_header_rename, extract_method, Extractor};
pub use layer::EcsLayer;
pub use logger::{default_logger, set_default_logger, Logger};
pub use middleware::{HttpAttributesConfig, HttpAttributesMiddleware, REQUEST_HANDLED_MESSAGE};
pub use record::{Record, Source};
pub use sink::{JsonSink, RecordSink, ReplaceAttr};
pub use tracing::level_filters::LevelFilter;
pub use tracing::Level;
