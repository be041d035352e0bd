//! # Serene
//!
//! **Request-scoped ECS logging for HTTP services**
//!
//! Serene provides:
//!
//! - **Middleware composition** – Wrap a handler with an ordered list of middleware
//! - **Attribute extraction** – Pull labels and ECS fields out of each request
//! - **ECS logging** – One Elastic Common Schema JSON object per log record
//! - **Healthz** – A dependency status endpoint
//!
//! ## Quick Start
//!
//! ```rust
//! use serene::prelude::*;
//!
//! let app = handler_fn(|ctx: Context, _req: Request| async move {
//!     let labels = label_attrs(&ctx);
//!     Response::text(StatusCode::OK, &format!("{} label(s)", labels.len()))
//! });
//!
//! let attributes = HttpAttributesMiddleware::new(
//!     HttpAttributesConfig::default()
//!         .log_request()
//!         .with_default_info()
//!         .label_extractor(extract_header_rename("X-Tenant", "tenant")),
//! );
//!
//! let handler = ChainBuilder::new(app).with(attributes).build();
//! let service = HandlerService::from_boxed(handler);
//! ```
//!
//! ## Request Flow
//!
//! ```text
//! Request → HttpAttributes (extract labels + ECS fields) → … → Handler
//!                                                               ↓
//! Response ← HttpAttributes (log "HTTP Request handled") ←──────┘
//! ```

#![doc(html_root_url = "https://docs.rs/serene/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use serene_core as core;

// Re-export middleware composition
pub use serene_middleware as middleware;

// Re-export ECS logging
pub use serene_log as log;

// Re-export diagnostics setup
pub use serene_telemetry as telemetry;

// Re-export the status endpoint
pub use serene_healthz as healthz;

/// Prelude module for convenient imports.
///
/// ```rust
/// use serene::prelude::*;
/// ```
pub mod prelude {
    pub use serene_core::{
        handler_fn, BoxFuture, BoxedHandler, Context, Handler, HandlerService, Request, Response,
        ResponseExt,
    };

    pub use serene_middleware::{
        apply_middlewares, BoxedMiddleware, ChainBuilder, FnMiddleware, Middleware, Next,
    };

    pub use serene_log::{
        add_label_attrs, ecs_attrs, ecs_debug, ecs_error, ecs_info, ecs_warn, extract_header,
        extract_header_rename, extract_method, label_attrs, Attribute, EcsConfig, EcsHandler,
        Extractor, HttpAttributesConfig, HttpAttributesMiddleware, Level, Logger,
    };

    pub use serene_healthz::{Dependency, HealthzHandler};

    pub use serene_telemetry::{init_logging, LogConfig};

    pub use serene_core::StatusCode;
}
