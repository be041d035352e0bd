//! # Serene Core
//!
//! Core types shared by every serene crate.
//!
//! - [`Context`] - Immutable, request-scoped value bag
//! - [`Handler`] - A request handler producing one response per request
//! - [`Request`] / [`Response`] - The HTTP types handlers and middleware exchange
//! - [`HandlerService`] - Adapter exposing a handler to a hyper connection
//! - [`CoreError`] - Errors raised at the HTTP boundary
//!
//! ## Example
//!
//! ```
//! use serene_core::Context;
//!
//! #[derive(Debug, PartialEq)]
//! struct Tenant(&'static str);
//!
//! let root = Context::new();
//! let scoped = root.with_value(Tenant("acme"));
//!
//! assert_eq!(scoped.value::<Tenant>(), Some(&Tenant("acme")));
//! assert!(root.value::<Tenant>().is_none());
//! ```

#![doc(html_root_url = "https://docs.rs/serene-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod handler;
mod service;
pub mod types;

pub use context::Context;
pub use error::{CoreError, CoreResult};
pub use handler::{handler_fn, BoxedHandler, FnHandler, Handler};
pub use service::HandlerService;
pub use types::{BoxFuture, Request, Response, ResponseExt};

/// HTTP status codes, as used by [`ResponseExt`].
pub use http::StatusCode;
