//! # Serene Middleware
//!
//! Middleware composition for serene handlers.
//!
//! A [`Middleware`] wraps behaviour around the handler that follows it. The
//! chain builder composes a base handler with an ordered list of middleware
//! into a single [`Handler`](serene_core::Handler).
//!
//! ## Composition Order
//!
//! Starting from the base handler, each middleware wraps the result of the
//! previous step, in list order. The last middleware listed is therefore the
//! outermost one and runs first on an inbound request:
//!
//! ```text
//! apply_middlewares(base, [a, b, c])
//!
//! Request → c → b → a → base
//!                        ↓
//! Response ← c ← b ← a ←─┘
//! ```
//!
//! ## Example
//!
//! ```
//! use serene_core::{handler_fn, Context, Request, Response, ResponseExt};
//! use serene_middleware::{ChainBuilder, FnMiddleware};
//! use http::StatusCode;
//!
//! let base = handler_fn(|_ctx: Context, _req: Request| async {
//!     Response::text(StatusCode::OK, "Hello, world!")
//! });
//!
//! let auth = FnMiddleware::new("auth", |ctx, req: Request, next| {
//!     Box::pin(async move {
//!         if req.headers().contains_key("authorization") {
//!             next.run(ctx, req).await
//!         } else {
//!             Response::error(StatusCode::FORBIDDEN, "Forbidden")
//!         }
//!     })
//! });
//!
//! let chain = ChainBuilder::new(base).with(auth).build();
//! ```

#![doc(html_root_url = "https://docs.rs/serene-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain;
pub mod middleware;

// Re-export main types at crate root
pub use chain::{apply_middlewares, BoxedMiddleware, ChainBuilder};
pub use middleware::{FnMiddleware, Middleware, Next};
