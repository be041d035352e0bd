//! Middleware chain composition.
//!
//! [`apply_middlewares`] folds an ordered list of middleware around a base
//! handler. Each middleware wraps the handler produced so far, so the last
//! middleware listed ends up outermost:
//!
//! ```text
//! apply_middlewares(base, [logger, auth])
//!     == auth(logger(base))
//!
//! Request → auth → logger → base
//! ```
//!
//! Chains are built once at startup and are immutable afterwards. Building a
//! chain has no side effects beyond a debug log line; all behaviour happens
//! per request inside the produced handler.

use crate::middleware::{Middleware, Next};
use serene_core::{BoxFuture, BoxedHandler, Context, Handler, Request, Response};
use std::sync::Arc;

/// A type-erased middleware that can be stored in a vector.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// A handler wrapped by one middleware.
struct Wrapped {
    middleware: BoxedMiddleware,
    inner: BoxedHandler,
}

impl Handler for Wrapped {
    fn call(&self, ctx: Context, request: Request) -> BoxFuture<'_, Response> {
        self.middleware
            .process(ctx, request, Next::new(self.inner.as_ref()))
    }
}

/// Applies a list of middleware to a base handler.
///
/// Starting from `base`, each middleware wraps the current handler in list
/// order. The returned handler runs the last-listed middleware first. An
/// empty list returns `base` unchanged.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use serene_core::{handler_fn, BoxedHandler, Context, Request, Response, ResponseExt};
/// use serene_middleware::{apply_middlewares, BoxedMiddleware, FnMiddleware};
/// use http::StatusCode;
///
/// let base: BoxedHandler = Arc::new(handler_fn(|_ctx: Context, _req: Request| async {
///     Response::text(StatusCode::OK, "OK")
/// }));
///
/// let logger: BoxedMiddleware = Arc::new(FnMiddleware::new("logger", |ctx, req: Request, next| {
///     Box::pin(async move {
///         tracing::info!(path = %req.uri().path(), "request received");
///         next.run(ctx, req).await
///     })
/// }));
///
/// let handler = apply_middlewares(base, vec![logger]);
/// ```
pub fn apply_middlewares<I>(base: BoxedHandler, middlewares: I) -> BoxedHandler
where
    I: IntoIterator<Item = BoxedMiddleware>,
{
    let mut handler = base;
    let mut names = Vec::new();

    for middleware in middlewares {
        names.push(middleware.name());
        handler = Arc::new(Wrapped {
            middleware,
            inner: handler,
        });
    }

    tracing::debug!(middlewares = ?names, "middleware chain built");
    handler
}

/// Builder form of [`apply_middlewares`].
///
/// Middleware added later wraps middleware added earlier, exactly as with
/// [`apply_middlewares`].
///
/// # Example
///
/// ```
/// use serene_core::{handler_fn, Context, Request, Response, ResponseExt};
/// use serene_middleware::{ChainBuilder, FnMiddleware};
/// use http::StatusCode;
///
/// let base = handler_fn(|_ctx: Context, _req: Request| async {
///     Response::text(StatusCode::OK, "OK")
/// });
///
/// let builder = ChainBuilder::new(base)
///     .with(FnMiddleware::new("inner", |ctx, req, next| Box::pin(next.run(ctx, req))))
///     .with(FnMiddleware::new("outer", |ctx, req, next| Box::pin(next.run(ctx, req))));
///
/// assert_eq!(builder.names(), vec!["inner", "outer"]);
/// let handler = builder.build();
/// ```
pub struct ChainBuilder {
    base: BoxedHandler,
    middlewares: Vec<BoxedMiddleware>,
}

impl ChainBuilder {
    /// Starts a chain from the given base handler.
    pub fn new<H: Handler>(base: H) -> Self {
        Self::from_boxed(Arc::new(base))
    }

    /// Starts a chain from an already shared base handler.
    #[must_use]
    pub fn from_boxed(base: BoxedHandler) -> Self {
        Self {
            base,
            middlewares: Vec::new(),
        }
    }

    /// Adds a middleware around everything added so far.
    #[must_use]
    pub fn with<M: Middleware>(self, middleware: M) -> Self {
        self.with_boxed(Arc::new(middleware))
    }

    /// Adds an already shared middleware.
    #[must_use]
    pub fn with_boxed(mut self, middleware: BoxedMiddleware) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// Returns the middleware names in declaration order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.middlewares.iter().map(|m| m.name()).collect()
    }

    /// Returns the number of middleware added.
    #[must_use]
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Returns true if no middleware was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Composes the chain into a single handler.
    #[must_use]
    pub fn build(self) -> BoxedHandler {
        apply_middlewares(self.base, self.middlewares)
    }
}

impl std::fmt::Debug for ChainBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainBuilder")
            .field("middlewares", &self.names())
            .finish_non_exhaustive()
    }
}
