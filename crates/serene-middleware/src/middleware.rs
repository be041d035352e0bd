//! Core middleware trait and types.
//!
//! This module defines the [`Middleware`] trait that every middleware
//! implements. Middleware receives the request context and the request,
//! may derive a new context, and hands both to [`Next`].
//!
//! # Example
//!
//! ```
//! use serene_core::{BoxFuture, Context, Request, Response};
//! use serene_middleware::{Middleware, Next};
//!
//! struct Timing;
//!
//! impl Middleware for Timing {
//!     fn name(&self) -> &'static str {
//!         "timing"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         ctx: Context,
//!         request: Request,
//!         next: Next<'a>,
//!     ) -> BoxFuture<'a, Response> {
//!         Box::pin(async move {
//!             let start = std::time::Instant::now();
//!             let response = next.run(ctx, request).await;
//!             tracing::debug!(elapsed = ?start.elapsed(), "request timed");
//!             response
//!         })
//!     }
//! }
//! ```

use serene_core::{BoxFuture, Context, Handler, Request, Response};

/// The core middleware trait.
///
/// # Invariants
///
/// - Middleware MUST call `next.run()` at most once
/// - Not calling `next.run()` short-circuits the chain
/// - Middleware SHOULD NOT suppress responses from downstream
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name of this middleware.
    ///
    /// This name is used for logging and debugging.
    fn name(&self) -> &'static str;

    /// Process the request through this middleware.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The request context as seen by this layer
    /// * `request` - The incoming HTTP request
    /// * `next` - Callback invoking the wrapped handler
    fn process<'a>(
        &'a self,
        ctx: Context,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response>;
}

/// Callback invoking the handler wrapped by a middleware.
///
/// `run` consumes `self`, so the wrapped handler can be reached only once.
pub struct Next<'a> {
    handler: &'a dyn Handler,
}

impl<'a> Next<'a> {
    /// Creates a `Next` that invokes the given handler.
    pub fn new(handler: &'a dyn Handler) -> Self {
        Self { handler }
    }

    /// Invokes the wrapped handler with the given context.
    pub async fn run(self, ctx: Context, request: Request) -> Response {
        self.handler.call(ctx, request).await
    }
}

impl std::fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}

/// A middleware created from a closure.
///
/// The closure returns a boxed future borrowing [`Next`], which keeps the
/// closure free to await the rest of the chain.
///
/// # Example
///
/// ```
/// use serene_middleware::FnMiddleware;
///
/// let middleware = FnMiddleware::new("passthrough", |ctx, req, next| {
///     Box::pin(async move { next.run(ctx, req).await })
/// });
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F>
where
    F: for<'a> Fn(Context, Request, Next<'a>) -> BoxFuture<'a, Response> + Send + Sync + 'static,
{
    /// Creates a new function-based middleware.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(Context, Request, Next<'a>) -> BoxFuture<'a, Response> + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(
        &'a self,
        ctx: Context,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        (self.func)(ctx, request, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{Request as HttpRequest, StatusCode};
    use http_body_util::Full;
    use serene_core::{handler_fn, ResponseExt};

    #[derive(Debug, Clone, PartialEq)]
    struct Visited(&'static str);

    struct TestMiddleware {
        name: &'static str,
    }

    impl Middleware for TestMiddleware {
        fn name(&self) -> &'static str {
            self.name
        }

        fn process<'a>(
            &'a self,
            ctx: Context,
            request: Request,
            next: Next<'a>,
        ) -> BoxFuture<'a, Response> {
            Box::pin(async move {
                // Record that this middleware was called
                let ctx = ctx.with_value(Visited(self.name));
                next.run(ctx, request).await
            })
        }
    }

    fn create_test_request() -> Request {
        HttpRequest::builder()
            .uri("/test")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[test]
    fn test_middleware_name() {
        let mw = TestMiddleware { name: "test" };
        assert_eq!(mw.name(), "test");
    }

    #[tokio::test]
    async fn test_next_runs_handler() {
        let handler = handler_fn(|_ctx: Context, _req: Request| async {
            Response::text(StatusCode::OK, "OK")
        });

        let response = Next::new(&handler)
            .run(Context::new(), create_test_request())
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_middleware_passes_derived_context() {
        let mw = TestMiddleware { name: "first" };
        let handler = handler_fn(|ctx: Context, _req: Request| async move {
            match ctx.value::<Visited>() {
                Some(Visited(name)) => Response::text(StatusCode::OK, name),
                None => Response::error(StatusCode::INTERNAL_SERVER_ERROR, "missing"),
            }
        });

        let response = mw
            .process(Context::new(), create_test_request(), Next::new(&handler))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_fn_middleware_can_short_circuit() {
        let mw = FnMiddleware::new("deny", |_ctx, _req, _next| {
            Box::pin(async { Response::error(StatusCode::FORBIDDEN, "Forbidden") })
        });
        let handler = handler_fn(|_ctx: Context, _req: Request| async {
            Response::text(StatusCode::OK, "OK")
        });

        assert_eq!(mw.name(), "deny");
        let response = mw
            .process(Context::new(), create_test_request(), Next::new(&handler))
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
