//! Handler trait for request processing.
//!
//! A [`Handler`] receives the request [`Context`] together with the request and
//! produces exactly one response. Middleware chains are themselves handlers,
//! so the base handler and a fully wrapped chain are interchangeable.

use crate::context::Context;
use crate::types::{BoxFuture, Request, Response};
use std::future::Future;
use std::sync::Arc;

/// Handles one request and produces one response.
///
/// # Example
///
/// ```
/// use serene_core::{BoxFuture, Context, Handler, Request, Response, ResponseExt};
/// use http::StatusCode;
///
/// struct Hello;
///
/// impl Handler for Hello {
///     fn call(&self, _ctx: Context, _request: Request) -> BoxFuture<'_, Response> {
///         Box::pin(async { Response::text(StatusCode::OK, "hello") })
///     }
/// }
/// ```
pub trait Handler: Send + Sync + 'static {
    /// Handles the request.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The request-scoped context
    /// * `request` - The incoming HTTP request
    fn call(&self, ctx: Context, request: Request) -> BoxFuture<'_, Response>;
}

/// A type-erased, shareable handler.
pub type BoxedHandler = Arc<dyn Handler>;

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn call(&self, ctx: Context, request: Request) -> BoxFuture<'_, Response> {
        (**self).call(ctx, request)
    }
}

/// A handler backed by an async function or closure.
///
/// # Example
///
/// ```
/// use serene_core::{handler_fn, Context, Request, Response, ResponseExt};
/// use http::StatusCode;
///
/// let handler = handler_fn(|_ctx: Context, _req: Request| async {
///     Response::text(StatusCode::OK, "OK")
/// });
/// ```
pub struct FnHandler<F> {
    func: F,
}

impl<F> FnHandler<F> {
    /// Wraps the given function.
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Context, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, ctx: Context, request: Request) -> BoxFuture<'_, Response> {
        Box::pin((self.func)(ctx, request))
    }
}

/// Creates a [`FnHandler`] from an async function or closure.
pub const fn handler_fn<F>(func: F) -> FnHandler<F> {
    FnHandler::new(func)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResponseExt;
    use bytes::Bytes;
    use http::StatusCode;
    use http_body_util::Full;

    fn request() -> Request {
        http::Request::builder()
            .uri("/test")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Marker(&'static str);

    #[tokio::test]
    async fn test_fn_handler_receives_context() {
        let handler = handler_fn(|ctx: Context, _req: Request| async move {
            let marker = ctx.value::<Marker>().map_or("none", |m| m.0);
            Response::text(StatusCode::OK, marker)
        });

        let ctx = Context::new().with_value(Marker("seen"));
        let response = handler.call(ctx, request()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_boxed_handler_delegates() {
        let handler: BoxedHandler = Arc::new(handler_fn(|_ctx: Context, _req: Request| async {
            Response::text(StatusCode::ACCEPTED, "accepted")
        }));

        let response = handler.call(Context::new(), request()).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }
}
