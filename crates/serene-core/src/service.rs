//! Hyper service adapter.
//!
//! [`HandlerService`] lets a host server built on hyper dispatch connections
//! to a [`Handler`]. The request body is buffered before the handler runs and
//! every request starts from an empty [`Context`].
//!
//! ```rust,ignore
//! use hyper::server::conn::http1;
//! use serene_core::HandlerService;
//!
//! let service = HandlerService::new(handler);
//! http1::Builder::new().serve_connection(io, service).await?;
//! ```

use crate::context::Context;
use crate::error::{CoreError, CoreResult};
use crate::handler::{BoxedHandler, Handler};
use crate::types::{BoxFuture, Request, Response, ResponseExt};
use http::StatusCode;
use http_body::Body;
use http_body_util::{BodyExt, Full};
use std::convert::Infallible;
use std::fmt::Display;
use std::sync::Arc;

/// Exposes a [`Handler`] as a `hyper::service::Service`.
#[derive(Clone)]
pub struct HandlerService {
    handler: BoxedHandler,
}

impl HandlerService {
    /// Creates a service dispatching to `handler`.
    pub fn new<H: Handler>(handler: H) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Creates a service from an already shared handler.
    #[must_use]
    pub fn from_boxed(handler: BoxedHandler) -> Self {
        Self { handler }
    }
}

impl std::fmt::Debug for HandlerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerService").finish_non_exhaustive()
    }
}

impl<B> hyper::service::Service<http::Request<B>> for HandlerService
where
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: Display + Send,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn call(&self, request: http::Request<B>) -> Self::Future {
        let handler = Arc::clone(&self.handler);

        Box::pin(async move {
            let method = request.method().clone();
            let path = request.uri().path().to_string();
            tracing::debug!("{} {}", method, path);

            match collect_request(request).await {
                Ok(request) => Ok(handler.call(Context::new(), request).await),
                Err(e) => {
                    tracing::error!(error = %e, %method, %path, "failed to collect request body");
                    Ok(Response::error(StatusCode::BAD_REQUEST, &e.to_string()))
                }
            }
        })
    }
}

/// Buffers the request body.
async fn collect_request<B>(request: http::Request<B>) -> CoreResult<Request>
where
    B: Body,
    B::Error: Display,
{
    let (parts, body) = request.into_parts();
    let collected = body
        .collect()
        .await
        .map_err(|e| CoreError::BodyCollection(e.to_string()))?;
    Ok(http::Request::from_parts(parts, Full::new(collected.to_bytes())))
}
