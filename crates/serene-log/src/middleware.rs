//! HTTP attribute extraction middleware.
//!
//! [`HttpAttributesMiddleware`] runs the configured extractors against every
//! inbound request, stores the results in the request [`Context`], and
//! optionally logs one summary record once the wrapped handler returns.

use crate::context::{add_ecs_attrs, add_label_attrs};
use crate::extract::{extract_method, Extractor};
use crate::logger::{default_logger, Logger};
use crate::record::Source;
use serene_core::{BoxFuture, Context, Request, Response};
use serene_middleware::{Middleware, Next};
use tracing::Level;

/// Message of the per-request summary record.
pub const REQUEST_HANDLED_MESSAGE: &str = "HTTP Request handled";

/// Configuration for [`HttpAttributesMiddleware`].
///
/// # Example
///
/// ```
/// use serene_log::{extract_header_rename, HttpAttributesConfig};
///
/// let config = HttpAttributesConfig::default()
///     .log_request()
///     .with_default_info()
///     .label_extractor(extract_header_rename("X-Tenant", "tenant"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct HttpAttributesConfig {
    /// Emit a summary record after the handler returns.
    pub log_request: bool,
    /// Extractors feeding the labels store.
    pub label_extractors: Vec<Extractor>,
    /// Extractors feeding the ECS fields store.
    pub ecs_extractors: Vec<Extractor>,
    /// Logger for the summary record; the default logger when unset.
    pub logger: Option<Logger>,
}

impl HttpAttributesConfig {
    /// Enables the summary record.
    #[must_use]
    pub const fn log_request(mut self) -> Self {
        self.log_request = true;
        self
    }

    /// Adds the `http.request.method` ECS field.
    #[must_use]
    pub fn with_default_info(self) -> Self {
        self.ecs_extractor(extract_method())
    }

    /// Appends a label extractor.
    #[must_use]
    pub fn label_extractor(mut self, extractor: Extractor) -> Self {
        self.label_extractors.push(extractor);
        self
    }

    /// Appends an ECS field extractor.
    #[must_use]
    pub fn ecs_extractor(mut self, extractor: Extractor) -> Self {
        self.ecs_extractors.push(extractor);
        self
    }

    /// Sets the logger for the summary record.
    #[must_use]
    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }
}

/// Attaches request attributes to the context of every request.
#[derive(Debug, Clone)]
pub struct HttpAttributesMiddleware {
    config: HttpAttributesConfig,
}

impl HttpAttributesMiddleware {
    /// Creates the middleware.
    #[must_use]
    pub const fn new(config: HttpAttributesConfig) -> Self {
        Self { config }
    }

    /// Runs every extractor and returns the context holding both stores.
    ///
    /// Both stores are attached even when no extractor matched.
    #[must_use]
    pub fn extract(&self, ctx: &Context, request: &Request) -> Context {
        let ecs: Vec<_> = self
            .config
            .ecs_extractors
            .iter()
            .filter_map(|extractor| extractor.extract(request))
            .collect();
        let labels: Vec<_> = self
            .config
            .label_extractors
            .iter()
            .filter_map(|extractor| extractor.extract(request))
            .collect();

        let ctx = add_ecs_attrs(ctx, ecs);
        add_label_attrs(&ctx, labels)
    }

    fn log_handled(&self, ctx: &Context, source: Source) {
        let logger = self.config.logger.clone().unwrap_or_else(default_logger);
        if let Err(e) = logger.log(ctx, Level::INFO, REQUEST_HANDLED_MESSAGE, [], Some(source)) {
            tracing::warn!(error = %e, "Failed to write request summary");
        }
    }
}

impl Middleware for HttpAttributesMiddleware {
    fn name(&self) -> &'static str {
        "http_attributes"
    }

    fn process<'a>(
        &'a self,
        ctx: Context,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        let source = crate::source!();
        Box::pin(async move {
            let ctx = self.extract(&ctx, &request);
            let response = next.run(ctx.clone(), request).await;
            if self.config.log_request {
                self.log_handled(&ctx, source);
            }
            response
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::Attribute;
    use crate::context::{ecs_attrs, has_ecs_store, has_label_store, label_attrs};
    use crate::extract::extract_header_rename;
    use bytes::Bytes;
    use http_body_util::Full;

    fn request() -> Request {
        http::Request::builder()
            .method("PUT")
            .uri("/items/1")
            .header("x-tenant", "acme")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[test]
    fn test_no_extractors_attach_empty_stores() {
        let middleware = HttpAttributesMiddleware::new(HttpAttributesConfig::default());
        let ctx = middleware.extract(&Context::new(), &request());

        assert!(has_label_store(&ctx));
        assert!(has_ecs_store(&ctx));
        assert!(label_attrs(&ctx).is_empty());
        assert!(ecs_attrs(&ctx).is_empty());
    }

    #[test]
    fn test_extractors_feed_their_stores() {
        let config = HttpAttributesConfig::default()
            .with_default_info()
            .label_extractor(extract_header_rename("X-Tenant", "tenant"))
            .label_extractor(extract_header_rename("X-Missing", "missing"));
        let ctx = HttpAttributesMiddleware::new(config).extract(&Context::new(), &request());

        assert_eq!(label_attrs(&ctx).to_vec(), [Attribute::string("tenant", "acme")]);
        assert_eq!(
            ecs_attrs(&ctx).to_vec(),
            [Attribute::string("http.request.method", "PUT")]
        );
    }

    #[test]
    fn test_builder_flags() {
        let config = HttpAttributesConfig::default().log_request().with_default_info();
        assert!(config.log_request);
        assert_eq!(config.ecs_extractors.len(), 1);
        assert!(config.label_extractors.is_empty());
        assert!(config.logger.is_none());
    }
}
