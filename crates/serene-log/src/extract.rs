//! Request attribute extractors.
//!
//! An [`Extractor`] inspects an inbound request and either produces one
//! [`Attribute`] or nothing. Extractors are stateless and shared across
//! requests; a missing signal is not an error.

use crate::attr::Attribute;
use crate::ecs::keys;
use serene_core::Request;
use std::sync::Arc;

type ExtractFn = dyn Fn(&Request) -> Option<Attribute> + Send + Sync;

/// Maps a request to an optional attribute.
///
/// # Example
///
/// ```
/// use serene_log::{Attribute, Extractor};
///
/// let path = Extractor::new(|req| Some(Attribute::string("url.path", req.uri().path())));
/// ```
#[derive(Clone)]
pub struct Extractor {
    func: Arc<ExtractFn>,
}

impl Extractor {
    /// Creates an extractor from a function.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Request) -> Option<Attribute> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }

    /// Runs the extractor against a request.
    #[must_use]
    pub fn extract(&self, request: &Request) -> Option<Attribute> {
        (self.func)(request)
    }
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor").finish_non_exhaustive()
    }
}

/// Reads header `name` and stores its value under the key `rename`.
///
/// Header lookup is case-insensitive. Absent, empty, or non-text header
/// values produce nothing.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use http_body_util::Full;
/// use serene_log::extract_header_rename;
///
/// let extractor = extract_header_rename("Authorization", "auth.token");
/// let request = http::Request::builder()
///     .header("authorization", "abc")
///     .body(Full::new(Bytes::new()))
///     .unwrap();
///
/// let attr = extractor.extract(&request).unwrap();
/// assert_eq!(attr.key, "auth.token");
/// assert_eq!(attr.value.as_str(), Some("abc"));
/// ```
pub fn extract_header_rename(name: impl Into<String>, rename: impl Into<String>) -> Extractor {
    let name = name.into();
    let rename = rename.into();
    Extractor::new(move |request| {
        request
            .headers()
            .get(name.as_str())
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(|value| Attribute::string(rename.clone(), value))
    })
}

/// Reads header `name` and stores its value under the same name.
pub fn extract_header(name: impl Into<String>) -> Extractor {
    let name = name.into();
    extract_header_rename(name.clone(), name)
}

/// Produces the ECS `http.request.method` field.
pub fn extract_method() -> Extractor {
    Extractor::new(|request| {
        Some(Attribute::string(
            keys::HTTP_REQUEST_METHOD,
            request.method().as_str(),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::Method;
    use http_body_util::Full;

    fn request_with(headers: &[(&str, &str)]) -> Request {
        let mut builder = http::Request::builder().method(Method::POST).uri("/orders");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Full::new(Bytes::new())).unwrap()
    }

    #[test]
    fn test_header_rename_present() {
        let extractor = extract_header_rename("Authorization", "auth.token");
        let attr = extractor
            .extract(&request_with(&[("Authorization", "abc")]))
            .unwrap();
        assert_eq!(attr, Attribute::string("auth.token", "abc"));
    }

    #[test]
    fn test_header_rename_absent() {
        let extractor = extract_header_rename("Authorization", "auth.token");
        assert!(extractor.extract(&request_with(&[])).is_none());
    }

    #[test]
    fn test_header_rename_empty_value() {
        let extractor = extract_header_rename("x-tenant", "tenant");
        assert!(extractor.extract(&request_with(&[("x-tenant", "")])).is_none());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let extractor = extract_header("X-Request-Id");
        let attr = extractor
            .extract(&request_with(&[("x-request-id", "r-1")]))
            .unwrap();
        assert_eq!(attr.key, "X-Request-Id");
        assert_eq!(attr.value.as_str(), Some("r-1"));
    }

    #[test]
    fn test_method_extractor() {
        let attr = extract_method().extract(&request_with(&[])).unwrap();
        assert_eq!(attr, Attribute::string("http.request.method", "POST"));
    }

    #[test]
    fn test_custom_extractor() {
        let extractor = Extractor::new(|req| Some(Attribute::string("url.path", req.uri().path())));
        let attr = extractor.extract(&request_with(&[])).unwrap();
        assert_eq!(attr.value.as_str(), Some("/orders"));
    }
}
