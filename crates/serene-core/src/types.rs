//! Common types used by handlers and middleware.

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;

/// A boxed future, as returned by handlers and middleware.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The HTTP request type handlers receive.
///
/// This is a standard `http::Request` with a fully buffered body.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type handlers produce.
pub type Response = http::Response<Full<Bytes>>;

/// Extension trait for building common responses.
pub trait ResponseExt {
    /// Creates a plain-text response.
    fn text(status: StatusCode, body: &str) -> Response;

    /// Creates a plain-text error response.
    fn error(status: StatusCode, message: &str) -> Response;

    /// Creates a JSON response from any serializable value.
    ///
    /// Falls back to a `500` plain-text response if serialization fails.
    fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Response;

    /// Creates a JSON error envelope.
    fn json_error(status: StatusCode, code: &str, message: &str) -> Response;
}

impl ResponseExt for Response {
    fn text(status: StatusCode, body: &str) -> Response {
        with_body(
            status,
            "text/plain; charset=utf-8",
            Bytes::from(body.to_string()),
        )
    }

    fn error(status: StatusCode, message: &str) -> Response {
        Self::text(status, message)
    }

    fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Response {
        match serde_json::to_vec(value) {
            Ok(body) => with_body(status, "application/json", Bytes::from(body)),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize JSON response");
                Self::error(StatusCode::INTERNAL_SERVER_ERROR, "serialization error")
            }
        }
    }

    fn json_error(status: StatusCode, code: &str, message: &str) -> Response {
        let body = serde_json::json!({
            "error": {
                "code": code,
                "message": message
            }
        });
        Self::json(status, &body)
    }
}

fn with_body(status: StatusCode, content_type: &'static str, body: Bytes) -> Response {
    let mut response = http::Response::new(Full::new(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_error_response() {
        let response = Response::error(StatusCode::BAD_REQUEST, "Invalid input");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_text_response() {
        let response = Response::text(StatusCode::OK, "hello");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"hello");
    }

    #[tokio::test]
    async fn test_json_response() {
        let response = Response::json(StatusCode::OK, &serde_json::json!({"status": "OK"}));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], br#"{"status":"OK"}"#);
    }

    #[test]
    fn test_json_error_response() {
        let response = Response::json_error(
            StatusCode::UNAUTHORIZED,
            "AUTH_REQUIRED",
            "Authentication required",
        );
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}
