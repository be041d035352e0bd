//! Dependency status endpoint.
//!
//! [`HealthzHandler`] answers `/status` with a JSON document listing every
//! registered dependency and an aggregate status. The aggregate is `"KO"` as
//! soon as one check fails, `"OK"` otherwise.
//!
//! ```text
//! {"dependencies":[{"name":"postgres","status":"up"}],"status":"OK"}
//! ```
//!
//! # Example
//!
//! ```rust
//! use serene_healthz::{Dependency, HealthzHandler};
//!
//! let healthz = HealthzHandler::new()
//!     .check(|| (Dependency::new("postgres").with_status("up"), true))
//!     .check(|| (Dependency::new("redis").with_status("timeout"), false));
//!
//! let status = healthz.status();
//! assert!(!status.is_ok());
//! assert_eq!(status.dependencies.len(), 2);
//! ```

#![doc(html_root_url = "https://docs.rs/serene-healthz/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use http::StatusCode;
use serde::{Deserialize, Serialize};
use serene_core::{BoxFuture, Context, Handler, Request, Response, ResponseExt};
use std::sync::Arc;

/// Path served by [`HealthzHandler`].
pub const STATUS_PATH: &str = "/status";

/// Aggregate status when every check passes.
pub const STATUS_OK: &str = "OK";

/// Aggregate status when at least one check fails.
pub const STATUS_KO: &str = "KO";

/// One dependency as reported by its check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dependency {
    /// Dependency name.
    pub name: String,

    /// Free-form status detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Dependency {
    /// Creates a dependency without status detail.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: None,
        }
    }

    /// Sets the status detail.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// The document served at [`STATUS_PATH`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Status {
    /// Check results in registration order.
    pub dependencies: Vec<Dependency>,

    /// `"OK"` or `"KO"`.
    pub status: String,
}

impl Status {
    /// Returns true if every check passed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// A dependency check: reports the dependency and whether it is healthy.
pub type DependencyCheck = Arc<dyn Fn() -> (Dependency, bool) + Send + Sync>;

/// Serves the dependency status document.
#[derive(Clone, Default)]
pub struct HealthzHandler {
    checks: Vec<DependencyCheck>,
}

impl std::fmt::Debug for HealthzHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthzHandler")
            .field("checks", &self.checks.len())
            .finish()
    }
}

impl HealthzHandler {
    /// Creates a handler with no checks; its status is always `"OK"`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a check. Checks run in registration order.
    #[must_use]
    pub fn check<F>(mut self, check: F) -> Self
    where
        F: Fn() -> (Dependency, bool) + Send + Sync + 'static,
    {
        self.checks.push(Arc::new(check));
        self
    }

    /// Runs every check and aggregates the results.
    #[must_use]
    pub fn status(&self) -> Status {
        let mut healthy = true;
        let dependencies = self
            .checks
            .iter()
            .map(|check| {
                let (dependency, ok) = check();
                healthy &= ok;
                dependency
            })
            .collect();

        Status {
            dependencies,
            status: if healthy { STATUS_OK } else { STATUS_KO }.to_string(),
        }
    }
}

impl Handler for HealthzHandler {
    fn call(&self, _ctx: Context, request: Request) -> BoxFuture<'_, Response> {
        Box::pin(async move {
            if request.uri().path() != STATUS_PATH {
                return Response::error(StatusCode::NOT_FOUND, "Not Found");
            }
            let status = self.status();
            if !status.is_ok() {
                tracing::warn!(
                    dependencies = status.dependencies.len(),
                    "Dependency check reported KO"
                );
            }
            Response::json(StatusCode::OK, &status)
        })
    }
}
