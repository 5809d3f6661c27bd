//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`mf_core::Error`] so that route handlers
//! can return `Result<T, AppError>` directly. Client errors answer with the
//! error text; server errors answer with a crash report.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Detail shown in place of the real message when redaction is on.
const REDACTED_DETAIL: &str = "conversion failed";

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError {
    inner: mf_core::Error,
    redact: bool,
}

impl AppError {
    pub fn new(inner: mf_core::Error) -> Self {
        Self {
            inner,
            redact: false,
        }
    }

    /// Hide the error detail from the crash report body.
    pub fn redacted(mut self, redact: bool) -> Self {
        self.redact = redact;
        self
    }

    /// The plain-text body for a server-side failure.
    pub fn crash_report(&self) -> String {
        let detail = if self.redact {
            REDACTED_DETAIL.to_string()
        } else {
            self.inner.detail()
        };
        format!("CRASH REPORT: {} - {}", self.inner.kind(), detail)
    }
}

impl From<mf_core::Error> for AppError {
    fn from(e: mf_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                kind = self.inner.kind(),
                error = %self.inner,
                "Server error in handler"
            );
            return (status, self.crash_report()).into_response();
        }

        tracing::debug!(status = %status, error = %self.inner, "Rejected request");
        (status, self.inner.to_string()).into_response()
    }
}
