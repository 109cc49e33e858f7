//! Error-to-HTTP response conversion.
//!
//! Wraps [`report_media_common::Error`] so route handlers can return
//! `Result<T, AppError>` and get the right status and JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Extension;
use report_media_common::Error;
use serde_json::json;

use super::request_id::RequestId;

/// Wrapper so we can implement `IntoResponse` for an external type.
pub struct AppError {
    inner: Error,
    request_id: Option<String>,
}

impl AppError {
    pub fn new(inner: Error) -> Self {
        Self {
            inner,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, id: Option<String>) -> Self {
        self.request_id = id;
        self
    }

    /// Build an error tagged with the id the middleware assigned to the
    /// request, when there is one.
    pub fn for_request(inner: Error, request_id: Option<&Extension<RequestId>>) -> Self {
        Self::new(inner).with_request_id(request_id.map(|Extension(RequestId(id))| id.clone()))
    }
}

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if !self.inner.is_client_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                request_id = ?self.request_id,
                "Server error in API handler"
            );
        } else {
            tracing::debug!(
                status = %status,
                error = %self.inner,
                request_id = ?self.request_id,
                "Rejected request"
            );
        }

        let body = json!({
            "error": self.inner.to_string(),
            "code": self.inner.code(),
            "request_id": self.request_id,
        });

        (status, axum::Json(body)).into_response()
    }
}
