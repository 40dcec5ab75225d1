//! # Error page
//!
//! The terminal stage of the request pipeline: every failure a handler,
//! extractor, or fallback produces is turned into an HTML error page here
//! and nowhere else.

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use wl_core::error::AppError;
use wl_ui::ErrorTemplate;

/// Shown when a failure carries no client-facing message.
pub const DEFAULT_MESSAGE: &str = "Something Wrong!";

/// A failure on its way to the client.
///
/// Both fields may be missing; rendering falls back to
/// `500 Internal Server Error` and [`DEFAULT_MESSAGE`].
#[derive(Debug, Default)]
pub struct ErrorPage {
    pub status: Option<StatusCode>,
    pub message: Option<String>,
}

/// Result type for handlers.
pub type WebResult<T> = Result<T, ErrorPage>;

impl ErrorPage {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status: Some(status), message: Some(message.into()) }
    }
}

impl From<AppError> for ErrorPage {
    fn from(err: AppError) -> Self {
        let code = err.status_code();
        if code >= 500 {
            tracing::error!(error = %err, "request failed");
        } else {
            tracing::debug!(status = code, error = %err, "request rejected");
        }
        Self {
            status: StatusCode::from_u16(code).ok(),
            message: err.public_message(),
        }
    }
}

impl From<anyhow::Error> for ErrorPage {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err).into()
    }
}

impl IntoResponse for ErrorPage {
    fn into_response(self) -> Response {
        let status = self.status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = self.message.as_deref().unwrap_or(DEFAULT_MESSAGE);

        match (ErrorTemplate { status: status.as_u16(), message }).render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "error page failed to render");
                (status, message.to_string()).into_response()
            }
        }
    }
}
