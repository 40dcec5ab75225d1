//! # AppError
//!
//! Centralized error handling for Wanderlust.
//! Every failure a handler or validator can raise ends up as one of these,
//! and each one knows the HTTP status it answers with.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// The primary error type for all wl-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Listing, Review)
    #[error("{0} not found with ID {1}")]
    NotFound(&'static str, String),

    /// No route matched the request
    #[error("Page Not Found!")]
    PageNotFound,

    /// Request payload failed its schema
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// A path segment that should hold an identifier does not parse as one
    #[error("malformed {0} id: {1}")]
    MalformedId(&'static str, String),

    /// Infrastructure failure (e.g., DB down, template failure)
    #[error("internal service error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Numeric HTTP status code for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::NotFound(..) | AppError::PageNotFound => 404,
            AppError::Validation(_) => 400,
            AppError::MalformedId(..) | AppError::Internal(_) => 500,
        }
    }

    /// Message that may be shown to the client.
    ///
    /// Server-side failures return `None`; their detail belongs in the logs,
    /// and the error page falls back to its generic text.
    pub fn public_message(&self) -> Option<String> {
        match self {
            AppError::MalformedId(..) | AppError::Internal(_) => None,
            other => Some(other.to_string()),
        }
    }
}
