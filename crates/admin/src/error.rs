//! Unified error handling for admin.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::supabase::RemoteError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Remote backend operation failed (tables, storage, or auth).
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Input rejected before any remote call was made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced product or order absent from the cache.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operator is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Remote(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "Admin request error");
        }

        let status = match &self {
            Self::Remote(RemoteError::Unauthorized(_) | RemoteError::NoSession)
            | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Remote(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
        };

        // Everything is surfaced to the operator directly; there is exactly
        // one admin and nothing to hide from them.
        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}
