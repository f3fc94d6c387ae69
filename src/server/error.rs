//! HTTP error mapping (spec §7 ambient addition).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::board::{FlipError, MapError};
use crate::boardfile::ParseError;

/// Every façade-level failure funnels through here before becoming a
/// response. `Internal` logs the underlying cause and never leaks it to the
/// caller.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,
    /// A rejected Flip (spec §6/§7: "409 with reason").
    #[error("{0}")]
    Conflict(String),
    /// A malformed request, e.g. a `/reset` that fails to parse its board
    /// file (spec §6: "400 on parse failure").
    #[error("{0}")]
    BadRequest(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<FlipError> for ApiError {
    fn from(err: FlipError) -> Self {
        ApiError::Conflict(err.to_string())
    }
}

impl From<MapError> for ApiError {
    fn from(err: MapError) -> Self {
        match err {
            MapError::EmptyPlayerId => ApiError::BadRequest(err.to_string()),
            MapError::Transform(source) => ApiError::Internal(source),
        }
    }
}

impl From<ParseError> for ApiError {
    fn from(err: ParseError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not found").into_response(),
            ApiError::Conflict(reason) => (StatusCode::CONFLICT, reason).into_response(),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason).into_response(),
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "internal error handling request");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
            }
        }
    }
}
