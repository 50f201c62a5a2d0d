//! Uniform error responses
//!
//! Every failure, typed or not, leaves the service as the same envelope:
//!
//! ```json
//! { "error": { "code": "...", "message": "...", "details": ... },
//!   "request_id": "...", "timestamp": "..." }
//! ```
//!
//! Handlers return [`ApiError`]; its `IntoResponse` impl does not build the
//! body itself but stashes the failure in the response extensions, where
//! the error-translation stage picks it up. That keeps a single point of
//! conversion with access to the request's correlation id, and guarantees
//! exactly one envelope per request.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use domain::{ErrorKind, ServiceError};
use infrastructure::Environment;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Message returned for internal failures outside development
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

/// HTTP status for each failure kind
#[must_use]
pub const fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The `error` object inside the envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable failure-kind code
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Structured detail, e.g. field-level validation issues
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// The uniform JSON error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorEnvelope {
    /// Translate a failure into status code and envelope.
    ///
    /// Pure apart from `timestamp`: translating the same failure twice
    /// yields identical content otherwise. Internal failures outside
    /// development get the generic message; the real detail stays
    /// server-side.
    #[must_use]
    pub fn from_error(
        error: &ServiceError,
        request_id: &str,
        environment: Environment,
    ) -> (StatusCode, Self) {
        let kind = error.kind();
        let message = if kind == ErrorKind::Internal && !environment.is_development() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            error.to_string()
        };

        let envelope = Self {
            error: ErrorBody {
                code: kind.as_str().to_string(),
                message,
                details: error.details(),
            },
            request_id: request_id.to_string(),
            timestamp: Utc::now(),
        };
        (status_for(kind), envelope)
    }
}

/// Failure raised by a handler, in flight to the translation stage.
#[derive(Debug, Clone)]
pub(crate) struct StashedError(pub Arc<ServiceError>);

/// Handler-level error type.
///
/// A thin wrapper so `?` works on `ServiceError` (and on `anyhow::Error`,
/// which becomes Internal) in axum handlers.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub ServiceError);

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self(ServiceError::internal(err.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = status_for(self.0.kind()).into_response();
        response
            .extensions_mut()
            .insert(StashedError(Arc::new(self.0)));
        response
    }
}
