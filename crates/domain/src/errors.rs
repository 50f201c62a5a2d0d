//! Failure taxonomy
//!
//! A closed set of failure kinds raised anywhere in the service and
//! converted to a wire response in exactly one place (the HTTP error
//! translation stage). Constructed once, never mutated.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field-level validation problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// Name of the offending field
    pub field: String,
    /// What was wrong with it
    pub issue: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, issue: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            issue: issue.into(),
        }
    }
}

/// The closed set of failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    BadRequest,
    Unauthorized,
    Forbidden,
    Conflict,
    Validation,
    Internal,
}

impl ErrorKind {
    /// Stable identifier used as the wire-level error code
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::BadRequest => "BadRequest",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::Conflict => "Conflict",
            Self::Validation => "Validation",
            Self::Internal => "Internal",
        }
    }

    /// Whether the failure is attributable to the caller (4xx class)
    #[must_use]
    pub const fn is_client_error(self) -> bool {
        !matches!(self, Self::Internal)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while serving a request
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// Referenced resource absent
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// Malformed caller input
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not permitted
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// State conflict, e.g. a duplicate
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Input failed schema or semantic validation; carries field detail
    #[error("{message}")]
    Validation {
        message: String,
        issues: Vec<FieldIssue>,
    },

    /// Unexpected or unclassified failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Create a not found error
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create a validation error with field-level issues
    pub fn validation(message: impl Into<String>, issues: Vec<FieldIssue>) -> Self {
        Self::Validation {
            message: message.into(),
            issues,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// The category this failure belongs to
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Structured detail payload, when the variant carries one
    #[must_use]
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::Validation { issues, .. } => serde_json::to_value(issues).ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_creates_correct_error() {
        let err = ServiceError::not_found("User", "123");
        match err {
            ServiceError::NotFound { resource, id } => {
                assert_eq!(resource, "User");
                assert_eq!(id, "123");
            },
            _ => unreachable!("Expected NotFound error"),
        }
    }

    #[test]
    fn not_found_error_message_is_correct() {
        let err = ServiceError::not_found("User", "123");
        assert_eq!(err.to_string(), "User not found: 123");
    }

    #[test]
    fn bad_request_error_message() {
        let err = ServiceError::bad_request("missing body");
        assert_eq!(err.to_string(), "Bad request: missing body");
    }

    #[test]
    fn unauthorized_error_message() {
        let err = ServiceError::Unauthorized("missing token".to_string());
        assert_eq!(err.to_string(), "Unauthorized: missing token");
    }

    #[test]
    fn forbidden_error_message() {
        let err = ServiceError::Forbidden("admin only".to_string());
        assert_eq!(err.to_string(), "Forbidden: admin only");
    }

    #[test]
    fn conflict_error_message() {
        let err = ServiceError::Conflict("duplicate name".to_string());
        assert_eq!(err.to_string(), "Conflict: duplicate name");
    }

    #[test]
    fn validation_error_message_is_bare() {
        let err = ServiceError::validation("Validation failed", vec![]);
        assert_eq!(err.to_string(), "Validation failed");
    }

    #[test]
    fn internal_error_message() {
        let err = ServiceError::internal("unexpected");
        assert_eq!(err.to_string(), "Internal error: unexpected");
    }

    #[test]
    fn kind_covers_every_variant() {
        assert_eq!(
            ServiceError::not_found("User", "1").kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ServiceError::bad_request("x").kind(),
            ErrorKind::BadRequest
        );
        assert_eq!(
            ServiceError::Unauthorized("x".into()).kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            ServiceError::Forbidden("x".into()).kind(),
            ErrorKind::Forbidden
        );
        assert_eq!(
            ServiceError::Conflict("x".into()).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            ServiceError::validation("x", vec![]).kind(),
            ErrorKind::Validation
        );
        assert_eq!(ServiceError::internal("x").kind(), ErrorKind::Internal);
    }

    #[test]
    fn kind_as_str_matches_wire_codes() {
        assert_eq!(ErrorKind::NotFound.as_str(), "NotFound");
        assert_eq!(ErrorKind::BadRequest.as_str(), "BadRequest");
        assert_eq!(ErrorKind::Unauthorized.as_str(), "Unauthorized");
        assert_eq!(ErrorKind::Forbidden.as_str(), "Forbidden");
        assert_eq!(ErrorKind::Conflict.as_str(), "Conflict");
        assert_eq!(ErrorKind::Validation.as_str(), "Validation");
        assert_eq!(ErrorKind::Internal.as_str(), "Internal");
    }

    #[test]
    fn only_internal_is_server_error() {
        assert!(ErrorKind::NotFound.is_client_error());
        assert!(ErrorKind::Validation.is_client_error());
        assert!(!ErrorKind::Internal.is_client_error());
    }

    #[test]
    fn validation_details_serialize_field_issues() {
        let err = ServiceError::validation(
            "Validation failed",
            vec![FieldIssue::new("email", "invalid format")],
        );
        let details = err.details().unwrap();
        assert_eq!(
            details,
            serde_json::json!([{"field": "email", "issue": "invalid format"}])
        );
    }

    #[test]
    fn non_validation_errors_have_no_details() {
        assert!(ServiceError::internal("x").details().is_none());
        assert!(ServiceError::not_found("User", "1").details().is_none());
    }

    #[test]
    fn field_issue_round_trips_through_json() {
        let issue = FieldIssue::new("email", "invalid format");
        let json = serde_json::to_string(&issue).unwrap();
        let parsed: FieldIssue = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, issue);
    }

    #[test]
    fn service_error_is_cloneable() {
        let err = ServiceError::validation("v", vec![FieldIssue::new("a", "b")]);
        let cloned = err.clone();
        assert_eq!(cloned.to_string(), err.to_string());
        assert_eq!(cloned.kind(), err.kind());
    }
}
