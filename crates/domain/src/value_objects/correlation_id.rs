//! Correlation identifier propagated through logs and response headers

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An opaque per-request identifier used for tracing.
///
/// Generated identifiers are UUID v4 strings, but inbound values supplied
/// by a caller are kept verbatim, so the type is a string wrapper rather
/// than a `Uuid`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a new collision-resistant identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Reuse an identifier supplied by the caller, verbatim.
    ///
    /// Returns `None` for empty or whitespace-only values.
    pub fn from_header(value: &str) -> Option<Self> {
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value.to_string()))
        }
    }

    /// The identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CorrelationId> for String {
    fn from(id: CorrelationId) -> Self {
        id.0
    }
}
