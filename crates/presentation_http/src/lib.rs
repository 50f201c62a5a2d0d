//! groundwork HTTP presentation layer
//!
//! Middleware chain, uniform error translation and the health endpoints
//! that every service built from this scaffold starts with.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod readiness;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorBody, ErrorEnvelope, INTERNAL_ERROR_MESSAGE};
pub use middleware::{
    ErrorTranslationLayer, REQUEST_ID_HEADER, RequestIdLayer, RequestLogLayer, ValidatedJson,
};
pub use readiness::Readiness;
pub use routes::{apply_middleware, create_router};
pub use state::AppState;
