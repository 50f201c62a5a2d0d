//! Route definitions and middleware chain composition

use axum::{Router, http::Uri, routing::get};
use std::sync::Arc;
use tower::ServiceBuilder;

use domain::ServiceError;
use infrastructure::{Environment, Logger};

use crate::error::ApiError;
use crate::middleware::{ErrorTranslationLayer, RequestIdLayer, RequestLogLayer};
use crate::{handlers, state::AppState};

/// Wrap a router in the core middleware chain.
///
/// The order is fixed and significant. `ServiceBuilder` applies the first
/// listed layer outermost:
/// request-id injection must see the final response to tag it, request
/// logging must see the translated status, and error translation must sit
/// directly around the handlers so every failure is caught exactly once.
pub fn apply_middleware(router: Router, logger: &Arc<Logger>, environment: Environment) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(RequestIdLayer::new())
            .layer(RequestLogLayer::new(logger.clone()))
            .layer(ErrorTranslationLayer::new(logger.clone(), environment)),
    )
}

/// Create the main router with all routes and the middleware chain
pub fn create_router(state: AppState) -> Router {
    let logger = state.logger.clone();
    let environment = state.config.environment;

    let router = Router::new()
        .route("/", get(handlers::root::root))
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Unknown paths get the uniform envelope too
        .fallback(fallback)
        .with_state(state);

    apply_middleware(router, &logger, environment)
}

/// Fallback for unmatched routes
async fn fallback(uri: Uri) -> ApiError {
    ApiError(ServiceError::not_found("Route", uri.path()))
}
