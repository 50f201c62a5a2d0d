//! Error translation middleware
//!
//! The single point where failures become wire responses. Typed failures
//! raised by handlers arrive stashed in the response extensions; panics
//! anywhere inside the stage are caught and treated as unclassified
//! failures. Either way the caller receives the uniform envelope, and the
//! real detail is logged server-side.
//!
//! Runs innermost so that the logging stage above records the translated
//! status and the request-id stage above that tags the translated response.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Instant,
};

use axum::{
    Json,
    body::Body,
    extract::Request,
    response::{IntoResponse, Response},
};
use futures::FutureExt;
use tower::{Layer, Service};

use domain::ServiceError;
use infrastructure::{Environment, Logger, RequestContext, field_value};

use crate::error::{ErrorEnvelope, StashedError};

/// Layer that adds error translation to HTTP services
#[derive(Debug, Clone)]
pub struct ErrorTranslationLayer {
    logger: Arc<Logger>,
    environment: Environment,
}

impl ErrorTranslationLayer {
    /// Create a layer translating for the given deployment environment
    pub fn new(logger: Arc<Logger>, environment: Environment) -> Self {
        Self {
            logger,
            environment,
        }
    }
}

impl<S> Layer<S> for ErrorTranslationLayer {
    type Service = ErrorTranslationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ErrorTranslationService {
            inner,
            logger: self.logger.clone(),
            environment: self.environment,
        }
    }
}

/// Service that converts failures into envelope responses
#[derive(Debug, Clone)]
pub struct ErrorTranslationService<S> {
    inner: S,
    logger: Arc<Logger>,
    environment: Environment,
}

impl<S> Service<Request<Body>> for ErrorTranslationService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let request_id = request
            .extensions()
            .get::<RequestContext>()
            .map_or_else(|| "unknown".to_string(), |ctx| ctx.correlation_id.to_string());

        let mut inner = self.inner.clone();
        let logger = self.logger.clone();
        let environment = self.environment;

        Box::pin(async move {
            let stage_start = Instant::now();
            let outcome =
                std::panic::AssertUnwindSafe(async move { inner.call(request).await })
                    .catch_unwind()
                    .await;

            let response = match outcome {
                Ok(Ok(mut response)) => {
                    match response.extensions_mut().remove::<StashedError>() {
                        Some(StashedError(error)) => {
                            log_failure(&logger, &error);
                            translate(&error, &request_id, environment)
                        },
                        None => response,
                    }
                },
                Ok(Err(err)) => return Err(err),
                Err(panic) => {
                    let error = ServiceError::internal(panic_message(panic.as_ref()));
                    log_failure(&logger, &error);
                    translate(&error, &request_id, environment)
                },
            };

            logger.debug(
                "stage completed",
                &[
                    ("stage", field_value("error_translation")),
                    (
                        "elapsed_ms",
                        field_value(stage_start.elapsed().as_millis() as u64),
                    ),
                ],
            );

            Ok(response)
        })
    }
}

/// Build the envelope response for a failure
fn translate(error: &ServiceError, request_id: &str, environment: Environment) -> Response {
    let (status, envelope) = ErrorEnvelope::from_error(error, request_id, environment);
    (status, Json(envelope)).into_response()
}

/// Record the failure server-side, with its full detail.
/// Client-class failures log at WARN, internal ones at ERROR.
fn log_failure(logger: &Logger, error: &ServiceError) {
    let kind = error.kind();
    let fields = [
        ("kind", field_value(kind.as_str())),
        ("message", field_value(error.to_string())),
    ];
    if kind.is_client_error() {
        logger.warn("request failed", &fields);
    } else {
        logger.error("request failed", &fields);
    }
}

/// Best-effort text for a panic payload
fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
