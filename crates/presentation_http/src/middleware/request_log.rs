//! Request logging middleware
//!
//! Emits one record when a request enters the chain and one when it
//! completes, success or failure alike, with the final status and total
//! latency. Sits between request-id injection (so records carry the
//! correlation id) and error translation (so the completion record sees
//! the translated status).

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Instant,
};

use axum::{body::Body, extract::Request, response::Response};
use tower::{Layer, Service};

use infrastructure::{Logger, RequestContext, field_value};

/// Layer that adds request logging to HTTP services
#[derive(Debug, Clone)]
pub struct RequestLogLayer {
    logger: Arc<Logger>,
}

impl RequestLogLayer {
    /// Create a layer logging through the given logger
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }
}

impl<S> Layer<S> for RequestLogLayer {
    type Service = RequestLogService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLogService {
            inner,
            logger: self.logger.clone(),
        }
    }
}

/// Service that logs request start and completion
#[derive(Debug, Clone)]
pub struct RequestLogService<S> {
    inner: S,
    logger: Arc<Logger>,
}

impl<S> Service<Request<Body>> for RequestLogService<S>
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
        let method = request.method().to_string();
        let path = request.uri().path().to_string();
        let context = request.extensions().get::<RequestContext>().cloned();

        let mut inner = self.inner.clone();
        let logger = self.logger.clone();

        Box::pin(async move {
            let stage_start = Instant::now();
            logger.info(
                "request started",
                &[
                    ("method", field_value(&method)),
                    ("path", field_value(&path)),
                ],
            );

            let response = inner.call(request).await?;

            // Total latency from chain entry; fall back to this stage's
            // clock if the request-id stage was not in front of us
            let duration_ms = context.as_ref().map_or_else(
                || stage_start.elapsed().as_millis(),
                |ctx| ctx.elapsed().as_millis(),
            );

            logger.info(
                "request completed",
                &[
                    ("method", field_value(&method)),
                    ("path", field_value(&path)),
                    ("status", field_value(response.status().as_u16())),
                    ("duration_ms", field_value(duration_ms as u64)),
                ],
            );
            logger.debug(
                "stage completed",
                &[
                    ("stage", field_value("request_log")),
                    ("elapsed_ms", field_value(stage_start.elapsed().as_millis() as u64)),
                ],
            );

            Ok(response)
        })
    }
}
