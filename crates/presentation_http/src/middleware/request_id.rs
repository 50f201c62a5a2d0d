//! Request ID middleware for HTTP request correlation
//!
//! Reuses the caller's `X-Request-Id` header verbatim or generates a new
//! id, attaches the request context, and copies the id onto the outbound
//! response. Runs outermost so the header copy sees the final response,
//! whatever happened inside the chain.

use axum::{body::Body, extract::Request, http::header::HeaderValue, response::Response};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tower::{Layer, Service};
use tracing::Instrument;

use domain::CorrelationId;
use infrastructure::{RequestContext, with_correlation};

/// The header name for the request ID
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Layer that adds request ID handling to HTTP services
#[derive(Debug, Clone, Default)]
pub struct RequestIdLayer;

impl RequestIdLayer {
    /// Create a new request ID layer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Service that extracts or generates a correlation id for each request
#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequestIdService<S>
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

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        // Reuse the caller's id verbatim, or generate a fresh one
        let correlation_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(CorrelationId::from_header)
            .unwrap_or_else(CorrelationId::generate);

        let context = RequestContext::new(correlation_id.clone());
        request.extensions_mut().insert(context);

        let span = tracing::info_span!(
            "http_request",
            request_id = %correlation_id,
            method = %request.method(),
            uri = %request.uri().path(),
        );

        let mut inner = self.inner.clone();
        let header_id = correlation_id.clone();

        Box::pin(
            with_correlation(correlation_id, async move {
                let mut response = inner.call(request).await?;

                // Tag the outbound response with the same id
                if let Ok(value) = HeaderValue::from_str(header_id.as_str()) {
                    response.headers_mut().insert(REQUEST_ID_HEADER, value);
                }

                Ok(response)
            })
            .instrument(span),
        )
    }
}
