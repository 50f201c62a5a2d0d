//! Request-scoped context propagation
//!
//! The correlation id of the request being handled is carried in a tokio
//! task-local, so the logger can stamp it on records without threading it
//! through every call. Concurrently handled requests each run inside their
//! own scope and never observe each other's id.

use std::time::{Duration, Instant};

use domain::CorrelationId;

tokio::task_local! {
    static CURRENT_CORRELATION: CorrelationId;
}

/// Per-request context created at chain entry and attached to the in-flight
/// request. Discarded when the response is sent.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Correlation identifier for this request
    pub correlation_id: CorrelationId,
    /// When the request entered the middleware chain
    pub start: Instant,
}

impl RequestContext {
    /// Create a context for a request entering the chain now
    pub fn new(correlation_id: CorrelationId) -> Self {
        Self {
            correlation_id,
            start: Instant::now(),
        }
    }

    /// Time elapsed since chain entry
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Run `fut` with `id` as the ambient correlation id.
pub async fn with_correlation<F>(id: CorrelationId, fut: F) -> F::Output
where
    F: Future,
{
    CURRENT_CORRELATION.scope(id, fut).await
}

/// The correlation id of the request currently being handled, if any.
#[must_use]
pub fn current_correlation() -> Option<CorrelationId> {
    CURRENT_CORRELATION.try_with(Clone::clone).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_correlation_outside_a_request() {
        assert!(current_correlation().is_none());
    }

    #[tokio::test]
    async fn correlation_visible_inside_scope() {
        let id = CorrelationId::from_header("abc123").unwrap();
        let seen = with_correlation(id.clone(), async { current_correlation() }).await;
        assert_eq!(seen, Some(id));
    }

    #[tokio::test]
    async fn correlation_cleared_after_scope() {
        let id = CorrelationId::generate();
        with_correlation(id, async {}).await;
        assert!(current_correlation().is_none());
    }

    #[tokio::test]
    async fn concurrent_scopes_are_isolated() {
        let id_a = CorrelationId::from_header("req-a").unwrap();
        let id_b = CorrelationId::from_header("req-b").unwrap();

        let task_a = with_correlation(id_a.clone(), async {
            tokio::task::yield_now().await;
            current_correlation()
        });
        let task_b = with_correlation(id_b.clone(), async {
            tokio::task::yield_now().await;
            current_correlation()
        });

        let (seen_a, seen_b) = tokio::join!(task_a, task_b);
        assert_eq!(seen_a, Some(id_a));
        assert_eq!(seen_b, Some(id_b));
    }

    #[test]
    fn request_context_measures_elapsed() {
        let ctx = RequestContext::new(CorrelationId::generate());
        assert!(ctx.elapsed() < Duration::from_secs(1));
    }
}
