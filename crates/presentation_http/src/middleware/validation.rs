//! Request validation
//!
//! Provides a `ValidatedJson` extractor that validates request bodies with
//! the validator crate and reports failures through the failure taxonomy:
//! malformed JSON is `BadRequest`, a body that parses but fails validation
//! is `Validation` with one issue per offending field.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use domain::{FieldIssue, ServiceError};

use crate::error::ApiError;

/// A JSON extractor that also validates the request body
///
/// Use this instead of `Json<T>` when you want automatic validation
/// of the request body using the `validator` crate.
///
/// # Example
///
/// ```ignore
/// use validator::Validate;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, Validate)]
/// struct MyRequest {
///     #[validate(email(message = "invalid format"))]
///     email: String,
/// }
///
/// async fn handler(ValidatedJson(req): ValidatedJson<MyRequest>) {
///     // req is validated
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| ServiceError::bad_request(e.to_string()))?;

        value.validate().map_err(|e| {
            let issues: Vec<FieldIssue> = e
                .field_errors()
                .iter()
                .flat_map(|(field, errors)| {
                    errors.iter().map(|error| {
                        FieldIssue::new(
                            field.to_string(),
                            error
                                .message
                                .as_ref()
                                .map_or_else(|| error.code.to_string(), ToString::to_string),
                        )
                    })
                })
                .collect();

            ServiceError::validation("Validation failed", issues)
        })?;

        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, http::StatusCode, routing::post};
    use infrastructure::{
        BufferSink, Environment, LogFormat, LogLevel, Logger, ServiceMetadata,
    };
    use serde::Deserialize;
    use std::sync::Arc;
    use tower::ServiceExt;
    use validator::Validate;

    use super::*;
    use crate::middleware::ErrorTranslationLayer;

    #[derive(Debug, Deserialize, Validate)]
    struct TestRequest {
        #[validate(email(message = "invalid format"))]
        email: String,
    }

    async fn test_handler(ValidatedJson(req): ValidatedJson<TestRequest>) -> String {
        req.email
    }

    fn create_test_app() -> Router {
        let logger = Arc::new(Logger::new(
            ServiceMetadata {
                service: "groundwork".to_string(),
                version: "0.1.0".to_string(),
                environment: "development".to_string(),
            },
            LogLevel::Error,
            LogFormat::Json,
            Arc::new(BufferSink::new()),
        ));
        Router::new()
            .route("/test", post(test_handler))
            .layer(ErrorTranslationLayer::new(logger, Environment::Development))
    }

    async fn post_json(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/test")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, json)
    }

    #[tokio::test]
    async fn valid_request_passes() {
        let (status, _) = post_json(create_test_app(), r#"{"email": "a@example.com"}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_email_rejected_with_field_issue() {
        let (status, body) =
            post_json(create_test_app(), r#"{"email": "not-an-email"}"#).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "Validation");
        assert_eq!(
            body["error"]["details"],
            serde_json::json!([{"field": "email", "issue": "invalid format"}])
        );
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (status, body) = post_json(create_test_app(), r#"{"email": not json}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BadRequest");
    }
}
