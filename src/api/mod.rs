//! REST API module.
//!
//! One file per entity. Every JSON response uses the same envelope.

mod agenda;
mod branding;
mod exports;
mod messages;
mod registrations;
mod revisions;
mod sponsors;
mod tabs;
mod uploads;
mod venue;
mod voting;

pub use agenda::*;
pub use branding::*;
pub use exports::*;
pub use messages::*;
pub use registrations::*;
pub use revisions::*;
pub use sponsors::*;
pub use tabs::*;
pub use uploads::*;
pub use venue::*;
pub use voting::*;

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::{AppError, AppErrorWithRevision};

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub revision_id: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, revision_id: i64) -> Self {
        Self {
            success: true,
            data,
            revision_id,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppErrorWithRevision>;

/// JSON request body.
///
/// Same as `Json<T>`, but a body that cannot be read as `T` is answered
/// with a 400 error envelope instead of axum's plain-text rejection.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppErrorWithRevision;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                tracing::debug!(status = %rejection.status(), "Rejected request body");
                Err(AppErrorWithRevision {
                    error: AppError::Validation(rejection.body_text()),
                    revision_id: 0,
                })
            }
        }
    }
}

/// Create a successful API response.
pub fn success<T: Serialize>(data: T, revision_id: i64) -> ApiResult<T> {
    Ok(ApiResponse::new(data, revision_id))
}

/// Create an error API response.
pub fn error<T: Serialize>(err: AppError, revision_id: i64) -> ApiResult<T> {
    Err(AppErrorWithRevision {
        error: err,
        revision_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header, routing::post, Router};
    use serde::Deserialize;
    use serde_json::Value;
    use tower::ServiceExt;

    #[derive(Debug, Serialize, Deserialize)]
    struct Greeting {
        name: String,
        count: u32,
    }

    async fn greet(ApiJson(greeting): ApiJson<Greeting>) -> ApiResult<Greeting> {
        success(greeting, 1)
    }

    async fn call(content_type: Option<&str>, body: &str) -> (StatusCode, Value) {
        let mut request = axum::http::Request::post("/greet");
        if let Some(content_type) = content_type {
            request = request.header(header::CONTENT_TYPE, content_type);
        }
        let request = request.body(Body::from(body.to_string())).unwrap();

        let response = Router::new()
            .route("/greet", post(greet))
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_api_json_accepts_matching_body() {
        let (status, body) = call(Some("application/json"), r#"{"name":"Sam","count":2}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["count"], 2);
    }

    #[tokio::test]
    async fn test_api_json_rejections_use_envelope() {
        let cases = [
            (Some("application/json"), r#"{"name":"Sam"}"#, "count"),
            (Some("application/json"), r#"{"name":"Sam","count":"two"}"#, "count"),
            (Some("application/json"), "{not json", ""),
            (None, r#"{"name":"Sam","count":2}"#, ""),
        ];

        for (content_type, payload, mentions) in cases {
            let (status, body) = call(content_type, payload).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", payload);
            assert_eq!(body["success"], false);
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
            assert_eq!(body["revisionId"], 0);
            assert!(
                body["error"]["message"].as_str().unwrap().contains(mentions),
                "{}",
                body
            );
        }
    }
}
