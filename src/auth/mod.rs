//! PSK-based authentication for admin routes.
//!
//! Implements constant-time comparison to mitigate timing attacks.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;

use crate::errors::{codes, ErrorDetails, ErrorResponse};
use crate::AppState;

/// Header name for the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Proof that the request carried the admin key.
///
/// Add as a handler argument to guard a route. When no PSK is configured
/// every request passes.
#[derive(Debug, Clone, Copy)]
pub struct AdminAccess;

impl FromRequestParts<AppState> for AdminAccess {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if is_authorized(state.config.api_psk.as_deref(), &parts.headers) {
            Ok(AdminAccess)
        } else {
            tracing::debug!(path = %parts.uri.path(), "Rejected admin request");
            Err(unauthorized_response(
                if provided_key(&parts.headers).is_some() {
                    "Invalid API key"
                } else {
                    "Missing or invalid API key"
                },
            ))
        }
    }
}

/// Check the request headers against the expected PSK.
///
/// Accepts `x-api-key: <key>` or `Authorization: Bearer <key>`.
pub fn is_authorized(expected_psk: Option<&str>, headers: &HeaderMap) -> bool {
    // If no PSK is configured, allow all requests (dev mode)
    let Some(expected) = expected_psk else {
        return true;
    };

    match provided_key(headers) {
        Some(provided) => constant_time_compare(provided, expected),
        None => false,
    }
}

fn provided_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
        })
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Create an unauthorized response.
pub fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorDetails {
            code: codes::UNAUTHORIZED.to_string(),
            message: message.to_string(),
            details: None,
        },
        revision_id: 0,
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
