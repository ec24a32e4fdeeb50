//! Branding API endpoints.

use axum::extract::State;
use serde_json::Value;

use super::{error, success, ApiJson, ApiResult};
use crate::auth::AdminAccess;
use crate::errors::AppError;
use crate::models::BrandingData;
use crate::AppState;

/// GET /api/branding - Branding merged with defaults.
pub async fn get_branding(State(state): State<AppState>) -> ApiResult<BrandingData> {
    let revision_id = state.repo.revision::<BrandingData>().await.unwrap_or(0);

    match state.repo.load::<BrandingData>().await {
        Ok(loaded) => success(loaded.value, loaded.revision),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/branding - Replace the branding.
pub async fn save_branding(
    _admin: AdminAccess,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<BrandingData> {
    let revision_id = state.repo.revision::<BrandingData>().await.unwrap_or(0);

    // Missing fields would otherwise deserialize to their defaults.
    let branding: BrandingData = match serde_json::from_value(body.clone()) {
        Ok(branding) => branding,
        Err(e) => return error(e.into(), revision_id),
    };
    let absent = ["eventTitle", "eventDate", "eventLocation"]
        .into_iter()
        .find(|field| body.get(*field).is_none());
    if let Some(field) = absent.or_else(|| branding.missing_required_field()) {
        return error(
            AppError::Validation(format!("{} is required", field)),
            revision_id,
        );
    }

    let branding = branding.merged_with_defaults();
    match state.repo.replace(&branding).await {
        Ok(revision) => success(branding, revision),
        Err(e) => error(e, revision_id),
    }
}
