//! Venue API endpoints.

use axum::extract::State;

use super::{error, success, ApiJson, ApiResult};
use crate::auth::AdminAccess;
use crate::errors::AppError;
use crate::models::VenueInfo;
use crate::AppState;

/// GET /api/venue - Venue details.
pub async fn get_venue(State(state): State<AppState>) -> ApiResult<VenueInfo> {
    let revision_id = state.repo.revision::<VenueInfo>().await.unwrap_or(0);

    match state.repo.load::<VenueInfo>().await {
        Ok(loaded) => success(loaded.value, loaded.revision),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/venue - Replace the venue details.
pub async fn save_venue(
    _admin: AdminAccess,
    State(state): State<AppState>,
    ApiJson(venue): ApiJson<VenueInfo>,
) -> ApiResult<VenueInfo> {
    let revision_id = state.repo.revision::<VenueInfo>().await.unwrap_or(0);

    if venue.name.trim().is_empty() {
        return error(
            AppError::Validation("Venue name is required".to_string()),
            revision_id,
        );
    }

    match state.repo.replace(&venue).await {
        Ok(revision) => success(venue, revision),
        Err(e) => error(e, revision_id),
    }
}
