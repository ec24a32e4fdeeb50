//! Sponsor API endpoints.

use std::collections::HashSet;

use axum::extract::State;

use super::{error, success, ApiJson, ApiResult};
use crate::auth::AdminAccess;
use crate::errors::AppError;
use crate::models::{group_by_tier, Sponsor, SponsorTierGroup};
use crate::AppState;

/// GET /api/sponsors - List all sponsors.
pub async fn list_sponsors(State(state): State<AppState>) -> ApiResult<Vec<Sponsor>> {
    let revision_id = state.repo.revision::<Vec<Sponsor>>().await.unwrap_or(0);

    match state.repo.load::<Vec<Sponsor>>().await {
        Ok(loaded) => success(loaded.value, loaded.revision),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/sponsors/tiers - Sponsors grouped by tier, highest first.
pub async fn list_sponsor_tiers(State(state): State<AppState>) -> ApiResult<Vec<SponsorTierGroup>> {
    let revision_id = state.repo.revision::<Vec<Sponsor>>().await.unwrap_or(0);

    match state.repo.load::<Vec<Sponsor>>().await {
        Ok(loaded) => success(group_by_tier(&loaded.value), loaded.revision),
        Err(e) => error(e, revision_id),
    }
}

fn validate_sponsors(sponsors: &[Sponsor]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for (index, sponsor) in sponsors.iter().enumerate() {
        if sponsor.id.trim().is_empty() {
            return Err(AppError::Validation(format!("sponsors[{}].id is required", index)));
        }
        if sponsor.name.trim().is_empty() {
            return Err(AppError::Validation(format!("sponsors[{}].name is required", index)));
        }
        if !seen.insert(sponsor.id.as_str()) {
            return Err(AppError::Validation(format!(
                "Duplicate sponsor id: {}",
                sponsor.id
            )));
        }
    }
    Ok(())
}

/// POST /api/sponsors - Replace the sponsor list.
pub async fn save_sponsors(
    _admin: AdminAccess,
    State(state): State<AppState>,
    ApiJson(sponsors): ApiJson<Vec<Sponsor>>,
) -> ApiResult<Vec<Sponsor>> {
    let revision_id = state.repo.revision::<Vec<Sponsor>>().await.unwrap_or(0);

    if let Err(e) = validate_sponsors(&sponsors) {
        return error(e, revision_id);
    }

    match state.repo.replace(&sponsors).await {
        Ok(revision) => {
            tracing::info!(count = sponsors.len(), "Sponsors saved");
            success(sponsors, revision)
        }
        Err(e) => error(e, revision_id),
    }
}
