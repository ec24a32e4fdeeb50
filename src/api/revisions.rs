//! Revision endpoint for change polling.

use std::collections::BTreeMap;

use axum::extract::State;

use super::{error, success, ApiResult};
use crate::AppState;

/// GET /api/revisions - Current revision of every stored document.
///
/// The envelope's `revisionId` is the highest of them.
pub async fn get_revisions(State(state): State<AppState>) -> ApiResult<BTreeMap<String, i64>> {
    match state.repo.revisions().await {
        Ok(revisions) => {
            let latest = revisions.values().copied().max().unwrap_or(0);
            success(revisions, latest)
        }
        Err(e) => error(e, 0),
    }
}
