//! Navigation tab API endpoints.

use std::collections::HashSet;

use axum::extract::{Path, State};

use super::{error, success, ApiJson, ApiResult};
use crate::auth::AdminAccess;
use crate::errors::AppError;
use crate::models::{MoveRequest, TabConfig, TabsDocument};
use crate::AppState;

/// GET /api/tabs - Tabs sorted by order.
pub async fn list_tabs(State(state): State<AppState>) -> ApiResult<Vec<TabConfig>> {
    let revision_id = state.repo.revision::<TabsDocument>().await.unwrap_or(0);

    match state.repo.load::<TabsDocument>().await {
        Ok(loaded) => success(loaded.value.tabs, loaded.revision),
        Err(e) => error(e, revision_id),
    }
}

fn validate_tabs(tabs: &[TabConfig]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for (index, tab) in tabs.iter().enumerate() {
        for (field, value) in [("id", &tab.id), ("label", &tab.label), ("icon", &tab.icon)] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!(
                    "tabs[{}].{} is required",
                    index, field
                )));
            }
        }
        if !seen.insert(tab.id.as_str()) {
            return Err(AppError::Validation(format!("Duplicate tab id: {}", tab.id)));
        }
    }
    Ok(())
}

/// POST /api/tabs - Replace the tab configuration.
pub async fn save_tabs(
    _admin: AdminAccess,
    State(state): State<AppState>,
    ApiJson(mut document): ApiJson<TabsDocument>,
) -> ApiResult<Vec<TabConfig>> {
    let revision_id = state.repo.revision::<TabsDocument>().await.unwrap_or(0);

    if let Err(e) = validate_tabs(&document.tabs) {
        return error(e, revision_id);
    }
    document.renumber();

    match state.repo.replace(&document).await {
        Ok(revision) => success(document.tabs, revision),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/tabs/:id/move - Move a tab one position and renumber.
pub async fn move_tab(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<MoveRequest>,
) -> ApiResult<Vec<TabConfig>> {
    let revision_id = state.repo.revision::<TabsDocument>().await.unwrap_or(0);

    let result = state
        .repo
        .mutate(|document: &mut TabsDocument| {
            document
                .move_tab(&id, request.direction)
                .ok_or_else(|| AppError::NotFound(format!("Tab {} not found", id)))?;
            Ok(document.tabs.clone())
        })
        .await;

    match result {
        Ok((tabs, revision)) => success(tabs, revision),
        Err(e) => error(e, revision_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::StoredDocument;

    #[test]
    fn test_validate_tabs() {
        let mut doc = TabsDocument::default_document();
        assert!(validate_tabs(&doc.tabs).is_ok());

        doc.tabs[3].icon = String::new();
        assert_eq!(
            validate_tabs(&doc.tabs).unwrap_err().message(),
            "tabs[3].icon is required"
        );
    }
}
