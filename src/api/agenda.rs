//! Agenda API endpoints.

use axum::extract::{Path, State};

use super::{error, success, ApiJson, ApiResult};
use crate::auth::AdminAccess;
use crate::errors::AppError;
use crate::models::{move_agenda_item, AgendaItem, MoveRequest};
use crate::AppState;

/// GET /api/agenda - The agenda in display order.
pub async fn list_agenda(State(state): State<AppState>) -> ApiResult<Vec<AgendaItem>> {
    let revision_id = state.repo.revision::<Vec<AgendaItem>>().await.unwrap_or(0);

    match state.repo.load::<Vec<AgendaItem>>().await {
        Ok(loaded) => success(loaded.value, loaded.revision),
        Err(e) => error(e, revision_id),
    }
}

fn validate_agenda(items: &[AgendaItem]) -> Result<(), AppError> {
    for (index, item) in items.iter().enumerate() {
        for (field, value) in [("id", &item.id), ("time", &item.time), ("title", &item.title)] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!(
                    "agenda[{}].{} is required",
                    index, field
                )));
            }
        }
    }
    Ok(())
}

/// POST /api/agenda - Replace the agenda.
pub async fn save_agenda(
    _admin: AdminAccess,
    State(state): State<AppState>,
    ApiJson(items): ApiJson<Vec<AgendaItem>>,
) -> ApiResult<Vec<AgendaItem>> {
    let revision_id = state.repo.revision::<Vec<AgendaItem>>().await.unwrap_or(0);

    if let Err(e) = validate_agenda(&items) {
        return error(e, revision_id);
    }

    match state.repo.replace(&items).await {
        Ok(revision) => success(items, revision),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/agenda/:id/move - Swap an item with its neighbour.
pub async fn move_agenda(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<MoveRequest>,
) -> ApiResult<Vec<AgendaItem>> {
    let revision_id = state.repo.revision::<Vec<AgendaItem>>().await.unwrap_or(0);

    let result = state
        .repo
        .mutate(|items: &mut Vec<AgendaItem>| {
            move_agenda_item(items, &id, request.direction)
                .ok_or_else(|| AppError::NotFound(format!("Agenda item {} not found", id)))?;
            Ok(items.clone())
        })
        .await;

    match result {
        Ok((items, revision)) => success(items, revision),
        Err(e) => error(e, revision_id),
    }
}
