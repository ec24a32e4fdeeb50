//! Live poll API endpoints.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use super::{error, success, ApiJson, ApiResult};
use crate::auth::{is_authorized, AdminAccess};
use crate::errors::AppError;
use crate::models::{
    CastVoteRequest, CreatePollRequest, PollQuery, PollView, UpdatePollRequest, VotingDocument,
};
use crate::AppState;

/// Payload of a voting response: one poll or all of them.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum VotingData {
    Poll(PollView),
    Polls(Vec<PollView>),
}

/// GET /api/voting - All polls, or one with `?pollId=`.
pub async fn get_polls(
    State(state): State<AppState>,
    Query(params): Query<PollQuery>,
) -> ApiResult<VotingData> {
    let revision_id = state.repo.revision::<VotingDocument>().await.unwrap_or(0);

    let loaded = match state.repo.load::<VotingDocument>().await {
        Ok(loaded) => loaded,
        Err(e) => return error(e, revision_id),
    };
    let now = Utc::now();

    match params.poll_id.as_deref().filter(|id| !id.is_empty()) {
        Some(poll_id) => match loaded.value.view(poll_id, now) {
            Ok(view) => success(VotingData::Poll(view), loaded.revision),
            Err(e) => error(e.into(), loaded.revision),
        },
        None => success(VotingData::Polls(loaded.value.views(now)), loaded.revision),
    }
}

/// POST /api/voting - Dispatch on `action`: `create_poll`, `vote` or `list`.
pub async fn post_voting(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<VotingData> {
    let revision_id = state.repo.revision::<VotingDocument>().await.unwrap_or(0);

    let action = body
        .get("action")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_default();
    match action.as_str() {
        "create_poll" => {
            if !is_authorized(state.config.api_psk.as_deref(), &headers) {
                return error(
                    AppError::Unauthorized("Missing or invalid API key".to_string()),
                    revision_id,
                );
            }
            let request: CreatePollRequest = match serde_json::from_value(body) {
                Ok(request) => request,
                Err(e) => return error(e.into(), revision_id),
            };
            create_poll(&state, request, revision_id).await
        }
        "vote" => {
            let request: CastVoteRequest = match serde_json::from_value(body) {
                Ok(request) => request,
                Err(e) => return error(e.into(), revision_id),
            };
            cast_vote(&state, request, revision_id).await
        }
        "list" => match state.repo.load::<VotingDocument>().await {
            Ok(loaded) => success(
                VotingData::Polls(loaded.value.views(Utc::now())),
                loaded.revision,
            ),
            Err(e) => error(e, revision_id),
        },
        _ => error(
            AppError::BadRequest("Invalid action".to_string()),
            revision_id,
        ),
    }
}

async fn create_poll(
    state: &AppState,
    request: CreatePollRequest,
    revision_id: i64,
) -> ApiResult<VotingData> {
    let now = Utc::now();
    let result = state
        .repo
        .mutate(|voting: &mut VotingDocument| {
            let poll = voting.create_poll(&request, now)?;
            Ok(voting.tally(&poll, now))
        })
        .await;

    match result {
        Ok((view, revision)) => {
            tracing::info!(poll_id = %view.poll.id, title = %view.poll.title, "Poll created");
            success(VotingData::Poll(view), revision)
        }
        Err(e) => error(e, revision_id),
    }
}

async fn cast_vote(
    state: &AppState,
    request: CastVoteRequest,
    revision_id: i64,
) -> ApiResult<VotingData> {
    let now = Utc::now();
    let result = state
        .repo
        .mutate(|voting: &mut VotingDocument| {
            voting.cast_vote(&request, now)?;
            Ok(voting.view(request.poll_id.trim(), now)?)
        })
        .await;

    match result {
        Ok((view, revision)) => {
            tracing::debug!(poll_id = %view.poll.id, total_votes = view.total_votes, "Vote recorded");
            success(VotingData::Poll(view), revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PATCH /api/voting - Activate or deactivate a poll.
pub async fn update_poll(
    _admin: AdminAccess,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdatePollRequest>,
) -> ApiResult<VotingData> {
    let revision_id = state.repo.revision::<VotingDocument>().await.unwrap_or(0);

    let poll_id = request.poll_id.trim();
    let Some(is_active) = request.is_active else {
        return error(
            AppError::Validation("Missing required fields: pollId, isActive".to_string()),
            revision_id,
        );
    };
    if poll_id.is_empty() {
        return error(
            AppError::Validation("Missing required fields: pollId, isActive".to_string()),
            revision_id,
        );
    }

    let now = Utc::now();
    let result = state
        .repo
        .mutate(|voting: &mut VotingDocument| {
            let poll = voting.set_active(poll_id, is_active)?;
            Ok(voting.tally(&poll, now))
        })
        .await;

    match result {
        Ok((view, revision)) => {
            tracing::info!(poll_id = %view.poll.id, is_active, "Poll updated");
            success(VotingData::Poll(view), revision)
        }
        Err(e) => error(e, revision_id),
    }
}
