use crate::dtos::{ApiResponse, CreateThoughtRequest, ThoughtResponse};
use crate::error::ApiError;
use crate::models::NewThought;
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use metrics::counter;

pub const RECENT_THOUGHTS_LIMIT: usize = 20;

/// `GET /thoughts` — the most recent thoughts, newest first.
pub async fn list_thoughts(
    State(state): State<AppState>,
) -> Result<Json<Vec<ThoughtResponse>>, ApiError> {
    let thoughts = state.store.list_recent(RECENT_THOUGHTS_LIMIT).await?;
    Ok(Json(thoughts.into_iter().map(ThoughtResponse::from).collect()))
}

/// `POST /thoughts`
pub async fn create_thought(
    State(state): State<AppState>,
    payload: Result<Json<CreateThoughtRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ThoughtResponse>>), ApiError> {
    let Json(request) = payload?;

    let new_thought = NewThought::parse(request.message.as_deref())
        .inspect_err(|_| counter!("thought_validation_failures_total").increment(1))?;

    let thought = state.store.insert(new_thought).await?;
    counter!("thoughts_created_total").increment(1);
    tracing::info!(thought_id = %thought.id, "Thought created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(ThoughtResponse::from(thought))),
    ))
}

/// `POST /thoughts/:id/like`
pub async fn like_thought(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ThoughtResponse>>, ApiError> {
    let thought = state
        .store
        .increment_like(&id)
        .await?
        .ok_or(ApiError::NotFound)?;

    counter!("thought_likes_total").increment(1);
    tracing::debug!(thought_id = %thought.id, like_count = thought.like_count, "Thought liked");

    Ok(Json(ApiResponse::ok(ThoughtResponse::from(thought))))
}
