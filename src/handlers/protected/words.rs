use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::SessionUser;
use crate::dictionary::{NewWord, Word, WordUpdate};
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::WordStatus;

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: WordStatus,
}

#[derive(Debug, Deserialize)]
pub struct AssigneeChange {
    /// `null` clears the assignment
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

/// POST /editor/api/words - new entries start as drafts owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    body: Result<Json<NewWord>, JsonRejection>,
) -> ApiResult<Word> {
    let Json(input) = body?;
    let word = state.dictionary().create_word(&session, input).await?;
    Ok(ApiResponse::created(word))
}

/// GET /editor/api/words/:id
pub async fn get(State(state): State<AppState>, id: Result<Path<i64>, PathRejection>) -> ApiResult<Word> {
    let Path(id) = id?;
    Ok(ApiResponse::success(state.dictionary().word(id).await?))
}

/// PUT /editor/api/words/:id - lemma, root and meanings; omitted fields stay as they are
pub async fn update(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<WordUpdate>, JsonRejection>,
) -> ApiResult<Word> {
    let Path(id) = id?;
    let Json(update) = body?;
    Ok(ApiResponse::success(state.dictionary().update_word(&session, id, update).await?))
}

/// DELETE /editor/api/words/:id - admins only; notes go with the word
pub async fn delete(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Value> {
    let Path(id) = id?;
    state.dictionary().delete_word(&session, id).await?;
    Ok(ApiResponse::success(json!({ "deleted": true, "id": id })))
}

/// PUT /editor/api/words/:id/status
pub async fn status(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<StatusChange>, JsonRejection>,
) -> ApiResult<Word> {
    let Path(id) = id?;
    let Json(change) = body?;
    Ok(ApiResponse::success(state.dictionary().set_status(&session, id, change.status).await?))
}

/// PUT /editor/api/words/:id/assignee
pub async fn assignee(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<AssigneeChange>, JsonRejection>,
) -> ApiResult<Word> {
    let Path(id) = id?;
    let Json(change) = body?;
    Ok(ApiResponse::success(state.dictionary().assign(&session, id, change.user_id).await?))
}
