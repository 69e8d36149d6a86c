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
use crate::dictionary::Note;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct NewNote {
    pub note: String,
}

/// GET /editor/api/words/:id/notes - oldest first
pub async fn list(State(state): State<AppState>, id: Result<Path<i64>, PathRejection>) -> ApiResult<Vec<Note>> {
    let Path(id) = id?;
    Ok(ApiResponse::success(state.dictionary().notes(id).await?))
}

/// POST /editor/api/words/:id/notes
pub async fn create(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<NewNote>, JsonRejection>,
) -> ApiResult<Note> {
    let Path(id) = id?;
    let Json(input) = body?;
    let note = state.dictionary().add_note(&session, id, &input.note).await?;
    Ok(ApiResponse::created(note))
}

/// DELETE /editor/api/words/:id/notes/:note_id
pub async fn delete(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    ids: Result<Path<(i64, Uuid)>, PathRejection>,
) -> ApiResult<Value> {
    let Path((word_id, note_id)) = ids?;
    state.dictionary().delete_note(&session, word_id, note_id).await?;
    Ok(ApiResponse::success(json!({ "deleted": true, "id": note_id })))
}
