use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::SessionUser;
use crate::database::models::{NewUser, PublicUser, UserUpdate};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /editor/api/users
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<PublicUser>> {
    Ok(ApiResponse::success(state.users().list_users().await?))
}

/// POST /editor/api/users - only roles below the caller's may be created
pub async fn create(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    body: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<PublicUser> {
    let Json(input) = body?;
    let user = state.users().create_user(&session, input).await?;

    if state.config.security.enable_audit_logging {
        tracing::info!(target: "audit", "{} created account {} ({})", session.username, user.username, user.role);
    }
    Ok(ApiResponse::created(user))
}

/// PUT /editor/api/users/:id - role, active flag or password
pub async fn update(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UserUpdate>, JsonRejection>,
) -> ApiResult<PublicUser> {
    let Path(id) = id?;
    let Json(update) = body?;
    let user = state.users().update_user(&session, id, update).await?;

    if state.config.security.enable_audit_logging {
        tracing::info!(
            target: "audit",
            "{} updated account {} (role {}, active {})",
            session.username,
            user.username,
            user.role,
            user.active
        );
    }
    Ok(ApiResponse::success(user))
}
