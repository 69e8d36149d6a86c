use axum::{extract::State, Extension};
use serde::Serialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::auth::SessionUser;
use crate::database::models::PublicUser;
use crate::error::ApiError;
use crate::middleware::cookies::expire_cookie;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct Permissions {
    pub edit_any: bool,
    pub review: bool,
    pub publish: bool,
    pub assign: bool,
    pub delete_words: bool,
    pub manage_users: bool,
}

#[derive(Debug, Serialize)]
pub struct WhoAmI {
    #[serde(flatten)]
    pub user: PublicUser,
    pub permissions: Permissions,
}

/// GET /editor/api/auth/whoami - the account behind the session, with its permissions
pub async fn whoami(State(state): State<AppState>, Extension(session): Extension<SessionUser>) -> ApiResult<WhoAmI> {
    let user = state
        .store
        .user(session.id)
        .await?
        .ok_or_else(|| ApiError::forbidden("User account is not active"))?;

    let role = user.role;
    Ok(ApiResponse::success(WhoAmI {
        user: PublicUser::from(&user),
        permissions: Permissions {
            edit_any: role.can_edit_any(),
            review: role.can_review(),
            publish: role.can_publish(),
            assign: role.can_assign(),
            delete_words: role.can_delete_words(),
            manage_users: role.can_manage_users(),
        },
    }))
}

/// POST /editor/api/auth/logout - expire the session cookie
pub async fn logout(State(state): State<AppState>, Extension(session): Extension<SessionUser>) -> ApiResponse<Value> {
    tracing::info!("{} logged out", session.username);
    let cookie = expire_cookie(&state.config.session.cookie_name, true, state.config.security.require_https);
    ApiResponse::success(json!({ "logged_out": true })).with_cookie(cookie)
}
