use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::database::models::PublicUser;
use crate::middleware::cookies::{build_set_cookie, CookieOptions};
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email
    #[serde(alias = "username", alias = "email")]
    pub login: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: PublicUser,
    /// Also set as the session cookie; returned for API clients such as the CLI
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// POST /editor/api/auth/login - check credentials and open a session
///
/// ```json
/// { "login": "edith", "password": "..." }
/// ```
///
/// Unknown users, inactive accounts and wrong passwords all get the same 401.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(request) = body?;

    let user = state.users().authenticate(&request.login, &request.password).await?;
    let session = state.sessions.issue(user.id, &user.username, user.role)?;

    let cookie = build_set_cookie(
        &state.config.session.cookie_name,
        &session.token,
        CookieOptions {
            http_only: true,
            secure: state.config.security.require_https,
            max_age: Some(session.max_age_secs),
        },
    );

    Ok(ApiResponse::success(LoginResponse {
        user: PublicUser::from(&user),
        token: session.token,
        expires_at: session.expires_at,
    })
    .with_cookie(cookie))
}
