use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use super::cookies::get_cookie;
use crate::app::AppState;
use crate::auth::SessionUser;
use crate::error::ApiError;

/// Session authentication middleware: verifies the token and injects its claims
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_session_token(request.headers(), &state.config.session.cookie_name)
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let claims = state.sessions.verify(&token).map_err(|e| {
        tracing::debug!("Rejected session token: {}", e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Gate for the account administration routes
pub async fn require_user_manager(request: Request, next: Next) -> Result<Response, ApiError> {
    let session = request
        .extensions()
        .get::<SessionUser>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    if !session.role.can_manage_users() {
        tracing::warn!("{} ({}) tried to reach user administration", session.username, session.role);
        return Err(ApiError::forbidden("User management requires an admin role"));
    }
    Ok(next.run(request).await)
}

/// Session cookie first, then `Authorization: Bearer` for API clients
pub fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(token) = get_cookie(headers, cookie_name).filter(|t| !t.is_empty()) {
        return Some(token);
    }

    let auth_str = headers.get(AUTHORIZATION)?.to_str().ok()?;
    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
