use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{Claims, SessionUser};
use crate::database::DictionaryStore;
use crate::error::ApiError;

/// Middleware that validates the user from the session claims against the store.
/// Ensures the account still exists, is active and holds the role the token was issued for.
pub async fn validate_user_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Get Claims from session middleware
    let claims = request
        .extensions()
        .get::<Claims>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("Session authentication required before user validation"))?;

    let session = validate_claims(state.store.as_ref(), &claims).await?;

    tracing::debug!("User validation successful: {} ({})", session.username, session.role);
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

pub async fn validate_claims(store: &dyn DictionaryStore, claims: &Claims) -> Result<SessionUser, ApiError> {
    let user = store.user(claims.sub).await?.ok_or_else(|| {
        tracing::warn!("User validation failed: '{}' ({}) no longer exists", claims.username, claims.sub);
        ApiError::forbidden("User account is not active")
    })?;

    if !user.active {
        tracing::warn!("User validation failed: '{}' is inactive", user.username);
        return Err(ApiError::forbidden("User account is not active"));
    }

    // Role changes invalidate sessions issued before them
    if user.role != claims.role {
        tracing::warn!(
            "User validation failed: session role '{}' doesn't match stored role '{}' for '{}'",
            claims.role, user.role, user.username
        );
        return Err(ApiError::forbidden("session role is stale"));
    }

    if !user.role.is_editor_role() {
        return Err(ApiError::forbidden("Editor access denied"));
    }

    Ok(SessionUser { id: user.id, username: user.username, role: user.role })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::database::models::User;
    use crate::database::{Corpus, MemoryStore};
    use chrono::Utc;
    use uuid::Uuid;

    fn user(role: Role, active: bool) -> User {
        User {
            id: Uuid::new_v4(),
            username: "edith".into(),
            email: "edith@duech.cl".into(),
            password_hash: String::new(),
            role,
            active,
            created_at: Utc::now(),
        }
    }

    fn claims(user: &User, role: Role) -> Claims {
        Claims { sub: user.id, username: user.username.clone(), role, exp: 0, iat: 0 }
    }

    #[tokio::test]
    async fn accepts_matching_active_users() {
        let edith = user(Role::Editor, true);
        let store = MemoryStore::new(Corpus { users: vec![edith.clone()], ..Default::default() });
        let session = validate_claims(&store, &claims(&edith, Role::Editor)).await.unwrap();
        assert_eq!(session.id, edith.id);
    }

    #[tokio::test]
    async fn rejects_stale_roles_and_inactive_accounts() {
        let edith = user(Role::Editor, true);
        let gone = user(Role::Editor, false);
        let store = MemoryStore::new(Corpus { users: vec![edith.clone(), gone.clone()], ..Default::default() });

        let err = validate_claims(&store, &claims(&edith, Role::Admin)).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.message(), "session role is stale");

        let err = validate_claims(&store, &claims(&gone, Role::Editor)).await.unwrap_err();
        assert_eq!(err.status_code(), 403);

        let stranger = user(Role::Editor, true);
        assert!(validate_claims(&store, &claims(&stranger, Role::Editor)).await.is_err());
    }
}
