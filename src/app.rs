use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{SessionError, SessionKeys};
use crate::config::{AppConfig, SecurityConfig};
use crate::database::DictionaryStore;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{
    access_mode_middleware, require_user_manager, session_auth_middleware, validate_user_middleware,
};
use crate::services::{DictionaryService, UserService};

/// Shared handles every handler and middleware receives
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DictionaryStore>,
    pub sessions: SessionKeys,
    decoy_hash: Arc<OnceCell<String>>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn DictionaryStore>) -> Result<Self, SessionError> {
        let sessions = SessionKeys::from_config(&config.session)?;
        Ok(Self { config: Arc::new(config), store, sessions, decoy_hash: Arc::default() })
    }

    pub fn dictionary(&self) -> DictionaryService {
        DictionaryService::new(self.store.clone(), self.config.clone())
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.store.clone(), self.config.clone()).with_decoy(self.decoy_hash.clone())
    }
}

/// The complete HTTP application.
///
/// Access-mode resolution has to see the request before routing so editor-host
/// requests can be moved onto `/editor`; the route table therefore sits behind an
/// outer router whose only job is to run that middleware.
pub fn app(state: AppState) -> Router {
    let routes = router(state.clone());

    Router::new()
        .fallback_service(routes)
        .layer(from_fn_with_state(state.clone(), access_mode_middleware))
        .layer(cors_layer(&state.config.security))
        .layer(TraceLayer::new_for_http())
}

/// Route table for both access modes, without the access-mode rewrite.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(public_routes())
        // Editor mode, by path prefix or by rewritten editor host
        .nest("/editor", editor_routes(state.clone()))
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/search", get(public::search))
        .route("/api/search/filters", delete(public::clear_filters))
        .route("/api/words/:lemma", get(public::word_by_lemma))
        .route("/api/letters", get(public::letters))
        .route("/api/letters/:letter", get(public::letter_page))
        .route("/api/word-of-the-day", get(public::word_of_the_day))
        .route("/api/catalog", get(public::catalog))
}

fn editor_routes(state: AppState) -> Router<AppState> {
    // Account administration adds a role gate on top of the session gate
    let admin = Router::new()
        .route("/api/users", get(elevated::users_list).post(elevated::users_create))
        .route("/api/users/:id", put(elevated::users_update))
        .route_layer(from_fn(require_user_manager));

    let session_required = Router::new()
        .route("/api/auth/logout", post(protected::logout))
        .route("/api/auth/whoami", get(protected::whoami))
        .route("/api/search", get(protected::search))
        .route("/api/search/filters", delete(protected::clear_filters))
        .route("/api/words", post(protected::word_create))
        .route(
            "/api/words/:id",
            get(protected::word_get).put(protected::word_update).delete(protected::word_delete),
        )
        .route("/api/words/:id/status", put(protected::word_status))
        .route("/api/words/:id/assignee", put(protected::word_assignee))
        .route("/api/words/:id/notes", get(protected::notes_list).post(protected::notes_create))
        .route("/api/words/:id/notes/:note_id", delete(protected::notes_delete))
        .route("/api/letters", get(protected::letters))
        .route("/api/letters/:letter", get(protected::letter_page))
        .route("/api/word-of-the-day", get(protected::word_of_the_day))
        .merge(admin)
        // Layers run bottom-up: token first, then the account behind it
        .route_layer(from_fn_with_state(state.clone(), validate_user_middleware))
        .route_layer(from_fn_with_state(state, session_auth_middleware));

    Router::new()
        .route("/", get(public::editor_root))
        .route("/api/auth/login", post(public::login))
        .merge(session_required)
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
