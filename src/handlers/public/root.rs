use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::middleware::AccessMode;

/// GET / - service information and the resolved access mode
pub async fn root(State(state): State<AppState>, mode: Option<Extension<AccessMode>>) -> Json<Value> {
    let mode = mode.map(|Extension(m)| m).unwrap_or(AccessMode::Public);

    Json(json!({
        "success": true,
        "data": {
            "name": "DUECh API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Diccionario del uso del español de Chile",
            "mode": mode,
            "environment": state.config.environment,
            "endpoints": {
                "search": "/api/search?q&category&style&origin&letter&page&page_size (public)",
                "words": "/api/words/:lemma (public)",
                "letters": "/api/letters[/:letter] (public)",
                "word_of_the_day": "/api/word-of-the-day[?date=YYYY-MM-DD] (public)",
                "catalog": "/api/catalog (public)",
                "editor": "/editor/api/* (session required, or the editor host)",
            }
        }
    }))
}

/// GET /editor - editor entry point; tells clients where to log in
pub async fn editor_root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "DUECh API",
            "version": env!("CARGO_PKG_VERSION"),
            "mode": AccessMode::Editor,
            "login": "/editor/api/auth/login",
            "session_cookie": state.config.session.cookie_name,
        }
    }))
}

/// GET /health - store connectivity
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": state.store.backend()
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "store unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "store": state.store.backend()
                    }
                })),
            )
        }
    }
}
