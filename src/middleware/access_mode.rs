use axum::{
    extract::{Request, State},
    http::{header::HOST, uri::PathAndQuery, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::app::AppState;
use crate::config::RoutingConfig;
use crate::error::ApiError;
use crate::types::Visibility;

pub const EDITOR_PREFIX: &str = "/editor";

// Load balancers probe the same path on every host
const HEALTH_PATH: &str = "/health";

/// Which side of the dictionary a request is talking to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    Public,
    Editor,
}

impl AccessMode {
    pub fn visibility(&self) -> Visibility {
        match self {
            AccessMode::Public => Visibility::Public,
            AccessMode::Editor => Visibility::Editor,
        }
    }
}

/// Outcome of looking at a request's host and path
#[derive(Debug, PartialEq)]
pub enum Resolution {
    Public,
    /// Editor mode; `rewrite` holds the prefixed URI for host-selected requests.
    Editor { rewrite: Option<Uri> },
    /// The `/editor` prefix was used while path access is turned off.
    PrefixDisabled,
}

pub fn resolve(host: Option<&str>, uri: &Uri, routing: &RoutingConfig) -> Result<Resolution, ApiError> {
    if uri.path() == HEALTH_PATH {
        return Ok(Resolution::Public);
    }

    if host.is_some_and(|h| host_selects_editor(h, &routing.editor_host_label)) {
        if has_editor_prefix(uri.path()) {
            return Ok(Resolution::Editor { rewrite: None });
        }
        return Ok(Resolution::Editor { rewrite: Some(prefixed(uri)?) });
    }

    if has_editor_prefix(uri.path()) {
        if routing.editor_path_prefix_enabled {
            return Ok(Resolution::Editor { rewrite: None });
        }
        return Ok(Resolution::PrefixDisabled);
    }

    Ok(Resolution::Public)
}

/// `editor.duech.cl:8080` selects editor mode when the label is `editor`.
pub fn host_selects_editor(host: &str, label: &str) -> bool {
    if label.is_empty() {
        return false;
    }
    let hostname = host.trim().split(':').next().unwrap_or_default();
    match hostname.split_once('.') {
        Some((first, rest)) => !rest.is_empty() && first.eq_ignore_ascii_case(label),
        None => false,
    }
}

pub fn has_editor_prefix(path: &str) -> bool {
    path == EDITOR_PREFIX || path.starts_with("/editor/")
}

fn prefixed(uri: &Uri) -> Result<Uri, ApiError> {
    let path = match uri.path() {
        "/" => "",
        other => other,
    };
    let path_and_query = match uri.query() {
        Some(query) => format!("{}{}?{}", EDITOR_PREFIX, path, query),
        None => format!("{}{}", EDITOR_PREFIX, path),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(
        PathAndQuery::try_from(path_and_query).map_err(|_| ApiError::bad_request("Invalid request path"))?,
    );
    Uri::from_parts(parts).map_err(|_| ApiError::bad_request("Invalid request path"))
}

/// Resolves the access mode before routing and rewrites editor-host requests onto `/editor`.
pub async fn access_mode_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let host = request
        .headers()
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .or_else(|| request.uri().host().map(str::to_string));

    let resolution = match resolve(host.as_deref(), request.uri(), &state.config.routing) {
        Ok(resolution) => resolution,
        Err(e) => return e.into_response(),
    };

    let mode = match resolution {
        Resolution::Public => AccessMode::Public,
        Resolution::Editor { rewrite } => {
            if let Some(uri) = rewrite {
                tracing::debug!("Editor host rewrite {} -> {}", request.uri(), uri);
                *request.uri_mut() = uri;
            }
            AccessMode::Editor
        }
        Resolution::PrefixDisabled => {
            return ApiError::not_found(format!("No route for {}", request.uri().path())).into_response();
        }
    };

    request.extensions_mut().insert(mode);
    next.run(request).await
}
