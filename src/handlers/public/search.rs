use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::HeaderMap,
};

use crate::app::AppState;
use crate::handlers::utils::{clear_filters_response, run_search, SearchPage};
use crate::middleware::{AccessMode, ApiResponse, ApiResult};

/// GET /api/search - published entries only
///
/// Filter parameters may repeat or hold comma-separated lists:
/// `?q=pololo&category=m.,f.&style=espon.&letter=p&page=1&page_size=25`.
/// Without any filter parameter the filters saved in `duech_filters` apply.
pub async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<SearchPage> {
    let Query(pairs) = query?;
    run_search(&state, &headers, &pairs, AccessMode::Public).await
}

/// DELETE /api/search/filters - forget the saved public filters
pub async fn clear_filters(State(state): State<AppState>) -> ApiResponse<serde_json::Value> {
    clear_filters_response(&state, AccessMode::Public)
}
