use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::HeaderMap,
};

use crate::app::AppState;
use crate::dictionary::WordSummary;
use crate::filter::{LetterGroup, Pagination, SearchResult};
use crate::handlers::public::browse::{daily_word, letter_groups, letter_results, DailyQuery, DailyWord};
use crate::handlers::utils::{clear_filters_response, run_search, SearchPage};
use crate::middleware::{AccessMode, ApiResponse, ApiResult};
use crate::types::Visibility;

/// GET /editor/api/search - every status; adds `status` and `assigned_to` filters
pub async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<SearchPage> {
    let Query(pairs) = query?;
    run_search(&state, &headers, &pairs, AccessMode::Editor).await
}

/// DELETE /editor/api/search/filters
pub async fn clear_filters(State(state): State<AppState>) -> ApiResponse<serde_json::Value> {
    clear_filters_response(&state, AccessMode::Editor)
}

/// GET /editor/api/letters - counts include drafts
pub async fn letters(State(state): State<AppState>) -> ApiResult<Vec<LetterGroup>> {
    letter_groups(&state, Visibility::Editor).await
}

pub async fn letter_page(
    State(state): State<AppState>,
    Path(letter): Path<String>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> ApiResult<SearchResult<WordSummary>> {
    let Query(pagination) = query?;
    letter_results(&state, &letter, pagination, Visibility::Editor).await
}

/// GET /editor/api/word-of-the-day - same pick as the public site
pub async fn word_of_the_day(
    State(state): State<AppState>,
    query: Result<Query<DailyQuery>, QueryRejection>,
) -> ApiResult<DailyWord> {
    let Query(query) = query?;
    daily_word(&state, query).await
}
