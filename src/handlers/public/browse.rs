use axum::extract::{rejection::QueryRejection, Path, Query, State};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::dictionary::catalog::{entries, ALPHABET, GRAMMATICAL_CATEGORIES, USAGE_STYLES};
use crate::dictionary::{Word, WordSummary};
use crate::error::ApiError;
use crate::filter::{LetterGroup, Pagination, SearchResult};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::word_of_the_day::parse_date;
use crate::types::{Visibility, WordStatus};

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DailyWord {
    pub date: NaiveDate,
    pub word: Word,
}

/// GET /api/words/:lemma
pub async fn word_by_lemma(State(state): State<AppState>, Path(lemma): Path<String>) -> ApiResult<Word> {
    let word = state.dictionary().word_by_lemma(&lemma, Visibility::Public).await?;
    Ok(ApiResponse::success(word))
}

/// GET /api/letters - published word counts for every letter
pub async fn letters(State(state): State<AppState>) -> ApiResult<Vec<LetterGroup>> {
    letter_groups(&state, Visibility::Public).await
}

/// GET /api/letters/:letter?page&page_size
pub async fn letter_page(
    State(state): State<AppState>,
    Path(letter): Path<String>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> ApiResult<SearchResult<WordSummary>> {
    let Query(pagination) = query?;
    letter_results(&state, &letter, pagination, Visibility::Public).await
}

/// GET /api/word-of-the-day?date=YYYY-MM-DD
pub async fn word_of_the_day(
    State(state): State<AppState>,
    query: Result<Query<DailyQuery>, QueryRejection>,
) -> ApiResult<DailyWord> {
    let Query(query) = query?;
    daily_word(&state, query).await
}

/// GET /api/catalog - codes the search facets and editor forms use
pub async fn catalog() -> ApiResponse<Value> {
    let statuses: Vec<Value> = WordStatus::ALL
        .iter()
        .map(|s| json!({ "code": s.as_str(), "label": s.label() }))
        .collect();

    ApiResponse::success(json!({
        "categories": entries(GRAMMATICAL_CATEGORIES),
        "styles": entries(USAGE_STYLES),
        "alphabet": ALPHABET,
        "statuses": statuses,
    }))
}

pub(crate) async fn letter_groups(state: &AppState, visibility: Visibility) -> ApiResult<Vec<LetterGroup>> {
    Ok(ApiResponse::success(state.dictionary().letter_groups(visibility).await?))
}

pub(crate) async fn letter_results(
    state: &AppState,
    letter: &str,
    pagination: Pagination,
    visibility: Visibility,
) -> ApiResult<SearchResult<WordSummary>> {
    let page = state.dictionary().by_letter(letter, pagination, visibility).await?;
    Ok(ApiResponse::success(page))
}

pub(crate) async fn daily_word(state: &AppState, query: DailyQuery) -> ApiResult<DailyWord> {
    let date = match query.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => Some(
            parse_date(raw).ok_or_else(|| ApiError::bad_request(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))?,
        ),
        None => None,
    };

    let (date, word) = state.dictionary().word_of_the_day(date).await?;
    Ok(ApiResponse::success(DailyWord { date, word }))
}
