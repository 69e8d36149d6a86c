use axum::http::HeaderMap;
use serde::Serialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::filter::{Filter, FilterError, Pagination, SearchFilters, SearchResult};
use crate::dictionary::WordSummary;
use crate::middleware::access_mode::AccessMode;
use crate::middleware::cookies::{expire_cookie, filters_cookie, filters_cookie_name, read_filters};
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::WordStatus;

/// Search query string, parsed by hand so repeated keys and comma lists both work
#[derive(Debug, Default, PartialEq)]
pub struct SearchParams {
    /// `None` when the request named no filter parameter at all
    pub filters: Option<SearchFilters>,
    pub pagination: Pagination,
}

impl SearchParams {
    pub fn from_pairs(pairs: &[(String, String)], mode: AccessMode) -> Result<Self, ApiError> {
        let mut filters = SearchFilters::default();
        let mut pagination = Pagination::default();
        let mut saw_filter = false;

        for (key, value) in pairs {
            match key.as_str() {
                "q" | "query" => {
                    saw_filter = true;
                    let value = value.trim();
                    filters.query = if value.is_empty() { None } else { Some(value.to_string()) };
                }
                "category" | "categories" => {
                    saw_filter = true;
                    filters.categories.extend(split_list(value));
                }
                "style" | "styles" => {
                    saw_filter = true;
                    filters.styles.extend(split_list(value));
                }
                "origin" | "origins" => {
                    saw_filter = true;
                    filters.origins.extend(split_list(value));
                }
                "letter" | "letters" => {
                    saw_filter = true;
                    for token in split_list(value) {
                        let mut chars = token.chars();
                        match (chars.next(), chars.next()) {
                            (Some(letter), None) => filters.letters.push(letter),
                            _ => return Err(FilterError::InvalidLetter(token).into()),
                        }
                    }
                }
                "status" if mode == AccessMode::Editor => {
                    saw_filter = true;
                    filters.status = match value.trim() {
                        "" => None,
                        raw => Some(raw.parse::<WordStatus>().map_err(ApiError::bad_request)?),
                    };
                }
                "assigned_to" if mode == AccessMode::Editor => {
                    saw_filter = true;
                    filters.assigned_to = match value.trim() {
                        "" => None,
                        raw => Some(
                            Uuid::parse_str(raw)
                                .map_err(|_| ApiError::bad_request(format!("Invalid assigned_to: {}", raw)))?,
                        ),
                    };
                }
                "page" => pagination.page = Some(parse_number("page", value)?),
                "page_size" => pagination.page_size = Some(parse_number("page_size", value)?),
                _ => {}
            }
        }

        Ok(Self { filters: saw_filter.then_some(filters), pagination })
    }
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value.split(',').map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

fn parse_number(name: &str, value: &str) -> Result<usize, ApiError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| ApiError::bad_request(format!("{} must be a non-negative integer", name)))
}

/// Search results plus the filters that produced them
#[derive(Debug, Serialize)]
pub struct SearchPage {
    pub filters: SearchFilters,
    #[serde(flatten)]
    pub results: SearchResult<WordSummary>,
}

/// Runs a search for either mode. Explicit filters replace the saved cookie;
/// a request without any falls back to it.
pub async fn run_search(
    state: &AppState,
    headers: &HeaderMap,
    pairs: &[(String, String)],
    mode: AccessMode,
) -> ApiResult<SearchPage> {
    let params = SearchParams::from_pairs(pairs, mode)?;
    let secure = state.config.security.require_https;

    let (filters, cookie) = match params.filters {
        Some(filters) => {
            let cookie = filters_cookie(&filters, mode, secure);
            (filters, cookie)
        }
        None => match read_filters(headers, mode) {
            Some(saved) => match Filter::new(mode.visibility(), &state.config.search).assign(saved.clone()) {
                Ok(_) => (saved, None),
                Err(e) => {
                    // Saved filters that no longer validate are dropped, not replayed
                    tracing::debug!("Discarding saved {:?} filters: {}", mode, e);
                    let expired = expire_cookie(filters_cookie_name(mode), false, secure);
                    (SearchFilters::default(), Some(expired))
                }
            },
            None => (SearchFilters::default(), None),
        },
    };

    if state.config.search.debug_logging {
        tracing::debug!("{:?} search with {:?}", mode, filters);
    }

    let results = state
        .dictionary()
        .search(filters.clone(), params.pagination, mode.visibility())
        .await?;

    Ok(ApiResponse::success(SearchPage { filters, results }).with_optional_cookie(cookie))
}

pub fn clear_filters_response(state: &AppState, mode: AccessMode) -> ApiResponse<serde_json::Value> {
    let cookie = expire_cookie(filters_cookie_name(mode), false, state.config.security.require_https);
    ApiResponse::success(serde_json::json!({ "cleared": true })).with_cookie(cookie)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn repeated_and_comma_separated_values_merge() {
        let params = SearchParams::from_pairs(
            &pairs(&[("category", "adj.,m."), ("category", "loc. sust."), ("letter", "a, ñ"), ("page", "2")]),
            AccessMode::Public,
        )
        .unwrap();
        let filters = params.filters.unwrap();
        assert_eq!(filters.categories, vec!["adj.", "m.", "loc. sust."]);
        assert_eq!(filters.letters, vec!['a', 'ñ']);
        assert_eq!(params.pagination.page, Some(2));
    }

    #[test]
    fn pagination_alone_is_not_a_filter() {
        let params = SearchParams::from_pairs(&pairs(&[("page", "3"), ("page_size", "10")]), AccessMode::Public).unwrap();
        assert_eq!(params.filters, None);
        assert_eq!(params.pagination, Pagination { page: Some(3), page_size: Some(10) });
    }

    #[test]
    fn editor_fields_only_count_in_editor_mode() {
        let raw = pairs(&[("status", "draft")]);
        assert_eq!(SearchParams::from_pairs(&raw, AccessMode::Public).unwrap().filters, None);

        let editor = SearchParams::from_pairs(&raw, AccessMode::Editor).unwrap();
        assert_eq!(editor.filters.unwrap().status, Some(WordStatus::Draft));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(SearchParams::from_pairs(&pairs(&[("letter", "ab")]), AccessMode::Public).is_err());
        assert!(SearchParams::from_pairs(&pairs(&[("page", "-1")]), AccessMode::Public).is_err());
        assert!(SearchParams::from_pairs(&pairs(&[("status", "lost")]), AccessMode::Editor).is_err());
    }
}
