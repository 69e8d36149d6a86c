use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::WordStatus;

/// User-facing search criteria. This is also the shape persisted in the filter cookie.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub styles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub origins: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub letters: Vec<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WordStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Uuid>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.query.as_deref().map_or(true, |q| q.trim().is_empty())
            && self.categories.is_empty()
            && self.styles.is_empty()
            && self.origins.is_empty()
            && self.letters.is_empty()
            && self.status.is_none()
            && self.assigned_to.is_none()
    }

    /// Drops the editor-only criteria.
    pub fn without_editor_fields(mut self) -> Self {
        self.status = None;
        self.assigned_to = None;
        self
    }
}

/// 1-based page request; missing values fall back to the configured defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

/// How strongly a word matched the text query; lower sorts first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    ExactLemma,
    LemmaPrefix,
    LemmaContains,
    Meaning,
    /// No text query was given
    Unranked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> SearchResult<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> SearchResult<U> {
        SearchResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LetterGroup {
    pub letter: char,
    pub count: usize,
}
