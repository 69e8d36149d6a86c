use uuid::Uuid;

use super::types::MatchTier;
use crate::dictionary::{normalize, Word};
use crate::types::{Visibility, WordStatus};

/// Compiled matching criteria. Text inputs are normalized once, up front.
#[derive(Debug, Clone)]
pub struct FilterWhere {
    pub(crate) visibility: Visibility,
    pub(crate) query: Option<String>,
    pub(crate) categories: Vec<String>,
    pub(crate) styles: Vec<String>,
    pub(crate) origins: Vec<String>,
    pub(crate) letters: Vec<char>,
    pub(crate) status: Option<WordStatus>,
    pub(crate) assigned_to: Option<Uuid>,
}

impl FilterWhere {
    pub fn new(visibility: Visibility) -> Self {
        Self {
            visibility,
            query: None,
            categories: vec![],
            styles: vec![],
            origins: vec![],
            letters: vec![],
            status: None,
            assigned_to: None,
        }
    }

    /// Returns the match tier when every criterion holds, `None` otherwise.
    pub fn matches(&self, word: &Word) -> Option<MatchTier> {
        if !self.visibility.allows(word.status) {
            return None;
        }
        if let Some(status) = self.status {
            if word.status != status {
                return None;
            }
        }
        if let Some(user) = self.assigned_to {
            if word.assigned_to != Some(user) {
                return None;
            }
        }
        if !self.letters.is_empty() && !self.letters.contains(&word.letter) {
            return None;
        }
        if !self.facets_match(word) {
            return None;
        }
        self.text_tier(word)
    }

    // OR inside a facet, AND across facets; a meaning only has to carry one selected value
    fn facets_match(&self, word: &Word) -> bool {
        let categories = self.categories.is_empty()
            || word
                .meanings
                .iter()
                .any(|m| m.categories.iter().any(|c| self.categories.contains(c)));
        let styles = self.styles.is_empty()
            || word
                .meanings
                .iter()
                .any(|m| m.styles.iter().any(|s| self.styles.contains(s)));
        let origins = self.origins.is_empty()
            || word.meanings.iter().any(|m| {
                m.origin
                    .as_deref()
                    .map(normalize)
                    .map_or(false, |origin| self.origins.contains(&origin))
            });
        categories && styles && origins
    }

    fn text_tier(&self, word: &Word) -> Option<MatchTier> {
        let Some(query) = self.query.as_deref() else {
            return Some(MatchTier::Unranked);
        };

        let lemma = normalize(&word.lemma);
        if lemma == query {
            return Some(MatchTier::ExactLemma);
        }
        if lemma.starts_with(query) {
            return Some(MatchTier::LemmaPrefix);
        }
        if lemma.contains(query) {
            return Some(MatchTier::LemmaContains);
        }
        if word.meanings.iter().any(|m| normalize(&m.meaning).contains(query)) {
            return Some(MatchTier::Meaning);
        }
        None
    }
}
