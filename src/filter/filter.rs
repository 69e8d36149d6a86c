use uuid::Uuid;

use super::error::FilterError;
use super::filter_order::{FilterOrder, Ranked};
use super::filter_where::FilterWhere;
use super::types::{LetterGroup, SearchFilters, SearchResult};
use crate::config::SearchConfig;
use crate::dictionary::catalog::{is_letter, ALPHABET};
use crate::dictionary::{normalize, Word};
use crate::types::{Visibility, WordStatus};

pub struct Filter {
    conditions: FilterWhere,
    page: usize,
    page_size: usize,
    limits: SearchConfig,
}

impl Filter {
    pub fn new(visibility: Visibility, limits: &SearchConfig) -> Self {
        Self {
            conditions: FilterWhere::new(visibility),
            page: 1,
            page_size: limits.default_page_size,
            limits: limits.clone(),
        }
    }

    pub fn assign(&mut self, data: SearchFilters) -> Result<&mut Self, FilterError> {
        if let Some(query) = data.query { self.query(&query)?; }
        if !data.letters.is_empty() { self.letters(data.letters)?; }
        self.categories(data.categories);
        self.styles(data.styles);
        self.origins(data.origins);
        if let Some(status) = data.status { self.status(status); }
        if let Some(user) = data.assigned_to { self.assigned_to(user); }
        Ok(self)
    }

    pub fn query(&mut self, query: &str) -> Result<&mut Self, FilterError> {
        let length = query.chars().count();
        if length > self.limits.max_query_length {
            return Err(FilterError::QueryTooLong(length, self.limits.max_query_length));
        }
        let normalized = normalize(query);
        self.conditions.query = if normalized.is_empty() { None } else { Some(normalized) };
        Ok(self)
    }

    pub fn letters(&mut self, letters: Vec<char>) -> Result<&mut Self, FilterError> {
        let mut folded = Vec::with_capacity(letters.len());
        for letter in letters {
            let lower = normalize(&letter.to_string()).chars().next().unwrap_or(letter);
            if !is_letter(lower) && lower != '#' {
                return Err(FilterError::InvalidLetter(letter.to_string()));
            }
            if !folded.contains(&lower) {
                folded.push(lower);
            }
        }
        self.conditions.letters = folded;
        Ok(self)
    }

    pub fn categories(&mut self, categories: Vec<String>) -> &mut Self {
        self.conditions.categories = tidy(categories);
        self
    }

    pub fn styles(&mut self, styles: Vec<String>) -> &mut Self {
        self.conditions.styles = tidy(styles);
        self
    }

    pub fn origins(&mut self, origins: Vec<String>) -> &mut Self {
        self.conditions.origins = origins.iter().map(|o| normalize(o)).filter(|o| !o.is_empty()).collect();
        self
    }

    /// Editor-only; a public filter keeps showing published words regardless.
    pub fn status(&mut self, status: WordStatus) -> &mut Self {
        if self.conditions.visibility == Visibility::Editor {
            self.conditions.status = Some(status);
        } else if self.limits.debug_logging {
            tracing::debug!("Ignoring status filter '{}' outside editor mode", status);
        }
        self
    }

    pub fn assigned_to(&mut self, user: Uuid) -> &mut Self {
        if self.conditions.visibility == Visibility::Editor {
            self.conditions.assigned_to = Some(user);
        }
        self
    }

    pub fn paginate(&mut self, page: Option<usize>, page_size: Option<usize>) -> Result<&mut Self, FilterError> {
        let page = page.unwrap_or(1);
        if page == 0 { return Err(FilterError::InvalidPage("Page numbers start at 1".to_string())); }

        let requested = page_size.unwrap_or(self.limits.default_page_size);
        if requested == 0 { return Err(FilterError::InvalidPageSize("Page size must be positive".to_string())); }

        // Apply max page size from config
        let applied = if requested > self.limits.max_page_size {
            if self.limits.debug_logging {
                tracing::warn!("Page size {} exceeds max {}, capping to max", requested, self.limits.max_page_size);
            }
            self.limits.max_page_size
        } else {
            requested
        };

        self.page = page;
        self.page_size = applied;
        Ok(self)
    }

    pub fn apply<'w>(&self, words: &'w [Word]) -> SearchResult<&'w Word> {
        let mut ranked: Vec<Ranked<'w>> = words
            .iter()
            .filter_map(|w| self.conditions.matches(w).map(|tier| Ranked::new(tier, w)))
            .collect();
        FilterOrder::sort(&mut ranked);

        let total = ranked.len();
        let total_pages = total.div_ceil(self.page_size);
        let start = (self.page - 1).saturating_mul(self.page_size);
        let items = ranked
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .map(|r| r.word)
            .collect();

        SearchResult {
            items,
            total,
            page: self.page,
            page_size: self.page_size,
            total_pages,
            has_next: self.page < total_pages,
            has_previous: self.page > 1,
        }
    }
}

/// Word counts per letter of the alphabet, zero counts included.
pub fn letter_groups(words: &[Word], visibility: Visibility) -> Vec<LetterGroup> {
    ALPHABET
        .iter()
        .map(|&letter| LetterGroup {
            letter,
            count: words
                .iter()
                .filter(|w| w.letter == letter && visibility.allows(w.status))
                .count(),
        })
        .collect()
}

fn tidy(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::dictionary::Meaning;
    use chrono::Utc;

    fn corpus() -> Vec<Word> {
        let entries = [
            (1, "pololo", WordStatus::Published, "Novio, enamorado.", "m."),
            (2, "polola", WordStatus::Published, "Novia, enamorada.", "f."),
            (3, "pololear", WordStatus::Published, "Tener una relación de pololos.", "intr."),
            (4, "apololado", WordStatus::Draft, "Que parece pololo.", "adj."),
            (5, "cahuín", WordStatus::Published, "Lío, enredo; chisme de pololos.", "m."),
            (6, "ñeque", WordStatus::Published, "Fuerza, energía.", "m."),
            (7, "nana", WordStatus::Published, "Empleada doméstica.", "f."),
        ];
        entries
            .into_iter()
            .map(|(id, lemma, status, text, category)| {
                let mut w = Word {
                    id,
                    lemma: lemma.to_string(),
                    root: None,
                    letter: '#',
                    status,
                    created_by: None,
                    assigned_to: None,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                    meanings: vec![Meaning {
                        meaning: text.to_string(),
                        categories: vec![category.to_string()],
                        ..Default::default()
                    }],
                };
                w.refresh_derived();
                w
            })
            .collect()
    }

    fn lemmas(result: &SearchResult<&Word>) -> Vec<String> {
        result.items.iter().map(|w| w.lemma.clone()).collect()
    }

    #[test]
    fn ranks_exact_lemma_before_meaning_matches() {
        let words = corpus();
        let limits = AppConfig::development().search;
        let mut filter = Filter::new(Visibility::Editor, &limits);
        filter.query("POLOLO").unwrap();

        let result = filter.apply(&words);
        assert_eq!(lemmas(&result), vec!["pololo", "apololado", "cahuín", "pololear"]);
    }

    #[test]
    fn ranks_prefix_then_contains_then_meaning() {
        let words = corpus();
        let limits = AppConfig::development().search;
        let mut filter = Filter::new(Visibility::Editor, &limits);
        filter.query("polol").unwrap();

        let result = filter.apply(&words);
        assert_eq!(lemmas(&result), vec!["polola", "pololear", "pololo", "apololado", "cahuín"]);
    }

    #[test]
    fn public_search_skips_drafts() {
        let words = corpus();
        let limits = AppConfig::development().search;
        let mut filter = Filter::new(Visibility::Public, &limits);
        filter.query("pololo").unwrap();

        let result = filter.apply(&words);
        assert!(!lemmas(&result).contains(&"apololado".to_string()));
        assert_eq!(result.total, 3);
    }

    #[test]
    fn no_query_sorts_alphabetically_with_enye_after_n() {
        let words = corpus();
        let limits = AppConfig::development().search;
        let filter = Filter::new(Visibility::Public, &limits);

        let result = filter.apply(&words);
        assert_eq!(lemmas(&result), vec!["cahuín", "nana", "ñeque", "polola", "pololear", "pololo"]);
    }

    #[test]
    fn pagination_math() {
        let words = corpus();
        let limits = AppConfig::development().search;
        let mut filter = Filter::new(Visibility::Public, &limits);
        filter.paginate(Some(2), Some(4)).unwrap();

        let result = filter.apply(&words);
        assert_eq!(result.total, 6);
        assert_eq!(result.total_pages, 2);
        assert_eq!(result.items.len(), 2);
        assert!(!result.has_next);
        assert!(result.has_previous);

        filter.paginate(Some(9), Some(4)).unwrap();
        let past_end = filter.apply(&words);
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 6);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        let words = corpus();
        let limits = AppConfig::development().search;
        let mut filter = Filter::new(Visibility::Public, &limits);
        filter.query("zzz").unwrap();
        let result = filter.apply(&words);
        assert_eq!(result.total_pages, 0);
        assert!(!result.has_next);
    }

    #[test]
    fn rejects_bad_input() {
        let limits = AppConfig::development().search;
        let mut filter = Filter::new(Visibility::Public, &limits);
        assert!(matches!(filter.paginate(Some(0), None), Err(FilterError::InvalidPage(_))));
        assert!(matches!(filter.paginate(None, Some(0)), Err(FilterError::InvalidPageSize(_))));
        assert!(matches!(filter.query(&"a".repeat(101)), Err(FilterError::QueryTooLong(101, 100))));
        assert!(matches!(filter.letters(vec!['3']), Err(FilterError::InvalidLetter(_))));
    }

    #[test]
    fn page_size_is_capped() {
        let limits = AppConfig::development().search;
        let mut filter = Filter::new(Visibility::Public, &limits);
        filter.paginate(None, Some(1000)).unwrap();
        let words = corpus();
        assert_eq!(filter.apply(&words).page_size, 100);
    }

    #[test]
    fn status_filter_is_ignored_in_public_mode() {
        let words = corpus();
        let limits = AppConfig::development().search;
        let mut filter = Filter::new(Visibility::Public, &limits);
        filter.assign(SearchFilters { status: Some(WordStatus::Draft), ..Default::default() }).unwrap();
        assert_eq!(filter.apply(&words).total, 6);
    }

    #[test]
    fn letter_groups_cover_the_alphabet() {
        let words = corpus();
        let groups = letter_groups(&words, Visibility::Public);
        assert_eq!(groups.len(), 27);
        let count = |l: char| groups.iter().find(|g| g.letter == l).map(|g| g.count);
        assert_eq!(count('p'), Some(3));
        assert_eq!(count('a'), Some(0));
        assert_eq!(count('ñ'), Some(1));
        assert_eq!(count('n'), Some(1));
    }
}
