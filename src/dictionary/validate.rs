use std::collections::HashMap;

use super::catalog::{is_category, is_style};
use super::model::Meaning;

pub const MAX_LEMMA_CHARS: usize = 120;

/// Field name -> message, reported together so an editor form can mark every problem at once.
pub type FieldErrors = HashMap<String, String>;

pub fn validate_lemma(lemma: &str, errors: &mut FieldErrors) {
    let trimmed = lemma.trim();
    if trimmed.is_empty() {
        errors.insert("lemma".to_string(), "Lemma is required".to_string());
    } else if trimmed.chars().count() > MAX_LEMMA_CHARS {
        errors.insert(
            "lemma".to_string(),
            format!("Lemma cannot exceed {} characters", MAX_LEMMA_CHARS),
        );
    }
}

pub fn validate_meanings(meanings: &[Meaning], errors: &mut FieldErrors) {
    if meanings.is_empty() {
        errors.insert("meanings".to_string(), "At least one meaning is required".to_string());
        return;
    }

    for (i, meaning) in meanings.iter().enumerate() {
        let prefix = format!("meanings[{}]", i);
        if meaning.meaning.trim().is_empty() {
            errors.insert(format!("{}.meaning", prefix), "Meaning text is required".to_string());
        }
        if let Some(code) = meaning.categories.iter().find(|c| !is_category(c)) {
            errors.insert(
                format!("{}.categories", prefix),
                format!("Unknown grammatical category '{}'", code),
            );
        }
        if let Some(code) = meaning.styles.iter().find(|s| !is_style(s)) {
            errors.insert(format!("{}.styles", prefix), format!("Unknown usage style '{}'", code));
        }
    }
}

/// Trims free-text fields and drops empty optional values.
pub fn tidy_meanings(meanings: &mut [Meaning]) {
    for meaning in meanings.iter_mut() {
        meaning.meaning = meaning.meaning.trim().to_string();
        for field in [
            &mut meaning.origin,
            &mut meaning.remission,
            &mut meaning.observation,
            &mut meaning.variant,
            &mut meaning.dictionary,
        ] {
            *field = tidy_optional(field.take());
        }
        meaning.examples.retain(|e| !e.value.trim().is_empty());
    }
}

pub fn tidy_optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
