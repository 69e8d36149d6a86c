use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::normalize::letter_for;
use crate::types::WordStatus;

fn default_letter() -> char {
    '#'
}

fn default_status() -> WordStatus {
    WordStatus::Published
}

/// A dictionary entry: one lemma with its numbered meanings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    #[serde(default)]
    pub id: i64,
    pub lemma: String,
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default = "default_letter")]
    pub letter: char,
    #[serde(default = "default_status")]
    pub status: WordStatus,
    #[serde(default)]
    pub created_by: Option<Uuid>,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Meaning {
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub remission: Option<String>,
    pub meaning: String,
    #[serde(default)]
    pub styles: Vec<String>,
    #[serde(default)]
    pub observation: Option<String>,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub dictionary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Example {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
}

impl Word {
    /// Recomputes the derived fields after the lemma or meanings change.
    pub fn refresh_derived(&mut self) {
        self.letter = letter_for(&self.lemma);
        renumber(&mut self.meanings);
    }

    pub fn summary(&self) -> WordSummary {
        let first = self.meanings.first();
        WordSummary {
            id: self.id,
            lemma: self.lemma.clone(),
            letter: self.letter,
            status: self.status,
            categories: first.map(|m| m.categories.clone()).unwrap_or_default(),
            styles: first.map(|m| m.styles.clone()).unwrap_or_default(),
            excerpt: first.map(|m| excerpt(&m.meaning)).unwrap_or_default(),
            meaning_count: self.meanings.len(),
            assigned_to: self.assigned_to,
        }
    }
}

/// Compact listing row for search results and letter pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordSummary {
    pub id: i64,
    pub lemma: String,
    pub letter: char,
    pub status: WordStatus,
    pub categories: Vec<String>,
    pub styles: Vec<String>,
    pub excerpt: String,
    pub meaning_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Uuid>,
}

const EXCERPT_CHARS: usize = 160;

fn excerpt(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= EXCERPT_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(EXCERPT_CHARS).collect();
    format!("{}…", cut.trim_end())
}

pub fn renumber(meanings: &mut [Meaning]) {
    for (i, meaning) in meanings.iter_mut().enumerate() {
        meaning.number = (i + 1) as u32;
    }
}

/// Payload for creating a word in editor mode
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewWord {
    pub lemma: String,
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
}

/// Payload for editing a word; absent fields stay as they are
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WordUpdate {
    #[serde(default)]
    pub lemma: Option<String>,
    /// An empty string clears the root.
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub meanings: Option<Vec<Meaning>>,
}

/// Editor comment attached to a word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub word_id: i64,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub note: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_derived_sets_letter_and_numbers() {
        let mut word: Word = serde_json::from_value(serde_json::json!({
            "lemma": "Ñache",
            "meanings": [
                { "number": 7, "meaning": "Plato de sangre de cordero." },
                { "number": 7, "meaning": "Otro sentido." }
            ]
        }))
        .unwrap();
        word.refresh_derived();
        assert_eq!(word.letter, 'ñ');
        assert_eq!(word.meanings.iter().map(|m| m.number).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(word.status, WordStatus::Published);
    }

    #[test]
    fn summary_truncates_long_meanings() {
        let long = "a".repeat(400);
        let word = Word {
            id: 1,
            lemma: "al tiro".into(),
            root: None,
            letter: 'a',
            status: WordStatus::Draft,
            created_by: None,
            assigned_to: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            meanings: vec![Meaning { meaning: long, ..Default::default() }],
        };
        let summary = word.summary();
        assert!(summary.excerpt.ends_with('…'));
        assert_eq!(summary.excerpt.chars().count(), EXCERPT_CHARS + 1);
    }
}
