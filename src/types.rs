/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Editorial workflow state of a word entry.
/// Only `Published` entries are visible outside editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordStatus {
    Draft,
    InReview,
    Reviewed,
    Rejected,
    Published,
    Archived,
}

impl WordStatus {
    pub const ALL: [WordStatus; 6] = [
        WordStatus::Draft,
        WordStatus::InReview,
        WordStatus::Reviewed,
        WordStatus::Rejected,
        WordStatus::Published,
        WordStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WordStatus::Draft => "draft",
            WordStatus::InReview => "in_review",
            WordStatus::Reviewed => "reviewed",
            WordStatus::Rejected => "rejected",
            WordStatus::Published => "published",
            WordStatus::Archived => "archived",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WordStatus::Draft => "Borrador",
            WordStatus::InReview => "En revisión",
            WordStatus::Reviewed => "Revisado",
            WordStatus::Rejected => "Rechazado",
            WordStatus::Published => "Publicado",
            WordStatus::Archived => "Archivado",
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, WordStatus::Published)
    }

    pub fn can_transition_to(&self, next: WordStatus) -> bool {
        use WordStatus::*;
        matches!(
            (self, next),
            (Draft, InReview)
                | (InReview, Reviewed)
                | (InReview, Rejected)
                | (InReview, Draft)
                | (Rejected, Draft)
                | (Reviewed, Published)
                | (Reviewed, Draft)
                | (Published, Archived)
                | (Published, Draft)
                | (Archived, Draft)
        )
    }
}

impl fmt::Display for WordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WordStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| format!("unknown word status '{}'", s))
    }
}

/// Which corpus slice a caller may see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Editor,
}

impl Visibility {
    pub fn allows(&self, status: WordStatus) -> bool {
        match self {
            Visibility::Public => status.is_public(),
            Visibility::Editor => true,
        }
    }
}
