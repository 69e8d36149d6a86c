use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::User;
use crate::dictionary::{Note, Word};

/// Errors from the storage backends
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Corpus file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corpus format error: {0}")]
    Format(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence seam for words, staff accounts and editor notes.
///
/// Search runs over the snapshot returned by [`DictionaryStore::words`]; backends only
/// need to load, store and enforce uniqueness.
#[async_trait]
pub trait DictionaryStore: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn words(&self) -> Result<Vec<Word>, StoreError>;

    async fn word(&self, id: i64) -> Result<Option<Word>, StoreError>;

    /// Stores a new word under a fresh id. Lemmas are unique ignoring case.
    async fn insert_word(&self, word: Word) -> Result<Word, StoreError>;

    async fn update_word(&self, word: Word) -> Result<Word, StoreError>;

    /// Removes a word and its notes. Returns false when nothing was deleted.
    async fn delete_word(&self, id: i64) -> Result<bool, StoreError>;

    async fn users(&self) -> Result<Vec<User>, StoreError>;

    async fn user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn user_by_login(&self, login: &str) -> Result<Option<User>, StoreError>;

    /// Usernames and emails are unique ignoring case.
    async fn insert_user(&self, user: User) -> Result<User, StoreError>;

    async fn update_user(&self, user: User) -> Result<User, StoreError>;

    async fn notes(&self, word_id: i64) -> Result<Vec<Note>, StoreError>;

    async fn insert_note(&self, note: Note) -> Result<Note, StoreError>;

    async fn delete_note(&self, word_id: i64, note_id: Uuid) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

pub(crate) fn lemma_key(lemma: &str) -> String {
    lemma.trim().to_lowercase()
}
