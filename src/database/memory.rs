use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::models::User;
use super::store::{lemma_key, DictionaryStore, StoreError};
use crate::dictionary::{Note, Word};

/// Everything the service stores, in the JSON layout of the corpus file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(default)]
    pub words: Vec<Word>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

// A corpus file is either the full object or a bare array of words
#[derive(Deserialize)]
#[serde(untagged)]
enum CorpusFile {
    Words(Vec<Word>),
    Full(Corpus),
}

impl Corpus {
    pub fn from_json(raw: &str) -> Result<Self, StoreError> {
        let corpus = match serde_json::from_str::<CorpusFile>(raw) {
            Ok(CorpusFile::Words(words)) => Corpus { words, ..Default::default() },
            Ok(CorpusFile::Full(corpus)) => corpus,
            // Re-parse as the full layout for a precise error message
            Err(_) => serde_json::from_str::<Corpus>(raw)?,
        };
        Ok(corpus.prepared())
    }

    /// Fills derived word fields and assigns ids to entries that lack one.
    fn prepared(mut self) -> Self {
        let mut next_id = self.words.iter().map(|w| w.id).max().unwrap_or(0).max(0) + 1;
        for word in &mut self.words {
            if word.id <= 0 {
                word.id = next_id;
                next_id += 1;
            }
            word.refresh_derived();
        }
        self
    }

    fn next_word_id(&self) -> i64 {
        self.words.iter().map(|w| w.id).max().unwrap_or(0) + 1
    }
}

/// In-memory backend, optionally mirrored to a JSON file after every change
pub struct MemoryStore {
    state: RwLock<Corpus>,
    path: Option<PathBuf>,
}

impl MemoryStore {
    pub fn new(corpus: Corpus) -> Self {
        Self { state: RwLock::new(corpus.prepared()), path: None }
    }

    pub fn from_words(words: Vec<Word>) -> Self {
        Self::new(Corpus { words, ..Default::default() })
    }

    /// Loads the corpus at `path`; a missing file starts an empty corpus.
    pub async fn open(path: impl AsRef<Path>, persist: bool) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let corpus = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Corpus::from_json(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Corpus file {} not found, starting with an empty corpus", path.display());
                Corpus::default()
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            "Loaded {} words, {} users and {} notes from {}",
            corpus.words.len(),
            corpus.users.len(),
            corpus.notes.len(),
            path.display()
        );

        Ok(Self {
            state: RwLock::new(corpus),
            path: if persist { Some(path) } else { None },
        })
    }

    pub async fn snapshot(&self) -> Corpus {
        self.state.read().await.clone()
    }

    // Called with the write lock held so concurrent saves cannot interleave.
    // `next` becomes live only once it is on disk.
    async fn commit(&self, live: &mut Corpus, next: Corpus) -> Result<(), StoreError> {
        self.persist(&next).await?;
        *live = next;
        Ok(())
    }

    async fn persist(&self, corpus: &Corpus) -> Result<(), StoreError> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(corpus)?;
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, path).await?;
        debug!("Persisted corpus to {}", path.display());
        Ok(())
    }
}

#[async_trait]
impl DictionaryStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn words(&self) -> Result<Vec<Word>, StoreError> {
        Ok(self.state.read().await.words.clone())
    }

    async fn word(&self, id: i64) -> Result<Option<Word>, StoreError> {
        Ok(self.state.read().await.words.iter().find(|w| w.id == id).cloned())
    }

    async fn insert_word(&self, mut word: Word) -> Result<Word, StoreError> {
        let mut corpus = self.state.write().await;
        let key = lemma_key(&word.lemma);
        if corpus.words.iter().any(|w| lemma_key(&w.lemma) == key) {
            return Err(StoreError::Conflict(format!("lemma '{}' already exists", word.lemma.trim())));
        }

        word.id = corpus.next_word_id();
        let mut next = corpus.clone();
        next.words.push(word.clone());
        self.commit(&mut corpus, next).await?;
        Ok(word)
    }

    async fn update_word(&self, word: Word) -> Result<Word, StoreError> {
        let mut corpus = self.state.write().await;
        let key = lemma_key(&word.lemma);
        if corpus.words.iter().any(|w| w.id != word.id && lemma_key(&w.lemma) == key) {
            return Err(StoreError::Conflict(format!("lemma '{}' already exists", word.lemma.trim())));
        }

        let mut next = corpus.clone();
        let slot = next
            .words
            .iter_mut()
            .find(|w| w.id == word.id)
            .ok_or_else(|| StoreError::NotFound(format!("word {}", word.id)))?;
        *slot = word.clone();
        self.commit(&mut corpus, next).await?;
        Ok(word)
    }

    async fn delete_word(&self, id: i64) -> Result<bool, StoreError> {
        let mut corpus = self.state.write().await;
        if !corpus.words.iter().any(|w| w.id == id) {
            return Ok(false);
        }
        let mut next = corpus.clone();
        next.words.retain(|w| w.id != id);
        next.notes.retain(|n| n.word_id != id);
        self.commit(&mut corpus, next).await?;
        Ok(true)
    }

    async fn users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.state.read().await.users.clone())
    }

    async fn user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.state.read().await.users.iter().find(|u| u.id == id).cloned())
    }

    async fn user_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        Ok(self.state.read().await.users.iter().find(|u| u.matches_login(login)).cloned())
    }

    async fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let mut corpus = self.state.write().await;
        if corpus.users.iter().any(|u| u.username.eq_ignore_ascii_case(&user.username)) {
            return Err(StoreError::Conflict(format!("username '{}' is taken", user.username)));
        }
        if corpus.users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(StoreError::Conflict(format!("email '{}' is taken", user.email)));
        }
        let mut next = corpus.clone();
        next.users.push(user.clone());
        self.commit(&mut corpus, next).await?;
        Ok(user)
    }

    async fn update_user(&self, user: User) -> Result<User, StoreError> {
        let mut corpus = self.state.write().await;
        let mut next = corpus.clone();
        let slot = next
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| StoreError::NotFound(format!("user {}", user.id)))?;
        *slot = user.clone();
        self.commit(&mut corpus, next).await?;
        Ok(user)
    }

    async fn notes(&self, word_id: i64) -> Result<Vec<Note>, StoreError> {
        let corpus = self.state.read().await;
        let mut notes: Vec<Note> = corpus.notes.iter().filter(|n| n.word_id == word_id).cloned().collect();
        notes.sort_by_key(|n| n.created_at);
        Ok(notes)
    }

    async fn insert_note(&self, note: Note) -> Result<Note, StoreError> {
        let mut corpus = self.state.write().await;
        if !corpus.words.iter().any(|w| w.id == note.word_id) {
            return Err(StoreError::NotFound(format!("word {}", note.word_id)));
        }
        let mut next = corpus.clone();
        next.notes.push(note.clone());
        self.commit(&mut corpus, next).await?;
        Ok(note)
    }

    async fn delete_note(&self, word_id: i64, note_id: Uuid) -> Result<bool, StoreError> {
        let mut corpus = self.state.write().await;
        if !corpus.notes.iter().any(|n| n.word_id == word_id && n.id == note_id) {
            return Ok(false);
        }
        let mut next = corpus.clone();
        next.notes.retain(|n| !(n.word_id == word_id && n.id == note_id));
        self.commit(&mut corpus, next).await?;
        Ok(true)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let _ = self.state.read().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Meaning;
    use crate::types::WordStatus;
    use chrono::Utc;

    fn word(lemma: &str) -> Word {
        let mut w = Word {
            id: 0,
            lemma: lemma.to_string(),
            root: None,
            letter: '#',
            status: WordStatus::Draft,
            created_by: None,
            assigned_to: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            meanings: vec![Meaning { meaning: "sentido".into(), ..Default::default() }],
        };
        w.refresh_derived();
        w
    }

    #[test]
    fn loads_bare_word_arrays() {
        let corpus = Corpus::from_json(r#"[{"lemma": "Chancho", "meanings": [{"meaning": "Cerdo."}]}]"#).unwrap();
        assert_eq!(corpus.words.len(), 1);
        assert_eq!(corpus.words[0].id, 1);
        assert_eq!(corpus.words[0].letter, 'c');
        assert!(corpus.users.is_empty());
    }

    #[test]
    fn loads_full_corpus_objects() {
        let corpus = Corpus::from_json(r#"{"words": [{"id": 7, "lemma": "once", "meanings": []}], "notes": []}"#).unwrap();
        assert_eq!(corpus.words[0].id, 7);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(Corpus::from_json("42"), Err(StoreError::Format(_))));
    }

    #[tokio::test]
    async fn lemma_conflicts_ignore_case() {
        let store = MemoryStore::from_words(vec![]);
        let first = store.insert_word(word("Fome")).await.unwrap();
        assert_eq!(first.id, 1);
        assert!(matches!(store.insert_word(word("fome")).await, Err(StoreError::Conflict(_))));
        // Accents make a different lemma
        assert!(store.insert_word(word("fomé")).await.is_ok());
    }

    #[tokio::test]
    async fn deleting_a_word_drops_its_notes() {
        let store = MemoryStore::from_words(vec![]);
        let w = store.insert_word(word("pega")).await.unwrap();
        store
            .insert_note(Note { id: Uuid::new_v4(), word_id: w.id, user_id: None, note: "revisar".into(), created_at: Utc::now() })
            .await
            .unwrap();
        assert!(store.delete_word(w.id).await.unwrap());
        assert!(store.notes(w.id).await.unwrap().is_empty());
        assert!(!store.delete_word(w.id).await.unwrap());
    }

    #[tokio::test]
    async fn persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("words.json");

        let store = MemoryStore::open(&path, true).await.unwrap();
        store.insert_word(word("cuico")).await.unwrap();
        assert!(path.exists());

        let reopened = MemoryStore::open(&path, true).await.unwrap();
        let words = reopened.words().await.unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].lemma, "cuico");
    }

    #[tokio::test]
    async fn failed_save_leaves_memory_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.json");
        let store = MemoryStore::open(&path, true).await.unwrap();
        let kept = store.insert_word(word("cuico")).await.unwrap();

        // A directory where the temp file goes makes every save fail
        std::fs::create_dir(path.with_extension("json.tmp")).unwrap();

        assert!(store.insert_word(word("fome")).await.is_err());
        assert!(store.delete_word(kept.id).await.is_err());
        let words = store.words().await.unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].lemma, "cuico");
    }
}
