use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::word_of_the_day;
use super::ServiceError;
use crate::auth::SessionUser;
use crate::config::AppConfig;
use crate::database::DictionaryStore;
use crate::dictionary::validate::{tidy_meanings, tidy_optional, validate_lemma, validate_meanings, FieldErrors};
use crate::dictionary::{normalize, NewWord, Note, Word, WordSummary, WordUpdate};
use crate::filter::{letter_groups, Filter, FilterError, LetterGroup, Pagination, SearchFilters, SearchResult};
use crate::types::{Visibility, WordStatus};

pub const MAX_NOTE_CHARS: usize = 2000;

/// Outcome of a bulk corpus import
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorpusStats {
    pub backend: &'static str,
    pub words: usize,
    pub by_status: BTreeMap<WordStatus, usize>,
    pub meanings: usize,
    pub users: usize,
}

/// Search, browsing and curation of dictionary entries.
///
/// Reads take a snapshot of the corpus from the store and filter it in memory.
/// Writes check the caller's role first, then validate, then hand off to the store.
pub struct DictionaryService {
    store: Arc<dyn DictionaryStore>,
    config: Arc<AppConfig>,
}

impl DictionaryService {
    pub fn new(store: Arc<dyn DictionaryStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    pub async fn search(
        &self,
        filters: SearchFilters,
        pagination: Pagination,
        visibility: Visibility,
    ) -> Result<SearchResult<WordSummary>, ServiceError> {
        let words = self.store.words().await?;

        let mut filter = Filter::new(visibility, &self.config.search);
        filter
            .assign(filters)?
            .paginate(pagination.page, pagination.page_size)?;

        Ok(filter.apply(&words).map(Word::summary))
    }

    /// Exact lemma first, then a match on the folded lemma (accents and case ignored).
    pub async fn word_by_lemma(&self, lemma: &str, visibility: Visibility) -> Result<Word, ServiceError> {
        let words = self.store.words().await?;
        let wanted = lemma.trim();
        let folded = normalize(wanted);

        let mut visible = words.iter().filter(|w| visibility.allows(w.status));
        visible
            .clone()
            .find(|w| w.lemma == wanted)
            .or_else(|| visible.find(|w| normalize(&w.lemma) == folded))
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("word '{}'", wanted)))
    }

    pub async fn word(&self, id: i64) -> Result<Word, ServiceError> {
        self.store
            .word(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("word {}", id)))
    }

    pub async fn letter_groups(&self, visibility: Visibility) -> Result<Vec<LetterGroup>, ServiceError> {
        let words = self.store.words().await?;
        Ok(letter_groups(&words, visibility))
    }

    pub async fn by_letter(
        &self,
        letter: &str,
        pagination: Pagination,
        visibility: Visibility,
    ) -> Result<SearchResult<WordSummary>, ServiceError> {
        let mut chars = letter.trim().chars();
        let (Some(first), None) = (chars.next(), chars.next()) else {
            return Err(FilterError::InvalidLetter(letter.to_string()).into());
        };

        let filters = SearchFilters { letters: vec![first], ..Default::default() };
        self.search(filters, pagination, visibility).await
    }

    /// The daily pick for `date`, or for today at the configured offset.
    pub async fn word_of_the_day(&self, date: Option<NaiveDate>) -> Result<(NaiveDate, Word), ServiceError> {
        let date = date.unwrap_or_else(|| word_of_the_day::today(self.config.daily.utc_offset_hours));
        let words = self.store.words().await?;
        word_of_the_day::select(&words, date)
            .cloned()
            .map(|word| (date, word))
            .ok_or_else(|| ServiceError::NotFound("no published words".to_string()))
    }

    pub async fn create_word(&self, session: &SessionUser, input: NewWord) -> Result<Word, ServiceError> {
        let NewWord { lemma, root, mut meanings, assigned_to } = input;

        tidy_meanings(&mut meanings);
        let mut errors = FieldErrors::new();
        validate_lemma(&lemma, &mut errors);
        validate_meanings(&meanings, &mut errors);
        if !errors.is_empty() {
            return Err(ServiceError::Validation { message: "Invalid word".to_string(), field_errors: errors });
        }

        let assigned_to = match assigned_to {
            Some(user_id) if session.role.can_assign() => Some(self.assignable_user(user_id).await?),
            Some(_) => {
                debug!("Ignoring assignee from {} who cannot assign", session.username);
                None
            }
            None => None,
        };

        let now = Utc::now();
        let mut word = Word {
            id: 0,
            lemma: lemma.trim().to_string(),
            root: tidy_optional(root),
            letter: '#',
            status: WordStatus::Draft,
            created_by: Some(session.id),
            assigned_to,
            created_at: now,
            updated_at: now,
            meanings,
        };
        word.refresh_derived();

        let word = self.store.insert_word(word).await?;
        info!("Word '{}' ({}) created by {}", word.lemma, word.id, session.username);
        Ok(word)
    }

    pub async fn update_word(&self, session: &SessionUser, id: i64, update: WordUpdate) -> Result<Word, ServiceError> {
        let mut word = self.word(id).await?;
        if !can_edit(session, &word) {
            return Err(ServiceError::Forbidden(format!("You cannot edit word {}", id)));
        }

        if let Some(lemma) = update.lemma {
            word.lemma = lemma.trim().to_string();
        }
        if let Some(root) = update.root {
            word.root = tidy_optional(Some(root));
        }
        if let Some(mut meanings) = update.meanings {
            tidy_meanings(&mut meanings);
            word.meanings = meanings;
        }

        let mut errors = FieldErrors::new();
        validate_lemma(&word.lemma, &mut errors);
        validate_meanings(&word.meanings, &mut errors);
        if !errors.is_empty() {
            return Err(ServiceError::Validation { message: "Invalid word".to_string(), field_errors: errors });
        }

        word.refresh_derived();
        word.updated_at = Utc::now();
        Ok(self.store.update_word(word).await?)
    }

    pub async fn set_status(&self, session: &SessionUser, id: i64, next: WordStatus) -> Result<Word, ServiceError> {
        let mut word = self.word(id).await?;
        if !word.status.can_transition_to(next) {
            return Err(ServiceError::InvalidTransition { from: word.status, to: next });
        }
        if !may_transition(session, &word, next) {
            return Err(ServiceError::Forbidden(format!(
                "Role {} cannot move a word from {} to {}",
                session.role, word.status, next
            )));
        }

        info!("Word {} moved from {} to {} by {}", id, word.status, next, session.username);
        word.status = next;
        word.updated_at = Utc::now();
        Ok(self.store.update_word(word).await?)
    }

    /// Sets or clears the reviewer assigned to a word.
    pub async fn assign(&self, session: &SessionUser, id: i64, user_id: Option<Uuid>) -> Result<Word, ServiceError> {
        if !session.role.can_assign() {
            return Err(ServiceError::Forbidden("You cannot assign words".to_string()));
        }
        let mut word = self.word(id).await?;
        word.assigned_to = match user_id {
            Some(user_id) => Some(self.assignable_user(user_id).await?),
            None => None,
        };
        word.updated_at = Utc::now();
        Ok(self.store.update_word(word).await?)
    }

    pub async fn delete_word(&self, session: &SessionUser, id: i64) -> Result<(), ServiceError> {
        if !session.role.can_delete_words() {
            return Err(ServiceError::Forbidden("You cannot delete words".to_string()));
        }
        if !self.store.delete_word(id).await? {
            return Err(ServiceError::NotFound(format!("word {}", id)));
        }
        info!("Word {} deleted by {}", id, session.username);
        Ok(())
    }

    pub async fn notes(&self, word_id: i64) -> Result<Vec<Note>, ServiceError> {
        self.word(word_id).await?;
        Ok(self.store.notes(word_id).await?)
    }

    pub async fn add_note(&self, session: &SessionUser, word_id: i64, text: &str) -> Result<Note, ServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::field("note", "Note text is required"));
        }
        if text.chars().count() > MAX_NOTE_CHARS {
            return Err(ServiceError::field("note", format!("Note cannot exceed {} characters", MAX_NOTE_CHARS)));
        }

        let note = Note {
            id: Uuid::new_v4(),
            word_id,
            user_id: Some(session.id),
            note: text.to_string(),
            created_at: Utc::now(),
        };
        Ok(self.store.insert_note(note).await?)
    }

    /// Authors may delete their own notes; user managers may delete any.
    pub async fn delete_note(&self, session: &SessionUser, word_id: i64, note_id: Uuid) -> Result<(), ServiceError> {
        let note = self
            .store
            .notes(word_id)
            .await?
            .into_iter()
            .find(|n| n.id == note_id)
            .ok_or_else(|| ServiceError::NotFound(format!("note {}", note_id)))?;

        if note.user_id != Some(session.id) && !session.role.can_manage_users() {
            return Err(ServiceError::Forbidden("Only the author can delete this note".to_string()));
        }
        self.store.delete_note(word_id, note_id).await?;
        Ok(())
    }

    /// Inserts words from a corpus file. Incoming ids are ignored; duplicate lemmas are skipped.
    pub async fn import(&self, words: Vec<Word>) -> Result<ImportSummary, ServiceError> {
        let mut summary = ImportSummary::default();
        for mut word in words {
            word.id = 0;
            word.refresh_derived();
            match self.store.insert_word(word.clone()).await {
                Ok(_) => summary.imported += 1,
                Err(crate::database::StoreError::Conflict(_)) => summary.skipped.push(word.lemma),
                Err(e) => return Err(e.into()),
            }
        }
        info!("Imported {} words, skipped {}", summary.imported, summary.skipped.len());
        Ok(summary)
    }

    pub async fn stats(&self) -> Result<CorpusStats, ServiceError> {
        let words = self.store.words().await?;
        let users = self.store.users().await?;

        let mut by_status = BTreeMap::new();
        for word in &words {
            *by_status.entry(word.status).or_insert(0) += 1;
        }

        Ok(CorpusStats {
            backend: self.store.backend(),
            words: words.len(),
            by_status,
            meanings: words.iter().map(|w| w.meanings.len()).sum(),
            users: users.len(),
        })
    }

    async fn assignable_user(&self, user_id: Uuid) -> Result<Uuid, ServiceError> {
        match self.store.user(user_id).await? {
            Some(user) if user.active => Ok(user.id),
            Some(_) => Err(ServiceError::field("assigned_to", "User is inactive")),
            None => Err(ServiceError::field("assigned_to", "User does not exist")),
        }
    }
}

/// Editors and up edit anything; lexicographers edit what they created or were assigned.
pub fn can_edit(session: &SessionUser, word: &Word) -> bool {
    session.role.can_edit_any()
        || word.created_by == Some(session.id)
        || word.assigned_to == Some(session.id)
}

fn may_transition(session: &SessionUser, word: &Word, next: WordStatus) -> bool {
    use WordStatus::*;
    match (word.status, next) {
        (InReview, Reviewed) | (InReview, Rejected) => session.role.can_review(),
        (Reviewed, Published) | (Published, Archived) => session.role.can_publish(),
        // Pulling a published or archived entry back to draft hides it from the public
        (Published, Draft) | (Archived, Draft) => session.role.can_publish(),
        _ => can_edit(session, word),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::database::models::User;
    use crate::database::{Corpus, MemoryStore};
    use crate::dictionary::Meaning;

    fn meaning(text: &str) -> Meaning {
        Meaning { meaning: text.to_string(), categories: vec!["adj.".into()], ..Default::default() }
    }

    fn word(id: i64, lemma: &str, status: WordStatus, text: &str) -> Word {
        Word {
            id,
            lemma: lemma.to_string(),
            root: None,
            letter: '#',
            status,
            created_by: None,
            assigned_to: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            meanings: vec![meaning(text)],
        }
    }

    fn user(name: &str, role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            username: name.to_string(),
            email: format!("{}@duech.cl", name),
            password_hash: String::new(),
            role,
            active: true,
            created_at: Utc::now(),
        }
    }

    fn session(user: &User) -> SessionUser {
        SessionUser { id: user.id, username: user.username.clone(), role: user.role }
    }

    struct Fixture {
        service: DictionaryService,
        lexicographer: User,
        editor: User,
        admin: User,
    }

    fn fixture() -> Fixture {
        let lexicographer = user("lexi", Role::Lexicographer);
        let editor = user("edith", Role::Editor);
        let admin = user("ada", Role::Admin);
        let corpus = Corpus {
            words: vec![
                word(1, "cachai", WordStatus::Published, "¿Entiendes?"),
                word(2, "Fome", WordStatus::Published, "Aburrido, sin gracia."),
                word(3, "pololo", WordStatus::Draft, "Novio."),
            ],
            users: vec![lexicographer.clone(), editor.clone(), admin.clone()],
            notes: vec![],
        };
        let store: Arc<dyn DictionaryStore> = Arc::new(MemoryStore::new(corpus));
        Fixture {
            service: DictionaryService::new(store, Arc::new(AppConfig::development())),
            lexicographer,
            editor,
            admin,
        }
    }

    fn new_word(lemma: &str) -> NewWord {
        NewWord { lemma: lemma.to_string(), meanings: vec![meaning("Algo.")], ..Default::default() }
    }

    #[tokio::test]
    async fn public_lookup_hides_drafts() {
        let f = fixture();
        assert!(f.service.word_by_lemma("pololo", Visibility::Public).await.is_err());
        assert_eq!(f.service.word_by_lemma("pololo", Visibility::Editor).await.unwrap().id, 3);
        // Folded fallback
        assert_eq!(f.service.word_by_lemma("FOME", Visibility::Public).await.unwrap().id, 2);
    }

    #[tokio::test]
    async fn by_letter_rejects_multi_character_input() {
        let f = fixture();
        let err = f.service.by_letter("ab", Pagination::default(), Visibility::Public).await.unwrap_err();
        assert!(matches!(err, ServiceError::Filter(FilterError::InvalidLetter(_))));

        let page = f.service.by_letter("F", Pagination::default(), Visibility::Public).await.unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn create_word_starts_as_draft_owned_by_session() {
        let f = fixture();
        let mut input = new_word("  al tiro ");
        input.assigned_to = Some(f.editor.id);

        let created = f.service.create_word(&session(&f.lexicographer), input).await.unwrap();
        assert_eq!(created.status, WordStatus::Draft);
        assert_eq!(created.lemma, "al tiro");
        assert_eq!(created.letter, 'a');
        assert_eq!(created.created_by, Some(f.lexicographer.id));
        // Lexicographers cannot assign
        assert_eq!(created.assigned_to, None);
    }

    #[tokio::test]
    async fn create_word_reports_conflicts_and_field_errors() {
        let f = fixture();
        let err = f.service.create_word(&session(&f.editor), new_word("fome")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let err = f
            .service
            .create_word(&session(&f.editor), NewWord { lemma: " ".into(), ..Default::default() })
            .await
            .unwrap_err();
        match err {
            ServiceError::Validation { field_errors, .. } => {
                assert!(field_errors.contains_key("lemma"));
                assert!(field_errors.contains_key("meanings"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn lexicographers_edit_only_their_words() {
        let f = fixture();
        let lexi = session(&f.lexicographer);
        let update = WordUpdate { root: Some("raíz".into()), ..Default::default() };
        assert!(matches!(
            f.service.update_word(&lexi, 3, update.clone()).await,
            Err(ServiceError::Forbidden(_))
        ));

        let own = f.service.create_word(&lexi, new_word("chato")).await.unwrap();
        let updated = f.service.update_word(&lexi, own.id, update).await.unwrap();
        assert_eq!(updated.root.as_deref(), Some("raíz"));
    }

    #[tokio::test]
    async fn status_changes_need_permission_and_a_valid_transition() {
        let f = fixture();
        let lexi = session(&f.lexicographer);
        let editor = session(&f.editor);
        let own = f.service.create_word(&lexi, new_word("chato")).await.unwrap();

        let err = f.service.set_status(&lexi, own.id, WordStatus::Published).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition { .. }));

        f.service.set_status(&lexi, own.id, WordStatus::InReview).await.unwrap();
        let err = f.service.set_status(&lexi, own.id, WordStatus::Reviewed).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        f.service.set_status(&editor, own.id, WordStatus::Reviewed).await.unwrap();
        let published = f.service.set_status(&editor, own.id, WordStatus::Published).await.unwrap();
        assert!(published.status.is_public());
    }

    #[tokio::test]
    async fn assignment_requires_an_active_user() {
        let f = fixture();
        let editor = session(&f.editor);
        let word = f.service.assign(&editor, 3, Some(f.lexicographer.id)).await.unwrap();
        assert_eq!(word.assigned_to, Some(f.lexicographer.id));

        // The assignee may now edit it
        let lexi = session(&f.lexicographer);
        assert!(f.service.update_word(&lexi, 3, WordUpdate::default()).await.is_ok());

        assert!(matches!(
            f.service.assign(&editor, 3, Some(Uuid::new_v4())).await,
            Err(ServiceError::Validation { .. })
        ));
        assert!(matches!(f.service.assign(&lexi, 3, None).await, Err(ServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn notes_are_trimmed_and_owned() {
        let f = fixture();
        let lexi = session(&f.lexicographer);
        let editor = session(&f.editor);

        assert!(matches!(f.service.add_note(&lexi, 1, "   ").await, Err(ServiceError::Validation { .. })));
        assert!(f.service.add_note(&lexi, 1, &"x".repeat(MAX_NOTE_CHARS + 1)).await.is_err());
        assert!(matches!(f.service.add_note(&lexi, 99, "hola").await, Err(ServiceError::NotFound(_))));

        let note = f.service.add_note(&lexi, 1, "  revisar acepción  ").await.unwrap();
        assert_eq!(note.note, "revisar acepción");

        assert!(matches!(f.service.delete_note(&editor, 1, note.id).await, Err(ServiceError::Forbidden(_))));
        f.service.delete_note(&session(&f.admin), 1, note.id).await.unwrap();
        assert!(f.service.notes(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn only_admins_delete_words() {
        let f = fixture();
        assert!(matches!(
            f.service.delete_word(&session(&f.editor), 1).await,
            Err(ServiceError::Forbidden(_))
        ));
        f.service.delete_word(&session(&f.admin), 1).await.unwrap();
        assert!(matches!(f.service.word(1).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn import_skips_duplicate_lemmas() {
        let f = fixture();
        let summary = f
            .service
            .import(vec![
                word(1, "cachai", WordStatus::Published, "dup"),
                word(1, "guagua", WordStatus::Published, "Bebé."),
            ])
            .await
            .unwrap();
        assert_eq!(summary.imported, 1);
        assert_eq!(summary.skipped, vec!["cachai".to_string()]);

        let stats = f.service.stats().await.unwrap();
        assert_eq!(stats.words, 4);
        assert_eq!(stats.by_status[&WordStatus::Published], 3);
    }
}
