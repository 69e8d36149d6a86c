use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::types::Json;
use sqlx::Row;
use uuid::Uuid;

use super::models::User;
use super::store::{DictionaryStore, StoreError};
use crate::auth::Role;
use crate::dictionary::{Meaning, Note, Word};
use crate::types::WordStatus;

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL,
        email TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL,
        active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    "CREATE UNIQUE INDEX IF NOT EXISTS users_username_key ON users (lower(username))",
    "CREATE UNIQUE INDEX IF NOT EXISTS users_email_key ON users (lower(email))",
    r#"CREATE TABLE IF NOT EXISTS words (
        id BIGSERIAL PRIMARY KEY,
        lemma TEXT NOT NULL,
        root TEXT,
        letter TEXT NOT NULL,
        status TEXT NOT NULL,
        created_by UUID REFERENCES users(id) ON DELETE SET NULL,
        assigned_to UUID REFERENCES users(id) ON DELETE SET NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        meanings JSONB NOT NULL DEFAULT '[]'
    )"#,
    "CREATE UNIQUE INDEX IF NOT EXISTS words_lemma_key ON words (lower(lemma))",
    r#"CREATE TABLE IF NOT EXISTS notes (
        id UUID PRIMARY KEY,
        word_id BIGINT NOT NULL REFERENCES words(id) ON DELETE CASCADE,
        user_id UUID REFERENCES users(id) ON DELETE SET NULL,
        note TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
];

const WORD_COLUMNS: &str =
    "id, lemma, root, letter, status, created_by, assigned_to, created_at, updated_at, meanings";
const USER_COLUMNS: &str = "id, username, email, password_hash, role, active, created_at";

/// PostgreSQL backend. Meanings are stored as a JSONB document per word.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the tables and indexes when they do not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

fn word_from_row(row: &PgRow) -> Result<Word, StoreError> {
    let status: String = row.try_get("status")?;
    let letter: String = row.try_get("letter")?;
    let Json(meanings): Json<Vec<Meaning>> = row.try_get("meanings")?;

    Ok(Word {
        id: row.try_get("id")?,
        lemma: row.try_get("lemma")?,
        root: row.try_get("root")?,
        letter: letter.chars().next().unwrap_or('#'),
        status: status.parse::<WordStatus>().map_err(StoreError::QueryError)?,
        created_by: row.try_get("created_by")?,
        assigned_to: row.try_get("assigned_to")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        meanings,
    })
}

fn user_from_row(row: &PgRow) -> Result<User, StoreError> {
    let role: String = row.try_get("role")?;
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        role: role.parse::<Role>().map_err(StoreError::QueryError)?,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
    })
}

fn note_from_row(row: &PgRow) -> Result<Note, StoreError> {
    Ok(Note {
        id: row.try_get("id")?,
        word_id: row.try_get("word_id")?,
        user_id: row.try_get("user_id")?,
        note: row.try_get("note")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Maps unique violations (SQLSTATE 23505) to a conflict.
fn conflict_or(err: sqlx::Error, what: impl FnOnce() -> String) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some("23505") {
            return StoreError::Conflict(what());
        }
    }
    StoreError::Sqlx(err)
}

#[async_trait]
impl DictionaryStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn words(&self) -> Result<Vec<Word>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {} FROM words", WORD_COLUMNS))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(word_from_row).collect()
    }

    async fn word(&self, id: i64) -> Result<Option<Word>, StoreError> {
        let row = sqlx::query(&format!("SELECT {} FROM words WHERE id = $1", WORD_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(word_from_row).transpose()
    }

    async fn insert_word(&self, word: Word) -> Result<Word, StoreError> {
        let sql = format!(
            "INSERT INTO words (lemma, root, letter, status, created_by, assigned_to, created_at, updated_at, meanings) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
            WORD_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&word.lemma)
            .bind(&word.root)
            .bind(word.letter.to_string())
            .bind(word.status.as_str())
            .bind(word.created_by)
            .bind(word.assigned_to)
            .bind(word.created_at)
            .bind(word.updated_at)
            .bind(Json(&word.meanings))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_or(e, || format!("lemma '{}' already exists", word.lemma.trim())))?;
        word_from_row(&row)
    }

    async fn update_word(&self, word: Word) -> Result<Word, StoreError> {
        let sql = format!(
            "UPDATE words SET lemma = $2, root = $3, letter = $4, status = $5, assigned_to = $6, \
             updated_at = $7, meanings = $8 WHERE id = $1 RETURNING {}",
            WORD_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(word.id)
            .bind(&word.lemma)
            .bind(&word.root)
            .bind(word.letter.to_string())
            .bind(word.status.as_str())
            .bind(word.assigned_to)
            .bind(word.updated_at)
            .bind(Json(&word.meanings))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_or(e, || format!("lemma '{}' already exists", word.lemma.trim())))?
            .ok_or_else(|| StoreError::NotFound(format!("word {}", word.id)))?;
        word_from_row(&row)
    }

    async fn delete_word(&self, id: i64) -> Result<bool, StoreError> {
        // notes go with the word through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM words WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn users(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {} FROM users ORDER BY username", USER_COLUMNS))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(user_from_row).collect()
    }

    async fn user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn user_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        let sql = format!(
            "SELECT {} FROM users WHERE lower(username) = lower($1) OR lower(email) = lower($1) LIMIT 1",
            USER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(login.trim())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (id, username, email, password_hash, role, active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.active)
            .bind(user.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_or(e, || format!("username '{}' or email '{}' is taken", user.username, user.email)))?;
        user_from_row(&row)
    }

    async fn update_user(&self, user: User) -> Result<User, StoreError> {
        let sql = format!(
            "UPDATE users SET password_hash = $2, role = $3, active = $4 WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(user.id)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.active)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("user {}", user.id)))?;
        user_from_row(&row)
    }

    async fn notes(&self, word_id: i64) -> Result<Vec<Note>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, word_id, user_id, note, created_at FROM notes WHERE word_id = $1 ORDER BY created_at",
        )
        .bind(word_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(note_from_row).collect()
    }

    async fn insert_note(&self, note: Note) -> Result<Note, StoreError> {
        let row = sqlx::query(
            "INSERT INTO notes (id, word_id, user_id, note, created_at) VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, word_id, user_id, note, created_at",
        )
        .bind(note.id)
        .bind(note.word_id)
        .bind(note.user_id)
        .bind(&note.note)
        .bind(note.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            // 23503: the word is gone
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23503") => {
                StoreError::NotFound(format!("word {}", note.word_id))
            }
            _ => StoreError::Sqlx(e),
        })?;
        note_from_row(&row)
    }

    async fn delete_note(&self, word_id: i64, note_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND word_id = $2")
            .bind(note_id)
            .bind(word_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
