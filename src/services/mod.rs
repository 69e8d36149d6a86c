pub mod dictionary_service;
pub mod user_service;
pub mod word_of_the_day;

pub use dictionary_service::{CorpusStats, DictionaryService, ImportSummary};
pub use user_service::UserService;

use thiserror::Error;

use crate::auth::password::BcryptError;
use crate::database::StoreError;
use crate::dictionary::validate::FieldErrors;
use crate::filter::FilterError;
use crate::types::WordStatus;

/// Errors raised by the dictionary and user services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("{message}")]
    Validation { message: String, field_errors: FieldErrors },

    #[error("Cannot move a word from {from} to {to}")]
    InvalidTransition { from: WordStatus, to: WordStatus },

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] BcryptError),

    #[error(transparent)]
    Store(StoreError),
}

impl ServiceError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut field_errors = FieldErrors::new();
        let message = message.into();
        field_errors.insert(field.to_string(), message.clone());
        ServiceError::Validation { message, field_errors }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ServiceError::NotFound(what),
            StoreError::Conflict(what) => ServiceError::Conflict(what),
            other => ServiceError::Store(other),
        }
    }
}
